//! The VIF hot-plug plugging driver.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use devplug_common::{
    ComputeVifApi, HostingDevice, HostingDeviceResources, MgmtContext, Outcome, PluggingDriver,
    PluggingResult, Port, PortAllocation, PortRegistry, RequestContext,
};

use crate::config::{VifDriverConfig, DRIVER_NAME};
use crate::connectivity::ConnectivityMgr;
use crate::provision::ResourceProvisioner;
use crate::reconcile::ResourceReconciler;

/// Plugging driver for hosting devices whose compute service supports
/// hot-plugging virtual interfaces.
///
/// Pure composition: provisioning, discovery and connectivity each live in
/// their own component and the facade only delegates. Both clients are
/// injected at construction, so alternative registry or compute backends
/// (including the in-memory test fakes) slot in without touching driver
/// logic.
pub struct VifHotplugDriver {
    provisioner: ResourceProvisioner,
    reconciler: ResourceReconciler,
    connectivity: ConnectivityMgr,
}

impl VifHotplugDriver {
    /// Creates a driver over the given registry and compute clients.
    pub fn new(
        registry: Arc<dyn PortRegistry>,
        compute: Arc<dyn ComputeVifApi>,
        config: VifDriverConfig,
    ) -> Self {
        Self {
            provisioner: ResourceProvisioner::new(registry.clone(), &config),
            reconciler: ResourceReconciler::new(registry.clone()),
            connectivity: ConnectivityMgr::new(registry, compute, config.admin_tenant_id),
        }
    }
}

#[async_trait]
impl PluggingDriver for VifHotplugDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    async fn create_resources(
        &self,
        ctx: &RequestContext,
        complementary_id: &str,
        tenant_id: &str,
        mgmt_context: Option<&MgmtContext>,
        max_hosted: u32,
    ) -> HostingDeviceResources {
        self.provisioner
            .create_resources(ctx, complementary_id, tenant_id, mgmt_context, max_hosted)
            .await
    }

    async fn get_resources(
        &self,
        ctx: &RequestContext,
        hosting_device_id: &str,
        complementary_id: &str,
        tenant_id: &str,
        mgmt_nw_id: &str,
    ) -> PluggingResult<HostingDeviceResources> {
        self.reconciler
            .get_resources(ctx, hosting_device_id, complementary_id, tenant_id, mgmt_nw_id)
            .await
    }

    async fn delete_resources(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        mgmt_port: Option<&Port>,
    ) -> Outcome {
        self.provisioner
            .delete_resources(ctx, tenant_id, mgmt_port)
            .await
    }

    async fn setup_connectivity(
        &self,
        ctx: &RequestContext,
        port: &Port,
        hosting_device_id: &str,
    ) -> Outcome {
        self.connectivity
            .setup_connectivity(ctx, port, hosting_device_id)
            .await
    }

    async fn teardown_connectivity(
        &self,
        ctx: &RequestContext,
        port: Option<&Port>,
        hosting_device_id: &str,
    ) -> Outcome {
        self.connectivity
            .teardown_connectivity(ctx, port, hosting_device_id)
            .await
    }

    async fn extend_hosting_port_info(
        &self,
        ctx: &RequestContext,
        port: &Port,
        hosting_device: &HostingDevice,
        hosting_info: &mut HashMap<String, String>,
    ) {
        self.connectivity
            .extend_hosting_port_info(ctx, port, hosting_device, hosting_info)
            .await
    }

    async fn allocate_hosting_port(
        &self,
        ctx: &RequestContext,
        router_id: &str,
        port: &Port,
        network_type: &str,
        hosting_device_id: &str,
    ) -> PluggingResult<PortAllocation> {
        self.connectivity
            .allocate_hosting_port(ctx, router_id, port, network_type, hosting_device_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use devplug_testkit::{MemoryRegistry, RecordingCompute};

    use super::*;

    #[tokio::test]
    async fn test_driver_name() {
        let driver = VifHotplugDriver::new(
            Arc::new(MemoryRegistry::new()),
            Arc::new(RecordingCompute::new()),
            VifDriverConfig::new("L3AdminTenant"),
        );
        assert_eq!(driver.name(), "vif-hotplug");
    }

    #[tokio::test]
    async fn test_driver_is_object_safe() {
        let driver: Arc<dyn PluggingDriver> = Arc::new(VifHotplugDriver::new(
            Arc::new(MemoryRegistry::new()),
            Arc::new(RecordingCompute::new()),
            VifDriverConfig::new("L3AdminTenant"),
        ));
        let ctx = RequestContext::for_tenant("tenant-a");
        let resources = driver
            .create_resources(&ctx, "csr-0042", "tenant-a", None, 1)
            .await;
        assert_eq!(resources.mgmt_port, None);
    }
}
