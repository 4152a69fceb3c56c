//! Logical-port connectivity through interface hot-plug.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, instrument};

use devplug_common::{
    ComputeVifApi, HostingDevice, Outcome, PluggingError, PluggingResult, Port, PortAllocation,
    PortRegistry, PortUpdate, RequestContext,
};

/// Plugs logical ports into and out of hosting-device instances.
///
/// Setup and teardown report their failures only through logs and the
/// returned [`Outcome`]: the orchestration above depends on these calls
/// never raising, so a failed plug degrades the device rather than the
/// control flow.
pub struct ConnectivityMgr {
    registry: Arc<dyn PortRegistry>,
    compute: Arc<dyn ComputeVifApi>,
    admin_tenant_id: String,
}

impl ConnectivityMgr {
    /// Creates a connectivity manager over the given clients.
    pub fn new(
        registry: Arc<dyn PortRegistry>,
        compute: Arc<dyn ComputeVifApi>,
        admin_tenant_id: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            compute,
            admin_tenant_id: admin_tenant_id.into(),
        }
    }

    /// Hot-plugs the interface of a logical port into a hosting device.
    ///
    /// The port belongs to an end-user tenant at this point, so it is
    /// first re-homed to the administrative tenant with cleared device
    /// bindings, under an elevated context. The attach is only attempted
    /// after a successful reset; a failure in either step is logged and
    /// the port is abandoned.
    #[instrument(
        skip_all,
        fields(request_id = %ctx.request_id, port_id = %port.id, hosting_device_id = %hosting_device_id)
    )]
    pub async fn setup_connectivity(
        &self,
        ctx: &RequestContext,
        port: &Port,
        hosting_device_id: &str,
    ) -> Outcome {
        // Clear the device binding and hand the port to the administrative
        // tenant so the infrastructure layer may attach it.
        let reset = PortUpdate {
            device_id: Some(String::new()),
            device_owner: Some(String::new()),
            tenant_id: Some(self.admin_tenant_id.clone()),
        };
        if let Err(e) = self
            .registry
            .update_port(&ctx.elevated(), &port.id, reset)
            .await
        {
            error!(
                "Failed to reset ownership of port {} before attaching it to hosting device {} \
                 due to error {}",
                port.id, hosting_device_id, e
            );
            return Outcome::Abandoned;
        }
        match self
            .compute
            .interface_attach(hosting_device_id, &port.id)
            .await
        {
            Ok(()) => {
                debug!("Setup logical port completed for port {}", port.id);
                Outcome::Completed
            }
            Err(e) => {
                error!(
                    "Failed to attach interface corresponding to port {} on hosting device {} \
                     due to error {}",
                    port.id, hosting_device_id, e
                );
                Outcome::Abandoned
            }
        }
    }

    /// Hot-unplugs the interface of a logical port from a hosting device.
    ///
    /// A missing port reference or an empty port id is logged and skipped
    /// without contacting the compute service; teardown runs in cleanup
    /// paths where the record may already be partially gone.
    #[instrument(
        skip_all,
        fields(request_id = %ctx.request_id, hosting_device_id = %hosting_device_id)
    )]
    pub async fn teardown_connectivity(
        &self,
        ctx: &RequestContext,
        port: Option<&Port>,
        hosting_device_id: &str,
    ) -> Outcome {
        let Some(port) = port.filter(|p| !p.id.is_empty()) else {
            error!(
                "Port id is missing! Cannot remove the port from hosting device {}",
                hosting_device_id
            );
            return Outcome::Skipped;
        };
        match self
            .compute
            .interface_detach(hosting_device_id, &port.id)
            .await
        {
            Ok(()) => {
                debug!("Done teardown of logical port connectivity for port {}", port.id);
                Outcome::Completed
            }
            Err(e) => {
                error!(
                    "Failed to detach interface corresponding to port {} on hosting device {} \
                     due to error {}",
                    port.id, hosting_device_id, e
                );
                Outcome::Abandoned
            }
        }
    }

    /// Annotates hosting-port metadata for a logical port.
    ///
    /// Hot-plug gives every logical port its own virtual interface, so
    /// there is nothing to annotate. The hook stays for driver variants
    /// that expose binding details to the configuration agent.
    pub async fn extend_hosting_port_info(
        &self,
        _ctx: &RequestContext,
        _port: &Port,
        _hosting_device: &HostingDevice,
        _hosting_info: &mut HashMap<String, String>,
    ) {
    }

    /// Allocates a hosting port to carry a logical port's traffic.
    ///
    /// With hot-plug the logical port is plugged directly, so it acts as
    /// its own hosting port and no VLAN tag is involved.
    pub async fn allocate_hosting_port(
        &self,
        _ctx: &RequestContext,
        _router_id: &str,
        port: &Port,
        _network_type: &str,
        _hosting_device_id: &str,
    ) -> PluggingResult<PortAllocation> {
        if port.id.is_empty() {
            return Err(PluggingError::missing_identifier("port id"));
        }
        Ok(PortAllocation {
            allocated_port_id: port.id.clone(),
            allocated_vlan: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use devplug_common::{AttachError, RegistryError};
    use devplug_testkit::{MemoryRegistry, RecordingCompute};

    use super::*;

    const ADMIN_TENANT: &str = "L3AdminTenant";

    struct Fixture {
        registry: Arc<MemoryRegistry>,
        compute: Arc<RecordingCompute>,
        mgr: ConnectivityMgr,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(MemoryRegistry::new());
        let compute = Arc::new(RecordingCompute::new());
        let mgr = ConnectivityMgr::new(registry.clone(), compute.clone(), ADMIN_TENANT);
        Fixture {
            registry,
            compute,
            mgr,
        }
    }

    fn tenant_port(id: &str) -> Port {
        Port {
            id: id.to_string(),
            network_id: "tenant-net".to_string(),
            tenant_id: "tenant-a".to_string(),
            device_id: "router-1".to_string(),
            device_owner: "network:router_interface".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_setup_resets_ownership_before_attach() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("port-1");
        f.registry.seed_port(port.clone());

        let outcome = f.mgr.setup_connectivity(&ctx, &port, "vm-1").await;
        assert_eq!(outcome, Outcome::Completed);

        let updates = f.registry.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].port_id, "port-1");
        assert_eq!(
            updates[0].update,
            PortUpdate {
                device_id: Some(String::new()),
                device_owner: Some(String::new()),
                tenant_id: Some(ADMIN_TENANT.to_string()),
            }
        );
        assert!(updates[0].elevated);

        let stored = f.registry.port("port-1").unwrap();
        assert_eq!(stored.tenant_id, ADMIN_TENANT);
        assert_eq!(stored.device_id, "");
        assert_eq!(stored.device_owner, "");

        assert_eq!(
            f.compute.attached(),
            vec![("vm-1".to_string(), "port-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_setup_reset_failure_skips_attach() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("port-1");
        f.registry.seed_port(port.clone());
        f.registry
            .fail_next_update(RegistryError::unavailable("registry down"));

        let outcome = f.mgr.setup_connectivity(&ctx, &port, "vm-1").await;

        assert_eq!(outcome, Outcome::Abandoned);
        assert!(f.compute.attached().is_empty());
    }

    #[tokio::test]
    async fn test_setup_attach_failure_is_swallowed() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("port-1");
        f.registry.seed_port(port.clone());
        f.compute
            .fail_next_attach(AttachError::operation("attach", "vm-1", "no free slot"));

        let outcome = f.mgr.setup_connectivity(&ctx, &port, "vm-1").await;

        assert_eq!(outcome, Outcome::Abandoned);
        assert!(f.compute.attached().is_empty());
        // The ownership reset still happened.
        assert_eq!(f.registry.port("port-1").unwrap().tenant_id, ADMIN_TENANT);
    }

    #[tokio::test]
    async fn test_teardown_detaches_interface() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("port-1");

        let outcome = f.mgr.teardown_connectivity(&ctx, Some(&port), "vm-1").await;

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(
            f.compute.detached(),
            vec![("vm-1".to_string(), "port-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_teardown_without_port_reference() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let outcome = f.mgr.teardown_connectivity(&ctx, None, "vm-1").await;
        assert_eq!(outcome, Outcome::Skipped);
        assert!(f.compute.detached().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_without_port_id() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("");
        let outcome = f.mgr.teardown_connectivity(&ctx, Some(&port), "vm-1").await;
        assert_eq!(outcome, Outcome::Skipped);
        assert!(f.compute.detached().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_detach_failure_is_swallowed() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("port-1");
        f.compute
            .fail_next_detach(AttachError::operation("detach", "vm-1", "timeout"));

        let outcome = f.mgr.teardown_connectivity(&ctx, Some(&port), "vm-1").await;

        assert_eq!(outcome, Outcome::Abandoned);
        assert!(f.compute.detached().is_empty());
    }

    #[tokio::test]
    async fn test_allocate_reuses_logical_port() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("port-1");
        let allocation = f
            .mgr
            .allocate_hosting_port(&ctx, "router-1", &port, "vlan", "vm-1")
            .await
            .unwrap();
        assert_eq!(allocation.allocated_port_id, "port-1");
        assert_eq!(allocation.allocated_vlan, None);
    }

    #[tokio::test]
    async fn test_allocate_rejects_missing_port_id() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("");
        let err = f
            .mgr
            .allocate_hosting_port(&ctx, "router-1", &port, "vlan", "vm-1")
            .await
            .unwrap_err();
        assert_eq!(err, PluggingError::missing_identifier("port id"));
    }

    #[tokio::test]
    async fn test_extend_hosting_port_info_adds_nothing() {
        let f = fixture();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = tenant_port("port-1");
        let device = HostingDevice {
            id: "vm-1".to_string(),
            ..Default::default()
        };
        let mut hosting_info = HashMap::new();
        f.mgr
            .extend_hosting_port_info(&ctx, &port, &device, &mut hosting_info)
            .await;
        assert!(hosting_info.is_empty());
    }
}
