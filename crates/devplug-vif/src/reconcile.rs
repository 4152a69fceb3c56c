//! Discovery of existing hosting-device resources.

use std::sync::Arc;

use tracing::{debug, instrument};

use devplug_common::{
    HostingDeviceResources, PluggingResult, PortFilter, PortRegistry, RequestContext,
};

/// Looks up the registry resources that belong to a hosting device.
///
/// Ports of a freshly provisioned device do not yet carry the compute
/// instance id in `device_id`; until the instance exists they are only
/// identifiable by the complementary id stored in `device_owner` at
/// creation. Discovery therefore matches on either key and resolves the
/// result by management-network membership.
pub struct ResourceReconciler {
    registry: Arc<dyn PortRegistry>,
}

impl ResourceReconciler {
    /// Creates a reconciler over the given registry client.
    pub fn new(registry: Arc<dyn PortRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the management port of a hosting device, if one exists.
    ///
    /// Queries ports bound to `hosting_device_id` or tagged with
    /// `complementary_id`, skips matches on networks other than
    /// `mgmt_nw_id`, and takes the first management-network port in
    /// registry enumeration order. A device is expected to have at most
    /// one management port; duplicates are not detected and the first hit
    /// wins. Registry failures propagate to the caller.
    #[instrument(
        skip_all,
        fields(request_id = %ctx.request_id, hosting_device_id = %hosting_device_id, complementary_id = %complementary_id)
    )]
    pub async fn get_resources(
        &self,
        ctx: &RequestContext,
        hosting_device_id: &str,
        complementary_id: &str,
        _tenant_id: &str,
        mgmt_nw_id: &str,
    ) -> PluggingResult<HostingDeviceResources> {
        let filter = PortFilter {
            device_id: Some(hosting_device_id.to_string()),
            device_owner: Some(complementary_id.to_string()),
        };
        let mut mgmt_port = None;
        for port in self.registry.query_ports(ctx, &filter).await? {
            if port.network_id != mgmt_nw_id {
                debug!(
                    "Ignoring hosting device port {} on network {} while assembling resources \
                     since it is not on the management network",
                    port.id, port.network_id
                );
            } else {
                // There should only be the management port.
                mgmt_port = Some(port);
                break;
            }
        }
        Ok(HostingDeviceResources {
            mgmt_port,
            ports: Vec::new(),
        })
    }
}
