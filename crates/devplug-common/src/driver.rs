//! The plugging-driver lifecycle contract.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::PluggingResult;
use crate::outcome::Outcome;
use crate::types::{HostingDevice, HostingDeviceResources, MgmtContext, Port, PortAllocation};

/// Lifecycle contract between the hosting-device orchestrator and a
/// plugging driver.
///
/// A plugging driver knows how to provision, discover and tear down the
/// network resources of one class of hosting device, and how to plug
/// logical ports into and out of its instances. The orchestrator decides
/// when devices come and go and which logical ports to plug; the driver
/// owns only the calling discipline around the registry and the compute
/// service.
///
/// # Error policy
///
/// Failure handling is deliberately asymmetric. Creation is loud:
/// [`create_resources`](PluggingDriver::create_resources) logs a registry
/// failure, cleans up and returns a bundle without a management port.
/// Deletion and connectivity changes are quiet: they return an [`Outcome`]
/// and never an error, because the orchestration above depends on teardown
/// calls not raising. Discovery and allocation propagate their errors.
#[async_trait]
pub trait PluggingDriver: Send + Sync {
    /// Returns the driver name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Creates the registry resources for a new hosting device.
    ///
    /// When `mgmt_context` names a management network and `tenant_id` is
    /// non-empty, a management port is created there; otherwise the device
    /// gets no dedicated management interface, which is a valid outcome.
    /// `complementary_id` tags the port so it can be found again before
    /// the compute instance id is known. `max_hosted` is the number of
    /// logical resources the device may host, for drivers that reserve
    /// data-plane ports up front.
    async fn create_resources(
        &self,
        ctx: &RequestContext,
        complementary_id: &str,
        tenant_id: &str,
        mgmt_context: Option<&MgmtContext>,
        max_hosted: u32,
    ) -> HostingDeviceResources;

    /// Returns the registry resources belonging to a hosting device,
    /// looked up by instance id or complementary id.
    async fn get_resources(
        &self,
        ctx: &RequestContext,
        hosting_device_id: &str,
        complementary_id: &str,
        tenant_id: &str,
        mgmt_nw_id: &str,
    ) -> PluggingResult<HostingDeviceResources>;

    /// Deletes the registry resources of a hosting device. Best-effort
    /// and idempotent; never fails.
    async fn delete_resources(
        &self,
        ctx: &RequestContext,
        tenant_id: &str,
        mgmt_port: Option<&Port>,
    ) -> Outcome;

    /// Establishes connectivity for a logical port by hot-plugging its
    /// interface into the hosting device. Best-effort; never fails.
    async fn setup_connectivity(
        &self,
        ctx: &RequestContext,
        port: &Port,
        hosting_device_id: &str,
    ) -> Outcome;

    /// Removes connectivity for a logical port by hot-unplugging its
    /// interface from the hosting device. Best-effort; never fails.
    async fn teardown_connectivity(
        &self,
        ctx: &RequestContext,
        port: Option<&Port>,
        hosting_device_id: &str,
    ) -> Outcome;

    /// Annotates hosting-port metadata for a logical port.
    ///
    /// Extension hook for drivers that expose extra binding information
    /// (VLAN tags, trunk membership) to the configuration agent. Drivers
    /// with nothing to add leave `hosting_info` untouched.
    async fn extend_hosting_port_info(
        &self,
        ctx: &RequestContext,
        port: &Port,
        hosting_device: &HostingDevice,
        hosting_info: &mut HashMap<String, String>,
    );

    /// Allocates a hosting port to carry a logical port's traffic.
    async fn allocate_hosting_port(
        &self,
        ctx: &RequestContext,
        router_id: &str,
        port: &Port,
        network_type: &str,
        hosting_device_id: &str,
    ) -> PluggingResult<PortAllocation>;
}
