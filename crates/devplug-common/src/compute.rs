//! Compute-side interface hot-plug client trait.

use async_trait::async_trait;

use crate::error::AttachResult;

/// Client for the compute service that hot-plugs interfaces into running
/// hosting-device instances.
///
/// Hot-plug attaches the virtual interface backing a port to an instance
/// without restarting it; hot-unplug removes one. The compute service is
/// the second independently failing subsystem a plugging driver
/// coordinates, and its failures are opaque to the driver.
#[async_trait]
pub trait ComputeVifApi: Send + Sync {
    /// Attaches the interface backing `port_id` to the given hosting
    /// device instance.
    async fn interface_attach(&self, hosting_device_id: &str, port_id: &str) -> AttachResult<()>;

    /// Detaches the interface backing `port_id` from the given hosting
    /// device instance.
    async fn interface_detach(&self, hosting_device_id: &str, port_id: &str) -> AttachResult<()>;
}
