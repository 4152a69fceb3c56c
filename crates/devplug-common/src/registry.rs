//! Port registry client trait.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::RegistryResult;
use crate::types::{Port, PortFilter, PortSpec, PortUpdate};

/// Client for the network-resource registry that owns all port records.
///
/// The registry is one of the two independently failing subsystems a
/// plugging driver coordinates. Drivers receive their registry client at
/// construction and keep no port state of their own between calls.
///
/// The registry offers no transactions across calls: a query may race with
/// a concurrent create or delete, so callers are written for eventual
/// consistency.
#[async_trait]
pub trait PortRegistry: Send + Sync {
    /// Creates a port record and returns it with registry-assigned fields
    /// filled in.
    async fn create_port(&self, ctx: &RequestContext, spec: PortSpec) -> RegistryResult<Port>;

    /// Applies a partial update to a port record and returns the updated
    /// record.
    async fn update_port(
        &self,
        ctx: &RequestContext,
        port_id: &str,
        update: PortUpdate,
    ) -> RegistryResult<Port>;

    /// Deletes a port record.
    ///
    /// Fails with [`PortNotFound`](crate::RegistryError::PortNotFound)
    /// when the port is already absent.
    async fn delete_port(&self, ctx: &RequestContext, port_id: &str) -> RegistryResult<()>;

    /// Returns all ports matching `filter`, in registry enumeration order.
    async fn query_ports(
        &self,
        ctx: &RequestContext,
        filter: &PortFilter,
    ) -> RegistryResult<Vec<Port>>;
}
