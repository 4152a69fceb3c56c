//! Common abstractions for devplug plugging drivers.
//!
//! This crate provides the core traits and types shared by every plugging
//! driver in the devplug control plane:
//!
//! - [`PluggingDriver`]: the hosting-device lifecycle contract consumed by
//!   the orchestrator
//! - [`PortRegistry`] / [`ComputeVifApi`]: injected clients for the port
//!   registry and the compute-side hot-plug mechanism
//! - [`RetryPolicy`]: bounded retry with exponential backoff
//! - [`Outcome`]: status value for best-effort operations
//! - [`RequestContext`]: tenant-scoped execution context with privilege
//!   elevation
//!
//! # Architecture
//!
//! A plugging driver coordinates two independently failing subsystems on
//! behalf of the hosting-device orchestrator:
//!
//! 1. The port registry owns every port record; drivers create, query,
//!    update and delete records through [`PortRegistry`]
//! 2. The compute service hot-plugs the interfaces backing those records
//!    into running instances through [`ComputeVifApi`]
//! 3. The driver itself holds no port state between calls; every record
//!    lives in the registry and is re-fetched when needed
//!
//! # Example
//!
//! ```ignore
//! use devplug_common::{MgmtContext, PluggingDriver, RequestContext};
//!
//! async fn provision(driver: &dyn PluggingDriver) {
//!     let ctx = RequestContext::for_tenant("tenant-a");
//!     let mgmt = MgmtContext::for_network("mgmt-net");
//!     let resources = driver
//!         .create_resources(&ctx, "csr-0042", "tenant-a", Some(&mgmt), 1)
//!         .await;
//!     if let Some(port) = &resources.mgmt_port {
//!         driver.setup_connectivity(&ctx, port, "vm-1").await;
//!     }
//! }
//! ```

mod context;
mod types;
mod error;
mod outcome;
mod retry;
mod registry;
mod compute;
mod driver;

pub use context::RequestContext;
pub use types::{
    FixedIp, HostingDevice, HostingDeviceResources, MgmtContext, Port, PortAllocation,
    PortFilter, PortSpec, PortUpdate,
};
pub use error::{
    AttachError, AttachResult, PluggingError, PluggingResult, RegistryError, RegistryResult,
};
pub use outcome::Outcome;
pub use retry::RetryPolicy;
pub use registry::PortRegistry;
pub use compute::ComputeVifApi;
pub use driver::PluggingDriver;
