//! VIF hot-plug plugging driver for devplug hosting devices.
//!
//! This crate implements the plugging driver used when the compute service
//! supports hot-plugging virtual interfaces into running service-VM
//! instances. On behalf of the hosting-device orchestrator it coordinates
//! the port registry, which owns every port record, and the compute
//! service, which plugs the backing interfaces, and it encodes the calling
//! discipline between the two when either fails.
//!
//! # Responsibilities
//!
//! - Provision the management port of a new hosting device, with cleanup
//!   on registry failure
//! - Rediscover a device's ports by instance id or complementary id
//! - Delete management ports idempotently, retrying with exponential
//!   backoff and abandoning rather than blocking teardown
//! - Re-home logical ports to the administrative tenant and hot-plug them
//!   into instances; hot-unplug them on teardown
//!
//! # Operations
//!
//! | Operation | Component | Failure policy |
//! |-----------|-----------|----------------|
//! | `create_resources` | [`ResourceProvisioner`] | log, clean up, return empty bundle |
//! | `get_resources` | [`ResourceReconciler`] | propagate registry errors |
//! | `delete_resources` | [`ResourceProvisioner`] | retry, then log and abandon |
//! | `setup_connectivity` | [`ConnectivityMgr`] | log and abandon |
//! | `teardown_connectivity` | [`ConnectivityMgr`] | guard, log and abandon |
//! | `extend_hosting_port_info` | [`ConnectivityMgr`] | no-op hook |
//! | `allocate_hosting_port` | [`ConnectivityMgr`] | validate the port id |
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use devplug_common::{MgmtContext, PluggingDriver, RequestContext};
//! use devplug_vif::{VifDriverConfig, VifHotplugDriver};
//!
//! let driver = VifHotplugDriver::new(registry, compute, VifDriverConfig::new("L3AdminTenant"));
//! let ctx = RequestContext::for_tenant("tenant-a");
//! let mgmt = MgmtContext::for_network("mgmt-net");
//! let resources = driver
//!     .create_resources(&ctx, "csr-0042", "tenant-a", Some(&mgmt), 1)
//!     .await;
//! ```

mod config;
mod connectivity;
mod driver;
mod provision;
mod reconcile;

pub use config::{
    VifDriverConfig, DELETION_ATTEMPTS, DELETION_BACKOFF, DELETION_RETRY_DELAY, DRIVER_NAME,
    MGMT_PORT_NAME,
};
pub use connectivity::ConnectivityMgr;
pub use driver::VifHotplugDriver;
pub use provision::ResourceProvisioner;
pub use reconcile::ResourceReconciler;
