//! Test fixtures for devplug plugging drivers
//!
//! Provides in-memory stand-ins for the two external subsystems a plugging
//! driver coordinates:
//! - [`MemoryRegistry`]: a [`PortRegistry`](devplug_common::PortRegistry)
//!   over an in-memory port list, with call counters and fault injection
//! - [`RecordingCompute`]: a [`ComputeVifApi`](devplug_common::ComputeVifApi)
//!   that records attach and detach invocations
//!
//! Both fakes are deterministic: ports enumerate in insertion order and
//! recorded calls keep their arrival order, so discovery and retry
//! behavior can be asserted precisely.

mod compute;
mod registry;

pub use compute::RecordingCompute;
pub use registry::{MemoryRegistry, RecordedUpdate, RegistryCounters};
