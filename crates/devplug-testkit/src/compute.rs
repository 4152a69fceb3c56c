//! Recording compute-side hot-plug fake.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use devplug_common::{AttachError, AttachResult, ComputeVifApi};

#[derive(Default)]
struct Inner {
    attached: Vec<(String, String)>,
    detached: Vec<(String, String)>,
    attach_failures: VecDeque<AttachError>,
    detach_failures: VecDeque<AttachError>,
}

/// [`ComputeVifApi`] fake that records every successful attach and detach
/// call as a `(hosting_device_id, port_id)` pair, in arrival order.
///
/// Injected failures are consumed FIFO, one per call; a failed call is
/// rejected before anything is recorded.
#[derive(Default)]
pub struct RecordingCompute {
    inner: Mutex<Inner>,
}

impl RecordingCompute {
    /// Creates a fake with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded attach calls.
    pub fn attached(&self) -> Vec<(String, String)> {
        self.lock().attached.clone()
    }

    /// Returns the recorded detach calls.
    pub fn detached(&self) -> Vec<(String, String)> {
        self.lock().detached.clone()
    }

    /// Makes the next `interface_attach` call fail with `err`.
    pub fn fail_next_attach(&self, err: AttachError) {
        self.lock().attach_failures.push_back(err);
    }

    /// Makes the next `interface_detach` call fail with `err`.
    pub fn fail_next_detach(&self, err: AttachError) {
        self.lock().detach_failures.push_back(err);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("compute mutex poisoned")
    }
}

#[async_trait]
impl ComputeVifApi for RecordingCompute {
    async fn interface_attach(&self, hosting_device_id: &str, port_id: &str) -> AttachResult<()> {
        let mut inner = self.lock();
        if let Some(err) = inner.attach_failures.pop_front() {
            return Err(err);
        }
        inner
            .attached
            .push((hosting_device_id.to_string(), port_id.to_string()));
        Ok(())
    }

    async fn interface_detach(&self, hosting_device_id: &str, port_id: &str) -> AttachResult<()> {
        let mut inner = self.lock();
        if let Some(err) = inner.detach_failures.pop_front() {
            return Err(err);
        }
        inner
            .detached
            .push((hosting_device_id.to_string(), port_id.to_string()));
        Ok(())
    }
}
