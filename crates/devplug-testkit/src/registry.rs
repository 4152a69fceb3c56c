//! In-memory port registry fake.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use devplug_common::{
    Port, PortFilter, PortRegistry, PortSpec, PortUpdate, RegistryError, RegistryResult,
    RequestContext,
};

/// Per-operation invocation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryCounters {
    /// Number of `create_port` calls, including failed ones.
    pub create_calls: usize,
    /// Number of `update_port` calls, including failed ones.
    pub update_calls: usize,
    /// Number of `delete_port` calls, including failed ones.
    pub delete_calls: usize,
    /// Number of `query_ports` calls.
    pub query_calls: usize,
}

/// A recorded `update_port` invocation that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    /// Port the update was applied to.
    pub port_id: String,
    /// The partial update as supplied.
    pub update: PortUpdate,
    /// True when the supplied context carried administrative privileges.
    pub elevated: bool,
}

#[derive(Default)]
struct Inner {
    // Insertion order doubles as enumeration order.
    ports: Vec<Port>,
    counters: RegistryCounters,
    updates: Vec<RecordedUpdate>,
    create_failures: VecDeque<RegistryError>,
    update_failures: VecDeque<RegistryError>,
    delete_failures: VecDeque<RegistryError>,
    query_failures: VecDeque<RegistryError>,
    sticky_delete_failure: Option<RegistryError>,
}

/// In-memory [`PortRegistry`] with deterministic enumeration order and
/// fault injection.
///
/// Injected failures are consumed FIFO, one per call to the matching
/// operation; [`fail_deletes`](MemoryRegistry::fail_deletes) instead makes
/// every `delete_port` call fail, for retry-exhaustion tests. Failed calls
/// count in the [`RegistryCounters`] but leave the stored ports untouched.
#[derive(Default)]
pub struct MemoryRegistry {
    inner: Mutex<Inner>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a port record directly, bypassing `create_port`.
    pub fn seed_port(&self, port: Port) {
        self.lock().ports.push(port);
    }

    /// Returns a snapshot of the stored ports in enumeration order.
    pub fn ports(&self) -> Vec<Port> {
        self.lock().ports.clone()
    }

    /// Looks up a stored port by id.
    pub fn port(&self, port_id: &str) -> Option<Port> {
        self.lock().ports.iter().find(|p| p.id == port_id).cloned()
    }

    /// Returns the per-operation invocation counters.
    pub fn counters(&self) -> RegistryCounters {
        self.lock().counters
    }

    /// Returns the applied `update_port` invocations in arrival order.
    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.lock().updates.clone()
    }

    /// Makes the next `create_port` call fail with `err`.
    pub fn fail_next_create(&self, err: RegistryError) {
        self.lock().create_failures.push_back(err);
    }

    /// Makes the next `update_port` call fail with `err`.
    pub fn fail_next_update(&self, err: RegistryError) {
        self.lock().update_failures.push_back(err);
    }

    /// Makes the next `delete_port` call fail with `err`.
    pub fn fail_next_delete(&self, err: RegistryError) {
        self.lock().delete_failures.push_back(err);
    }

    /// Makes the next `query_ports` call fail with `err`.
    pub fn fail_next_query(&self, err: RegistryError) {
        self.lock().query_failures.push_back(err);
    }

    /// Makes every `delete_port` call fail with `err` until
    /// [`clear_delete_failures`](MemoryRegistry::clear_delete_failures).
    pub fn fail_deletes(&self, err: RegistryError) {
        self.lock().sticky_delete_failure = Some(err);
    }

    /// Clears any sticky delete failure.
    pub fn clear_delete_failures(&self) {
        self.lock().sticky_delete_failure = None;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("registry mutex poisoned")
    }
}

#[async_trait]
impl PortRegistry for MemoryRegistry {
    async fn create_port(&self, _ctx: &RequestContext, spec: PortSpec) -> RegistryResult<Port> {
        let mut inner = self.lock();
        inner.counters.create_calls += 1;
        if let Some(err) = inner.create_failures.pop_front() {
            return Err(err);
        }
        let id = Uuid::new_v4();
        let port = Port {
            id: format!("port-{id}"),
            name: spec.name,
            network_id: spec.network_id,
            tenant_id: spec.tenant_id,
            admin_state_up: spec.admin_state_up,
            device_id: spec.device_id,
            device_owner: spec.device_owner,
            mac_address: spec.mac_address.or_else(|| Some(generated_mac(&id))),
            fixed_ips: spec.fixed_ips.unwrap_or_default(),
        };
        inner.ports.push(port.clone());
        Ok(port)
    }

    async fn update_port(
        &self,
        ctx: &RequestContext,
        port_id: &str,
        update: PortUpdate,
    ) -> RegistryResult<Port> {
        let mut inner = self.lock();
        inner.counters.update_calls += 1;
        if let Some(err) = inner.update_failures.pop_front() {
            return Err(err);
        }
        let elevated = ctx.is_admin;
        let Some(port) = inner.ports.iter_mut().find(|p| p.id == port_id) else {
            return Err(RegistryError::port_not_found(port_id));
        };
        if let Some(device_id) = update.device_id.clone() {
            port.device_id = device_id;
        }
        if let Some(device_owner) = update.device_owner.clone() {
            port.device_owner = device_owner;
        }
        if let Some(tenant_id) = update.tenant_id.clone() {
            port.tenant_id = tenant_id;
        }
        let updated = port.clone();
        inner.updates.push(RecordedUpdate {
            port_id: port_id.to_string(),
            update,
            elevated,
        });
        Ok(updated)
    }

    async fn delete_port(&self, _ctx: &RequestContext, port_id: &str) -> RegistryResult<()> {
        let mut inner = self.lock();
        inner.counters.delete_calls += 1;
        if let Some(err) = inner.sticky_delete_failure.clone() {
            return Err(err);
        }
        if let Some(err) = inner.delete_failures.pop_front() {
            return Err(err);
        }
        let Some(pos) = inner.ports.iter().position(|p| p.id == port_id) else {
            return Err(RegistryError::port_not_found(port_id));
        };
        inner.ports.remove(pos);
        Ok(())
    }

    async fn query_ports(
        &self,
        _ctx: &RequestContext,
        filter: &PortFilter,
    ) -> RegistryResult<Vec<Port>> {
        let mut inner = self.lock();
        inner.counters.query_calls += 1;
        if let Some(err) = inner.query_failures.pop_front() {
            return Err(err);
        }
        Ok(inner
            .ports
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}

// Locally administered address derived from the port id, in the style the
// registry itself would allocate.
fn generated_mac(id: &Uuid) -> String {
    let b = id.as_bytes();
    format!("fa:16:3e:{:02x}:{:02x}:{:02x}", b[0], b[1], b[2])
}
