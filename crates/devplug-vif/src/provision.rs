//! Provisioning and deletion of hosting-device management resources.

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use devplug_common::{
    HostingDeviceResources, MgmtContext, Outcome, Port, PortRegistry, PortSpec, RegistryError,
    RegistryResult, RequestContext, RetryPolicy,
};

use crate::config::VifDriverConfig;

/// Creates and destroys the auxiliary management port of a hosting device.
///
/// Creation is loud: a registry failure is logged, triggers a cleanup pass
/// and yields a resource bundle without a management port. Deletion is
/// quiet: it retries transient registry failures with exponential backoff
/// and abandons the port, logging rather than raising, when the registry
/// stays unavailable. A leaked port must not block the broader teardown
/// flow.
pub struct ResourceProvisioner {
    registry: Arc<dyn PortRegistry>,
    deletion_retry: RetryPolicy,
    mgmt_port_name: String,

    /// Cleanup passes observed by tests.
    #[cfg(test)]
    cleanup_calls: AtomicUsize,
}

impl ResourceProvisioner {
    /// Creates a provisioner over the given registry client.
    pub fn new(registry: Arc<dyn PortRegistry>, config: &VifDriverConfig) -> Self {
        Self {
            registry,
            deletion_retry: config.deletion_retry_policy(),
            mgmt_port_name: config.mgmt_port_name.clone(),
            #[cfg(test)]
            cleanup_calls: AtomicUsize::new(0),
        }
    }

    /// Creates the management port for a new hosting device.
    ///
    /// Requires a management network id and a non-empty tenant id; when
    /// either is missing the device simply gets no dedicated management
    /// interface and the registry is not contacted. On a registry failure
    /// the error is logged, a cleanup pass runs and the returned bundle
    /// carries no management port.
    #[instrument(
        skip_all,
        fields(request_id = %ctx.request_id, complementary_id = %complementary_id, tenant_id = %tenant_id)
    )]
    pub async fn create_resources(
        &self,
        ctx: &RequestContext,
        complementary_id: &str,
        tenant_id: &str,
        mgmt_context: Option<&MgmtContext>,
        _max_hosted: u32,
    ) -> HostingDeviceResources {
        let mgmt_nw_id = mgmt_context.and_then(|m| m.mgmt_nw_id.as_deref());
        let mut mgmt_port = None;
        if let Some(network_id) = mgmt_nw_id.filter(|_| !tenant_id.is_empty()) {
            let spec = PortSpec {
                name: self.mgmt_port_name.clone(),
                network_id: network_id.to_string(),
                tenant_id: tenant_id.to_string(),
                admin_state_up: true,
                device_id: String::new(),
                // The complementary id rides in device_owner so the port
                // can be found again before the compute instance id is
                // known.
                device_owner: complementary_id.to_string(),
                mac_address: None,
                fixed_ips: None,
            };
            match self.registry.create_port(ctx, spec).await {
                Ok(port) => mgmt_port = Some(port),
                Err(e) => {
                    error!("Error {} when creating management port. Cleaning up.", e);
                    self.delete_resources(ctx, tenant_id, None).await;
                }
            }
        }
        HostingDeviceResources {
            mgmt_port,
            ports: Vec::new(),
        }
    }

    /// Deletes the management port of a hosting device.
    ///
    /// Idempotent and best-effort: a missing port reference skips the
    /// call, an already-deleted port is benign, and a port the registry
    /// refuses to release within the attempt budget is abandoned rather
    /// than allowed to block teardown.
    #[instrument(skip_all, fields(request_id = %ctx.request_id))]
    pub async fn delete_resources(
        &self,
        ctx: &RequestContext,
        _tenant_id: &str,
        mgmt_port: Option<&Port>,
    ) -> Outcome {
        #[cfg(test)]
        self.cleanup_calls.fetch_add(1, Ordering::SeqCst);

        let Some(port) = mgmt_port else {
            return Outcome::Skipped;
        };
        match self.delete_port_with_retry(ctx, &port.id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    "Unable to delete port {} after {} attempts due to error {}. Skipping it.",
                    port.id,
                    self.deletion_retry.tries(),
                    e
                );
                Outcome::Abandoned
            }
        }
    }

    /// Deletes one port under the deletion retry policy. An already-absent
    /// port counts as success and consumes no further attempts.
    async fn delete_port_with_retry(
        &self,
        ctx: &RequestContext,
        port_id: &str,
    ) -> RegistryResult<Outcome> {
        self.deletion_retry
            .run(
                || async move {
                    match self.registry.delete_port(ctx, port_id).await {
                        Ok(()) => {
                            info!("Port {} deleted successfully", port_id);
                            Ok(Outcome::Completed)
                        }
                        Err(RegistryError::PortNotFound { .. }) => {
                            warn!("Trying to delete port {}, but port is not found", port_id);
                            Ok(Outcome::AlreadyAbsent)
                        }
                        Err(e) => Err(e),
                    }
                },
                RegistryError::is_retryable,
            )
            .await
    }

    /// Number of cleanup passes that have run.
    #[cfg(test)]
    pub(crate) fn cleanup_invocations(&self) -> usize {
        self.cleanup_calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use devplug_common::MgmtContext;
    use devplug_testkit::MemoryRegistry;

    use super::*;

    const MGMT_NW: &str = "mgmt-net";

    fn provisioner() -> (Arc<MemoryRegistry>, ResourceProvisioner) {
        let registry = Arc::new(MemoryRegistry::new());
        let config = VifDriverConfig::new("L3AdminTenant");
        let provisioner = ResourceProvisioner::new(registry.clone(), &config);
        (registry, provisioner)
    }

    fn mgmt_context() -> MgmtContext {
        MgmtContext::for_network(MGMT_NW)
    }

    #[tokio::test]
    async fn test_create_resources_creates_mgmt_port() {
        let (registry, provisioner) = provisioner();
        let ctx = RequestContext::for_tenant("tenant-a");
        let resources = provisioner
            .create_resources(&ctx, "csr-0042", "tenant-a", Some(&mgmt_context()), 1)
            .await;

        let port = resources.mgmt_port.expect("management port created");
        assert_eq!(port.name, "mgmt");
        assert_eq!(port.network_id, MGMT_NW);
        assert_eq!(port.tenant_id, "tenant-a");
        assert!(port.admin_state_up);
        assert_eq!(port.device_id, "");
        assert_eq!(port.device_owner, "csr-0042");
        assert!(resources.ports.is_empty());
        assert_eq!(registry.counters().create_calls, 1);
    }

    #[tokio::test]
    async fn test_create_resources_without_mgmt_network() {
        let (registry, provisioner) = provisioner();
        let ctx = RequestContext::for_tenant("tenant-a");

        let resources = provisioner
            .create_resources(&ctx, "csr-0042", "tenant-a", None, 1)
            .await;
        assert_eq!(resources, HostingDeviceResources::default());

        let blank = MgmtContext::default();
        let resources = provisioner
            .create_resources(&ctx, "csr-0042", "tenant-a", Some(&blank), 1)
            .await;
        assert_eq!(resources, HostingDeviceResources::default());

        assert_eq!(registry.counters().create_calls, 0);
    }

    #[tokio::test]
    async fn test_create_resources_without_tenant() {
        let (registry, provisioner) = provisioner();
        let ctx = RequestContext::admin();
        let resources = provisioner
            .create_resources(&ctx, "csr-0042", "", Some(&mgmt_context()), 1)
            .await;
        assert_eq!(resources, HostingDeviceResources::default());
        assert_eq!(registry.counters().create_calls, 0);
    }

    #[tokio::test]
    async fn test_create_failure_triggers_single_cleanup() {
        let (registry, provisioner) = provisioner();
        let ctx = RequestContext::for_tenant("tenant-a");
        registry.fail_next_create(RegistryError::unavailable("registry down"));

        let resources = provisioner
            .create_resources(&ctx, "csr-0042", "tenant-a", Some(&mgmt_context()), 1)
            .await;

        assert_eq!(resources.mgmt_port, None);
        assert!(resources.ports.is_empty());
        assert_eq!(provisioner.cleanup_invocations(), 1);
        // Cleanup ran with no port reference, so nothing was deleted.
        assert_eq!(registry.counters().delete_calls, 0);
    }

    #[tokio::test]
    async fn test_delete_resources_without_port_reference() {
        let (registry, provisioner) = provisioner();
        let ctx = RequestContext::for_tenant("tenant-a");
        let outcome = provisioner.delete_resources(&ctx, "tenant-a", None).await;
        assert_eq!(outcome, Outcome::Skipped);
        assert!(outcome.is_success());
        assert_eq!(registry.counters().delete_calls, 0);
    }

    #[tokio::test]
    async fn test_delete_resources_is_idempotent() {
        let (registry, provisioner) = provisioner();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = Port {
            id: "port-1".to_string(),
            ..Default::default()
        };
        registry.seed_port(port.clone());

        let first = provisioner
            .delete_resources(&ctx, "tenant-a", Some(&port))
            .await;
        let second = provisioner
            .delete_resources(&ctx, "tenant-a", Some(&port))
            .await;

        assert_eq!(first, Outcome::Completed);
        assert_eq!(second, Outcome::AlreadyAbsent);
        assert!(first.is_success() && second.is_success());
        assert!(registry.ports().is_empty());
        // The missing port is benign, not a retried failure.
        assert_eq!(registry.counters().delete_calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_resources_retries_transient_failures() {
        let (registry, provisioner) = provisioner();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = Port {
            id: "port-1".to_string(),
            ..Default::default()
        };
        registry.seed_port(port.clone());
        registry.fail_next_delete(RegistryError::unavailable("busy"));

        let outcome = provisioner
            .delete_resources(&ctx, "tenant-a", Some(&port))
            .await;

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(registry.counters().delete_calls, 2);
        assert!(registry.ports().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_resources_abandons_after_exhaustion() {
        let (registry, provisioner) = provisioner();
        let ctx = RequestContext::for_tenant("tenant-a");
        let port = Port {
            id: "port-1".to_string(),
            ..Default::default()
        };
        registry.seed_port(port.clone());
        registry.fail_deletes(RegistryError::unavailable("registry down"));

        let start = tokio::time::Instant::now();
        let outcome = provisioner
            .delete_resources(&ctx, "tenant-a", Some(&port))
            .await;

        assert_eq!(outcome, Outcome::Abandoned);
        assert!(outcome.is_failure());
        assert_eq!(registry.counters().delete_calls, 4);
        // Three backoff sleeps between four attempts: 1s + 2s + 4s.
        assert_eq!(start.elapsed(), Duration::from_secs(7));
        // The port is leaked, not removed.
        assert_eq!(registry.ports().len(), 1);
    }
}
