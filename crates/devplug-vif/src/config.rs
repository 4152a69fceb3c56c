//! Driver constants and configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use devplug_common::RetryPolicy;

/// Number of deletion attempts before a port is abandoned.
pub const DELETION_ATTEMPTS: u32 = 4;

/// Initial delay between deletion attempts.
pub const DELETION_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Multiplier applied to the deletion delay after each failed attempt.
pub const DELETION_BACKOFF: u32 = 2;

/// Name given to management ports created by this driver.
pub const MGMT_PORT_NAME: &str = "mgmt";

/// Driver name used in logs and diagnostics.
pub const DRIVER_NAME: &str = "vif-hotplug";

/// Configuration for the VIF hot-plug plugging driver.
///
/// Only `admin_tenant_id` is required: logical ports are re-homed to that
/// tenant before attachment so the infrastructure layer is allowed to
/// operate on them. The remaining knobs default to the constants above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VifDriverConfig {
    /// Tenant owning infrastructure-side port resources.
    pub admin_tenant_id: String,

    /// Deletion attempts before a port is abandoned.
    #[serde(default = "default_deletion_attempts")]
    pub deletion_attempts: u32,

    /// Initial delay between deletion attempts.
    #[serde(default = "default_deletion_retry_delay")]
    pub deletion_retry_delay: Duration,

    /// Backoff multiplier for the deletion delay.
    #[serde(default = "default_deletion_backoff")]
    pub deletion_backoff: u32,

    /// Name given to created management ports.
    #[serde(default = "default_mgmt_port_name")]
    pub mgmt_port_name: String,
}

fn default_deletion_attempts() -> u32 {
    DELETION_ATTEMPTS
}

fn default_deletion_retry_delay() -> Duration {
    DELETION_RETRY_DELAY
}

fn default_deletion_backoff() -> u32 {
    DELETION_BACKOFF
}

fn default_mgmt_port_name() -> String {
    MGMT_PORT_NAME.to_string()
}

impl VifDriverConfig {
    /// Creates a configuration with the given administrative tenant and
    /// default retry behavior.
    pub fn new(admin_tenant_id: impl Into<String>) -> Self {
        Self {
            admin_tenant_id: admin_tenant_id.into(),
            deletion_attempts: DELETION_ATTEMPTS,
            deletion_retry_delay: DELETION_RETRY_DELAY,
            deletion_backoff: DELETION_BACKOFF,
            mgmt_port_name: MGMT_PORT_NAME.to_string(),
        }
    }

    /// Sets the number of deletion attempts.
    pub fn with_deletion_attempts(mut self, attempts: u32) -> Self {
        self.deletion_attempts = attempts;
        self
    }

    /// Sets the initial delay between deletion attempts.
    pub fn with_deletion_retry_delay(mut self, delay: Duration) -> Self {
        self.deletion_retry_delay = delay;
        self
    }

    /// Sets the backoff multiplier for the deletion delay.
    pub fn with_deletion_backoff(mut self, backoff: u32) -> Self {
        self.deletion_backoff = backoff;
        self
    }

    /// Returns the retry policy used for port deletion.
    pub fn deletion_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.deletion_attempts, self.deletion_retry_delay)
            .with_backoff(self.deletion_backoff)
    }
}
