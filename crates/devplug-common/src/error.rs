//! Error types for plugging-driver operations.
//!
//! This module defines the error types used throughout the devplug crates.
//! All errors implement `std::error::Error` via `thiserror`.

use thiserror::Error;

/// Result type alias for port registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type alias for compute-side attach operations.
pub type AttachResult<T> = Result<T, AttachError>;

/// Result type alias for plugging-driver lifecycle operations.
pub type PluggingResult<T> = Result<T, PluggingError>;

/// Errors returned by the port registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The port does not exist. Benign during deletion, fatal elsewhere.
    #[error("Port '{port_id}' not found")]
    PortNotFound {
        /// The port identifier.
        port_id: String,
    },

    /// The registry is temporarily unreachable or overloaded.
    #[error("Registry unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// A registry operation was rejected or failed internally.
    #[error("Registry operation failed: {operation}: {message}")]
    Backend {
        /// The operation that failed (e.g., "create_port", "delete_port").
        operation: String,
        /// Error message.
        message: String,
    },
}

impl RegistryError {
    /// Creates a port not found error.
    pub fn port_not_found(port_id: impl Into<String>) -> Self {
        Self::PortNotFound {
            port_id: port_id.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient condition
    /// that may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RegistryError::Unavailable { .. } | RegistryError::Backend { .. }
        )
    }
}

/// Errors returned by the compute-side interface attach mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    /// The hosting-device instance does not exist on the compute side.
    #[error("Instance '{instance_id}' not found")]
    InstanceNotFound {
        /// The compute instance identifier.
        instance_id: String,
    },

    /// An attach or detach call failed.
    #[error("Interface {operation} failed on instance '{instance_id}': {message}")]
    Operation {
        /// The operation that failed ("attach" or "detach").
        operation: String,
        /// The compute instance identifier.
        instance_id: String,
        /// Error message.
        message: String,
    },
}

impl AttachError {
    /// Creates an instance not found error.
    pub fn instance_not_found(instance_id: impl Into<String>) -> Self {
        Self::InstanceNotFound {
            instance_id: instance_id.into(),
        }
    }

    /// Creates an operation error.
    pub fn operation(
        operation: impl Into<String>,
        instance_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Operation {
            operation: operation.into(),
            instance_id: instance_id.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the plugging-driver lifecycle contract.
///
/// Only operations whose failures the caller must see return these; the
/// best-effort operations report an
/// [`Outcome`](crate::Outcome) instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluggingError {
    /// Registry failure propagated from a query or mutation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Compute-side failure propagated from attach or detach.
    #[error(transparent)]
    Attach(#[from] AttachError),

    /// A required identifier is missing from the supplied entity.
    #[error("Missing required identifier: {what}")]
    MissingIdentifier {
        /// What was expected (e.g., "port id").
        what: String,
    },
}

impl PluggingError {
    /// Creates a missing identifier error.
    pub fn missing_identifier(what: impl Into<String>) -> Self {
        Self::MissingIdentifier { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::port_not_found("port-1");
        assert_eq!(err.to_string(), "Port 'port-1' not found");
    }

    #[test]
    fn test_backend_error() {
        let err = RegistryError::backend("create_port", "quota exceeded");
        assert_eq!(
            err.to_string(),
            "Registry operation failed: create_port: quota exceeded"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(RegistryError::unavailable("timeout").is_retryable());
        assert!(RegistryError::backend("delete_port", "conflict").is_retryable());
        assert!(!RegistryError::port_not_found("port-1").is_retryable());
    }

    #[test]
    fn test_attach_error_display() {
        let err = AttachError::operation("attach", "vm-1", "no free slot");
        assert_eq!(
            err.to_string(),
            "Interface attach failed on instance 'vm-1': no free slot"
        );
    }

    #[test]
    fn test_plugging_error_from_registry() {
        let err: PluggingError = RegistryError::unavailable("timeout").into();
        assert_eq!(err.to_string(), "Registry unavailable: timeout");
    }

    #[test]
    fn test_plugging_error_from_attach() {
        let err: PluggingError = AttachError::instance_not_found("vm-1").into();
        assert_eq!(err.to_string(), "Instance 'vm-1' not found");
    }
}
