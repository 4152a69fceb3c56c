//! Request execution context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller identity and privilege level for registry and driver operations.
///
/// The context carries the tenant scope of the request and a request id
/// that correlates the registry and compute calls made on its behalf.
/// Operations that must touch resources across tenant boundaries run under
/// an [`elevated`](RequestContext::elevated) variant of the caller's
/// context rather than a separate identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Correlation id for this request.
    pub request_id: String,
    /// Tenant the request is scoped to, if any.
    pub tenant_id: Option<String>,
    /// True when the request bypasses tenant-scoped authorization.
    pub is_admin: bool,
}

impl RequestContext {
    /// Creates a context scoped to a tenant.
    pub fn for_tenant(tenant_id: impl Into<String>) -> Self {
        Self {
            request_id: new_request_id(),
            tenant_id: Some(tenant_id.into()),
            is_admin: false,
        }
    }

    /// Creates an administrative context with no tenant scope.
    pub fn admin() -> Self {
        Self {
            request_id: new_request_id(),
            tenant_id: None,
            is_admin: true,
        }
    }

    /// Returns an administrative-privilege copy of this context.
    ///
    /// The request id and tenant scope are preserved so elevated calls stay
    /// correlated with the request that triggered them.
    pub fn elevated(&self) -> Self {
        Self {
            is_admin: true,
            ..self.clone()
        }
    }
}

fn new_request_id() -> String {
    format!("req-{}", Uuid::new_v4())
}
