//! Core data model for hosting-device network resources.
//!
//! Every record here mirrors what the port registry stores. Drivers never
//! persist any of these values themselves; they hold them only for the
//! duration of a lifecycle operation.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// A fixed IP assignment on a port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    /// Subnet the address was allocated from.
    pub subnet_id: String,
    /// The allocated address.
    pub ip_address: IpAddr,
}

/// A port record as returned by the registry.
///
/// An empty `id` means the record has not been persisted (or the reference
/// was assembled without one); lifecycle operations that need a persisted
/// port treat an empty id as a missing identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Registry-assigned identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Network the port lives on.
    pub network_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Administrative up/down state.
    pub admin_state_up: bool,
    /// Identifier of the device the port is bound to, empty when unbound.
    pub device_id: String,
    /// Role or owner tag of the binding, empty when unbound.
    pub device_owner: String,
    /// Hardware address, if one has been assigned.
    pub mac_address: Option<String>,
    /// Fixed IP assignments.
    pub fixed_ips: Vec<FixedIp>,
}

/// Parameters for creating a port.
///
/// `mac_address` and `fixed_ips` are deliberately optional: leaving them
/// unset tells the registry to allocate them itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Human-readable name.
    pub name: String,
    /// Network to create the port on.
    pub network_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Administrative up/down state.
    pub admin_state_up: bool,
    /// Device binding, empty for an unbound port.
    pub device_id: String,
    /// Binding role or owner tag.
    pub device_owner: String,
    /// Hardware address; `None` lets the registry allocate one.
    pub mac_address: Option<String>,
    /// Fixed IP assignments; `None` lets the registry allocate them.
    pub fixed_ips: Option<Vec<FixedIp>>,
}

/// Partial update of a port record. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortUpdate {
    /// New device binding; `Some("")` clears it.
    pub device_id: Option<String>,
    /// New binding role; `Some("")` clears it.
    pub device_owner: Option<String>,
    /// New owning tenant.
    pub tenant_id: Option<String>,
}

/// Query filter over port records. Conditions combine with OR, so a port
/// matches when any set condition matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortFilter {
    /// Match ports bound to this device.
    pub device_id: Option<String>,
    /// Match ports carrying this binding role or owner tag.
    pub device_owner: Option<String>,
}

impl PortFilter {
    /// Returns true when `port` satisfies any set condition.
    pub fn matches(&self, port: &Port) -> bool {
        let by_device = self
            .device_id
            .as_deref()
            .is_some_and(|id| port.device_id == id);
        let by_owner = self
            .device_owner
            .as_deref()
            .is_some_and(|owner| port.device_owner == owner);
        by_device || by_owner
    }
}

/// The network resources belonging to one hosting device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingDeviceResources {
    /// The dedicated management port, when the device has one.
    pub mgmt_port: Option<Port>,
    /// Additional data-plane ports reserved at creation time. Drivers that
    /// plug interfaces on demand leave this empty.
    pub ports: Vec<Port>,
}

/// Result of allocating a hosting port for a logical port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAllocation {
    /// Port selected to carry the traffic.
    pub allocated_port_id: String,
    /// VLAN tag for the allocation, when the plugging mechanism needs one.
    pub allocated_vlan: Option<u16>,
}

/// Management-network parameters handed to resource creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MgmtContext {
    /// Identifier of the management network, when one is configured.
    pub mgmt_nw_id: Option<String>,
}

impl MgmtContext {
    /// Creates a context naming a management network.
    pub fn for_network(mgmt_nw_id: impl Into<String>) -> Self {
        Self {
            mgmt_nw_id: Some(mgmt_nw_id.into()),
        }
    }
}

/// A hosting device as known to the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingDevice {
    /// Orchestrator-assigned identifier, equal to the compute instance id
    /// once the instance exists.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Pre-instance identifier used to tag ports before the compute
    /// instance id is known.
    pub complementary_id: Option<String>,
    /// Id of the device's management port, when one was provisioned.
    pub management_port_id: Option<String>,
}
