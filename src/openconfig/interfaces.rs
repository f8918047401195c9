//! openconfig-interfaces with the ethernet, aggregate, vlan and ip augments.

use serde::Serialize;
use std::collections::BTreeMap;

use super::as_list;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Interfaces {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub interface: BTreeMap<String, Interface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Interface {
    pub name: String,
    pub config: InterfaceConfig,
    #[serde(rename = "openconfig-if-ethernet:ethernet", skip_serializing_if = "Option::is_none")]
    pub ethernet: Option<Ethernet>,
    #[serde(rename = "openconfig-if-aggregate:aggregation", skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(rename = "openconfig-vlan:routed-vlan", skip_serializing_if = "Option::is_none")]
    pub routed_vlan: Option<RoutedVlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subinterfaces: Option<Subinterfaces>,
}

impl Interface {
    /// New interface with the key mirrored into `config.name`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            config: InterfaceConfig {
                name: name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn ethernet_config(&mut self) -> &mut EthernetConfig {
        self.ethernet
            .get_or_insert_with(Ethernet::default)
            .config
            .get_or_insert_with(EthernetConfig::default)
    }

    pub fn switched_vlan_config(&mut self) -> &mut SwitchedVlanConfig {
        &mut self
            .ethernet
            .get_or_insert_with(Ethernet::default)
            .switched_vlan
            .get_or_insert_with(SwitchedVlan::default)
            .config
    }

    pub fn subinterfaces(&mut self) -> &mut BTreeMap<u32, Subinterface> {
        &mut self
            .subinterfaces
            .get_or_insert_with(Subinterfaces::default)
            .subinterface
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InterfaceConfig {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub if_type: Option<InterfaceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// iana-if-type identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterfaceType {
    #[serde(rename = "iana-if-type:l2vlan")]
    L2vlan,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Ethernet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<EthernetConfig>,
    #[serde(rename = "openconfig-vlan:switched-vlan", skip_serializing_if = "Option::is_none")]
    pub switched_vlan: Option<SwitchedVlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EthernetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_negotiate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_speed: Option<PortSpeed>,
    #[serde(rename = "openconfig-if-aggregate:aggregate-id", skip_serializing_if = "Option::is_none")]
    pub aggregate_id: Option<String>,
}

/// openconfig-if-ethernet ETHERNET_SPEED identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PortSpeed {
    #[serde(rename = "openconfig-if-ethernet:SPEED_1GB")]
    Speed1Gb,
    #[serde(rename = "openconfig-if-ethernet:SPEED_10GB")]
    Speed10Gb,
    #[serde(rename = "openconfig-if-ethernet:SPEED_40GB")]
    Speed40Gb,
    #[serde(rename = "openconfig-if-ethernet:SPEED_100GB")]
    Speed100Gb,
    #[serde(rename = "openconfig-if-ethernet:SPEED_400GB")]
    Speed400Gb,
}

impl PortSpeed {
    /// Map a NetBox speed (kbps) to a port speed identity
    pub fn from_kbps(kbps: u64) -> Option<Self> {
        match kbps {
            1_000_000 => Some(PortSpeed::Speed1Gb),
            10_000_000 => Some(PortSpeed::Speed10Gb),
            40_000_000 => Some(PortSpeed::Speed40Gb),
            100_000_000 => Some(PortSpeed::Speed100Gb),
            400_000_000 => Some(PortSpeed::Speed400Gb),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwitchedVlan {
    pub config: SwitchedVlanConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SwitchedVlanConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_mode: Option<VlanModeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_vlan: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trunk_vlans: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VlanModeType {
    Access,
    Trunk,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub config: AggregationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AggregationConfig {
    pub lag_type: AggregationType,
    pub min_links: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationType {
    #[default]
    Lacp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutedVlan {
    pub config: RoutedVlanConfig,
    #[serde(rename = "openconfig-if-ip:ipv4", skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Ipv4>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutedVlanConfig {
    pub vlan: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subinterfaces {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub subinterface: BTreeMap<u32, Subinterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subinterface {
    pub index: u32,
    pub config: SubinterfaceConfig,
    #[serde(rename = "openconfig-if-ip:ipv4", skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Ipv4>,
    #[serde(rename = "openconfig-vlan:vlan", skip_serializing_if = "Option::is_none")]
    pub vlan: Option<SubinterfaceVlan>,
}

impl Subinterface {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            config: SubinterfaceConfig {
                index,
                description: None,
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubinterfaceConfig {
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubinterfaceVlan {
    #[serde(rename = "match")]
    pub matching: VlanMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VlanMatch {
    pub single_tagged: SingleTagged,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SingleTagged {
    pub config: SingleTaggedConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SingleTaggedConfig {
    pub vlan_id: u16,
}

impl SubinterfaceVlan {
    pub fn single_tagged(vlan_id: u16) -> Self {
        Self {
            matching: VlanMatch {
                single_tagged: SingleTagged {
                    config: SingleTaggedConfig { vlan_id },
                },
            },
        }
    }
}

/// openconfig-if-ip ipv4 container, shared by subinterfaces and routed VLANs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ipv4 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Addresses>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Ipv4Config>,
}

impl Ipv4 {
    pub fn addresses(&mut self) -> &mut BTreeMap<String, Address> {
        &mut self.addresses.get_or_insert_with(Addresses::default).address
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ipv4Config {
    pub mtu: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Addresses {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub address: BTreeMap<String, Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Address {
    pub ip: String,
    pub config: AddressConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vrrp: Option<Vrrp>,
}

impl Address {
    pub fn new(ip: &str, prefix_length: u8) -> Self {
        Self {
            ip: ip.to_string(),
            config: AddressConfig {
                ip: ip.to_string(),
                prefix_length,
            },
            vrrp: None,
        }
    }

    pub fn vrrp_groups(&mut self) -> &mut BTreeMap<u8, VrrpGroup> {
        &mut self.vrrp.get_or_insert_with(Vrrp::default).vrrp_group
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddressConfig {
    pub ip: String,
    pub prefix_length: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Vrrp {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub vrrp_group: BTreeMap<u8, VrrpGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VrrpGroup {
    pub virtual_router_id: u8,
    pub config: VrrpGroupConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VrrpGroupConfig {
    pub virtual_router_id: u8,
    pub virtual_address: Vec<String>,
    pub priority: u8,
}
