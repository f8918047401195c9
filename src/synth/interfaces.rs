//! INTERFACES assembly: one `openconfig-interfaces` binding per target
//! interface, with its subinterfaces folded in.

use regex_lite::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;
use std::sync::LazyLock;

use super::derive::FhrpEntry;
use crate::error::SynthError;
use crate::netbox::{Interface as SotInterface, InterfaceMapping, InterfaceMode};
use crate::openconfig::interfaces::{
    Address, Aggregation, AggregationConfig, AggregationType, Interface, InterfaceType, Ipv4, Ipv4Config,
    PortSpeed, RoutedVlan, RoutedVlanConfig, Subinterface, SubinterfaceVlan, VlanModeType, VrrpGroup,
    VrrpGroupConfig,
};
use crate::utils::split_address;

/// Per-device inputs shared by every interface on that device
pub struct InterfaceContext<'a> {
    pub host: &'a str,
    pub auto_desc: bool,
    pub descriptions: &'a BTreeMap<String, String>,
    pub fhrp: &'a BTreeMap<String, Vec<FhrpEntry>>,
}

impl InterfaceContext<'_> {
    fn description(&self, name: &str) -> Option<&str> {
        self.descriptions
            .get(name)
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }

    fn fhrp(&self, name: &str) -> &[FhrpEntry] {
        self.fhrp.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Interfaces selected by `filter` (name or tag match), with subinterfaces
/// replaced by their parent. An empty filter selects everything.
pub fn target_interfaces(mapping: &InterfaceMapping, filter: &[String]) -> BTreeSet<String> {
    mapping
        .interfaces
        .values()
        .filter(|iface| {
            filter.is_empty() || filter.contains(&iface.name) || iface.tags.iter().any(|t| filter.contains(&t.name))
        })
        .map(|iface| iface.parent_name().unwrap_or(&iface.name).to_string())
        .collect()
}

/// Build the interface bindings for one device
pub fn build_interfaces(
    mapping: &InterfaceMapping,
    filter: &[String],
    ctx: &InterfaceContext<'_>,
) -> Result<BTreeMap<String, Interface>, SynthError> {
    let mut out = BTreeMap::new();
    for name in target_interfaces(mapping, filter) {
        match mapping.interfaces.get(&name) {
            Some(iface) => {
                out.insert(name, build_interface(mapping, iface, ctx)?);
            }
            None => tracing::warn!("{}: parent interface {} not found in NetBox, skipping", ctx.host, name),
        }
    }
    Ok(out)
}

pub fn build_interface(
    mapping: &InterfaceMapping,
    iface: &SotInterface,
    ctx: &InterfaceContext<'_>,
) -> Result<Interface, SynthError> {
    let mut oc = Interface::new(&iface.name);
    oc.config.enabled = Some(iface.enabled);

    let derived = if ctx.auto_desc { ctx.description(&iface.name) } else { None };
    oc.config.description = derived
        .or(Some(iface.description.as_str()).filter(|d| !d.is_empty()))
        .map(str::to_string);

    if iface.mtu != 0 {
        oc.config.mtu = Some(to_u16("mtu", iface.mtu)?);
    }
    if !iface.mac_address.is_empty() {
        oc.ethernet_config().mac_address = Some(iface.mac_address.clone());
    }
    if let Some(lag) = iface.lag_name() {
        oc.ethernet_config().aggregate_id = Some(lag.to_string());
    }
    if iface.is_lag() {
        oc.aggregation = Some(Aggregation {
            config: AggregationConfig {
                lag_type: AggregationType::Lacp,
                min_links: 1,
            },
        });
    }
    if iface.speed != 0 {
        let speed = PortSpeed::from_kbps(iface.speed).ok_or_else(|| SynthError::UnsupportedSpeed {
            host: ctx.host.to_string(),
            interface: iface.name.clone(),
            speed: iface.speed,
        })?;
        let eth = oc.ethernet_config();
        eth.port_speed = Some(speed);
        eth.auto_negotiate = Some(false);
    }

    if iface.name.contains("vlan") {
        oc.config.if_type = Some(InterfaceType::L2vlan);
        let mut routed = RoutedVlan {
            config: RoutedVlanConfig {
                vlan: iface.untagged_vlan.vid,
            },
            ipv4: None,
        };
        if !iface.ip_addresses.is_empty() {
            routed.ipv4 = Some(build_ipv4(iface, ctx.fhrp(&iface.name))?);
        }
        oc.routed_vlan = Some(routed);
    } else {
        match iface.mode {
            InterfaceMode::Access => {
                let sw = oc.switched_vlan_config();
                sw.interface_mode = Some(VlanModeType::Access);
                sw.access_vlan = iface.untagged_vid();
            }
            InterfaceMode::Tagged => {
                let sw = oc.switched_vlan_config();
                sw.interface_mode = Some(VlanModeType::Trunk);
                sw.trunk_vlans = iface.tagged_vlans.iter().map(|v| v.vid).collect();
                sw.native_vlan = iface.untagged_vid();
            }
            _ => {}
        }
        if !iface.ip_addresses.is_empty() {
            let mut sub = Subinterface::new(0);
            sub.ipv4 = Some(build_ipv4(iface, ctx.fhrp(&iface.name))?);
            oc.subinterfaces().insert(0, sub);
        }
    }

    let children = mapping.subinterfaces.get(&iface.name).map(Vec::as_slice).unwrap_or_default();
    for child_name in children {
        let Some(child) = mapping.interfaces.get(child_name) else {
            continue;
        };
        let index = subinterface_index(child_name)?;
        let mut sub = Subinterface::new(index);
        sub.config.description = ctx.description(child_name).map(str::to_string);

        if child.mode != InterfaceMode::Access {
            return Err(SynthError::SubinterfaceMode {
                host: ctx.host.to_string(),
                interface: child_name.clone(),
            });
        }
        sub.vlan = Some(SubinterfaceVlan::single_tagged(child.untagged_vlan.vid));

        if !child.ip_addresses.is_empty() {
            // VRRP groups for subinterfaces are looked up under the parent's name
            let mut ipv4 = build_ipv4(child, ctx.fhrp(&iface.name))?;
            if child.mtu != 0 {
                ipv4.config = Some(Ipv4Config {
                    mtu: to_u16("mtu", child.mtu)?,
                });
            }
            sub.ipv4 = Some(ipv4);
        }
        oc.subinterfaces().insert(index, sub);
    }

    Ok(oc)
}

static SUBINTERFACE_INDEX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r".*\.(\d+)").ok());

/// Numeric index from the trailing `.<n>` of a subinterface name
pub fn subinterface_index(name: &str) -> Result<u32, SynthError> {
    SUBINTERFACE_INDEX
        .as_ref()
        .and_then(|re| re.captures(name))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| SynthError::SubinterfaceId(name.to_string()))
}

/// IPv4 addresses of an interface, each carrying the given VRRP groups
fn build_ipv4(iface: &SotInterface, fhrp: &[FhrpEntry]) -> Result<Ipv4, SynthError> {
    let invalid = |address: &str| SynthError::InvalidAddress {
        interface: iface.name.clone(),
        address: address.to_string(),
    };

    let mut ipv4 = Ipv4::default();
    for entry in &iface.ip_addresses {
        let (ip, len) = split_address(&entry.address);
        match ip.parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => {}
            Ok(IpAddr::V6(_)) => {
                tracing::debug!("{}: skipping IPv6 address {}", iface.name, entry.address);
                continue;
            }
            Err(_) => return Err(invalid(&entry.address)),
        }
        let prefix_length = len
            .and_then(|l| l.parse::<u8>().ok())
            .filter(|l| *l <= 32)
            .ok_or_else(|| invalid(&entry.address))?;

        let mut address = Address::new(ip, prefix_length);
        for group in fhrp {
            let vrid = to_u8("virtual-router-id", group.group_id)?;
            let priority = to_u8("priority", group.priority)?;
            address.vrrp_groups().insert(
                vrid,
                VrrpGroup {
                    virtual_router_id: vrid,
                    config: VrrpGroupConfig {
                        virtual_router_id: vrid,
                        virtual_address: vec![group.virtual_ip.clone()],
                        priority,
                    },
                },
            );
        }
        ipv4.addresses().insert(ip.to_string(), address);
    }
    Ok(ipv4)
}

fn to_u16(field: &'static str, value: u32) -> Result<u16, SynthError> {
    u16::try_from(value).map_err(|_| SynthError::OutOfRange {
        field,
        value: value.to_string(),
    })
}

fn to_u8(field: &'static str, value: u32) -> Result<u8, SynthError> {
    u8::try_from(value).map_err(|_| SynthError::OutOfRange {
        field,
        value: value.to_string(),
    })
}
