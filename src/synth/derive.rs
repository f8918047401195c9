//! Pure derivations over a NetBox snapshot: interface descriptions, FHRP
//! assignments per interface and the parent -> subinterface map.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SynthError;
use crate::netbox::{ConnectedInterface, FhrpAssignment, FhrpGroup, Interface, InterfaceMode, Prefix, SotSnapshot};
use crate::utils::split_address;

/// The only FHRP protocol rendered as VRRP
pub const VRRP_PROTOCOL: &str = "vrrp3";

/// `description[host][ifname]`
pub type DescriptionMapping = BTreeMap<String, BTreeMap<String, String>>;

/// `fhrp[host][ifname]`
pub type FhrpMapping = BTreeMap<String, BTreeMap<String, Vec<FhrpEntry>>>;

/// One VRRP group an interface participates in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FhrpEntry {
    pub virtual_ip: String,
    pub priority: u32,
    pub group_id: u32,
}

/// Map each parent interface name to its children, in NetBox order
pub fn subinterface_map(interfaces: &[Interface]) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for iface in interfaces {
        if let Some(parent) = iface.parent_name() {
            map.entry(parent.to_string()).or_default().push(iface.name.clone());
        }
    }
    map
}

/// Access ports with a named untagged VLAN are described by that name
/// instead of their parent prefix.
pub fn uses_vlan_name(iface: &Interface) -> bool {
    iface.mode == InterfaceMode::Access && !iface.untagged_vlan.name.is_empty()
}

/// Build the description mapping for every interface in the snapshot
pub fn descriptions(snapshot: &SotSnapshot, category_tags: &[String]) -> DescriptionMapping {
    snapshot
        .interfaces
        .iter()
        .map(|(host, mapping)| {
            let per_host = mapping
                .interfaces
                .values()
                .map(|iface| {
                    let text = describe(iface, &snapshot.connected, &snapshot.prefixes, category_tags);
                    (iface.name.clone(), text)
                })
                .collect();
            (host.clone(), per_host)
        })
        .collect()
}

/// Derive a single interface description.
///
/// Fields, each only when present, joined by " - ":
/// `[CATEGORY,..]`, VLAN name or parent-prefix description, LAG neighbours,
/// NetBox description, far-end links and cable ids, owning LAG.
pub fn describe(
    iface: &Interface,
    connected: &BTreeMap<i64, ConnectedInterface>,
    prefixes: &BTreeMap<String, Prefix>,
    category_tags: &[String],
) -> String {
    let mut fields: Vec<String> = Vec::new();

    let is_category = |name: &String| category_tags.contains(name);
    let mut categories: Vec<String> = iface.tags.iter().map(|t| t.name.clone()).filter(is_category).collect();
    if iface.mode == InterfaceMode::Access && iface.untagged_vid().is_some() {
        categories.extend(
            iface
                .untagged_vlan
                .tags
                .iter()
                .map(|t| t.name.clone())
                .filter(is_category),
        );
    }
    if !categories.is_empty() {
        fields.push(format!("[{}]", categories.join(",")));
    }

    if uses_vlan_name(iface) {
        fields.push(iface.untagged_vlan.name.clone());
    } else if let Some(last) = iface.ip_addresses.last() {
        if let Some(prefix) = prefixes.get(&last.address) {
            if !prefix.description.is_empty() {
                fields.push(prefix.description.clone());
            }
        }
    }

    if iface.is_lag() {
        let neighbors: BTreeSet<&str> = iface
            .member_interfaces
            .iter()
            .filter_map(|m| m.id.parse::<i64>().ok())
            .filter_map(|id| connected.get(&id))
            .flat_map(|c| c.connected_endpoints.iter())
            .map(|e| e.device.name.as_str())
            .filter(|n| !n.is_empty())
            .collect();
        if !neighbors.is_empty() {
            fields.push(neighbors.into_iter().collect::<Vec<_>>().join("/"));
        }
    }

    if !iface.description.is_empty() {
        fields.push(iface.description.clone());
    }

    let own = iface.id.parse::<i64>().ok().and_then(|id| connected.get(&id));
    if let Some(link) = own {
        if link.connected_endpoints.is_empty() {
            if link.cable.id != 0 {
                fields.push(format!("CABLE {}", link.cable.id));
            }
        } else if !iface.cable.id.is_empty() {
            for endpoint in &link.connected_endpoints {
                fields.push(format!("{}:{}", endpoint.device.name, endpoint.name));
                fields.push(format!("CABLE {}", endpoint.cable));
            }
        }
    }

    if let Some(lag) = iface.lag_name() {
        fields.push(lag.to_string());
    }

    fields.join(" - ")
}

/// Join FHRP assignments to their groups, keeping VRRPv3 only
pub fn fhrp_mapping(groups: &[FhrpGroup], assignments: &[FhrpAssignment]) -> Result<FhrpMapping, SynthError> {
    let mut mapping = FhrpMapping::new();
    for group in groups {
        if group.protocol != VRRP_PROTOCOL {
            tracing::debug!("Skipping FHRP group {} with protocol {}", group.group_id, group.protocol);
            continue;
        }
        let members: Vec<&FhrpAssignment> = assignments.iter().filter(|a| a.group.id == group.id).collect();
        if members.is_empty() {
            continue;
        }
        let virtual_ip = group
            .ip_addresses
            .first()
            .map(|a| split_address(&a.address).0.to_string())
            .ok_or(SynthError::FhrpGroupWithoutAddress(group.id))?;

        for assignment in members {
            mapping
                .entry(assignment.interface.device.name.clone())
                .or_default()
                .entry(assignment.interface.name.clone())
                .or_default()
                .push(FhrpEntry {
                    virtual_ip: virtual_ip.clone(),
                    priority: assignment.priority,
                    group_id: group.group_id,
                });
        }
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbox::{AssignedInterface, FhrpAddress, FhrpGroupRef, NameRef};
    use crate::testutil::{access_port, connect, iface, lag_member, tagged};
    use pretty_assertions::assert_eq;

    fn categories() -> Vec<String> {
        vec!["SERVERS".to_string(), "PEERING".to_string()]
    }

    #[test]
    fn test_subinterface_map() {
        let mut child = iface("Ethernet2.100");
        child.parent.name = "Ethernet2".to_string();
        let mut child2 = iface("Ethernet2.200");
        child2.parent.name = "Ethernet2".to_string();
        let map = subinterface_map(&[iface("Ethernet2"), child, child2]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["Ethernet2"], vec!["Ethernet2.100", "Ethernet2.200"]);
    }

    #[test]
    fn test_lag_description_sorted_neighbors() {
        let mut connected = BTreeMap::new();
        connect(&mut connected, 11, "rtr-c", "Ethernet9", 501);
        connect(&mut connected, 12, "rtr-b", "Ethernet9", 502);

        let mut po = iface("Port-Channel1");
        po.if_type = "LAG".to_string();
        po.description = "core uplink".to_string();
        po.member_interfaces = vec![lag_member("Ethernet1", "11"), lag_member("Ethernet2", "12")];

        let text = describe(&po, &connected, &BTreeMap::new(), &categories());
        assert_eq!(text, "rtr-b/rtr-c - core uplink");
    }

    #[test]
    fn test_lag_neighbors_deduplicated() {
        let mut connected = BTreeMap::new();
        connect(&mut connected, 11, "rtr-b", "Ethernet9", 501);
        connect(&mut connected, 12, "rtr-b", "Ethernet10", 502);

        let mut po = iface("Port-Channel1");
        po.if_type = "LAG".to_string();
        po.member_interfaces = vec![lag_member("Ethernet1", "11"), lag_member("Ethernet2", "12")];

        assert_eq!(describe(&po, &connected, &BTreeMap::new(), &[]), "rtr-b");
    }

    #[test]
    fn test_access_port_description() {
        let mut connected = BTreeMap::new();
        let mut port = access_port("Ethernet1/1", 10, "USERS");
        port.id = "31".to_string();
        port.cable.id = "700".to_string();
        port.tags = vec![NameRef { name: "PEERING".to_string() }, NameRef { name: "OTHER".to_string() }];
        port.untagged_vlan.tags = vec![NameRef { name: "SERVERS".to_string() }];
        port.lag.name = "Port-Channel1".to_string();
        connect(&mut connected, 31, "sw-b", "Ethernet48", 700);

        let text = describe(&port, &connected, &BTreeMap::new(), &categories());
        assert_eq!(
            text,
            "[PEERING,SERVERS] - USERS - sw-b:Ethernet48 - CABLE 700 - Port-Channel1"
        );
    }

    #[test]
    fn test_trunk_ignores_native_vlan_tags() {
        let mut port = tagged("Ethernet3", &[10, 20]);
        port.untagged_vlan.vid = 99;
        port.untagged_vlan.tags = vec![NameRef { name: "SERVERS".to_string() }];
        assert_eq!(describe(&port, &BTreeMap::new(), &BTreeMap::new(), &categories()), "");
    }

    #[test]
    fn test_dangling_cable_description() {
        let mut connected = BTreeMap::new();
        connected.insert(
            40,
            ConnectedInterface {
                id: 40,
                cable: crate::netbox::IdRef { id: 812 },
                connected_endpoints: vec![],
            },
        );
        let mut port = iface("Ethernet4");
        port.id = "40".to_string();
        assert_eq!(describe(&port, &connected, &BTreeMap::new(), &[]), "CABLE 812");
    }

    #[test]
    fn test_routed_port_uses_prefix_description() {
        let mut port = iface("Ethernet5");
        port.ip_addresses = vec![
            crate::netbox::IpAddress {
                address: "192.0.2.1/31".to_string(),
                ..Default::default()
            },
            crate::netbox::IpAddress {
                address: "198.51.100.1/24".to_string(),
                ..Default::default()
            },
        ];
        let mut prefixes = BTreeMap::new();
        prefixes.insert(
            "198.51.100.1/24".to_string(),
            Prefix {
                prefix: "198.51.100.0/24".to_string(),
                description: "dmz".to_string(),
            },
        );
        assert_eq!(describe(&port, &BTreeMap::new(), &prefixes, &[]), "dmz");
    }

    fn group(id: i64, protocol: &str, vrid: u32, addresses: &[&str]) -> FhrpGroup {
        FhrpGroup {
            id,
            protocol: protocol.to_string(),
            group_id: vrid,
            ip_addresses: addresses
                .iter()
                .map(|a| FhrpAddress {
                    id: 0,
                    address: a.to_string(),
                })
                .collect(),
        }
    }

    fn assignment(group_id: i64, device: &str, name: &str, priority: u32) -> FhrpAssignment {
        FhrpAssignment {
            group: FhrpGroupRef { id: group_id, group_id: 0 },
            priority,
            interface: AssignedInterface {
                device: NameRef { name: device.to_string() },
                name: name.to_string(),
            },
        }
    }

    #[test]
    fn test_fhrp_mapping_keeps_vrrp3_only() {
        let groups = vec![group(1, "vrrp3", 10, &["10.0.10.1/24"]), group(2, "hsrp", 20, &["10.0.20.1/24"])];
        let assignments = vec![
            assignment(1, "rtr-a", "vlan10", 120),
            assignment(2, "rtr-a", "vlan20", 110),
            assignment(1, "rtr-b", "vlan10", 100),
        ];
        let mapping = fhrp_mapping(&groups, &assignments).unwrap();
        assert_eq!(
            mapping["rtr-a"]["vlan10"],
            vec![FhrpEntry {
                virtual_ip: "10.0.10.1".to_string(),
                priority: 120,
                group_id: 10,
            }]
        );
        assert!(!mapping["rtr-a"].contains_key("vlan20"));
        assert_eq!(mapping["rtr-b"]["vlan10"][0].priority, 100);
    }

    #[test]
    fn test_fhrp_group_without_address_is_fatal() {
        let groups = vec![group(1, "vrrp3", 10, &[])];
        let assignments = vec![assignment(1, "rtr-a", "vlan10", 120)];
        assert!(matches!(
            fhrp_mapping(&groups, &assignments),
            Err(SynthError::FhrpGroupWithoutAddress(1))
        ));
        // unreferenced groups are never dereferenced
        assert!(fhrp_mapping(&groups, &[]).unwrap().is_empty());
    }
}
