//! Per-device protocol containers: VLANS, LACP, ACL and OSPF.

use super::VlanKey;
use crate::error::SynthError;
use crate::netbox::{InterfaceMapping, VlanEntry};
use crate::openconfig::acl::{AclInterface, AclType, InterfaceRefConfig};
use crate::openconfig::network_instance::{OspfInterface, OspfInterfaceConfig};
use crate::openconfig::{AclInterfaces, Lacp, Ospfv2, Vlans};
use crate::utils::normalize_vlan_name;

pub const TAG_TRANSIT: &str = "TRANSIT";
pub const TAG_PEERING: &str = "PEERING";
pub const TAG_OSPF_ACTIVE: &str = "OSPF_ACTIVE";
pub const TAG_OSPF_PASSIVE: &str = "OSPF_PASSIVE";

pub const INGRESS_ACL: &str = "INGRESS_ACL";
pub const EGRESS_ACL: &str = "EGRESS_ACL";

const BACKBONE_AREA: u32 = 0;

/// VLANs defined at the device's site
pub fn build_vlans(entries: &[VlanEntry], key: VlanKey) -> Result<Vlans, SynthError> {
    let mut vlans = Vlans::default();
    for entry in entries {
        let vlan_id = match key {
            VlanKey::Id => entry.id.parse::<u16>().map_err(|_| SynthError::OutOfRange {
                field: "vlan id",
                value: entry.id.clone(),
            })?,
            VlanKey::Vid => entry.vid,
        };
        vlans.insert(vlan_id, normalize_vlan_name(&entry.name));
    }
    Ok(vlans)
}

/// One LACP entry per LAG that has at least one member on the device
pub fn build_lacp(mapping: &InterfaceMapping) -> Lacp {
    let mut lacp = Lacp::default();
    for iface in mapping.interfaces.values() {
        if let Some(lag) = iface.lag_name() {
            lacp.ensure_interface(lag);
        }
    }
    lacp
}

/// Ingress and egress IPv4 ACLs on every TRANSIT or PEERING interface
pub fn build_acl(mapping: &InterfaceMapping) -> Result<AclInterfaces, SynthError> {
    let mut acl = AclInterfaces::default();
    for iface in mapping.interfaces.values() {
        if !(iface.has_tag(TAG_TRANSIT) || iface.has_tag(TAG_PEERING)) {
            continue;
        }
        let interface_ref = match iface.parent_name() {
            None => InterfaceRefConfig {
                interface: iface.name.clone(),
                subinterface: None,
            },
            Some(_) => {
                let (base, index) = iface
                    .name
                    .split_once('.')
                    .ok_or_else(|| SynthError::SubinterfaceId(iface.name.clone()))?;
                let index = index
                    .parse::<u32>()
                    .map_err(|_| SynthError::SubinterfaceId(iface.name.clone()))?;
                InterfaceRefConfig {
                    interface: base.to_string(),
                    subinterface: Some(index),
                }
            }
        };
        acl.interface.insert(
            iface.name.clone(),
            AclInterface::new(&iface.name, interface_ref, INGRESS_ACL, EGRESS_ACL, AclType::Ipv4),
        );
    }
    Ok(acl)
}

/// Area 0 with every OSPF-tagged interface; no areas at all when none are tagged
pub fn build_ospf(mapping: &InterfaceMapping) -> Ospfv2 {
    let mut ospf = Ospfv2::default();
    for iface in mapping.interfaces.values() {
        let passive = iface.has_tag(TAG_OSPF_PASSIVE);
        if !(passive || iface.has_tag(TAG_OSPF_ACTIVE)) {
            continue;
        }
        ospf.area_interfaces(BACKBONE_AREA).insert(
            iface.name.clone(),
            OspfInterface {
                id: iface.name.clone(),
                config: OspfInterfaceConfig {
                    id: iface.name.clone(),
                    passive: passive.then_some(true),
                },
            },
        );
    }
    ospf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbox::{NameRef, SlugRef};
    use crate::openconfig::Tree;
    use crate::testutil::{device, iface, subinterface};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tagged_with(name: &str, tags: &[&str]) -> crate::netbox::Interface {
        let mut i = iface(name);
        i.tags = tags.iter().map(|t| NameRef { name: t.to_string() }).collect();
        i
    }

    fn vlan(id: &str, vid: u16, name: &str) -> VlanEntry {
        VlanEntry {
            id: id.to_string(),
            vid,
            site: SlugRef { slug: "nyc".to_string() },
            name: name.to_string(),
        }
    }

    #[test]
    fn test_vlans_keyed_by_record_id() {
        let entries = vec![vlan("412", 10, "users-floor 2"), vlan("7", 20, "mgmt")];
        let vlans = build_vlans(&entries, VlanKey::Id).unwrap();
        assert_eq!(vlans.vlan.keys().copied().collect::<Vec<_>>(), vec![7, 412]);
        assert_eq!(vlans.vlan[&412].config.name, "USERS_FLOOR_2");
        assert_eq!(vlans.vlan[&412].config.vlan_id, 412);
    }

    #[test]
    fn test_vlans_keyed_by_vid() {
        let entries = vec![vlan("412", 10, "users"), vlan("7", 20, "mgmt")];
        let vlans = build_vlans(&entries, VlanKey::Vid).unwrap();
        assert_eq!(vlans.vlan.keys().copied().collect::<Vec<_>>(), vec![10, 20]);
    }

    #[test]
    fn test_vlan_record_id_out_of_range() {
        let entries = vec![vlan("70000", 10, "users")];
        assert!(matches!(
            build_vlans(&entries, VlanKey::Id),
            Err(SynthError::OutOfRange { field: "vlan id", .. })
        ));
    }

    #[test]
    fn test_lacp_one_entry_per_lag() {
        let mut a = iface("Ethernet1");
        a.lag.name = "Port-Channel1".to_string();
        let mut b = iface("Ethernet2");
        b.lag.name = "Port-Channel1".to_string();
        let mapping = InterfaceMapping::new(device("rtr-a", "nyc", vec![a, b, iface("Ethernet3")]));
        let lacp = build_lacp(&mapping);
        assert_eq!(lacp.interface.keys().collect::<Vec<_>>(), vec!["Port-Channel1"]);
    }

    #[test]
    fn test_acl_subinterface_ref() {
        let mut child = subinterface("Ethernet2.100", "Ethernet2", 100);
        child.tags = vec![NameRef { name: TAG_TRANSIT.to_string() }];
        let mapping = InterfaceMapping::new(device(
            "rtr-a",
            "nyc",
            vec![iface("Ethernet2"), child, tagged_with("Ethernet3", &[TAG_PEERING])],
        ));
        let acl = build_acl(&mapping).unwrap();
        assert_eq!(acl.interface.len(), 2);

        let got = Tree::AclInterfaces(acl).to_rfc7951().unwrap();
        let entries = got["openconfig-acl:interface"].as_array().unwrap();
        assert_eq!(
            entries[0]["interface-ref"]["config"],
            json!({"interface": "Ethernet2", "subinterface": 100})
        );
        assert_eq!(entries[1]["interface-ref"]["config"], json!({"interface": "Ethernet3"}));
        assert_eq!(
            entries[1]["egress-acl-sets"]["egress-acl-set"][0]["type"],
            json!("openconfig-acl:ACL_IPV4")
        );
    }

    #[test]
    fn test_acl_non_numeric_subinterface_is_fatal() {
        let mut child = subinterface("Ethernet2.edge", "Ethernet2", 100);
        child.tags = vec![NameRef { name: TAG_TRANSIT.to_string() }];
        let mapping = InterfaceMapping::new(device("rtr-a", "nyc", vec![child]));
        assert!(matches!(build_acl(&mapping), Err(SynthError::SubinterfaceId(_))));
    }

    #[test]
    fn test_ospf_gating() {
        let untagged = InterfaceMapping::new(device("rtr-a", "nyc", vec![iface("Ethernet1")]));
        assert!(Tree::Ospfv2(build_ospf(&untagged)).is_empty());

        let mapping = InterfaceMapping::new(device(
            "rtr-a",
            "nyc",
            vec![
                tagged_with("Ethernet1", &[TAG_OSPF_PASSIVE]),
                tagged_with("Ethernet2", &[TAG_OSPF_ACTIVE]),
                tagged_with("Loopback0", &[TAG_OSPF_ACTIVE, TAG_OSPF_PASSIVE]),
            ],
        ));
        let mut ospf = build_ospf(&mapping);
        let area0 = ospf.area_interfaces(0);
        assert_eq!(area0.len(), 3);
        assert_eq!(area0["Ethernet1"].config.passive, Some(true));
        assert_eq!(area0["Ethernet2"].config.passive, None);
        assert_eq!(area0["Loopback0"].config.passive, Some(true));
        assert_eq!(ospf.areas.as_ref().unwrap().area.len(), 1);
    }
}
