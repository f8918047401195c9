//! Pieces of openconfig-network-instance: the VLAN table and the OSPFv2
//! protocol container of the DEFAULT instance.

use serde::Serialize;
use std::collections::BTreeMap;

use super::as_list;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vlans {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub vlan: BTreeMap<u16, Vlan>,
}

impl Vlans {
    pub fn insert(&mut self, vlan_id: u16, name: String) {
        self.vlan.insert(
            vlan_id,
            Vlan {
                vlan_id,
                config: VlanConfig { vlan_id, name },
            },
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Vlan {
    pub vlan_id: u16,
    pub config: VlanConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VlanConfig {
    pub vlan_id: u16,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ospfv2 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areas: Option<Areas>,
}

impl Ospfv2 {
    /// Interface table of an area, creating the area on first use
    pub fn area_interfaces(&mut self, identifier: u32) -> &mut BTreeMap<String, OspfInterface> {
        &mut self
            .areas
            .get_or_insert_with(Areas::default)
            .area
            .entry(identifier)
            .or_insert_with(|| Area {
                identifier,
                config: AreaConfig { identifier },
                interfaces: AreaInterfaces::default(),
            })
            .interfaces
            .interface
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Areas {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub area: BTreeMap<u32, Area>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Area {
    pub identifier: u32,
    pub config: AreaConfig,
    pub interfaces: AreaInterfaces,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaConfig {
    pub identifier: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaInterfaces {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub interface: BTreeMap<String, OspfInterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OspfInterface {
    pub id: String,
    pub config: OspfInterfaceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OspfInterfaceConfig {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passive: Option<bool>,
}
