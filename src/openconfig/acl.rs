//! openconfig-acl interface bindings.

use serde::Serialize;
use std::collections::BTreeMap;

use super::as_list;

/// The `/acl/interfaces` container
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AclInterfaces {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub interface: BTreeMap<String, AclInterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AclInterface {
    pub id: String,
    pub interface_ref: InterfaceRef,
    pub ingress_acl_sets: IngressAclSets,
    pub egress_acl_sets: EgressAclSets,
}

impl AclInterface {
    /// Attach an ACL set in each direction
    pub fn new(id: &str, interface_ref: InterfaceRefConfig, ingress: &str, egress: &str, acl_type: AclType) -> Self {
        let mut entry = Self {
            id: id.to_string(),
            interface_ref: InterfaceRef { config: interface_ref },
            ..Default::default()
        };
        entry
            .ingress_acl_sets
            .ingress_acl_set
            .insert((ingress.to_string(), acl_type), AclSet::new(ingress, acl_type));
        entry
            .egress_acl_sets
            .egress_acl_set
            .insert((egress.to_string(), acl_type), AclSet::new(egress, acl_type));
        entry
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterfaceRef {
    pub config: InterfaceRefConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterfaceRefConfig {
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subinterface: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct IngressAclSets {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub ingress_acl_set: BTreeMap<(String, AclType), AclSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EgressAclSets {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub egress_acl_set: BTreeMap<(String, AclType), AclSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AclSet {
    pub set_name: String,
    #[serde(rename = "type")]
    pub acl_type: AclType,
}

impl AclSet {
    fn new(name: &str, acl_type: AclType) -> Self {
        Self {
            set_name: name.to_string(),
            acl_type,
        }
    }
}

/// openconfig-acl ACL_TYPE identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AclType {
    #[serde(rename = "openconfig-acl:ACL_IPV4")]
    Ipv4,
}
