//! Typed OpenConfig trees.
//!
//! Containers serialize with bare kebab-case member names. A member that
//! crosses into another YANG module (an augment, or a grouping from another
//! namespace) carries its `module:` prefix in the serde rename, and
//! [`qualify`] turns that into RFC7951 form: every top-level member is
//! module-qualified, nested members only when the namespace changes.

pub mod acl;
pub mod interfaces;
pub mod lacp;
pub mod network_instance;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub use acl::AclInterfaces;
pub use interfaces::{Interface, Interfaces};
pub use lacp::Lacp;
pub use network_instance::{Ospfv2, Vlans};

/// Serialize a keyed YANG list as a JSON array ordered by key
pub(crate) fn as_list<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    serializer.collect_seq(map.values())
}

/// One OpenConfig subtree ready to be placed under a gNMI path
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Interface(Box<Interface>),
    Interfaces(Interfaces),
    AclInterfaces(AclInterfaces),
    Lacp(Lacp),
    Vlans(Vlans),
    Ospfv2(Ospfv2),
}

impl Tree {
    /// YANG module owning the root of this subtree
    pub fn module(&self) -> &'static str {
        match self {
            Tree::Interface(_) | Tree::Interfaces(_) => "openconfig-interfaces",
            Tree::AclInterfaces(_) => "openconfig-acl",
            Tree::Lacp(_) => "openconfig-lacp",
            Tree::Vlans(_) | Tree::Ospfv2(_) => "openconfig-network-instance",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Tree::Interface(_) => false,
            Tree::Interfaces(i) => i.interface.is_empty(),
            Tree::AclInterfaces(a) => a.interface.is_empty(),
            Tree::Lacp(l) => l.interface.is_empty(),
            Tree::Vlans(v) => v.vlan.is_empty(),
            Tree::Ospfv2(o) => o.areas.is_none(),
        }
    }

    /// Emit the subtree as RFC7951 JSON with module names appended
    pub fn to_rfc7951(&self) -> serde_json::Result<Value> {
        let raw = match self {
            Tree::Interface(i) => serde_json::to_value(i)?,
            Tree::Interfaces(i) => serde_json::to_value(i)?,
            Tree::AclInterfaces(a) => serde_json::to_value(a)?,
            Tree::Lacp(l) => serde_json::to_value(l)?,
            Tree::Vlans(v) => serde_json::to_value(v)?,
            Tree::Ospfv2(o) => serde_json::to_value(o)?,
        };
        Ok(qualify(raw, self.module(), true))
    }
}

/// Apply RFC7951 member-name qualification to a serialized tree.
pub fn qualify(value: Value, module: &str, top: bool) -> Value {
    match value {
        Value::Object(members) => {
            let mut out = Map::new();
            for (key, child) in members {
                let (name, child_module) = match key.split_once(':') {
                    Some((m, n)) => (n.to_string(), m.to_string()),
                    None => (key.clone(), module.to_string()),
                };
                let qualified = if top || child_module != module {
                    format!("{}:{}", child_module, name)
                } else {
                    name
                };
                out.insert(qualified, qualify(child, &child_module, false));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| qualify(item, module, false))
                .collect(),
        ),
        other => other,
    }
}
