//! openconfig-lacp

use serde::Serialize;
use std::collections::BTreeMap;

use super::as_list;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lacp {
    #[serde(serialize_with = "as_list", skip_serializing_if = "BTreeMap::is_empty")]
    pub interface: BTreeMap<String, LacpInterface>,
}

impl Lacp {
    /// Ensure an entry for the aggregate exists; no-op when already present
    pub fn ensure_interface(&mut self, name: &str) {
        self.interface
            .entry(name.to_string())
            .or_insert_with(|| LacpInterface {
                name: name.to_string(),
            });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LacpInterface {
    pub name: String,
}
