//! Binding assembly: NetBox snapshot in, OpenConfig trees per device out.

pub mod derive;
pub mod interfaces;
pub mod protocols;

use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SynthError;
use crate::netbox::{FetchPlan, SotSnapshot};
use crate::openconfig::{AclInterfaces, Interface, Lacp, Ospfv2, Vlans};
use interfaces::InterfaceContext;

/// Configuration families that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigType {
    Interfaces,
    Ospf,
    Vlans,
    Acl,
    Lacp,
}

impl ConfigType {
    pub const ALL: [ConfigType; 5] = [
        ConfigType::Interfaces,
        ConfigType::Ospf,
        ConfigType::Vlans,
        ConfigType::Acl,
        ConfigType::Lacp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigType::Interfaces => "INTERFACES",
            ConfigType::Ospf => "OSPF",
            ConfigType::Vlans => "VLANS",
            ConfigType::Acl => "ACL",
            ConfigType::Lacp => "LACP",
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Which NetBox VLAN field becomes the OpenConfig VLAN key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum VlanKey {
    /// NetBox record id
    #[default]
    Id,
    /// 802.1Q VLAN id
    Vid,
}

#[derive(Debug, Clone, Default)]
pub struct SynthOptions {
    /// Requested families; empty means all of them
    pub config_types: Vec<ConfigType>,
    pub filter: Vec<String>,
    pub auto_desc: bool,
    pub category_tags: Vec<String>,
    pub vlan_key: VlanKey,
}

impl SynthOptions {
    pub fn includes(&self, config_type: ConfigType) -> bool {
        self.config_types.is_empty() || self.config_types.contains(&config_type)
    }

    /// Optional NetBox datasets these options consume
    pub fn fetch_plan(&self) -> FetchPlan {
        let interfaces = self.includes(ConfigType::Interfaces);
        FetchPlan {
            vlans: self.includes(ConfigType::Vlans),
            fhrp: interfaces,
            prefixes: interfaces && self.auto_desc,
        }
    }
}

/// Everything assembled for one device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceObjects {
    pub interfaces: BTreeMap<String, Interface>,
    pub acl: Option<AclInterfaces>,
    pub vlans: Option<Vlans>,
    pub ospf: Option<Ospfv2>,
    pub lacp: Option<Lacp>,
}

/// Assemble the requested families for every device in the snapshot
pub fn synthesize(snapshot: &SotSnapshot, opts: &SynthOptions) -> Result<BTreeMap<String, DeviceObjects>, SynthError> {
    let with_interfaces = opts.includes(ConfigType::Interfaces);
    let descriptions = if with_interfaces && opts.auto_desc {
        derive::descriptions(snapshot, &opts.category_tags)
    } else {
        derive::DescriptionMapping::new()
    };
    let fhrp = if with_interfaces {
        derive::fhrp_mapping(&snapshot.fhrp_groups, &snapshot.fhrp_assignments)?
    } else {
        derive::FhrpMapping::new()
    };
    let no_descriptions = BTreeMap::new();
    let no_fhrp = BTreeMap::new();

    let mut assembled = BTreeMap::new();
    for (host, mapping) in &snapshot.interfaces {
        let mut objects = DeviceObjects::default();

        if with_interfaces {
            let ctx = InterfaceContext {
                host,
                auto_desc: opts.auto_desc,
                descriptions: descriptions.get(host).unwrap_or(&no_descriptions),
                fhrp: fhrp.get(host).unwrap_or(&no_fhrp),
            };
            objects.interfaces = interfaces::build_interfaces(mapping, &opts.filter, &ctx)?;
        }
        if opts.includes(ConfigType::Vlans) {
            let entries = snapshot.vlans.get(mapping.site()).map(Vec::as_slice).unwrap_or_default();
            objects.vlans = Some(protocols::build_vlans(entries, opts.vlan_key)?);
        }
        if opts.includes(ConfigType::Lacp) {
            objects.lacp = Some(protocols::build_lacp(mapping));
        }
        if opts.includes(ConfigType::Acl) {
            objects.acl = Some(protocols::build_acl(mapping)?);
        }
        if opts.includes(ConfigType::Ospf) {
            objects.ospf = Some(protocols::build_ospf(mapping));
        }

        tracing::debug!("{}: assembled {} interfaces", host, objects.interfaces.len());
        assembled.insert(host.clone(), objects);
    }
    Ok(assembled)
}
