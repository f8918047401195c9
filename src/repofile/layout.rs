use clap::ValueEnum;
use std::collections::BTreeMap;

use super::{RepoConfig, RepoFile};
use crate::error::SynthError;
use crate::openconfig::{Interfaces, Tree};
use crate::synth::DeviceObjects;
use crate::utils::interface_file_id;

pub const INTERFACES_PATH: &str = "openconfig:/interfaces";
pub const ACL_PATH: &str = "openconfig:/acl/interfaces";
pub const VLANS_PATH: &str = "openconfig:/network-instance[name=DEFAULT]/vlans";
pub const OSPF_PATH: &str = "openconfig:/network-instance[name=DEFAULT]/protocols/protocol[name=OSPF]/ospfv2";
pub const LACP_PATH: &str = "openconfig:/lacp";

/// How interface bindings are spread over files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum InterfaceLayout {
    /// One file per interface
    #[default]
    Separate,
    /// One file, one section per interface
    Samefile,
    /// One file, one section holding every interface
    Together,
}

pub fn interface_path(name: &str) -> String {
    format!("{}/interface[name={}]", INTERFACES_PATH, name)
}

/// Directory of the first listed file whose parent directory is named after the host
pub fn host_prefix(host: &str, listing: &[String]) -> Result<String, SynthError> {
    listing
        .iter()
        .find_map(|path| {
            let parts: Vec<&str> = path.split('/').collect();
            (parts.len() > 2 && parts[parts.len() - 2] == host).then(|| parts[..parts.len() - 1].join("/"))
        })
        .ok_or_else(|| SynthError::NoHostPrefix(host.to_string()))
}

/// Lay out every device's bindings as repository files
pub fn plan(
    assembled: BTreeMap<String, DeviceObjects>,
    listing: &[String],
    layout: InterfaceLayout,
) -> Result<BTreeMap<String, Vec<RepoFile>>, SynthError> {
    let mut planned = BTreeMap::new();
    for (host, objects) in assembled {
        let prefix = host_prefix(&host, listing)?;
        let files = device_files(&prefix, objects, layout);
        tracing::debug!("{}: {} files under {}", host, files.len(), prefix);
        planned.insert(host, files);
    }
    Ok(planned)
}

fn device_files(prefix: &str, objects: DeviceObjects, layout: InterfaceLayout) -> Vec<RepoFile> {
    let mut files = Vec::new();

    if !objects.interfaces.is_empty() {
        let interfaces_file = format!("{}/interfaces.yaml.j2", prefix);
        match layout {
            InterfaceLayout::Separate => {
                for (name, iface) in objects.interfaces {
                    let section = RepoConfig::binding(interface_path(&name), Tree::Interface(Box::new(iface)));
                    let path = format!("{}/interfaces-{}.yaml.j2", prefix, interface_file_id(&name));
                    files.push(RepoFile::new(path, vec![section]));
                }
            }
            InterfaceLayout::Samefile => {
                let sections = objects
                    .interfaces
                    .into_iter()
                    .map(|(name, iface)| RepoConfig::binding(interface_path(&name), Tree::Interface(Box::new(iface))))
                    .collect();
                files.push(RepoFile::new(interfaces_file, sections));
            }
            InterfaceLayout::Together => {
                let all = Interfaces {
                    interface: objects.interfaces,
                };
                let section = RepoConfig::binding(INTERFACES_PATH, Tree::Interfaces(all));
                files.push(RepoFile::new(interfaces_file, vec![section]));
            }
        }
    }

    let others = [
        ("acl", ACL_PATH, objects.acl.map(Tree::AclInterfaces)),
        ("vlan", VLANS_PATH, objects.vlans.map(Tree::Vlans)),
        ("ospfv2", OSPF_PATH, objects.ospf.map(Tree::Ospfv2)),
        ("lacp", LACP_PATH, objects.lacp.map(Tree::Lacp)),
    ];
    for (stem, path, tree) in others {
        if let Some(tree) = tree.filter(|t| !t.is_empty()) {
            let file = format!("{}/{}.yaml.j2", prefix, stem);
            files.push(RepoFile::new(file, vec![RepoConfig::binding(path, tree)]));
        }
    }

    files
}
