//! Fixtures and in-memory collaborators shared by unit tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::netbox::*;
use crate::repo::*;

pub fn device(name: &str, site: &str, interfaces: Vec<Interface>) -> Device {
    Device {
        id: "1".to_string(),
        name: name.to_string(),
        site: SlugRef { slug: site.to_string() },
        interfaces,
        ..Default::default()
    }
}

/// An enabled interface with nothing else set
pub fn iface(name: &str) -> Interface {
    Interface {
        name: name.to_string(),
        enabled: true,
        ..Default::default()
    }
}

pub fn access_port(name: &str, vid: u16, vlan_name: &str) -> Interface {
    let mut i = iface(name);
    i.mode = InterfaceMode::Access;
    i.untagged_vlan = UntaggedVlan {
        vid,
        name: vlan_name.to_string(),
        tags: vec![],
    };
    i
}

pub fn tagged(name: &str, vids: &[u16]) -> Interface {
    let mut i = iface(name);
    i.mode = InterfaceMode::Tagged;
    i.tagged_vlans = vids.iter().map(|vid| TaggedVlan { vid: *vid }).collect();
    i
}

/// Access-mode child of `parent` carrying `vid` untagged
pub fn subinterface(name: &str, parent: &str, vid: u16) -> Interface {
    let mut i = iface(name);
    i.parent.name = parent.to_string();
    i.mode = InterfaceMode::Access;
    i.untagged_vlan.vid = vid;
    i
}

pub fn with_address(mut i: Interface, address: &str) -> Interface {
    i.ip_addresses.push(IpAddress {
        address: address.to_string(),
        ..Default::default()
    });
    i
}

pub fn lag_member(name: &str, id: &str) -> MemberInterface {
    MemberInterface {
        name: name.to_string(),
        id: id.to_string(),
    }
}

/// Record a cabled link from local interface `id` to `device:name`
pub fn connect(connected: &mut BTreeMap<i64, ConnectedInterface>, id: i64, device: &str, name: &str, cable: i64) {
    connected.insert(
        id,
        ConnectedInterface {
            id,
            cable: IdRef { id: cable },
            connected_endpoints: vec![ConnectedEndpoint {
                id: id + 1000,
                name: name.to_string(),
                device: RemoteDevice {
                    id: 0,
                    name: device.to_string(),
                },
                cable,
            }],
        },
    );
}

/// Static NetBox data with a log of which datasets were requested
#[derive(Default)]
pub struct FakeSot {
    pub devices: Vec<Device>,
    pub connected: Vec<ConnectedInterface>,
    pub vlans: Vec<VlanEntry>,
    pub fhrp_groups: Vec<FhrpGroup>,
    pub fhrp_assignments: Vec<FhrpAssignment>,
    pub prefixes: BTreeMap<String, Prefix>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeSot {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl SotSource for FakeSot {
    async fn devices(&self, names: &[String]) -> Vec<Device> {
        self.record("devices");
        self.devices
            .iter()
            .filter(|d| names.contains(&d.name))
            .cloned()
            .collect()
    }

    async fn connected_interfaces(&self, _devices: &[String]) -> Vec<ConnectedInterface> {
        self.record("connected_interfaces");
        self.connected.clone()
    }

    async fn vlans(&self) -> Vec<VlanEntry> {
        self.record("vlans");
        self.vlans.clone()
    }

    async fn fhrp_groups(&self) -> Vec<FhrpGroup> {
        self.record("fhrp_groups");
        self.fhrp_groups.clone()
    }

    async fn fhrp_assignments(&self) -> Vec<FhrpAssignment> {
        self.record("fhrp_assignments");
        self.fhrp_assignments.clone()
    }

    async fn parent_prefix(&self, address: &str) -> Option<Prefix> {
        self.record("parent_prefix");
        self.prefixes.get(address).cloned()
    }
}

/// Repository held in memory: `main` plus any branches created from it
pub struct FakeRepo {
    main: BTreeMap<String, String>,
    branches: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRepo {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            main: files.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect(),
            branches: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Main with the files of every committed action applied
    pub fn with_committed(actions: &[FileAction]) -> Self {
        let files: Vec<(&str, &str)> = actions
            .iter()
            .map(|a| (a.file_path.as_str(), a.content.as_str()))
            .collect();
        Self::new(&files)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Content of `path` on `main`
    pub fn file(&self, path: &str) -> Option<String> {
        self.main.get(path).cloned()
    }

    pub fn branch_exists(&self, branch: &str) -> bool {
        self.branches.lock().map(|b| b.contains_key(branch)).unwrap_or(false)
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn files_at(&self, git_ref: &str) -> BTreeMap<String, String> {
        if git_ref == MAIN_BRANCH {
            return self.main.clone();
        }
        self.branches
            .lock()
            .ok()
            .and_then(|b| b.get(git_ref).cloned())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RepoService for FakeRepo {
    async fn list_files(&self) -> Vec<TreeEntry> {
        self.record("list_files".to_string());
        self.main
            .keys()
            .map(|path| TreeEntry {
                path: path.clone(),
                name: path.rsplit('/').next().unwrap_or_default().to_string(),
                entry_type: "blob".to_string(),
            })
            .collect()
    }

    async fn get_file_raw(&self, path: &str, git_ref: &str) -> Option<String> {
        self.record(format!("get_file_raw {}", path));
        self.files_at(git_ref).get(path).cloned()
    }

    async fn create_branch(&self, branch: &str, from: &str) {
        self.record(format!("create_branch {}", branch));
        let files = self.files_at(from);
        if let Ok(mut branches) = self.branches.lock() {
            branches.entry(branch.to_string()).or_insert(files);
        }
    }

    async fn commit_files(&self, branch: &str, _message: &str, actions: &[FileAction]) {
        self.record(format!("commit_files {}", branch));
        if let Ok(mut branches) = self.branches.lock() {
            if let Some(files) = branches.get_mut(branch) {
                for action in actions {
                    files.insert(action.file_path.clone(), action.content.clone());
                }
            }
        }
    }

    async fn compare(&self, from: &str, to: &str) -> CompareResponse {
        self.record(format!("compare {} {}", from, to));
        let (old, new) = (self.files_at(from), self.files_at(to));
        let diffs = new
            .iter()
            .filter(|(path, content)| old.get(*path) != Some(*content))
            .map(|(path, _)| CompareDiff {
                diff: String::new(),
                new_path: path.clone(),
                old_path: path.clone(),
            })
            .collect();
        CompareResponse {
            commits: vec![],
            diffs,
        }
    }

    async fn delete_branch(&self, branch: &str) {
        self.record(format!("delete_branch {}", branch));
        if let Ok(mut branches) = self.branches.lock() {
            branches.remove(branch);
        }
    }

    async fn create_merge_request(&self, source: &str, _target: &str, _title: &str) -> MergeRequest {
        self.record(format!("create_merge_request {}", source));
        MergeRequest {
            web_url: Some("https://gitlab.example/mr/1".to_string()),
        }
    }
}
