pub mod client;
pub mod types;

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

pub use client::NetBoxClient;
pub use types::*;

use crate::synth::derive;

/// Read-only view of the NetBox data a run needs
#[async_trait]
pub trait SotSource: Send + Sync {
    async fn devices(&self, names: &[String]) -> Vec<Device>;
    async fn connected_interfaces(&self, devices: &[String]) -> Vec<ConnectedInterface>;
    async fn vlans(&self) -> Vec<VlanEntry>;
    async fn fhrp_groups(&self) -> Vec<FhrpGroup>;
    async fn fhrp_assignments(&self) -> Vec<FhrpAssignment>;
    async fn parent_prefix(&self, address: &str) -> Option<Prefix>;
}

/// A device with its interfaces keyed by name
#[derive(Debug, Clone, Default)]
pub struct InterfaceMapping {
    pub device: Device,
    pub interfaces: BTreeMap<String, Interface>,
    pub subinterfaces: BTreeMap<String, Vec<String>>,
}

impl InterfaceMapping {
    pub fn new(mut device: Device) -> Self {
        let list = std::mem::take(&mut device.interfaces);
        let subinterfaces = derive::subinterface_map(&list);
        let interfaces = list.into_iter().map(|i| (i.name.clone(), i)).collect();
        Self {
            device,
            interfaces,
            subinterfaces,
        }
    }

    pub fn site(&self) -> &str {
        &self.device.site.slug
    }
}

/// Which optional datasets to pull
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchPlan {
    pub vlans: bool,
    pub fhrp: bool,
    pub prefixes: bool,
}

/// Everything read from NetBox for one run
#[derive(Debug, Clone, Default)]
pub struct SotSnapshot {
    pub interfaces: BTreeMap<String, InterfaceMapping>,
    pub connected: BTreeMap<i64, ConnectedInterface>,
    pub vlans: BTreeMap<String, Vec<VlanEntry>>,
    pub fhrp_groups: Vec<FhrpGroup>,
    pub fhrp_assignments: Vec<FhrpAssignment>,
    /// Parent prefix per interface address, for description derivation
    pub prefixes: BTreeMap<String, Prefix>,
}

impl SotSnapshot {
    pub async fn fetch(source: &dyn SotSource, names: &[String], plan: FetchPlan) -> Self {
        let mut snapshot = SotSnapshot::default();

        for device in source.devices(names).await {
            tracing::debug!("{}: {} interfaces", device.name, device.interfaces.len());
            snapshot
                .interfaces
                .insert(device.name.clone(), InterfaceMapping::new(device));
        }
        for name in names {
            if !snapshot.interfaces.contains_key(name) {
                tracing::warn!("Device {} not found in NetBox", name);
            }
        }

        let found: Vec<String> = snapshot.interfaces.keys().cloned().collect();
        snapshot.connected = source
            .connected_interfaces(&found)
            .await
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        if plan.vlans {
            snapshot.vlans = group_vlans_by_site(source.vlans().await);
        }
        if plan.fhrp {
            snapshot.fhrp_groups = source.fhrp_groups().await;
            snapshot.fhrp_assignments = source.fhrp_assignments().await;
        }
        if plan.prefixes {
            for address in snapshot.prefix_lookups() {
                if let Some(prefix) = source.parent_prefix(&address).await {
                    snapshot.prefixes.insert(address, prefix);
                }
            }
        }

        tracing::info!(
            "Fetched {} devices, {} connected interfaces, {} FHRP assignments",
            snapshot.interfaces.len(),
            snapshot.connected.len(),
            snapshot.fhrp_assignments.len()
        );
        snapshot
    }

    /// Addresses whose parent prefix feeds an interface description
    fn prefix_lookups(&self) -> BTreeSet<String> {
        self.interfaces
            .values()
            .flat_map(|m| m.interfaces.values())
            .filter(|i| !derive::uses_vlan_name(i))
            .filter_map(|i| i.ip_addresses.last())
            .map(|a| a.address.clone())
            .collect()
    }
}

/// Group VLAN records by site slug, dropping site-less VLANs
pub fn group_vlans_by_site(vlans: Vec<VlanEntry>) -> BTreeMap<String, Vec<VlanEntry>> {
    let mut by_site: BTreeMap<String, Vec<VlanEntry>> = BTreeMap::new();
    for vlan in vlans {
        if !vlan.site.slug.is_empty() {
            by_site.entry(vlan.site.slug.clone()).or_default().push(vlan);
        }
    }
    by_site
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{device, iface, FakeSot};

    #[test]
    fn test_group_vlans_by_site() {
        let vlan = |id: &str, site: &str| VlanEntry {
            id: id.to_string(),
            site: SlugRef { slug: site.to_string() },
            name: format!("v{}", id),
            ..Default::default()
        };
        let grouped = group_vlans_by_site(vec![vlan("1", "nyc"), vlan("2", ""), vlan("3", "nyc"), vlan("4", "lon")]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["nyc"].len(), 2);
        assert_eq!(grouped["lon"][0].id, "4");
    }

    #[tokio::test]
    async fn test_fetch_skips_optional_datasets() {
        let sot = FakeSot::new(vec![device("rtr-a", "nyc", vec![iface("Ethernet1")])]);
        let snapshot = SotSnapshot::fetch(&sot, &["rtr-a".to_string()], FetchPlan::default()).await;
        assert!(snapshot.interfaces.contains_key("rtr-a"));
        assert!(snapshot.vlans.is_empty());
        assert_eq!(sot.calls(), vec!["devices", "connected_interfaces"]);
    }

    #[tokio::test]
    async fn test_fetch_looks_up_last_address_prefix() {
        let mut routed = iface("Ethernet1");
        routed.ip_addresses = vec![
            IpAddress {
                address: "10.0.0.1/31".to_string(),
                ..Default::default()
            },
            IpAddress {
                address: "10.9.0.1/24".to_string(),
                ..Default::default()
            },
        ];
        let mut sot = FakeSot::new(vec![device("rtr-a", "nyc", vec![routed])]);
        sot.prefixes.insert(
            "10.9.0.1/24".to_string(),
            Prefix {
                prefix: "10.9.0.0/24".to_string(),
                description: "servers".to_string(),
            },
        );
        let plan = FetchPlan {
            prefixes: true,
            ..Default::default()
        };
        let snapshot = SotSnapshot::fetch(&sot, &["rtr-a".to_string()], plan).await;
        assert_eq!(snapshot.prefixes.len(), 1);
        assert_eq!(snapshot.prefixes["10.9.0.1/24"].description, "servers");
    }
}
