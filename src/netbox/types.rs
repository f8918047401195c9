use serde::{Deserialize, Deserializer, Serialize};

// --- NetBox API types ---
//
// NetBox returns `null` for unset nested objects and scalars. Fields that may be
// null use `null_default` so an absent value reads as the type's zero value.

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// NetBox nests the cable as `{"id": .., "url": .., "label": ..}`; older
/// payloads carry the bare id.
#[derive(Deserialize)]
#[serde(untagged)]
enum CableIdRepr {
    Id(i64),
    Nested(IdRef),
}

fn cable_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<CableIdRepr>::deserialize(deserializer)? {
        Some(CableIdRepr::Id(id)) => id,
        Some(CableIdRepr::Nested(cable)) => cable.id,
        None => 0,
    })
}

#[derive(Debug, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
}

impl<T> Default for GraphQlResponse<T> {
    fn default() -> Self {
        Self { data: None }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeviceListData {
    #[serde(default, deserialize_with = "null_default")]
    pub device_list: Vec<Device>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VlanListData {
    #[serde(default, deserialize_with = "null_default")]
    pub vlan_list: Vec<VlanEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NameRef {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SlugRef {
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub platform: SlugRef,
    #[serde(default, deserialize_with = "null_default")]
    pub site: SlugRef,
    #[serde(default, deserialize_with = "null_default")]
    pub interfaces: Vec<Interface>,
}

/// Switchport mode as reported by NetBox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum InterfaceMode {
    #[default]
    #[serde(skip)]
    Unset,
    #[serde(rename = "ACCESS", alias = "access")]
    Access,
    #[serde(rename = "TAGGED", alias = "tagged")]
    Tagged,
    #[serde(rename = "TAGGED_ALL", alias = "tagged-all")]
    TaggedAll,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MemberInterface {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaggedVlan {
    pub vid: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UntaggedVlan {
    #[serde(default, deserialize_with = "null_default")]
    pub vid: u16,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<NameRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IpAddress {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    pub address: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CableRef {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
}

/// One interface as returned by the device GraphQL query
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Interface {
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<NameRef>,
    #[serde(default, deserialize_with = "null_default")]
    pub vrf: NameRef,
    #[serde(default, deserialize_with = "null_default")]
    pub member_interfaces: Vec<MemberInterface>,
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_default")]
    pub if_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub mgmt_only: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub mtu: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub mac_address: String,
    #[serde(default, deserialize_with = "null_default")]
    pub lag: NameRef,
    #[serde(default, deserialize_with = "null_default")]
    pub speed: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub duplex: String,
    #[serde(default, deserialize_with = "null_default")]
    pub mode: InterfaceMode,
    #[serde(default, deserialize_with = "null_default")]
    pub parent: NameRef,
    #[serde(default, deserialize_with = "null_default")]
    pub tagged_vlans: Vec<TaggedVlan>,
    #[serde(default, deserialize_with = "null_default")]
    pub untagged_vlan: UntaggedVlan,
    #[serde(default, deserialize_with = "null_default")]
    pub ip_addresses: Vec<IpAddress>,
    #[serde(default, deserialize_with = "null_default")]
    pub cable: CableRef,
}

impl Interface {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.name == tag)
    }

    pub fn is_lag(&self) -> bool {
        self.if_type.eq_ignore_ascii_case("LAG")
    }

    pub fn parent_name(&self) -> Option<&str> {
        Some(self.parent.name.as_str()).filter(|n| !n.is_empty())
    }

    pub fn lag_name(&self) -> Option<&str> {
        Some(self.lag.name.as_str()).filter(|n| !n.is_empty())
    }

    /// Untagged VLAN id, if one is assigned
    pub fn untagged_vid(&self) -> Option<u16> {
        Some(self.untagged_vlan.vid).filter(|v| *v != 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IdRef {
    #[serde(default, deserialize_with = "null_default")]
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteDevice {
    #[serde(default, deserialize_with = "null_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectedEndpoint {
    #[serde(default, deserialize_with = "null_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub device: RemoteDevice,
    #[serde(default, deserialize_with = "cable_id")]
    pub cable: i64,
}

/// REST view of an interface with its far-end endpoints
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectedInterface {
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub cable: IdRef,
    #[serde(default, deserialize_with = "null_default")]
    pub connected_endpoints: Vec<ConnectedEndpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VlanEntry {
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub vid: u16,
    #[serde(default, deserialize_with = "null_default")]
    pub site: SlugRef,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FhrpAddress {
    #[serde(default, deserialize_with = "null_default")]
    pub id: i64,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FhrpGroup {
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub protocol: String,
    #[serde(default, deserialize_with = "null_default")]
    pub group_id: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub ip_addresses: Vec<FhrpAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FhrpGroupRef {
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub group_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssignedInterface {
    #[serde(default, deserialize_with = "null_default")]
    pub device: NameRef,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FhrpAssignment {
    pub group: FhrpGroupRef,
    #[serde(default, deserialize_with = "null_default")]
    pub priority: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub interface: AssignedInterface,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Prefix {
    pub prefix: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
}
