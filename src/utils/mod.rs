/// Encode a repository path or branch name for use as a single URL path segment
/// e.g., "devices/rtr-a/acl.yaml.j2" -> "devices%2Frtr-a%2Facl.yaml.j2"
pub fn encode_path_component(s: &str) -> String {
    s.replace('/', "%2F")
}

/// Convert an interface name to the fragment used in per-interface file names
/// e.g., "Ethernet1/1" -> "Ethernet1-1"
pub fn interface_file_id(name: &str) -> String {
    name.replace('/', "-")
}

/// Split "10.0.0.1/24" into ("10.0.0.1", Some("24")).
pub fn split_address(address: &str) -> (&str, Option<&str>) {
    match address.split_once('/') {
        Some((ip, len)) => (ip, Some(len)),
        None => (address, None),
    }
}

/// Normalize a NetBox VLAN name into an OpenConfig VLAN name.
/// Dashes and spaces become underscores and the result is uppercased.
pub fn normalize_vlan_name(name: &str) -> String {
    name.replace('-', "_").replace(' ', "_").to_uppercase()
}
