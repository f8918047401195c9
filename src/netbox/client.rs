use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::*;
use super::SotSource;

const DEVICE_QUERY_FIELDS: &str = "id name platform{slug} site{slug} interfaces{ tags{name} vrf{name} \
member_interfaces{name id} id name type mgmt_only enabled description label mtu mac_address lag{name} \
speed duplex mode parent{name} tagged_vlans{vid} untagged_vlan{vid name tags{name}} \
ip_addresses{id address description} cable{id} }";

const VLAN_QUERY: &str = "{vlan_list { id vid name site{slug} }}";

/// NetBox API client
///
/// Failures are logged and read as empty data; nothing here returns an error
/// once the client is built.
pub struct NetBoxClient {
    base_url: String,
    token: String,
    client: Client,
}

impl NetBoxClient {
    pub fn new(url: String, token: String, timeout: Duration) -> Result<Self> {
        // NetBox deployments commonly sit behind self-signed certificates
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Send a request and return the body text.
    /// Non-2xx responses are logged and their body is still returned.
    async fn request(&self, method: Method, url: &str, body: Option<&GraphQlRequest>) -> Option<String> {
        let mut req = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json")
            .header("Authorization", self.auth_header());
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("NetBox request {} failed: {}", url, e);
                return None;
            }
        };

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("NetBox response body from {} unreadable: {}", url, e);
                return None;
            }
        };
        if !status.is_success() {
            tracing::warn!("NetBox API error {} from {}: {}", status, url, text);
        }
        Some(text)
    }

    async fn get_json<T: DeserializeOwned + Default>(&self, url: &str) -> T {
        match self.request(Method::GET, url, None).await {
            Some(text) => decode(url, &text),
            None => T::default(),
        }
    }

    /// Helper to perform a paginated GET list request, following `next` links
    async fn list_paginated<T: DeserializeOwned>(&self, url: String) -> Vec<T> {
        let mut results = Vec::new();
        let mut next = Some(url);
        while let Some(url) = next {
            let page: PaginatedResponse<T> = self.get_json(&url).await;
            results.extend(page.results);
            next = page.next;
        }
        results
    }

    async fn graphql<T: DeserializeOwned + Default>(&self, query: String) -> T {
        let url = self.url("/graphql/");
        let body = GraphQlRequest { query };
        match self.request(Method::POST, &url, Some(&body)).await {
            Some(text) => decode::<GraphQlResponse<T>>(&url, &text)
                .data
                .unwrap_or_default(),
            None => T::default(),
        }
    }
}

fn decode<T: DeserializeOwned + Default>(url: &str, text: &str) -> T {
    serde_json::from_str(text).unwrap_or_else(|e| {
        tracing::warn!("Failed to parse NetBox response from {}: {}", url, e);
        T::default()
    })
}

/// GraphQL query for the given devices and all of their interfaces
pub fn device_query(names: &[String]) -> String {
    let quoted: Vec<String> = names
        .iter()
        .map(|n| serde_json::Value::String(n.clone()).to_string())
        .collect();
    format!("{{device_list(name:[{}]) {{ {} }}}}", quoted.join(","), DEVICE_QUERY_FIELDS)
}

/// `/api/dcim/interfaces` URL filtered to the given devices, one `device` pair each
pub fn connected_interfaces_url(base_url: &str, devices: &[String]) -> Option<String> {
    let mut url = Url::parse(&format!("{}/api/dcim/interfaces", base_url)).ok()?;
    {
        let mut pairs = url.query_pairs_mut();
        for device in devices {
            pairs.append_pair("device", device);
        }
    }
    Some(url.to_string())
}

#[async_trait]
impl SotSource for NetBoxClient {
    async fn devices(&self, names: &[String]) -> Vec<Device> {
        let data: DeviceListData = self.graphql(device_query(names)).await;
        data.device_list
    }

    async fn connected_interfaces(&self, devices: &[String]) -> Vec<ConnectedInterface> {
        if devices.is_empty() {
            return Vec::new();
        }
        match connected_interfaces_url(&self.base_url, devices) {
            Some(url) => self.list_paginated(url).await,
            None => {
                tracing::warn!("Invalid NetBox URL: {}", self.base_url);
                Vec::new()
            }
        }
    }

    async fn vlans(&self) -> Vec<VlanEntry> {
        let data: VlanListData = self.graphql(VLAN_QUERY.to_string()).await;
        data.vlan_list
    }

    async fn fhrp_groups(&self) -> Vec<FhrpGroup> {
        self.list_paginated(self.url("/api/ipam/fhrp-groups/")).await
    }

    async fn fhrp_assignments(&self) -> Vec<FhrpAssignment> {
        self.list_paginated(self.url("/api/ipam/fhrp-group-assignments/")).await
    }

    async fn parent_prefix(&self, address: &str) -> Option<Prefix> {
        let mut url = Url::parse(&self.url("/api/ipam/prefixes/")).ok()?;
        url.query_pairs_mut().append_pair("contains", address);
        let page: PaginatedResponse<Prefix> = self.get_json(url.as_str()).await;
        page.results.into_iter().next()
    }
}
