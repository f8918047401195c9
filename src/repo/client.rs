use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::*;
use super::RepoService;
use crate::utils::encode_path_component;

const BRANCH_EXISTS: &str = "Branch already exists";

/// GitLab v4 project API client
///
/// Like the NetBox client, failures are logged and read as empty data.
pub struct GitLabClient {
    project_url: String,
    token: String,
    client: Client,
}

impl GitLabClient {
    pub fn new(base_url: &str, project_id: &str, token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            project_url: project_url(base_url, project_id),
            token,
            client,
        })
    }

    fn request(&self, method: Method, suffix: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.project_url, suffix))
            .header("PRIVATE-TOKEN", &self.token)
            .header("Content-Type", "application/json")
    }

    /// Send a request and return the body text.
    /// Non-2xx responses are logged unless they only report an existing branch.
    async fn send(&self, req: RequestBuilder, suffix: &str) -> Option<String> {
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Repository request {} failed: {}", suffix, e);
                return None;
            }
        };

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Repository response body from {} unreadable: {}", suffix, e);
                return None;
            }
        };
        if !status.is_success() && !is_branch_exists(&text) {
            tracing::warn!("Repository API error {} from {}{}: {}", status, self.project_url, suffix, text);
        }
        Some(text)
    }

    async fn get_json<T: DeserializeOwned + Default>(&self, req: RequestBuilder, suffix: &str) -> T {
        match self.send(req, suffix).await {
            Some(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse repository response from {}: {}", suffix, e);
                T::default()
            }),
            None => T::default(),
        }
    }
}

/// `<base>/projects/<id>/`, with a namespaced project path encoded as one segment
pub fn project_url(base_url: &str, project_id: &str) -> String {
    format!(
        "{}/projects/{}/",
        base_url.trim_end_matches('/'),
        encode_path_component(project_id)
    )
}

fn is_branch_exists(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(|m| m == BRANCH_EXISTS))
        .unwrap_or(false)
}

#[async_trait]
impl RepoService for GitLabClient {
    async fn list_files(&self) -> Vec<TreeEntry> {
        let suffix = "repository/tree";
        let req = self
            .request(Method::GET, suffix)
            .query(&[("recursive", "true"), ("per_page", "10000")]);
        self.get_json(req, suffix).await
    }

    async fn get_file_raw(&self, path: &str, git_ref: &str) -> Option<String> {
        let suffix = format!("repository/files/{}/raw", encode_path_component(path));
        let req = self.request(Method::GET, &suffix).query(&[("ref", git_ref)]);
        self.send(req, &suffix).await
    }

    async fn create_branch(&self, branch: &str, from: &str) {
        let suffix = "repository/branches";
        let req = self
            .request(Method::POST, suffix)
            .query(&[("branch", branch), ("ref", from)]);
        self.send(req, suffix).await;
    }

    async fn commit_files(&self, branch: &str, message: &str, actions: &[FileAction]) {
        let suffix = "repository/commits";
        let body = FilesCommit {
            branch,
            commit_message: message,
            actions,
        };
        let req = self.request(Method::POST, suffix).json(&body);
        self.send(req, suffix).await;
    }

    async fn compare(&self, from: &str, to: &str) -> CompareResponse {
        let suffix = "repository/compare";
        let req = self.request(Method::GET, suffix).query(&[("from", from), ("to", to)]);
        self.get_json(req, suffix).await
    }

    async fn delete_branch(&self, branch: &str) {
        let suffix = format!("repository/branches/{}", encode_path_component(branch));
        let req = self.request(Method::DELETE, &suffix);
        self.send(req, &suffix).await;
    }

    async fn create_merge_request(&self, source: &str, target: &str, title: &str) -> MergeRequest {
        let suffix = "merge_requests";
        let body = MergeRequestBody {
            title,
            source_branch: source,
            target_branch: target,
        };
        let req = self.request(Method::POST, suffix).json(&body);
        self.get_json(req, suffix).await
    }
}
