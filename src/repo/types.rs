use serde::{Deserialize, Serialize};

// --- Repository API types ---

/// One entry of `GET /repository/tree`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub entry_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
}

/// Commit author attached to every file action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAction {
    pub file_path: String,
    pub action: ActionKind,
    pub content: String,
    pub author_email: String,
    pub author_name: String,
}

#[derive(Debug, Serialize)]
pub struct FilesCommit<'a> {
    pub branch: &'a str,
    pub commit_message: &'a str,
    pub actions: &'a [FileAction],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareCommit {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareDiff {
    #[serde(default)]
    pub diff: String,
    #[serde(default)]
    pub new_path: String,
    #[serde(default)]
    pub old_path: String,
}

/// `GET /repository/compare` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub commits: Vec<CompareCommit>,
    #[serde(default)]
    pub diffs: Vec<CompareDiff>,
}

#[derive(Debug, Serialize)]
pub struct MergeRequestBody<'a> {
    pub title: &'a str,
    pub source_branch: &'a str,
    pub target_branch: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeRequest {
    #[serde(default)]
    pub web_url: Option<String>,
}
