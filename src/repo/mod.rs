pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::GitLabClient;
pub use types::*;

/// Branch every change set is compared against and merged into
pub const MAIN_BRANCH: &str = "main";

pub const NO_CHANGES: &str = "No changes, deleting branch";

/// Operations used against the repository hosting service
#[async_trait]
pub trait RepoService: Send + Sync {
    async fn list_files(&self) -> Vec<TreeEntry>;
    async fn get_file_raw(&self, path: &str, git_ref: &str) -> Option<String>;
    async fn create_branch(&self, branch: &str, from: &str);
    async fn commit_files(&self, branch: &str, message: &str, actions: &[FileAction]);
    async fn compare(&self, from: &str, to: &str) -> CompareResponse;
    async fn delete_branch(&self, branch: &str);
    async fn create_merge_request(&self, source: &str, target: &str, title: &str) -> MergeRequest;
}

/// `feature/niac-config-<unix seconds>`
pub fn default_branch_name() -> String {
    format!("feature/niac-config-{}", chrono::Utc::now().timestamp())
}

/// Drop updates whose content already matches main
pub async fn changed_actions(service: &dyn RepoService, actions: Vec<FileAction>) -> Vec<FileAction> {
    let mut changed = Vec::with_capacity(actions.len());
    for action in actions {
        if action.action == ActionKind::Update {
            let current = service.get_file_raw(&action.file_path, MAIN_BRANCH).await;
            if current.as_deref() == Some(action.content.as_str()) {
                tracing::debug!("{} unchanged", action.file_path);
                continue;
            }
        }
        changed.push(action);
    }
    changed
}

/// Branch, commit and open a merge request.
///
/// When the branch ends up identical to main it is deleted instead and
/// [`NO_CHANGES`] is returned; otherwise the merge request URL.
pub async fn publish(
    service: &dyn RepoService,
    actions: &[FileAction],
    branch: &str,
    commit_message: &str,
    title: &str,
) -> String {
    service.create_branch(branch, MAIN_BRANCH).await;
    tracing::info!("Committing {} files to {}", actions.len(), branch);
    service.commit_files(branch, commit_message, actions).await;

    let compare = service.compare(MAIN_BRANCH, branch).await;
    if compare.diffs.is_empty() {
        service.delete_branch(branch).await;
        return NO_CHANGES.to_string();
    }
    tracing::info!("{} files differ from {}", compare.diffs.len(), MAIN_BRANCH);

    let mr = service.create_merge_request(branch, MAIN_BRANCH, title).await;
    mr.web_url
        .unwrap_or_else(|| format!("Merge request for {} was not created", branch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeRepo;

    fn action(path: &str, content: &str) -> FileAction {
        FileAction {
            file_path: path.to_string(),
            action: ActionKind::Create,
            content: content.to_string(),
            author_email: "bot@example.com".to_string(),
            author_name: "bot".to_string(),
        }
    }

    #[test]
    fn test_default_branch_name() {
        let name = default_branch_name();
        let ts = name.strip_prefix("feature/niac-config-").unwrap();
        assert!(ts.parse::<i64>().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_publish_opens_merge_request() {
        let repo = FakeRepo::new(&[]);
        let url = publish(&repo, &[action("a/devices/rtr-a/lacp.yaml.j2", "x")], "feature/t", "msg", "title").await;
        assert_eq!(url, "https://gitlab.example/mr/1");
        assert_eq!(
            repo.calls(),
            vec!["create_branch feature/t", "commit_files feature/t", "compare main feature/t", "create_merge_request feature/t"]
        );
    }

    #[tokio::test]
    async fn test_publish_without_diff_deletes_branch() {
        let repo = FakeRepo::new(&[("a/devices/rtr-a/lacp.yaml.j2", "x")]);
        let msg = publish(&repo, &[action("a/devices/rtr-a/lacp.yaml.j2", "x")], "feature/t", "msg", "title").await;
        assert_eq!(msg, NO_CHANGES);
        assert_eq!(repo.calls().last().unwrap(), "delete_branch feature/t");
    }

    #[tokio::test]
    async fn test_changed_actions_drops_identical_updates() {
        let repo = FakeRepo::new(&[("d/rtr-a/lacp.yaml.j2", "same"), ("d/rtr-a/vlan.yaml.j2", "old")]);
        let mut lacp = action("d/rtr-a/lacp.yaml.j2", "same");
        lacp.action = ActionKind::Update;
        let mut vlan = action("d/rtr-a/vlan.yaml.j2", "new");
        vlan.action = ActionKind::Update;
        let acl = action("d/rtr-a/acl.yaml.j2", "same");

        let kept = changed_actions(&repo, vec![lacp, vlan.clone(), acl.clone()]).await;
        assert_eq!(kept, vec![vlan, acl]);
        // creates are never read back
        assert_eq!(
            repo.calls(),
            vec!["get_file_raw d/rtr-a/lacp.yaml.j2", "get_file_raw d/rtr-a/vlan.yaml.j2"]
        );
    }
}
