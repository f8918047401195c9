use anyhow::Result;
use std::collections::BTreeMap;

use crate::netbox::{SotSnapshot, SotSource};
use crate::repo::{self, Author, RepoService};
use crate::repofile::layout::{self, InterfaceLayout};
use crate::repofile::{file_actions, ExportFormat, RepoFile};
use crate::synth::{self, SynthOptions};

pub const COMMIT_MESSAGE: &str = "[AUTO] netbox-oc-synth from NetBox";
pub const MR_TITLE: &str = "netbox-oc-synth from NetBox";
pub const NOTHING_GENERATED: &str = "Nothing generated, skipping commit";

/// Fetch, assemble and lay out the files for `devices`.
/// `listing` is the repository's current file paths.
pub async fn generate(
    sot: &dyn SotSource,
    devices: &[String],
    listing: &[String],
    opts: &SynthOptions,
    interface_layout: InterfaceLayout,
) -> Result<BTreeMap<String, Vec<RepoFile>>> {
    let snapshot = SotSnapshot::fetch(sot, devices, opts.fetch_plan()).await;
    let assembled = synth::synthesize(&snapshot, opts)?;
    let files = layout::plan(assembled, listing, interface_layout)?;
    tracing::info!(
        "Generated {} files for {} devices",
        files.values().map(Vec::len).sum::<usize>(),
        files.len()
    );
    Ok(files)
}

/// Every file's content in planning order
pub fn render(files: &BTreeMap<String, Vec<RepoFile>>, format: ExportFormat) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for file in files.values().flatten() {
        out.push((file.file_path.clone(), file.content(format)?));
    }
    Ok(out)
}

/// Commit the files on `branch` and open a merge request.
/// Returns the line to show the user.
pub async fn commit(
    service: &dyn RepoService,
    files: &BTreeMap<String, Vec<RepoFile>>,
    listing: &[String],
    format: ExportFormat,
    author: &Author,
    branch: &str,
) -> Result<String> {
    let actions = file_actions(files, listing, format, author)?;
    if actions.is_empty() {
        return Ok(NOTHING_GENERATED.to_string());
    }
    let actions = repo::changed_actions(service, actions).await;
    if actions.is_empty() {
        return Ok(repo::NO_CHANGES.to_string());
    }
    Ok(repo::publish(service, &actions, branch, COMMIT_MESSAGE, MR_TITLE).await)
}
