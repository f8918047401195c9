//! Files written to the config repository: ordered sections, each an
//! OpenConfig subtree wrapped under its gNMI path.

pub mod layout;

use clap::ValueEnum;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::SynthError;
use crate::openconfig::Tree;
use crate::repo::{ActionKind, Author, FileAction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum ExportFormat {
    Json,
    #[default]
    Yaml,
}

/// Section body: a typed tree, or an already generic value
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Binding(Tree),
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepoConfig {
    pub path: String,
    pub payload: Payload,
}

impl RepoConfig {
    pub fn binding(path: impl Into<String>, tree: Tree) -> Self {
        Self {
            path: path.into(),
            payload: Payload::Binding(tree),
        }
    }

    pub fn raw(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            payload: Payload::Raw(value),
        }
    }

    /// `{ <path>: <body> }` in the requested format
    pub fn serialize(&self, format: ExportFormat) -> Result<String, SynthError> {
        let fail = |e: &dyn std::fmt::Display| SynthError::Serialize {
            path: self.path.clone(),
            message: e.to_string(),
        };

        let body = match &self.payload {
            Payload::Binding(tree) => tree.to_rfc7951().map_err(|e| fail(&e))?,
            Payload::Raw(value) => value.clone(),
        };
        let mut wrapper = Map::new();
        wrapper.insert(self.path.clone(), body);
        let wrapper = Value::Object(wrapper);

        match format {
            ExportFormat::Yaml => serde_yaml_ng::to_string(&wrapper)
                .map(|yaml| indent_sequences(&yaml))
                .map_err(|e| fail(&e)),
            ExportFormat::Json => serde_json::to_string_pretty(&wrapper).map_err(|e| fail(&e)),
        }
    }
}

/// Indent block sequences under a mapping key by two spaces.
///
/// serde_yaml_ng writes `key:\n- item`; files in the repository use
/// `key:\n  - item`, and a layout-only difference would show up as a diff.
fn indent_sequences(yaml: &str) -> String {
    // key columns whose sequence items are currently shifted
    let mut open: Vec<usize> = Vec::new();
    let mut key_column: Option<usize> = None;
    // key column of an enclosing block scalar
    let mut scalar: Option<usize> = None;
    let mut out = String::with_capacity(yaml.len() + yaml.len() / 8);

    for line in yaml.lines() {
        let text = line.trim_start_matches(' ');
        let indent = line.len() - text.len();
        if text.is_empty() || scalar.is_some_and(|col| indent > col) {
            if !text.is_empty() {
                out.push_str(&" ".repeat(indent + 2 * open.len()));
                out.push_str(text);
            }
            out.push('\n');
            continue;
        }
        scalar = None;

        let is_item = text == "-" || text.starts_with("- ");
        while let Some(&col) = open.last() {
            if indent < col || (indent == col && !is_item) {
                open.pop();
            } else {
                break;
            }
        }
        if is_item && key_column == Some(indent) && open.last() != Some(&indent) {
            open.push(indent);
        }

        out.push_str(&" ".repeat(indent + 2 * open.len()));
        out.push_str(text);
        out.push('\n');

        let mut column = indent;
        let mut rest = text;
        while let Some(tail) = rest.strip_prefix("- ") {
            column += 2;
            rest = tail;
        }
        key_column = rest.ends_with(':').then_some(column);
        if let Some((_, value)) = rest.rsplit_once(": ") {
            if matches!(value, "|" | "|-" | "|+" | ">" | ">-" | ">+") {
                scalar = Some(column);
            }
        }
    }
    out
}

/// One repository file and its sections, kept sorted by path
#[derive(Debug, Clone, PartialEq)]
pub struct RepoFile {
    pub file_path: String,
    sections: Vec<RepoConfig>,
}

impl RepoFile {
    pub fn new(file_path: impl Into<String>, sections: Vec<RepoConfig>) -> Self {
        let mut file = Self {
            file_path: file_path.into(),
            sections: Vec::with_capacity(sections.len()),
        };
        for section in sections {
            file.insert(section);
        }
        file
    }

    /// Insert after any section with an equal or smaller path
    pub fn insert(&mut self, section: RepoConfig) {
        let at = self.sections.partition_point(|s| s.path <= section.path);
        self.sections.insert(at, section);
    }

    pub fn sections(&self) -> &[RepoConfig] {
        &self.sections
    }

    /// Serialized sections joined by a newline
    pub fn content(&self, format: ExportFormat) -> Result<String, SynthError> {
        let parts = self
            .sections
            .iter()
            .map(|s| s.serialize(format))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join("\n"))
    }

    /// `update` when the path is already in the repository, else `create`
    pub fn file_action(
        &self,
        listing: &BTreeSet<&str>,
        format: ExportFormat,
        author: &Author,
    ) -> Result<FileAction, SynthError> {
        let action = if listing.contains(self.file_path.as_str()) {
            ActionKind::Update
        } else {
            ActionKind::Create
        };
        Ok(FileAction {
            file_path: self.file_path.clone(),
            action,
            content: self.content(format)?,
            author_email: author.email.clone(),
            author_name: author.name.clone(),
        })
    }
}

/// File actions for every planned file, devices in name order
pub fn file_actions(
    files: &BTreeMap<String, Vec<RepoFile>>,
    listing: &[String],
    format: ExportFormat,
    author: &Author,
) -> Result<Vec<FileAction>, SynthError> {
    let listing: BTreeSet<&str> = listing.iter().map(String::as_str).collect();
    files
        .values()
        .flatten()
        .map(|f| f.file_action(&listing, format, author))
        .collect()
}
