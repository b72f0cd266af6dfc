//! Target/live structural diff of manifest documents.

use crate::document::{DocumentNormalizer, DocumentTree};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// Display name for the document root path
const ROOT_LABEL: &str = "<document>";

/// Kind of difference at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Present only in live
    Added,
    /// Present only in target
    Removed,
    /// Present in both with different canonical text
    Changed,
}

/// One difference between target and live
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    /// Dotted/bracketed location, empty for the document root
    pub path: String,
    /// Kind of difference
    pub kind: DiffKind,
    /// Value in the desired state (`Removed`, `Changed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<DocumentTree>,
    /// Value in the cluster (`Added`, `Changed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_value: Option<DocumentTree>,
}

impl DiffEntry {
    fn added(path: String, live: &DocumentTree) -> Self {
        Self {
            path,
            kind: DiffKind::Added,
            target_value: None,
            live_value: Some(live.clone()),
        }
    }

    fn removed(path: String, target: &DocumentTree) -> Self {
        Self {
            path,
            kind: DiffKind::Removed,
            target_value: Some(target.clone()),
            live_value: None,
        }
    }

    fn changed(path: String, target: &DocumentTree, live: &DocumentTree) -> Self {
        Self {
            path,
            kind: DiffKind::Changed,
            target_value: Some(target.clone()),
            live_value: Some(live.clone()),
        }
    }

    /// Human-readable line, e.g. `  spec.replicas: 2 -> 3`
    #[must_use]
    pub fn render(&self) -> String {
        let path = if self.path.is_empty() {
            ROOT_LABEL
        } else {
            self.path.as_str()
        };
        let text = |value: &Option<DocumentTree>| {
            value.as_ref().map(DocumentTree::canonical).unwrap_or_default()
        };
        match self.kind {
            DiffKind::Removed => format!("  {path}: {} (REMOVED)", text(&self.target_value)),
            DiffKind::Added => format!("  {path}: {} (ADDED)", text(&self.live_value)),
            DiffKind::Changed => format!(
                "  {path}: {} -> {}",
                text(&self.live_value),
                text(&self.target_value)
            ),
        }
    }
}

/// Render entries one per line
#[must_use]
pub fn render_lines(entries: &[DiffEntry]) -> String {
    entries
        .iter()
        .map(DiffEntry::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Entry counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    /// Live-only paths
    pub added: usize,
    /// Target-only paths
    pub removed: usize,
    /// Paths whose values differ
    pub changed: usize,
}

impl DiffSummary {
    /// Total entry count
    #[must_use]
    pub fn total(&self) -> usize {
        self.added + self.removed + self.changed
    }
}

/// Diff entries with their summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    /// Entries in emission order
    pub entries: Vec<DiffEntry>,
    /// Counts per kind
    pub summary: DiffSummary,
}

impl DiffReport {
    /// Build a report, counting kinds
    #[must_use]
    pub fn new(entries: Vec<DiffEntry>) -> Self {
        let summary = entries
            .iter()
            .fold(DiffSummary::default(), |mut summary, entry| {
                match entry.kind {
                    DiffKind::Added => summary.added += 1,
                    DiffKind::Removed => summary.removed += 1,
                    DiffKind::Changed => summary.changed += 1,
                }
                summary
            });
        Self { entries, summary }
    }

    /// No differences
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable diff text
    #[must_use]
    pub fn render(&self) -> String {
        render_lines(&self.entries)
    }
}

/// How sequence elements are paired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceMode {
    /// Pair by index
    #[default]
    Positional,
    /// Pair objects by their `name` key when every element on both sides
    /// has a unique one; otherwise positional
    ByIdentity,
}

/// Computes path-level differences between a target and a live document
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralDiffer {
    mode: SequenceMode,
}

impl StructuralDiffer {
    /// Positional differ
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set sequence pairing mode
    #[must_use]
    pub fn with_mode(mut self, mode: SequenceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Differences between `target` and `live`.
    ///
    /// Object keys are visited in target order, then live-only keys in
    /// live order.
    #[must_use]
    pub fn diff(&self, target: &DocumentTree, live: &DocumentTree) -> Vec<DiffEntry> {
        let mut entries = Vec::new();
        self.compare(String::new(), target, live, &mut entries);
        entries
    }

    /// Diff two manifest texts.
    ///
    /// Empty text on either side yields no entries. When both sides parse
    /// they are normalized and compared structurally; otherwise the raw
    /// texts are compared as opaque values at the document root.
    #[must_use]
    pub fn diff_documents(
        &self,
        normalizer: &DocumentNormalizer,
        target_text: &str,
        live_text: &str,
    ) -> DiffReport {
        if target_text.is_empty() || live_text.is_empty() {
            return DiffReport::default();
        }
        let entries = match (
            normalizer.normalize(target_text),
            normalizer.normalize(live_text),
        ) {
            (Ok(target), Ok(live)) => self.diff(&target, &live),
            (target, live) => {
                if let Err(e) = target.as_ref().and(live.as_ref()) {
                    debug!(error = %e, "Comparing manifests as opaque text");
                }
                if target_text == live_text {
                    Vec::new()
                } else {
                    vec![DiffEntry::changed(
                        String::new(),
                        &DocumentTree::string(target_text),
                        &DocumentTree::string(live_text),
                    )]
                }
            }
        };
        DiffReport::new(entries)
    }

    fn compare(
        &self,
        path: String,
        target: &DocumentTree,
        live: &DocumentTree,
        out: &mut Vec<DiffEntry>,
    ) {
        match (target, live) {
            (DocumentTree::Object(t), DocumentTree::Object(l)) => {
                for (key, t_val) in t {
                    let child = join_key(&path, key);
                    match l.get(key) {
                        Some(l_val) => self.compare(child, t_val, l_val, out),
                        None => out.push(DiffEntry::removed(child, t_val)),
                    }
                }
                for (key, l_val) in l {
                    if !t.contains_key(key) {
                        out.push(DiffEntry::added(join_key(&path, key), l_val));
                    }
                }
            }
            (DocumentTree::Sequence(t), DocumentTree::Sequence(l)) => {
                let identities = match self.mode {
                    SequenceMode::ByIdentity => named(t).zip(named(l)),
                    SequenceMode::Positional => None,
                };
                match identities {
                    Some((t_named, l_named)) => {
                        self.compare_by_name(&path, &t_named, &l_named, out);
                    }
                    None => self.compare_positional(&path, t, l, out),
                }
            }
            _ => {
                if target.canonical() != live.canonical() {
                    out.push(DiffEntry::changed(path, target, live));
                }
            }
        }
    }

    fn compare_positional(
        &self,
        path: &str,
        target: &[DocumentTree],
        live: &[DocumentTree],
        out: &mut Vec<DiffEntry>,
    ) {
        for i in 0..target.len().max(live.len()) {
            let child = format!("{path}[{i}]");
            match (target.get(i), live.get(i)) {
                (Some(t), Some(l)) => self.compare(child, t, l, out),
                (Some(t), None) => out.push(DiffEntry::removed(child, t)),
                (None, Some(l)) => out.push(DiffEntry::added(child, l)),
                (None, None) => {}
            }
        }
    }

    fn compare_by_name(
        &self,
        path: &str,
        target: &IndexMap<&str, &DocumentTree>,
        live: &IndexMap<&str, &DocumentTree>,
        out: &mut Vec<DiffEntry>,
    ) {
        for (name, t) in target {
            let child = format!("{path}[name={name}]");
            match live.get(name) {
                Some(l) => self.compare(child, t, l, out),
                None => out.push(DiffEntry::removed(child, t)),
            }
        }
        for (name, l) in live {
            if !target.contains_key(name) {
                out.push(DiffEntry::added(format!("{path}[name={name}]"), l));
            }
        }
    }
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Index elements by their `name` string, or `None` if any element lacks
/// one or a name repeats
fn named(items: &[DocumentTree]) -> Option<IndexMap<&str, &DocumentTree>> {
    let mut out = IndexMap::with_capacity(items.len());
    for item in items {
        let DocumentTree::Object(map) = item else {
            return None;
        };
        let Some(DocumentTree::Scalar(crate::Scalar::String(name))) = map.get("name") else {
            return None;
        };
        if out.insert(name.as_str(), item).is_some() {
            return None;
        }
    }
    Some(out)
}
