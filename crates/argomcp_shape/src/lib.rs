//! argocd-mcp Response Shaping
//!
//! Pure, synchronous transformations applied between the platform client
//! and the tool caller: manifest normalization and YAML rendering,
//! target/live structural diffs, event payload normalization, and the
//! bounder that keeps every result within the configured ceilings.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bound;
pub mod diff;
pub mod document;
pub mod error;
pub mod events;

pub use bound::{Bounded, BoundedList, ResponseBounder, TRUNCATION_MARKER};
pub use diff::{
    DiffEntry, DiffKind, DiffReport, DiffSummary, SequenceMode, StructuralDiffer, render_lines,
};
pub use document::{DocumentNormalizer, DocumentTree, MANAGED_FIELDS, NormalizeConfig, Scalar};
pub use error::{MalformedEventsError, ParseError};
pub use events::{EventFilter, EventRecord, InvolvedObject, normalize_events, normalize_events_str};
