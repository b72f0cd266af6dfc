//! Manifest documents: parsing, field stripping, and YAML rendering.

use crate::error::ParseError;
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use tracing::warn;

/// Field the platform adds to every live object; noise for a reviewer
pub const MANAGED_FIELDS: &str = "managedFields";

/// Leaf value of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// JSON null
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number
    Number(serde_json::Number),
    /// JSON string
    String(String),
}

/// Parsed manifest.
///
/// Object keys keep their source order, which fixes the emission order of
/// diffs and the layout of rendered YAML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentTree {
    /// Leaf value
    Scalar(Scalar),
    /// Mapping with unique keys
    Object(IndexMap<String, DocumentTree>),
    /// Ordered list
    Sequence(Vec<DocumentTree>),
}

impl DocumentTree {
    /// Parse JSON text into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text is not well-formed JSON; no
    /// partial tree is ever produced.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(text)?)
    }

    /// String leaf
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// Copy of this tree without the top-level `field`.
    ///
    /// Only the outermost object is inspected; anything else is returned
    /// as is.
    #[must_use]
    pub fn strip_field(&self, field: &str) -> Self {
        match self {
            Self::Object(map) if map.contains_key(field) => Self::Object(
                map.iter()
                    .filter(|(key, _)| key.as_str() != field)
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Whether this is a scalar
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Textual form used for equality of leaves and for display.
    ///
    /// Strings render bare, other scalars as their JSON literal, and
    /// collections as compact JSON.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Scalar(Scalar::Null) => "null".to_string(),
            Self::Scalar(Scalar::Bool(b)) => b.to_string(),
            Self::Scalar(Scalar::Number(n)) => canonical_number(n),
            Self::Scalar(Scalar::String(s)) => s.clone(),
            Self::Object(_) | Self::Sequence(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// Render as YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML emitter fails
    pub fn try_render(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }
}

/// Integral floats drop their fraction so `1.0` reads as `1`
fn canonical_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

impl From<serde_json::Value> for DocumentTree {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            serde_json::Value::String(s) => Self::Scalar(Scalar::String(s)),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl Serialize for DocumentTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Self::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Self::Scalar(Scalar::Number(n)) => n.serialize(serializer),
            Self::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DocumentTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TreeVisitor)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = DocumentTree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<DocumentTree, E> {
        Ok(DocumentTree::Scalar(Scalar::Bool(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<DocumentTree, E> {
        Ok(DocumentTree::Scalar(Scalar::Number(v.into())))
    }

    fn visit_u64<E>(self, v: u64) -> Result<DocumentTree, E> {
        Ok(DocumentTree::Scalar(Scalar::Number(v.into())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<DocumentTree, E> {
        serde_json::Number::from_f64(v)
            .map(|n| DocumentTree::Scalar(Scalar::Number(n)))
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E>(self, v: &str) -> Result<DocumentTree, E> {
        Ok(DocumentTree::string(v))
    }

    fn visit_string<E>(self, v: String) -> Result<DocumentTree, E> {
        Ok(DocumentTree::string(v))
    }

    fn visit_unit<E>(self) -> Result<DocumentTree, E> {
        Ok(DocumentTree::Scalar(Scalar::Null))
    }

    fn visit_none<E>(self) -> Result<DocumentTree, E> {
        Ok(DocumentTree::Scalar(Scalar::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<DocumentTree, D::Error> {
        DocumentTree::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DocumentTree, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(DocumentTree::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DocumentTree, A::Error> {
        let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, DocumentTree>()? {
            map.insert(key, value);
        }
        Ok(DocumentTree::Object(map))
    }
}

/// Normalization configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Top-level fields removed before diffing or display
    pub stripped_fields: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            stripped_fields: vec![MANAGED_FIELDS.to_string()],
        }
    }
}

/// Turns manifest text into trees and display text.
///
/// Never fails outward for display purposes: text that is not JSON is
/// shown verbatim.
#[derive(Debug, Clone, Default)]
pub struct DocumentNormalizer {
    config: NormalizeConfig,
}

impl DocumentNormalizer {
    /// Create a normalizer that strips `managedFields`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with custom config
    #[must_use]
    pub fn with_config(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Parse and strip the configured fields.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for malformed JSON
    pub fn normalize(&self, text: &str) -> Result<DocumentTree, ParseError> {
        let tree = DocumentTree::parse(text)?;
        Ok(self
            .config
            .stripped_fields
            .iter()
            .fold(tree, |tree, field| tree.strip_field(field)))
    }

    /// Render `tree` as YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML emitter fails
    pub fn render(&self, tree: &DocumentTree) -> Result<String, serde_yaml_ng::Error> {
        tree.try_render()
    }

    /// Render `tree` as YAML, or `source` if rendering fails
    #[must_use]
    pub fn render_or(&self, tree: &DocumentTree, source: &str) -> String {
        match tree.try_render() {
            Ok(yaml) => yaml,
            Err(e) => {
                warn!(error = %e, "YAML rendering failed; showing source text");
                source.to_string()
            }
        }
    }

    /// Display form of manifest text: normalized YAML, the text itself
    /// when it is not JSON, and empty for empty input.
    #[must_use]
    pub fn to_yaml(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        match self.normalize(text) {
            Ok(tree) => self.render_or(&tree, text),
            Err(e) => {
                warn!(error = %e, "Manifest is not JSON; showing raw text");
                text.to_string()
            }
        }
    }
}
