use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::{
    hash::{combine, hash_bytes, HashCode},
    Changeset, DiffError, DiffOptions, DocumentError, Number, PatchError,
};

const NULL_HASH: HashCode = [0x4A, 0xD1, 0x0C, 0x5E, 0x92, 0x37, 0xB8, 0x61];
const BOOL_TRUE_HASH: HashCode = [0x7F, 0x2B, 0xE0, 0x14, 0x5C, 0xA9, 0x63, 0xD8];
const BOOL_FALSE_HASH: HashCode = [0x1D, 0x84, 0x3F, 0xC2, 0x0B, 0x76, 0xE5, 0x99];
const SEQUENCE_SEED: [u8; 8] = [0xB3, 0x41, 0x97, 0x0E, 0xD6, 0x28, 0x5A, 0xFC];
const MAPPING_SEED: [u8; 8] = [0x62, 0xAF, 0x09, 0xE7, 0x33, 0xC8, 0x14, 0x5B];

/// A tree-shaped document value.
///
/// Mappings preserve key insertion order; equality between mappings is
/// nevertheless key-order-insensitive, which makes `PartialEq` the deep
/// equality primitive used by patch validation. `Clone` is the deep copy
/// primitive: a cloned document shares no mutable substructure with the
/// original.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    /// The null scalar.
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A numeric scalar (IEEE-754 double precision).
    Number(Number),
    /// A string scalar.
    String(String),
    /// An ordered sequence of documents.
    Array(Vec<Document>),
    /// A mapping from string keys to documents, insertion order preserved.
    Object(IndexMap<String, Document>),
}

/// The runtime shape of a [`Document`], used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// The null scalar.
    Null,
    /// A boolean scalar.
    Bool,
    /// A numeric scalar.
    Number,
    /// A string scalar.
    String,
    /// An ordered sequence.
    Sequence,
    /// A string-keyed mapping.
    Mapping,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool => f.write_str("boolean"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Sequence => f.write_str("sequence"),
            Self::Mapping => f.write_str("mapping"),
        }
    }
}

impl Document {
    /// Parses a JSON string into a document.
    ///
    /// ```
    /// # use changeset_core::Document;
    /// let doc = Document::from_json_str("{\"hello\":\"world\"}")?;
    /// assert!(matches!(doc, Document::Object(_)));
    /// # Ok::<(), changeset_core::DocumentError>(())
    /// ```
    pub fn from_json_str(input: &str) -> Result<Self, DocumentError> {
        let value: JsonValue = serde_json::from_str(input)?;
        Self::from_json_value(value)
    }

    /// Parses a YAML string into a document.
    ///
    /// ```
    /// # use changeset_core::Document;
    /// let doc = Document::from_yaml_str("---\nanswer: 42\n")?;
    /// assert!(matches!(doc, Document::Object(_)));
    /// # Ok::<(), changeset_core::DocumentError>(())
    /// ```
    pub fn from_yaml_str(input: &str) -> Result<Self, DocumentError> {
        let value: YamlValue = serde_yaml::from_str(input)?;
        Self::from_yaml_value(value)
    }

    /// Converts a serde JSON value into a [`Document`].
    pub fn from_json_value(value: JsonValue) -> Result<Self, DocumentError> {
        match value {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(v) => Ok(Self::Bool(v)),
            JsonValue::Number(num) => {
                let Some(as_f64) = num.as_f64() else {
                    return Err(DocumentError::NumberOutOfRange { value: num.to_string() });
                };
                Ok(Self::Number(Number::new(as_f64)?))
            }
            JsonValue::String(s) => Ok(Self::String(s)),
            JsonValue::Array(values) => {
                let mut items = Vec::with_capacity(values.len());
                for value in values {
                    items.push(Self::from_json_value(value)?);
                }
                Ok(Self::Array(items))
            }
            JsonValue::Object(map) => {
                let mut object = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key, Self::from_json_value(value)?);
                }
                Ok(Self::Object(object))
            }
        }
    }

    fn from_yaml_value(value: YamlValue) -> Result<Self, DocumentError> {
        match value {
            YamlValue::Null => Ok(Self::Null),
            YamlValue::Bool(v) => Ok(Self::Bool(v)),
            YamlValue::Number(num) => {
                if let Some(f) = num.as_f64() {
                    return Ok(Self::Number(Number::new(f)?));
                }
                Err(DocumentError::NumberOutOfRange { value: num.to_string() })
            }
            YamlValue::String(s) => Ok(Self::String(s)),
            YamlValue::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for value in seq {
                    items.push(Self::from_yaml_value(value)?);
                }
                Ok(Self::Array(items))
            }
            YamlValue::Mapping(map) => {
                let mut object = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    let key = match key {
                        YamlValue::String(s) => s,
                        other => {
                            return Err(DocumentError::NonStringYamlKey {
                                found: format!("{other:?}"),
                            });
                        }
                    };
                    object.insert(key, Self::from_yaml_value(value)?);
                }
                Ok(Self::Object(object))
            }
            YamlValue::Tagged(tagged) => {
                Err(DocumentError::UnsupportedYamlTag { tag: tagged.tag.to_string() })
            }
        }
    }

    /// Converts the document into a serde JSON value.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Number(n) => JsonValue::Number(n.to_json_number()),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Array(values) => {
                JsonValue::Array(values.iter().map(Self::to_json_value).collect())
            }
            Self::Object(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json_value());
                }
                JsonValue::Object(object)
            }
        }
    }

    /// Returns the runtime shape of this document.
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Null => DocumentKind::Null,
            Self::Bool(_) => DocumentKind::Bool,
            Self::Number(_) => DocumentKind::Number,
            Self::String(_) => DocumentKind::String,
            Self::Array(_) => DocumentKind::Sequence,
            Self::Object(_) => DocumentKind::Mapping,
        }
    }

    /// Computes the structural difference between this document and `target`.
    ///
    /// Both documents must be mappings at the top level.
    ///
    /// ```
    /// # use changeset_core::{DiffOptions, Document};
    /// let source = Document::from_json_str("{\"version\":1}")?;
    /// let target = Document::from_json_str("{\"version\":2}")?;
    /// let changeset = source.diff(&target, &DiffOptions::default())?;
    /// assert_eq!(changeset.len(), 2);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn diff(&self, target: &Self, options: &DiffOptions) -> Result<Changeset, DiffError> {
        crate::diff::diff(self, target, options)
    }

    /// Applies a changeset to this document, returning the patched copy.
    ///
    /// ```
    /// # use changeset_core::{DiffOptions, Document};
    /// let source = Document::from_json_str("{\"items\":[1,2,3]}")?;
    /// let target = Document::from_json_str("{\"items\":[3,1,2]}")?;
    /// let changeset = source.diff(&target, &DiffOptions::default())?;
    /// assert_eq!(source.apply_changeset(&changeset)?, target);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn apply_changeset(&self, changeset: &Changeset) -> Result<Self, PatchError> {
        crate::patch::apply(self, changeset)
    }

    /// Computes the content hash of this document.
    ///
    /// Sequences hash in element order; mapping hashes are insensitive to
    /// key insertion order, matching `PartialEq`.
    #[must_use]
    pub fn hash_code(&self) -> HashCode {
        match self {
            Self::Null => NULL_HASH,
            Self::Bool(true) => BOOL_TRUE_HASH,
            Self::Bool(false) => BOOL_FALSE_HASH,
            Self::Number(n) => n.hash_code(),
            Self::String(s) => hash_bytes(s.as_bytes()),
            Self::Array(values) => {
                let mut bytes = Vec::with_capacity(8 + values.len() * 8);
                bytes.extend_from_slice(&SEQUENCE_SEED);
                for value in values {
                    bytes.extend_from_slice(&value.hash_code());
                }
                hash_bytes(&bytes)
            }
            Self::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let mut bytes = Vec::with_capacity(16);
                    bytes.extend_from_slice(&hash_bytes(key.as_bytes()));
                    bytes.extend_from_slice(&value.hash_code());
                    entries.push(hash_bytes(&bytes));
                }
                let mut bytes = Vec::with_capacity(16);
                bytes.extend_from_slice(&MAPPING_SEED);
                bytes.extend_from_slice(&combine(entries));
                hash_bytes(&bytes)
            }
        }
    }
}

impl TryFrom<JsonValue> for Document {
    type Error = DocumentError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json_value(value)
    }
}
