//! Request-side data model: operations, schema types and payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

// =============================================================================
// OPERATION
// =============================================================================

/// Document operation requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Slides + summary for a whole document.
    #[serde(rename = "analyzePDF", alias = "pdfAnalysis")]
    AnalyzePdf,
    /// Summary (optionally answering a question).
    #[serde(rename = "summarize")]
    Summarize,
    /// Top-level section outline.
    #[serde(rename = "extractSections")]
    ExtractSections,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::AnalyzePdf,
        Operation::Summarize,
        Operation::ExtractSections,
    ];

    /// Wire name, also used as the cache-key segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnalyzePdf => "analyzePDF",
            Self::Summarize => "summarize",
            Self::ExtractSections => "extractSections",
        }
    }

    /// Schema the operation's output must satisfy.
    pub fn schema(&self) -> SchemaType {
        match self {
            Self::AnalyzePdf => SchemaType::Analysis,
            Self::Summarize => SchemaType::Summary,
            Self::ExtractSections => SchemaType::Sections,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "analyzePDF" | "pdfAnalysis" => Ok(Self::AnalyzePdf),
            "summarize" => Ok(Self::Summarize),
            "extractSections" => Ok(Self::ExtractSections),
            other => Err(Error::InvalidInput(format!(
                "Unsupported operation \"{}\".",
                other
            ))),
        }
    }
}

// =============================================================================
// SCHEMA TYPE
// =============================================================================

/// Basic JSON kind a required field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Array,
    String,
}

impl FieldKind {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Array => value.is_array(),
            Self::String => value.is_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => write!(f, "array"),
            Self::String => write!(f, "string"),
        }
    }
}

/// Expected top-level field set of a model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaType {
    Analysis,
    Summary,
    Sections,
    Keywords,
    Entities,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Summary => "summary",
            Self::Sections => "sections",
            Self::Keywords => "keywords",
            Self::Entities => "entities",
        }
    }

    /// Required top-level fields and their kinds.
    pub fn required_fields(&self) -> &'static [(&'static str, FieldKind)] {
        match self {
            Self::Analysis => &[("slides", FieldKind::Array), ("summary", FieldKind::String)],
            Self::Summary => &[("summary", FieldKind::String)],
            Self::Sections => &[("sections", FieldKind::Array)],
            Self::Keywords => &[("keywords", FieldKind::Array)],
            Self::Entities => &[("entities", FieldKind::Array)],
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "analysis" => Ok(Self::Analysis),
            "summary" => Ok(Self::Summary),
            "sections" => Ok(Self::Sections),
            "keywords" => Ok(Self::Keywords),
            "entities" => Ok(Self::Entities),
            other => Err(Error::Validation(format!("Unknown schema type: {}", other))),
        }
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// Uploaded file attached to a request.
///
/// Only the descriptor is serialized; the bytes never reach the cache key.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePart {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FilePart {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let size = bytes.len() as u64;
        Self {
            bytes,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Everything a provider needs to serve one request.
///
/// Built once per request by the ingestion layer and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub cleaned: String,
    pub normalized: String,
    pub chunks: Vec<String>,
    pub language: String,
    pub context: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
    pub file: Option<FilePart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    /// Operation-specific fields not covered above.
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Payload {
    /// Payload carrying only a prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_schema(mut self, schema: SchemaType) -> Self {
        self.schema_type = Some(schema);
        self
    }

    /// JSON view used for cache-key derivation.
    ///
    /// File bytes are replaced by `{fileName, mimeType, size}`.
    pub fn redacted(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
