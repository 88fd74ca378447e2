//! Tolerant JSON parsing and shallow schema checks for model output.
//!
//! Models are asked for a bare JSON object but frequently append prose after
//! it. Parsing therefore tries a strict parse first and, unless the validator
//! is strict, falls back to a best-effort repair: the text is cut at its last
//! closing brace and parsed again. The repair cannot fix anything else
//! (leading prose, code fences, truncated output), and it can accept a
//! shorter object than the model meant when prose itself contains braces.
//!
//! Schema checks cover top-level field presence and basic kind only.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{trace, warn};

use docslide_core::{Error, Result, SchemaType};

/// Normalized, schema-checked model output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedResult {
    #[serde(rename = "type")]
    pub schema: SchemaType,
    pub data: Value,
    pub received_at: DateTime<Utc>,
}

/// Parses and checks raw model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputValidator {
    repair: bool,
}

impl Default for OutputValidator {
    fn default() -> Self {
        Self { repair: true }
    }
}

impl OutputValidator {
    /// Validator that applies the truncate-at-last-brace repair.
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Validator that rejects anything a strict JSON parse rejects.
    pub fn strict() -> Self {
        Self { repair: false }
    }

    pub fn repairs(&self) -> bool {
        self.repair
    }

    /// Validate `raw` against the schema named `schema`.
    ///
    /// Unknown schema names fail before any parsing.
    pub fn validate(&self, schema: &str, raw: Value) -> Result<ValidatedResult> {
        let schema: SchemaType = schema.parse()?;
        self.validate_as(schema, raw)
    }

    /// Validate `raw` against a known schema type.
    ///
    /// A JSON string is parsed as model text; any other value is checked as-is.
    pub fn validate_as(&self, schema: SchemaType, raw: Value) -> Result<ValidatedResult> {
        let data = match raw {
            Value::String(text) => self.parse(&text)?,
            other => other,
        };
        check_fields(schema, &data)?;
        Ok(ValidatedResult {
            schema,
            data,
            received_at: Utc::now(),
        })
    }

    /// Parse model text into JSON.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let first_err = match serde_json::from_str::<Value>(text) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !self.repair {
            return Err(Error::Validation(format!(
                "Unable to parse AI response: {}",
                first_err
            )));
        }

        let trimmed = text.trim();
        let Some(last_brace) = trimmed.rfind('}') else {
            return Err(Error::Validation("AI response is not valid JSON.".to_string()));
        };

        let sliced = &trimmed[..=last_brace];
        match serde_json::from_str::<Value>(sliced) {
            Ok(value) => {
                warn!(
                    dropped_len = trimmed.len() - sliced.len(),
                    "Repaired model output by truncating at last closing brace"
                );
                trace!(raw = %text, "Unrepaired model output");
                Ok(value)
            }
            Err(e) => Err(Error::Validation(format!(
                "Unable to parse AI response: {}",
                e
            ))),
        }
    }
}

fn check_fields(schema: SchemaType, data: &Value) -> Result<()> {
    for (field, kind) in schema.required_fields() {
        let value = data.get(*field).ok_or_else(|| {
            Error::Validation(format!("Missing field \"{}\" in {} response.", field, schema))
        })?;
        if !kind.matches(value) {
            return Err(Error::Validation(format!(
                "Invalid type for \"{}\", expected {}.",
                field, kind
            )));
        }
    }
    Ok(())
}

/// Validate with the default (repairing) validator.
pub fn validate_output(schema: &str, raw: Value) -> Result<ValidatedResult> {
    OutputValidator::default().validate(schema, raw)
}
