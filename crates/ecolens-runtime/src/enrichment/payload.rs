//! Validated enrichment payload.
//!
//! Raw provider text crosses into the engine only through [`parse_payload`]:
//! strip fences, parse JSON, validate against the embedded schema, then
//! convert into a typed [`EnrichmentPayload`]. Any failure along the way is
//! [`EnrichmentError::Malformed`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use ecolens_core::{Confidence, MetricKey};
use serde_json::Value as JsonValue;

use super::EnrichmentError;
use crate::prompts::strip_code_fences;

/// Embedded payload schema (loaded at compile time).
const ENRICHMENT_SCHEMA_JSON: &str = include_str!("../../schema/enrichment.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn get_validator() -> Result<&'static jsonschema::Validator, EnrichmentError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: JsonValue = serde_json::from_str(ENRICHMENT_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {}", e))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result
        .as_ref()
        .map_err(|e| EnrichmentError::Malformed(e.clone()))
}

/// Overlay for a single metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricOverlay {
    /// Raw score; rounded and clamped when merged
    pub score: f64,

    /// Replacement note, if the provider sent a string
    pub note: Option<String>,
}

/// A partial analysis from an enrichment provider.
///
/// Every field is optional; an empty payload changes nothing when merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentPayload {
    pub overall: Option<f64>,
    pub metrics: BTreeMap<MetricKey, MetricOverlay>,
    pub notes: Vec<String>,
    pub confidence: Option<Confidence>,
}

impl EnrichmentPayload {
    pub fn is_empty(&self) -> bool {
        self.overall.is_none()
            && self.metrics.is_empty()
            && self.notes.is_empty()
            && self.confidence.is_none()
    }
}

/// Check a JSON value against the payload schema.
///
/// Returns every violation message, not just the first.
pub fn validate_payload_schema(value: &JsonValue) -> Result<(), EnrichmentError> {
    let validator = get_validator()?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EnrichmentError::Malformed(errors.join("; ")))
    }
}

/// Parse raw provider output into a validated payload.
pub fn parse_payload(raw: &str) -> Result<EnrichmentPayload, EnrichmentError> {
    let cleaned = strip_code_fences(raw);
    let value: JsonValue = serde_json::from_str(&cleaned)
        .map_err(|e| EnrichmentError::Malformed(format!("response was not valid JSON: {}", e)))?;
    payload_from_value(&value)
}

/// Validate and convert an already-parsed JSON value.
pub fn payload_from_value(value: &JsonValue) -> Result<EnrichmentPayload, EnrichmentError> {
    validate_payload_schema(value)?;

    let mut payload = EnrichmentPayload {
        overall: value["overall"].as_f64(),
        ..Default::default()
    };

    if let Some(metrics) = value["metrics"].as_object() {
        for (name, overlay) in metrics {
            // Unknown metric keys are ignored
            let Some(key) = MetricKey::from_key(name) else {
                continue;
            };
            let score = overlay["score"].as_f64().ok_or_else(|| {
                EnrichmentError::Malformed(format!("metric '{}' has no numeric score", name))
            })?;
            payload.metrics.insert(
                key,
                MetricOverlay {
                    score,
                    note: overlay["note"].as_str().map(str::to_string),
                },
            );
        }
    }

    if let Some(notes) = value["notes"].as_array() {
        payload.notes = notes
            .iter()
            .filter_map(|n| n.as_str().map(str::to_string))
            .collect();
    }

    payload.confidence = match value["confidence"].as_str() {
        None | Some("") => None,
        Some(s) => Some(s.parse().map_err(|_| {
            EnrichmentError::Malformed(format!("unknown confidence '{}'", s))
        })?),
    };

    Ok(payload)
}
