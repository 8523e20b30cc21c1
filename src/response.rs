//! Typed results of the generation endpoints and the parsing that produces them.
//!
//! Response bodies are loosely specified and have changed shape over time, so
//! parsing works on the decoded JSON object and looks fields up under every key
//! the API has been seen to use.

use crate::{Error, Result};
use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Result of `POST /generations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGenerationResult {
    /// Server-assigned id of the new generation. Never empty.
    pub generation_id: String,

    /// Diagnostic entries echoed by the server, unchanged.
    pub warnings: Vec<Value>,
}

/// A generation that is still running.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingGeneration {
    /// Id of the generation.
    pub generation_id: String,

    /// Server's estimate of the remaining time, in seconds.
    pub estimated_wait_seconds: Option<u64>,

    /// Credit usage snapshot, when the server sent one.
    pub credits: Option<Map<String, Value>>,

    /// Diagnostic entries echoed by the server, unchanged.
    pub warnings: Vec<Value>,
}

/// A finished generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGeneration {
    /// Id of the generation.
    pub generation_id: String,

    /// URL of the generated gamma. Always present.
    pub gamma_url: String,

    /// PDF export, when one was requested and is ready.
    pub pdf_url: Option<String>,

    /// PPTX export, when one was requested and is ready.
    pub pptx_url: Option<String>,

    /// Credit usage snapshot, when the server sent one.
    pub credits: Option<Map<String, Value>>,

    /// Every export URL the server listed, keyed by export kind.
    pub export_urls: BTreeMap<String, String>,

    /// Diagnostic entries echoed by the server, unchanged.
    pub warnings: Vec<Value>,
}

/// Outcome of a status check: exactly one of pending or completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationStatus {
    /// Still running.
    Pending(PendingGeneration),
    /// Finished, with its URLs.
    Completed(CompletedGeneration),
}

impl GenerationStatus {
    /// The wire status tag.
    pub fn status(&self) -> &'static str {
        match self {
            GenerationStatus::Pending(_) => "pending",
            GenerationStatus::Completed(_) => "completed",
        }
    }

    /// The generation id.
    pub fn generation_id(&self) -> &str {
        match self {
            GenerationStatus::Pending(p) => &p.generation_id,
            GenerationStatus::Completed(c) => &c.generation_id,
        }
    }

    /// Warnings returned with this status.
    pub fn warnings(&self) -> &[Value] {
        match self {
            GenerationStatus::Pending(p) => &p.warnings,
            GenerationStatus::Completed(c) => &c.warnings,
        }
    }

    /// Returns `true` for a completed generation.
    pub fn is_completed(&self) -> bool {
        matches!(self, GenerationStatus::Completed(_))
    }
}

const GAMMA_URL_KEYS: [&str; 3] = ["gammaUrl", "gamma_url", "gamma"];
const PDF_URL_KEYS: [&str; 2] = ["pdfUrl", "pdf_url"];
const PPTX_URL_KEYS: [&str; 2] = ["pptxUrl", "pptx_url"];

/// Removes the `warnings` array from `data` and returns it.
///
/// Each entry is logged as a warning with `context`. A missing or non-array
/// `warnings` field yields an empty list and is left in place.
pub(crate) fn extract_warnings(data: &mut Map<String, Value>, context: &str) -> Vec<Value> {
    if !matches!(data.get("warnings"), Some(Value::Array(_))) {
        return Vec::new();
    }

    let Some(Value::Array(warnings)) = data.remove("warnings") else {
        return Vec::new();
    };

    for warning in &warnings {
        tracing::warn!(
            context = context,
            warning = %describe_warning(warning),
            "Gamma API returned a warning"
        );
    }

    warnings
}

/// Renders a warning entry for logs.
pub(crate) fn describe_warning(warning: &Value) -> String {
    match warning {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            let parts: Vec<&str> = ["code", "message"]
                .iter()
                .filter_map(|k| map.get(*k).and_then(Value::as_str))
                .collect();
            if parts.is_empty() {
                warning.to_string()
            } else {
                parts.join(": ")
            }
        }
        _ => "Unknown warning structure".to_string(),
    }
}

/// Builds a create result from a successful response body.
pub(crate) fn parse_created(
    data: Map<String, Value>,
    warnings: Vec<Value>,
    status: StatusCode,
) -> Result<CreateGenerationResult> {
    // A null id counts as absent; any other non-string value is not an id.
    let generation_id = ["generationId", "id"]
        .iter()
        .find_map(|key| data.get(*key).filter(|v| !v.is_null()))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    match generation_id {
        Some(generation_id) => Ok(CreateGenerationResult {
            generation_id,
            warnings,
        }),
        None => Err(Error::Protocol {
            message: "generationId missing from response".to_string(),
            status,
            body: Some(data),
        }),
    }
}

/// Builds a status result from a successful response body.
///
/// `requested_id` is used when the body does not echo the generation id.
pub(crate) fn parse_status(
    data: Map<String, Value>,
    warnings: Vec<Value>,
    requested_id: &str,
    status: StatusCode,
) -> Result<GenerationStatus> {
    let generation_id = data
        .get("generationId")
        .and_then(scalar_to_string)
        .unwrap_or_else(|| requested_id.to_string());
    let credits = match data.get("credits") {
        Some(Value::Object(credits)) => Some(credits.clone()),
        _ => None,
    };

    let tag = data
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match tag.as_str() {
        "pending" => Ok(GenerationStatus::Pending(PendingGeneration {
            generation_id,
            estimated_wait_seconds: data.get("estimatedWaitSeconds").and_then(as_seconds),
            credits,
            warnings,
        })),
        "completed" => {
            let Some(gamma_url) = resolve_url_field(&data, &GAMMA_URL_KEYS) else {
                return Err(Error::Protocol {
                    message: "Missing gammaUrl in completed generation payload".to_string(),
                    status,
                    body: Some(data),
                });
            };

            let export_urls = collect_export_urls(&data);
            let pdf_url = export_urls
                .get("pdf")
                .cloned()
                .or_else(|| resolve_url_field(&data, &PDF_URL_KEYS));
            let pptx_url = export_urls
                .get("pptx")
                .cloned()
                .or_else(|| resolve_url_field(&data, &PPTX_URL_KEYS));

            Ok(GenerationStatus::Completed(CompletedGeneration {
                generation_id,
                gamma_url,
                pdf_url,
                pptx_url,
                credits,
                export_urls,
                warnings,
            }))
        }
        other => Err(Error::Protocol {
            message: format!("Unexpected generation status \"{}\"", other),
            status,
            body: Some(data),
        }),
    }
}

/// Finds the first candidate key holding a URL, checking the top level and
/// then the nested `urls` object for each key in turn.
fn resolve_url_field(data: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    let urls = data.get("urls").and_then(Value::as_object);

    candidates.iter().find_map(|key| {
        data.get(*key)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .or_else(|| urls.and_then(|u| u.get(*key)).and_then(Value::as_str))
            .map(str::to_string)
    })
}

/// Merges `exportUrls` and then the legacy `urls` object; `urls` wins on
/// conflicting keys. Empty and non-string values are skipped.
fn collect_export_urls(data: &Map<String, Value>) -> BTreeMap<String, String> {
    let mut export_urls = BTreeMap::new();

    for source in ["exportUrls", "urls"] {
        let Some(Value::Object(entries)) = data.get(source) else {
            continue;
        };
        for (kind, url) in entries {
            if let Some(url) = url.as_str().filter(|u| !u.is_empty()) {
                export_urls.insert(kind.clone(), url.to_string());
            }
        }
    }

    export_urls
}

/// Renders a scalar id as a string; `null`, arrays and objects yield `None`.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

/// Reads a wait estimate in whole seconds. Only `null` means "no estimate".
///
/// Floats are truncated and negatives clamp to zero. Strings are read up to
/// their leading number, so `"12s"` is 12 and `"soon"` is 0.
fn as_seconds(value: &Value) -> Option<u64> {
    let seconds = match value {
        Value::Null => return None,
        Value::Bool(b) => u64::from(*b),
        Value::Number(n) => n
            .as_u64()
            .unwrap_or_else(|| n.as_f64().map_or(0, truncate_seconds)),
        Value::String(s) => truncate_seconds(leading_number(s)),
        Value::Array(items) => u64::from(!items.is_empty()),
        Value::Object(map) => u64::from(!map.is_empty()),
    };
    Some(seconds)
}

fn truncate_seconds(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

fn leading_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    text[..end].parse().unwrap_or(0.0)
}
