use serde::{Deserialize, Serialize};
use serde_json::Value;

// -- Request ----------------------------------------------------------------

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
}

impl AnalysisRequest {
    /// Build a request from raw input, trimming surrounding whitespace.
    ///
    /// Returns `None` when nothing is left after trimming, so a request
    /// value always carries non-empty text.
    pub fn from_input(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            None
        } else {
            Some(AnalysisRequest {
                text: text.to_string(),
            })
        }
    }
}

// -- Response ---------------------------------------------------------------

/// Verdict returned by the analysis backend.
///
/// Every field is optional and kept as raw JSON so that a payload with odd
/// types still renders; the accessors below apply the display defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_toxic: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toxicity_level: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toxicity_score: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_magnitude: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_keywords: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Diagnostic detail some backends attach next to `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl AnalysisResponse {
    /// The explicit error marker, if the payload carries a non-empty one.
    pub fn error_message(&self) -> Option<String> {
        truthy_text(self.error.as_ref())
    }

    /// Backend diagnostic detail (never shown in the error panel).
    pub fn diagnostic(&self) -> Option<String> {
        truthy_text(self.message.as_ref())
    }

    pub fn is_toxic(&self) -> bool {
        self.is_toxic.as_ref().is_some_and(is_truthy)
    }

    pub fn toxicity_level(&self) -> Option<String> {
        truthy_text(self.toxicity_level.as_ref())
    }

    /// Toxicity score as display text, `"0"` when absent.
    pub fn toxicity_score_text(&self) -> String {
        truthy_text(self.toxicity_score.as_ref()).unwrap_or_else(|| "0".to_string())
    }

    /// Sentiment score as display text, `"0"` when absent.
    pub fn sentiment_score_text(&self) -> String {
        truthy_text(self.sentiment_score.as_ref()).unwrap_or_else(|| "0".to_string())
    }

    /// Sentiment magnitude as display text, only when the field is present.
    pub fn sentiment_magnitude_text(&self) -> Option<String> {
        self.sentiment_magnitude.as_ref().map(display_text)
    }

    /// Flagged keywords; empty unless the payload holds a JSON array.
    /// `null` elements become empty strings.
    pub fn matched_keywords(&self) -> Vec<String> {
        match &self.matched_keywords {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    other => display_text(other),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

// -- Display helpers --------------------------------------------------------

/// Whether a JSON value counts as "set" for display purposes.
///
/// `null`, `false`, zero, `NaN` and the empty string are unset; arrays and
/// objects are always set.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Largest integer an `f64` holds exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Render a JSON value as plain display text. Strings are shown unquoted.
///
/// Floats with no fractional part print without one (`1.0` as `1`), the
/// way a browser would show them.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(display_text)
}
