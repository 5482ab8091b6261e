//! Turns an analysis verdict into results-panel content.

use crate::protocol::AnalysisResponse;
use crate::view::{DetailRow, ResultsPanel, Tone, View, ViewState};

pub const TOXIC_ICON: &str = "⚠️";
pub const SAFE_ICON: &str = "✅";
pub const SAFE_TITLE: &str = "Content Appears Safe";
/// Risk label used when a toxic verdict carries no `toxicity_level`.
pub const DEFAULT_RISK_LEVEL: &str = "High";

pub const LABEL_TOXICITY: &str = "Toxicity Score";
pub const LABEL_SENTIMENT: &str = "Sentiment Score";
pub const LABEL_MAGNITUDE: &str = "Sentiment Magnitude";
pub const LABEL_KEYWORDS: &str = "Flagged Keywords";

/// What a response turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Results(ResultsPanel),
    /// The payload carried an explicit error marker.
    Error(String),
}

pub fn interpret(response: &AnalysisResponse) -> Verdict {
    if let Some(message) = response.error_message() {
        return Verdict::Error(message);
    }

    let (tone, icon, title) = if response.is_toxic() {
        let level = response
            .toxicity_level()
            .unwrap_or_else(|| DEFAULT_RISK_LEVEL.to_string());
        (
            Tone::Toxic,
            TOXIC_ICON,
            format!("Toxic Content Detected ({level} Risk)"),
        )
    } else {
        (Tone::Safe, SAFE_ICON, SAFE_TITLE.to_string())
    };

    let mut details = vec![
        DetailRow {
            label: LABEL_TOXICITY,
            value: format!("{}/1.0", response.toxicity_score_text()),
        },
        DetailRow {
            label: LABEL_SENTIMENT,
            value: response.sentiment_score_text(),
        },
    ];
    if let Some(magnitude) = response.sentiment_magnitude_text() {
        details.push(DetailRow {
            label: LABEL_MAGNITUDE,
            value: magnitude,
        });
    }
    let keywords = response.matched_keywords();
    if !keywords.is_empty() {
        details.push(DetailRow {
            label: LABEL_KEYWORDS,
            value: keywords.join(", "),
        });
    }

    Verdict::Results(ResultsPanel {
        tone,
        icon,
        title,
        details,
    })
}

/// Interpret `response` and show the outcome on `view`.
///
/// Returns the state the view ended up in: one of the two results states
/// or [`ViewState::Error`].
pub fn render(response: &AnalysisResponse, view: &mut View) -> ViewState {
    match interpret(response) {
        Verdict::Results(panel) => view.show_results(panel),
        Verdict::Error(message) => view.show_error(message),
    }
    view.state()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AnalysisResponse {
        serde_json::from_str(json).expect("valid response json")
    }

    fn panel_of(json: &str) -> ResultsPanel {
        match interpret(&parse(json)) {
            Verdict::Results(p) => p,
            Verdict::Error(e) => panic!("expected results, got error {e}"),
        }
    }

    #[test]
    fn toxic_high_risk() {
        let p = panel_of(
            r#"{"is_toxic": true, "toxicity_level": "High", "toxicity_score": 0.82, "sentiment_score": -0.5}"#,
        );
        assert_eq!(p.tone, Tone::Toxic);
        assert_eq!(p.icon, TOXIC_ICON);
        assert_eq!(p.title, "Toxic Content Detected (High Risk)");
        assert_eq!(p.detail(LABEL_TOXICITY), Some("0.82/1.0"));
        assert_eq!(p.detail(LABEL_SENTIMENT), Some("-0.5"));
        assert!(p.detail(LABEL_MAGNITUDE).is_none());
        assert!(p.detail(LABEL_KEYWORDS).is_none());
        assert_eq!(p.details.len(), 2);
    }

    #[test]
    fn toxic_without_level_defaults_to_high() {
        let p = panel_of(r#"{"is_toxic": true, "toxicity_level": ""}"#);
        assert_eq!(p.title, "Toxic Content Detected (High Risk)");
    }

    #[test]
    fn toxic_medium_level() {
        let p = panel_of(r#"{"is_toxic": true, "toxicity_level": "Medium"}"#);
        assert_eq!(p.title, "Toxic Content Detected (Medium Risk)");
    }

    #[test]
    fn safe_defaults() {
        let p = panel_of(r#"{"is_toxic": false}"#);
        assert_eq!(p.tone, Tone::Safe);
        assert_eq!(p.icon, SAFE_ICON);
        assert_eq!(p.title, SAFE_TITLE);
        assert_eq!(p.detail(LABEL_TOXICITY), Some("0/1.0"));
        assert_eq!(p.detail(LABEL_SENTIMENT), Some("0"));
    }

    #[test]
    fn missing_flag_is_safe() {
        assert_eq!(panel_of("{}").tone, Tone::Safe);
    }

    #[test]
    fn magnitude_and_keywords_appended_in_order() {
        let p = panel_of(
            r#"{"is_toxic": true, "sentiment_magnitude": 1.2, "matched_keywords": ["slur1","slur2"]}"#,
        );
        let labels: Vec<_> = p.details.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![LABEL_TOXICITY, LABEL_SENTIMENT, LABEL_MAGNITUDE, LABEL_KEYWORDS]
        );
        assert_eq!(p.detail(LABEL_MAGNITUDE), Some("1.2"));
        assert_eq!(p.detail(LABEL_KEYWORDS), Some("slur1, slur2"));
    }

    #[test]
    fn empty_keywords_produce_no_row() {
        let p = panel_of(r#"{"is_toxic": false, "matched_keywords": []}"#);
        assert!(p.detail(LABEL_KEYWORDS).is_none());
    }

    #[test]
    fn error_marker_wins_over_verdict() {
        let v = interpret(&parse(r#"{"error": "bad request", "is_toxic": true}"#));
        assert_eq!(v, Verdict::Error("bad request".to_string()));
    }

    #[test]
    fn render_routes_error_to_error_view() {
        let mut view = View::new();
        let state = render(&parse(r#"{"error": "bad request"}"#), &mut view);
        assert_eq!(state, ViewState::Error);
        assert_eq!(view.error_message(), Some("bad request"));
        assert!(!view.is_results_visible());
    }

    #[test]
    fn render_shows_results_and_hides_error() {
        let mut view = View::new();
        view.show_error("old");
        let state = render(&parse(r#"{"is_toxic": true}"#), &mut view);
        assert_eq!(state, ViewState::ResultsToxic);
        assert!(!view.is_error_visible());
        assert_eq!(
            view.results().map(|p| p.tone.class_name()),
            Some("results toxic")
        );
    }
}
