//! View model for the analysis panel.
//!
//! [`View`] owns every addressable UI region: the character counter, the
//! trigger control, the loading indicator, the results panel and the error
//! panel. Which panel is visible is a single [`ViewState`] value, so at most
//! one of loading / results / error can ever be shown. Front ends paint a
//! `View`; they never toggle regions themselves.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The one visible panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewState {
    /// Initial state, before the first interaction.
    #[default]
    Idle,
    Loading,
    ResultsSafe,
    ResultsToxic,
    Error,
}

impl ViewState {
    pub fn is_results(self) -> bool {
        matches!(self, ViewState::ResultsSafe | ViewState::ResultsToxic)
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Idle => write!(f, "idle"),
            ViewState::Loading => write!(f, "loading"),
            ViewState::ResultsSafe => write!(f, "results-safe"),
            ViewState::ResultsToxic => write!(f, "results-toxic"),
            ViewState::Error => write!(f, "error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Visual emphasis of the character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterEmphasis {
    #[default]
    Normal,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CharCounter {
    pub count: usize,
    pub emphasis: CounterEmphasis,
}

/// Styling of the results panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Safe,
    Toxic,
}

impl Tone {
    /// Style class of the results panel for this tone.
    pub fn class_name(self) -> &'static str {
        match self {
            Tone::Safe => "results safe",
            Tone::Toxic => "results toxic",
        }
    }

    pub fn state(self) -> ViewState {
        match self {
            Tone::Safe => ViewState::ResultsSafe,
            Tone::Toxic => ViewState::ResultsToxic,
        }
    }
}

/// One `label: value` line in the results details list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Content of the results panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsPanel {
    pub tone: Tone,
    pub icon: &'static str,
    pub title: String,
    pub details: Vec<DetailRow>,
}

impl ResultsPanel {
    /// Value of the detail row labelled `label`, if rendered.
    pub fn detail(&self, label: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

// ---------------------------------------------------------------------------
// Change notification
// ---------------------------------------------------------------------------

/// A change applied to the view, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    StateChanged { from: ViewState, to: ViewState },
    TriggerChanged { enabled: bool },
    CounterChanged(CharCounter),
}

/// Callback invoked synchronously for every [`ViewEvent`].
pub type ViewListener = Box<dyn FnMut(&ViewEvent) + Send>;

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Serializable picture of what is currently visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub state: ViewState,
    pub counter: CharCounter,
    pub trigger_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct View {
    state: ViewState,
    counter: CharCounter,
    trigger_enabled: bool,
    results: Option<ResultsPanel>,
    error_message: Option<String>,
    listener: Option<ViewListener>,
}

impl Default for View {
    fn default() -> Self {
        View {
            state: ViewState::Idle,
            counter: CharCounter::default(),
            trigger_enabled: true,
            results: None,
            error_message: None,
            listener: None,
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("state", &self.state)
            .field("counter", &self.counter)
            .field("trigger_enabled", &self.trigger_enabled)
            .field("results", &self.results)
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the callback notified of every change. Replaces any previous one.
    pub fn subscribe(&mut self, listener: impl FnMut(&ViewEvent) + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Forward every change into `tx`. Send errors (receiver gone) are ignored.
    pub fn subscribe_channel(&mut self, tx: mpsc::UnboundedSender<ViewEvent>) {
        self.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn counter(&self) -> CharCounter {
        self.counter
    }

    pub fn is_trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    pub fn is_loading_visible(&self) -> bool {
        self.state == ViewState::Loading
    }

    pub fn is_results_visible(&self) -> bool {
        self.state.is_results()
    }

    pub fn is_error_visible(&self) -> bool {
        self.state == ViewState::Error
    }

    /// Results panel content, only while the panel is visible.
    pub fn results(&self) -> Option<&ResultsPanel> {
        if self.is_results_visible() {
            self.results.as_ref()
        } else {
            None
        }
    }

    /// Error panel text, only while the panel is visible.
    pub fn error_message(&self) -> Option<&str> {
        if self.is_error_visible() {
            self.error_message.as_deref()
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            state: self.state,
            counter: self.counter,
            trigger_enabled: self.trigger_enabled,
            results: self.results().cloned(),
            error: self.error_message().map(str::to_string),
        }
    }

    /// Switch the visible panel.
    ///
    /// Content belonging to the panel being left is dropped, so a stale
    /// results or error panel can never reappear.
    pub fn set_state(&mut self, next: ViewState) {
        if next == self.state {
            return;
        }
        let from = std::mem::replace(&mut self.state, next);
        if !next.is_results() {
            self.results = None;
        }
        if next != ViewState::Error {
            self.error_message = None;
        }
        self.emit(ViewEvent::StateChanged { from, to: next });
    }

    pub fn show_loading(&mut self) {
        self.set_state(ViewState::Loading);
    }

    pub fn show_results(&mut self, panel: ResultsPanel) {
        let next = panel.tone.state();
        // Leave the current panel first so a results → results switch is
        // still reported as a change.
        if self.state == next {
            self.set_state(ViewState::Idle);
        }
        self.results = Some(panel);
        self.set_state(next);
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        if self.state == ViewState::Error {
            self.set_state(ViewState::Idle);
        }
        self.error_message = Some(message.into());
        self.set_state(ViewState::Error);
    }

    /// Hide a visible results or error panel.
    pub fn clear_outcome(&mut self) {
        if self.state.is_results() || self.state == ViewState::Error {
            self.set_state(ViewState::Idle);
        }
    }

    pub(crate) fn set_trigger_enabled(&mut self, enabled: bool) {
        if self.trigger_enabled != enabled {
            self.trigger_enabled = enabled;
            self.emit(ViewEvent::TriggerChanged { enabled });
        }
    }

    pub(crate) fn update_counter(&mut self, counter: CharCounter) {
        if self.counter != counter {
            self.counter = counter;
            self.emit(ViewEvent::CounterChanged(counter));
        }
    }

    fn emit(&mut self, event: ViewEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(tone: Tone) -> ResultsPanel {
        ResultsPanel {
            tone,
            icon: "✅",
            title: "Content Appears Safe".to_string(),
            details: vec![DetailRow {
                label: "Toxicity Score",
                value: "0/1.0".to_string(),
            }],
        }
    }

    #[test]
    fn new_view_is_idle_and_interactive() {
        let view = View::new();
        assert_eq!(view.state(), ViewState::Idle);
        assert!(view.is_trigger_enabled());
        assert!(!view.is_loading_visible());
        assert!(!view.is_results_visible());
        assert!(!view.is_error_visible());
        assert_eq!(view.counter(), CharCounter::default());
    }

    #[test]
    fn showing_error_hides_results() {
        let mut view = View::new();
        view.show_results(panel(Tone::Safe));
        assert!(view.results().is_some());
        view.show_error("boom");
        assert!(view.results().is_none());
        assert_eq!(view.error_message(), Some("boom"));
        assert_eq!(view.state(), ViewState::Error);
    }

    #[test]
    fn showing_results_hides_error() {
        let mut view = View::new();
        view.show_error("boom");
        view.show_results(panel(Tone::Toxic));
        assert!(view.error_message().is_none());
        assert_eq!(view.state(), ViewState::ResultsToxic);
    }

    #[test]
    fn loading_hides_both_panels() {
        let mut view = View::new();
        view.show_results(panel(Tone::Safe));
        view.show_loading();
        assert!(view.is_loading_visible());
        assert!(view.results().is_none());
        assert!(view.error_message().is_none());
    }

    #[test]
    fn stale_content_does_not_reappear() {
        let mut view = View::new();
        view.show_results(panel(Tone::Safe));
        view.set_state(ViewState::Idle);
        view.set_state(ViewState::ResultsSafe);
        assert!(view.results().is_none());
    }

    #[test]
    fn clear_outcome_only_touches_results_and_error() {
        let mut view = View::new();
        view.show_loading();
        view.clear_outcome();
        assert_eq!(view.state(), ViewState::Loading);

        view.show_error("x");
        view.clear_outcome();
        assert_eq!(view.state(), ViewState::Idle);
    }

    #[test]
    fn listener_sees_transitions_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = View::new();
        view.subscribe_channel(tx);

        view.show_loading();
        view.set_trigger_enabled(false);
        view.show_error("nope");
        view.set_trigger_enabled(true);

        let mut events = Vec::new();
        while let Ok(e) = rx.try_recv() {
            events.push(e);
        }
        assert_eq!(
            events,
            vec![
                ViewEvent::StateChanged { from: ViewState::Idle, to: ViewState::Loading },
                ViewEvent::TriggerChanged { enabled: false },
                ViewEvent::StateChanged { from: ViewState::Loading, to: ViewState::Error },
                ViewEvent::TriggerChanged { enabled: true },
            ]
        );
    }

    #[test]
    fn repeated_error_is_reported_again() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = View::new();
        view.show_error("first");
        view.subscribe_channel(tx);
        view.show_error("second");
        assert_eq!(view.error_message(), Some("second"));
        let mut tos = Vec::new();
        while let Ok(ViewEvent::StateChanged { to, .. }) = rx.try_recv() {
            tos.push(to);
        }
        assert_eq!(tos, vec![ViewState::Idle, ViewState::Error]);
    }

    #[test]
    fn snapshot_serializes_visible_panel_only() {
        let mut view = View::new();
        view.show_results(panel(Tone::Safe));
        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert_eq!(json["state"], "results-safe");
        assert_eq!(json["results"]["tone"], "safe");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn view_state_display() {
        assert_eq!(ViewState::ResultsToxic.to_string(), "results-toxic");
        assert_eq!(ViewState::Idle.to_string(), "idle");
    }

    #[test]
    fn tone_class_names() {
        assert_eq!(Tone::Safe.class_name(), "results safe");
        assert_eq!(Tone::Toxic.class_name(), "results toxic");
    }
}
