pub mod cli;
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod renderer;
pub mod tracker;
pub mod view;

use dispatcher::{AnalysisBackend, DispatchOutcome, Dispatcher};
use tracker::InputTracker;
use view::View;

// ---------------------------------------------------------------------------
// UI events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// A key press in the text input, with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn ctrl_enter() -> Self {
        KeyPress {
            key: Key::Enter,
            ctrl: true,
        }
    }

    /// Ctrl+Enter is equivalent to clicking the trigger.
    pub fn is_submit_shortcut(&self) -> bool {
        self.ctrl && self.key == Key::Enter
    }
}

/// Everything a front end can report to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The input now holds this text.
    Edit(String),
    /// The trigger control was clicked.
    Click,
    Key(KeyPress),
}

// ---------------------------------------------------------------------------
// AnalysisController
// ---------------------------------------------------------------------------

/// Owns the view and wires input tracking to request dispatch.
///
/// The view model is built by the caller and handed in once; the controller
/// is the only thing that mutates it afterwards.
pub struct AnalysisController<B> {
    view: View,
    tracker: InputTracker,
    dispatcher: Dispatcher<B>,
}

impl<B: AnalysisBackend> AnalysisController<B> {
    pub fn new(view: View, tracker: InputTracker, dispatcher: Dispatcher<B>) -> Self {
        AnalysisController {
            view,
            tracker,
            dispatcher,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn tracker(&self) -> &InputTracker {
        &self.tracker
    }

    pub fn dispatcher(&self) -> &Dispatcher<B> {
        &self.dispatcher
    }

    /// Handle one UI event.
    ///
    /// Returns the dispatch outcome for events that trigger analysis, `None`
    /// for edits and unrelated key presses.
    pub async fn handle(&mut self, event: UiEvent) -> Option<DispatchOutcome> {
        match event {
            UiEvent::Edit(text) => {
                self.tracker.edit(text, &mut self.view);
                None
            }
            UiEvent::Click => Some(self.submit().await),
            UiEvent::Key(press) if press.is_submit_shortcut() => Some(self.submit().await),
            UiEvent::Key(_) => None,
        }
    }

    async fn submit(&mut self) -> DispatchOutcome {
        self.dispatcher
            .trigger(self.tracker.text(), &mut self.view)
            .await
    }
}
