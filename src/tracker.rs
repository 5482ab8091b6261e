use crate::view::{CharCounter, CounterEmphasis, View};

/// Counter switches to warning emphasis above this many characters.
pub const DEFAULT_SOFT_LIMIT: usize = 900;

/// Measure `text` against `soft_limit`.
///
/// The count is in UTF-16 code units, the length a browser text box reports,
/// so a character outside the BMP counts as two. The limit is advisory only:
/// nothing here rejects or truncates input.
pub fn measure(text: &str, soft_limit: usize) -> CharCounter {
    let count = text.encode_utf16().count();
    let emphasis = if count > soft_limit {
        CounterEmphasis::Warning
    } else {
        CounterEmphasis::Normal
    };
    CharCounter { count, emphasis }
}

/// Holds the current input text and keeps the view's counter in sync.
#[derive(Debug, Clone)]
pub struct InputTracker {
    text: String,
    soft_limit: usize,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SOFT_LIMIT)
    }
}

impl InputTracker {
    pub fn new(soft_limit: usize) -> Self {
        InputTracker {
            text: String::new(),
            soft_limit,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn soft_limit(&self) -> usize {
        self.soft_limit
    }

    /// Replace the input with `text` and refresh the counter.
    pub fn edit(&mut self, text: impl Into<String>, view: &mut View) {
        self.text = text.into();
        view.update_counter(measure(&self.text, self.soft_limit));
    }

    pub fn clear(&mut self, view: &mut View) {
        self.edit(String::new(), view);
    }
}
