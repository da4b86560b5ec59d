//! Host editable text, measured in characters.

/// Editable text owned by the host application.
///
/// Reads return `None` when the field is no longer available; callers treat
/// that as "nothing happened".
pub trait TextField {
    fn cursor(&self) -> Option<usize>;
    fn text_before_cursor(&self, n: usize) -> Option<String>;
    fn text_after_cursor(&self, n: usize) -> Option<String>;
    fn all_text(&self) -> Option<String>;
    /// Text between the selection bounds; empty when only a caret is set.
    fn selected_text(&self) -> Option<String>;
    /// Selects `start..end`, or places the caret when they are equal.
    fn set_selection(&mut self, start: usize, end: usize) -> bool;
    /// Deletes around the selection, leaving the selected text itself.
    fn delete_surrounding(&mut self, before: usize, after: usize) -> bool;
    /// Inserts `text`, replacing any composing region or selection. A positive
    /// `new_cursor` is relative to the end of the inserted text (1 = just
    /// after it); zero or negative is relative to its start.
    fn commit_text(&mut self, text: &str, new_cursor: i32) -> bool;
    /// Replaces the composing region (or inserts one at the cursor).
    fn set_composing_text(&mut self, text: &str, new_cursor: i32) -> bool;
    /// Non-zero when the next character should be capitalized.
    fn cursor_caps_mode(&self) -> u32;
    fn send_enter(&mut self) -> bool;
    fn is_password(&self) -> bool {
        false
    }
}

/// Caps mode flag reported at the start of a sentence.
pub const CAP_MODE_SENTENCES: u32 = 0x4000;

/// In-memory field with composing-region support.
#[derive(Debug, Clone, Default)]
pub struct MemoryTextField {
    text: Vec<char>,
    cursor: usize,
    /// Non-empty selection; `cursor` sits at its start.
    selection: Option<(usize, usize)>,
    composing: Option<(usize, usize)>,
    sentence_caps: bool,
    password: bool,
    closed: bool,
}

impl MemoryTextField {
    pub fn new() -> Self {
        Self {
            sentence_caps: true,
            ..Self::default()
        }
    }

    /// Field containing `text` with the cursor at the end.
    pub fn with_text(text: &str) -> Self {
        let mut field = Self::new();
        field.text = text.chars().collect();
        field.cursor = field.text.len();
        field
    }

    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor.min(self.text.len());
        self
    }

    pub fn with_sentence_caps(mut self, enabled: bool) -> Self {
        self.sentence_caps = enabled;
        self
    }

    pub fn with_password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    /// Simulates the field going away; every call then fails.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn composing_region(&self) -> Option<(usize, usize)> {
        self.composing
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    fn caret_range(&self) -> (usize, usize) {
        self.selection.unwrap_or((self.cursor, self.cursor))
    }

    fn replace(&mut self, start: usize, end: usize, text: &str, new_cursor: i32) {
        let inserted: Vec<char> = text.chars().collect();
        let len = inserted.len();
        self.text.splice(start..end, inserted);
        self.selection = None;
        let target = if new_cursor > 0 {
            (start + len) as i64 + i64::from(new_cursor) - 1
        } else {
            start as i64 + i64::from(new_cursor)
        };
        self.cursor = target.clamp(0, self.text.len() as i64) as usize;
    }

    fn insertion_range(&self) -> (usize, usize) {
        self.composing.unwrap_or_else(|| self.caret_range())
    }
}

impl TextField for MemoryTextField {
    fn cursor(&self) -> Option<usize> {
        (!self.closed).then_some(self.cursor)
    }

    fn text_before_cursor(&self, n: usize) -> Option<String> {
        if self.closed {
            return None;
        }
        let start = self.cursor.saturating_sub(n);
        Some(self.text[start..self.cursor].iter().collect())
    }

    fn text_after_cursor(&self, n: usize) -> Option<String> {
        if self.closed {
            return None;
        }
        let (_, from) = self.caret_range();
        let end = (from + n).min(self.text.len());
        Some(self.text[from..end].iter().collect())
    }

    fn all_text(&self) -> Option<String> {
        (!self.closed).then(|| self.text())
    }

    fn selected_text(&self) -> Option<String> {
        if self.closed {
            return None;
        }
        let (start, end) = self.caret_range();
        Some(self.text[start..end].iter().collect())
    }

    fn set_selection(&mut self, start: usize, end: usize) -> bool {
        if self.closed {
            return false;
        }
        let len = self.text.len();
        let (start, end) = (start.min(end).min(len), start.max(end).min(len));
        self.composing = None;
        self.cursor = start;
        self.selection = (start < end).then_some((start, end));
        true
    }

    fn delete_surrounding(&mut self, before: usize, after: usize) -> bool {
        if self.closed {
            return false;
        }
        let (from, to) = self.caret_range();
        let start = from.saturating_sub(before);
        let end = (to + after).min(self.text.len());
        self.text.drain(to..end);
        self.text.drain(start..from);
        self.cursor = start;
        self.selection = None;
        self.composing = None;
        true
    }

    fn commit_text(&mut self, text: &str, new_cursor: i32) -> bool {
        if self.closed {
            return false;
        }
        let (start, end) = self.insertion_range();
        self.composing = None;
        self.replace(start, end, text, new_cursor);
        true
    }

    fn set_composing_text(&mut self, text: &str, new_cursor: i32) -> bool {
        if self.closed {
            return false;
        }
        let (start, end) = self.insertion_range();
        self.replace(start, end, text, new_cursor);
        self.composing = Some((start, start + text.chars().count()));
        true
    }

    fn cursor_caps_mode(&self) -> u32 {
        if self.closed || !self.sentence_caps {
            return 0;
        }
        let before = &self.text[..self.cursor];
        let trimmed_len = before.iter().rposition(|c| !c.is_whitespace()).map_or(0, |i| i + 1);
        let at_sentence_start = trimmed_len == 0
            || (trimmed_len < before.len() && matches!(before[trimmed_len - 1], '.' | '!' | '?'));
        if at_sentence_start {
            CAP_MODE_SENTENCES
        } else {
            0
        }
    }

    fn send_enter(&mut self) -> bool {
        self.commit_text("\n", 1)
    }

    fn is_password(&self) -> bool {
        self.password
    }
}
