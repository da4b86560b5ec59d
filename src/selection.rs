//! The user's mark and the region it spans with the cursor.

use crate::text::TextField;

/// Mark and select-all state for one input session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    mark: Option<usize>,
    select_all: bool,
}

impl Selection {
    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    /// Sets the mark at the cursor, or clears it when the cursor is already
    /// on the mark or everything is selected. Returns whether a mark is set.
    pub fn toggle_mark(&mut self, field: &dyn TextField) -> bool {
        let cursor = field.cursor();
        if self.select_all || cursor.is_none() || cursor == self.mark {
            self.clear();
        } else {
            self.mark = cursor;
        }
        self.mark.is_some()
    }

    /// Selects the whole text and marks its end.
    pub fn select_all(&mut self, field: &mut dyn TextField) -> bool {
        if let Some(text) = field.all_text() {
            let len = text.chars().count();
            self.mark = Some(len);
            self.select_all = field.set_selection(0, len);
        }
        self.select_all
    }

    /// Drops select-all, and the mark it set, before the text changes.
    pub fn end_select_all(&mut self) {
        if self.select_all {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.mark = None;
        self.select_all = false;
    }

    /// The region between `caret` and the mark, including the character
    /// under the later end.
    pub fn bounds(&self, field: &dyn TextField, caret: usize) -> Option<(usize, usize)> {
        let mark = self.mark?;
        let len = field.all_text()?.chars().count();
        let mark = mark.min(len);
        let start = caret.min(mark);
        let end = caret.max(mark);
        Some((start, if end < len { end + 1 } else { end }))
    }

    /// Where the region is measured from: the start of the text under
    /// select-all, otherwise the cursor.
    pub fn caret(&self, field: &dyn TextField) -> Option<usize> {
        if self.select_all {
            Some(0)
        } else {
            field.cursor()
        }
    }

    /// Selects the marked region in the field. Fails without a mark.
    pub fn apply(&self, field: &mut dyn TextField) -> Option<(usize, usize)> {
        let caret = self.caret(field)?;
        let (start, end) = self.bounds(field, caret)?;
        field.set_selection(start, end).then_some((start, end))
    }
}
