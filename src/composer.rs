//! Turns typed cells into composed text in the host field.

use crate::text::TextField;
use crate::translate::{translate_cells, BackTranslate, Cell};
use tracing::debug;

/// Result of typing one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    /// The buffer translated; `delta` is the part of the composed text that
    /// changed and should be read back.
    Composed { delta: String },
    /// Nothing in the buffer translated. The cell was rolled back.
    Unrecognized,
}

/// Keys sent straight to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Delete,
    Enter,
    Char(char),
}

/// Suffix of `new` after the prefix it shares with `old`, compared
/// case-insensitively. When `new` is no longer than the shared prefix the
/// whole of `new` is returned.
pub fn diff(old: &str, new: &str) -> String {
    let shared = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
        .count();
    if shared >= new.chars().count() {
        new.to_string()
    } else {
        new.chars().skip(shared).collect()
    }
}

/// Uppercases the first character.
pub fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The cell buffer of the word being typed and the text it translates to.
pub struct DotComposer {
    translator: Box<dyn BackTranslate>,
    cells: Vec<Cell>,
    composing: String,
    caps_mode: u32,
    auto_caps: bool,
    predictive: bool,
}

impl DotComposer {
    pub fn new(translator: Box<dyn BackTranslate>, auto_caps: bool, predictive: bool) -> Self {
        Self {
            translator,
            cells: Vec::new(),
            composing: String::new(),
            caps_mode: 0,
            auto_caps,
            predictive,
        }
    }

    /// Buffered cells, including the leading blank once anything is typed.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn composing(&self) -> &str {
        &self.composing
    }

    pub fn is_composing(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn auto_caps(&self) -> bool {
        self.auto_caps
    }

    pub fn set_auto_caps(&mut self, enabled: bool) {
        self.auto_caps = enabled;
    }

    pub fn predictive(&self) -> bool {
        self.predictive
    }

    fn apply_caps(&self, text: &str) -> String {
        if self.auto_caps && self.caps_mode != 0 {
            capitalise(text)
        } else {
            text.to_string()
        }
    }

    /// Appends `cell`, re-translates the buffer and rewrites the composed
    /// text in `field`.
    pub fn type_cell(&mut self, field: &mut dyn TextField, cell: Cell) -> CellOutcome {
        let previous_len = self.cells.len();
        if self.cells.is_empty() {
            self.cells.push(0);
        }
        self.cells.push(cell);

        let Some(text) = translate_cells(self.translator.as_ref(), &self.cells) else {
            debug!("Cells {:?} did not translate, rolling back", self.cells);
            self.cells.truncate(previous_len);
            return CellOutcome::Unrecognized;
        };

        let old = self.composing.clone();
        let text = self.compose(field, &text);
        CellOutcome::Composed {
            delta: diff(&old, &text),
        }
    }

    /// Writes `text` over the previous composed text and returns it as
    /// written. Empty text leaves a non-predictive field untouched.
    fn compose(&mut self, field: &mut dyn TextField, text: &str) -> String {
        if self.composing.is_empty() {
            self.caps_mode = field.cursor_caps_mode();
        }
        let text = self.apply_caps(text);

        if self.predictive {
            field.set_composing_text(&text, 1);
            self.composing = text.clone();
        } else if !text.is_empty() {
            // Character by character, for fields that reject bulk replacement.
            field.delete_surrounding(self.composing.chars().count(), 0);
            let mut buffer = [0u8; 4];
            for c in text.chars() {
                field.commit_text(c.encode_utf8(&mut buffer), 1);
            }
            self.composing = text.clone();
        }
        text
    }

    /// Ends the current word. With `commit`, composing text is committed as
    /// it stands; non-predictive text is already in the field.
    pub fn finish_composing(&mut self, field: &mut dyn TextField, commit: bool) {
        if !self.composing.is_empty() && self.predictive && commit {
            field.commit_text(&self.composing, 1);
        }
        self.composing.clear();
        self.cells.clear();
    }

    pub fn on_key(&mut self, field: &mut dyn TextField, key: EditorKey) {
        self.finish_composing(field, true);
        match key {
            EditorKey::Delete => {
                field.delete_surrounding(1, 0);
            }
            EditorKey::Enter => {
                field.send_enter();
            }
            EditorKey::Char(c) => {
                let mut buffer = [0u8; 4];
                field.commit_text(c.encode_utf8(&mut buffer), 1);
            }
        }
    }

    /// Commits text from outside the cell stream, such as dictation or a
    /// spelling suggestion, honouring auto-caps.
    pub fn commit_text(&mut self, field: &mut dyn TextField, text: &str) {
        self.finish_composing(field, true);
        self.caps_mode = field.cursor_caps_mode();
        let text = self.apply_caps(text);
        field.commit_text(&text, 1);
    }
}

impl std::fmt::Debug for DotComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotComposer")
            .field("cells", &self.cells)
            .field("composing", &self.composing)
            .field("auto_caps", &self.auto_caps)
            .field("predictive", &self.predictive)
            .finish_non_exhaustive()
    }
}
