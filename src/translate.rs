//! Back-translation seam: Braille cells in, text out.
//!
//! Real language tables live outside this crate. [`UnicodeBraille`] is a
//! reference implementation that renders cells as Unicode Braille patterns.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// One Braille cell. Bit `i` set means dot `i + 1` is raised.
pub type Cell = u8;

/// External back-translation service.
///
/// Returns `None` when nothing in the sequence is recognized. The result may
/// contain `\<dots>/` placeholders for cells that could not be resolved yet.
pub trait BackTranslate {
    fn back_translate(&self, cells: &[Cell]) -> Option<String>;
}

impl<F> BackTranslate for F
where
    F: Fn(&[Cell]) -> Option<String>,
{
    fn back_translate(&self, cells: &[Cell]) -> Option<String> {
        self(cells)
    }
}

/// Dot numbers of a cell in ascending order, e.g. `0b10011` -> "125".
pub fn dot_numbers(cell: Cell) -> String {
    (0..8)
        .filter(|bit| cell & (1 << bit) != 0)
        .map(|bit| char::from(b'1' + bit))
        .collect()
}

/// Removes every `\<dots>/` placeholder belonging to one of `cells`.
pub fn strip_unresolved(text: &str, cells: &[Cell]) -> String {
    let mut text = text.to_string();
    for &cell in cells {
        let token = format!("\\{}/", dot_numbers(cell));
        if text.contains(&token) {
            text = text.replace(&token, "");
        }
    }
    text
}

/// Translates the composing buffer with a blank cell on either side, strips
/// placeholders and trims the result.
pub fn translate_cells(translator: &dyn BackTranslate, cells: &[Cell]) -> Option<String> {
    let mut padded = Vec::with_capacity(cells.len() + 2);
    padded.push(0);
    padded.extend_from_slice(cells);
    padded.push(0);

    let text = translator.back_translate(&padded)?;
    Some(strip_unresolved(&text, &padded).trim().to_string())
}

/// Braille code family, which also fixes how many dots a cell may use.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BrailleType {
    /// Eight-dot computer Braille.
    Computer,
    /// Six-dot literary Braille.
    #[default]
    Literary,
}

impl BrailleType {
    pub fn dots(self) -> usize {
        match self {
            Self::Computer => 8,
            Self::Literary => 6,
        }
    }

    pub fn switched(self) -> Self {
        match self {
            Self::Computer => Self::Literary,
            Self::Literary => Self::Computer,
        }
    }
}

const BRAILLE_PATTERN_BASE: u32 = 0x2800;

/// Renders each cell as the matching Unicode Braille pattern; blank cells
/// become spaces. Every pattern is recognized.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeBraille;

impl UnicodeBraille {
    fn glyph(cell: Cell) -> char {
        if cell == 0 {
            return ' ';
        }
        // Unicode orders bits as dots 1,2,3,4,5,6,7,8, the same as a Cell.
        char::from_u32(BRAILLE_PATTERN_BASE + u32::from(cell)).unwrap_or(' ')
    }
}

impl BackTranslate for UnicodeBraille {
    fn back_translate(&self, cells: &[Cell]) -> Option<String> {
        Some(cells.iter().map(|&c| Self::glyph(c)).collect())
    }
}
