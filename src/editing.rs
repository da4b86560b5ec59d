//! Separator-based scanning and cursor movement over a [`TextField`].

use crate::text::TextField;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub const MAX_WORD_LENGTH: usize = 30;
pub const MAX_LINE_LENGTH: usize = 1000;
pub const WORD_SEPARATORS: &str = " \n\t";
pub const LINE_SEPARATOR: &str = "\n";

/// Text unit for movement, reading and deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Granularity {
    Character,
    Word,
    Line,
    All,
}

/// A block of text around the cursor and how far it extends either side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    pub text: String,
    pub chars_before: usize,
    pub chars_after: usize,
    pub moved_left: bool,
    pub moved_right: bool,
}

impl Word {
    fn new(text: String, chars_before: usize, chars_after: usize) -> Self {
        Self {
            text,
            chars_before,
            chars_after,
            ..Self::default()
        }
    }
}

fn is_separator(c: char, separators: &str) -> bool {
    separators.contains(c)
}

/// The run of non-separators touching the cursor.
pub fn get_block(before: &str, after: &str, separators: &str) -> Word {
    let before: Vec<char> = before.chars().collect();
    let after: Vec<char> = after.chars().collect();
    block(&before, &after, separators)
}

fn block(before: &[char], after: &[char], separators: &str) -> Word {
    let start = before
        .iter()
        .rposition(|&c| is_separator(c, separators))
        .map_or(0, |i| i + 1);
    let end = after
        .iter()
        .position(|&c| is_separator(c, separators))
        .unwrap_or(after.len());
    let text: String = before[start..].iter().chain(&after[..end]).collect();
    Word::new(text, before.len() - start, end)
}

/// Separator counts directly before and after the cursor, each capped at
/// `max_skip` (`None` is unlimited).
fn skip_separator(before: &[char], after: &[char], separators: &str, max_skip: Option<usize>) -> (usize, usize) {
    let cap = |n: usize| max_skip.map_or(n, |max| n.min(max));
    let trailing = before
        .iter()
        .rev()
        .take_while(|&&c| is_separator(c, separators))
        .count();
    let leading = after
        .iter()
        .take_while(|&&c| is_separator(c, separators))
        .count();
    (cap(trailing), cap(leading))
}

/// Skip separators, find the block, then skip trailing separators.
///
/// When separators directly follow the cursor, `chars_after` covers only
/// them, so moving forward lands on the start of the next block.
fn block_for_movement(before: &[char], after: &[char], separators: &str, max_skip: Option<usize>) -> Word {
    let (skip_before, skip_after) = skip_separator(before, after, separators, max_skip);
    let inner_before = &before[..before.len() - skip_before];
    let mut word = block(inner_before, &after[skip_after..], separators);
    let (_, trailing_after) = skip_separator(
        &inner_before[..inner_before.len() - word.chars_before],
        &after[skip_after + word.chars_after..],
        separators,
        max_skip,
    );

    word.chars_before += skip_before;
    if skip_after == 0 {
        word.chars_after += trailing_after;
    } else {
        word.chars_after = skip_after;
    }
    word
}

fn chars(text: Option<String>) -> Option<Vec<char>> {
    text.map(|t| t.chars().collect())
}

fn set_cursor(field: &mut dyn TextField, cursor: usize) {
    field.set_selection(cursor, cursor);
}

pub fn move_to_previous_character(field: &mut dyn TextField) -> Option<Word> {
    let cursor = field.cursor()?;
    let mut word = Word::default();
    if cursor > 0 {
        let text = field.text_before_cursor(1)?;
        word = Word::new(text, 1, 0);
        word.moved_left = true;
        set_cursor(field, cursor - 1);
    }
    Some(word)
}

pub fn move_to_next_character(field: &mut dyn TextField) -> Option<Word> {
    let cursor = field.cursor()?;
    let text = field.text_after_cursor(2)?;
    let mut word = Word::default();
    // Announce the character the cursor now sits before.
    if text.chars().count() > 1 {
        word = Word::new(text.chars().skip(1).collect(), 0, 1);
        word.moved_right = true;
    }
    set_cursor(field, cursor + 1);
    Some(word)
}

fn move_to_previous(field: &mut dyn TextField, separators: &str, max_len: usize, max_skip: Option<usize>) -> Option<Word> {
    let cursor = field.cursor()?;
    let before = chars(field.text_before_cursor(max_len))?;
    let after = chars(field.text_after_cursor(max_len))?;

    let mut word = block_for_movement(&before, &after, separators, max_skip);
    if word.chars_before == 0 {
        word.text.clear();
    } else {
        set_cursor(field, cursor - word.chars_before);
        let after = field.text_after_cursor(max_len).unwrap_or_default();
        word.text = get_block("", &after, separators).text;
        word.moved_left = true;
    }
    Some(word)
}

fn move_to_next(field: &mut dyn TextField, separators: &str, max_len: usize, max_skip: Option<usize>) -> Option<Word> {
    let cursor = field.cursor()?;
    let before = chars(field.text_before_cursor(max_len))?;
    let after = chars(field.text_after_cursor(max_len))?;

    let mut word = block_for_movement(&before, &after, separators, max_skip);
    if word.chars_after == 0 {
        word.text.clear();
    } else {
        set_cursor(field, cursor + word.chars_after);
        let after = field.text_after_cursor(max_len).unwrap_or_default();
        word.text = get_block("", &after, separators).text;
        word.moved_right = !after.is_empty();
    }
    Some(word)
}

pub fn move_to_previous_word(field: &mut dyn TextField) -> Option<Word> {
    move_to_previous(field, WORD_SEPARATORS, MAX_WORD_LENGTH, None)
}

pub fn move_to_next_word(field: &mut dyn TextField) -> Option<Word> {
    move_to_next(field, WORD_SEPARATORS, MAX_WORD_LENGTH, None)
}

pub fn move_to_previous_line(field: &mut dyn TextField) -> Option<Word> {
    move_to_previous(field, LINE_SEPARATOR, MAX_LINE_LENGTH, Some(1))
}

pub fn move_to_next_line(field: &mut dyn TextField) -> Option<Word> {
    move_to_next(field, LINE_SEPARATOR, MAX_LINE_LENGTH, Some(1))
}

pub fn move_to_home(field: &mut dyn TextField) -> Option<Word> {
    set_cursor(field, 0);
    Some(Word::default())
}

pub fn move_to_end(field: &mut dyn TextField) -> Option<Word> {
    let text = field.all_text()?;
    set_cursor(field, text.chars().count());
    Some(Word::default())
}

pub fn move_left(field: &mut dyn TextField, granularity: Granularity) -> Option<Word> {
    match granularity {
        Granularity::Character => move_to_previous_character(field),
        Granularity::Word => move_to_previous_word(field),
        Granularity::Line => move_to_previous_line(field),
        Granularity::All => move_to_home(field),
    }
}

pub fn move_right(field: &mut dyn TextField, granularity: Granularity) -> Option<Word> {
    match granularity {
        Granularity::Character => move_to_next_character(field),
        Granularity::Word => move_to_next_word(field),
        Granularity::Line => move_to_next_line(field),
        Granularity::All => move_to_end(field),
    }
}

pub fn get_character(field: &dyn TextField) -> Option<String> {
    field.text_after_cursor(1)
}

pub fn get_word(field: &dyn TextField) -> Option<Word> {
    let before = field.text_before_cursor(MAX_WORD_LENGTH)?;
    let after = field.text_after_cursor(MAX_WORD_LENGTH)?;
    Some(get_block(&before, &after, WORD_SEPARATORS))
}

pub fn get_line(field: &dyn TextField) -> Option<Word> {
    let before = field.text_before_cursor(MAX_LINE_LENGTH)?;
    let after = field.text_after_cursor(MAX_LINE_LENGTH)?;
    Some(get_block(&before, &after, LINE_SEPARATOR))
}

pub fn get_all_text(field: &dyn TextField) -> Option<String> {
    field.all_text()
}

/// Text at the cursor for a granularity.
pub fn read(field: &dyn TextField, granularity: Granularity) -> Option<String> {
    match granularity {
        Granularity::Character => get_character(field),
        Granularity::Word => get_word(field).map(|w| w.text),
        Granularity::Line => get_line(field).map(|w| w.text),
        Granularity::All => get_all_text(field),
    }
}

/// Moves the cursor back over every separator before it.
pub fn skip_separators_backwards(field: &mut dyn TextField, separators: &str) -> Option<Word> {
    let before = chars(field.text_before_cursor(MAX_LINE_LENGTH))?;
    let (skipped, _) = skip_separator(&before, &[], separators, None);
    let cursor = field.cursor()?;
    if cursor == 0 {
        return None;
    }
    set_cursor(field, cursor - skipped);
    Some(Word::new(String::new(), skipped, 0))
}

/// Positions the cursor at the start of the text a backspace would remove
/// and returns it; `chars_before` is then the count to delete forward.
pub fn backspace_target(field: &mut dyn TextField, granularity: Granularity) -> Option<Word> {
    match granularity {
        Granularity::Character => move_to_previous_character(field),
        Granularity::Word => {
            let space = skip_separators_backwards(field, WORD_SEPARATORS);
            let mut word = get_word(field)?;
            if let Some(space) = space {
                word.chars_before += space.chars_before;
            }
            if word.text.chars().count() > word.chars_before {
                word.text = word.text.chars().take(word.chars_before).collect();
            }
            move_to_previous_word(field);
            Some(word)
        }
        Granularity::Line => {
            let cursor = field.cursor()?;
            let mut word = get_line(field)?;
            if cursor > 0 || word.chars_after > 0 {
                // Also take the newline ending the previous line.
                let newline = usize::from(cursor > word.chars_before);
                set_cursor(field, cursor - newline - word.chars_before);
                word.chars_before += newline + word.chars_after;
            }
            Some(word)
        }
        Granularity::All => {
            let text = get_all_text(field)?;
            move_to_home(field);
            let count = text.chars().count();
            Some(Word::new(text, count, 0))
        }
    }
}

pub fn character_count(text: &str) -> usize {
    text.chars().count()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lines in `text`, ignoring trailing empty lines.
pub fn line_count(text: &str) -> usize {
    let lines: Vec<&str> = text.split('\n').collect();
    lines.iter().rposition(|line| !line.is_empty()).map_or(0, |i| i + 1)
}
