use braillepad::composer::{capitalise, diff, CellOutcome, DotComposer, EditorKey};
use braillepad::text::MemoryTextField;
use braillepad::translate::{dot_numbers, translate_cells, Cell, UnicodeBraille};
use proptest::prelude::*;
use rstest::rstest;

mod common;
use common::{glyph, letters, A, B, C, D, E, UNKNOWN};

/// Like `letters`, but unknown cells come back as placeholders.
fn with_placeholders(cells: &[Cell]) -> Option<String> {
    Some(
        cells
            .iter()
            .map(|&c| glyph(c).map_or_else(|| format!("\\{}/", dot_numbers(c)), str::to_string))
            .collect(),
    )
}

fn composer(auto_caps: bool, predictive: bool) -> DotComposer {
    DotComposer::new(Box::new(letters), auto_caps, predictive)
}

fn type_all(composer: &mut DotComposer, field: &mut MemoryTextField, cells: &[Cell]) -> Vec<CellOutcome> {
    cells.iter().map(|&c| composer.type_cell(field, c)).collect()
}

fn composed(delta: &str) -> CellOutcome {
    CellOutcome::Composed {
        delta: delta.to_string(),
    }
}

// --- DIFF ---

#[rstest]
#[case("", "a", "a")]
#[case("c", "ca", "a")]
#[case("ca", "can", "n")]
#[case("Can", "can't", "'t")]
#[case("and", "and", "and")]
#[case("the", "th", "th")]
fn test_diff(#[case] old: &str, #[case] new: &str, #[case] expected: &str) {
    assert_eq!(diff(old, new), expected);
}

proptest! {
    #[test]
    fn prop_diff_is_a_nonempty_suffix(old in "[a-zA-Z ]{0,12}", new in "[a-zA-Z ]{1,12}") {
        let delta = diff(&old, &new);
        prop_assert!(!delta.is_empty());
        prop_assert!(new.ends_with(&delta));

        let kept = new.chars().count() - delta.chars().count();
        if kept > 0 {
            let head: String = new.chars().take(kept).collect();
            let old_head: String = old.chars().take(kept).collect();
            prop_assert_eq!(head.to_lowercase(), old_head.to_lowercase());
        }
    }
}

#[test]
fn test_capitalise_multibyte() {
    assert_eq!(capitalise("élan"), "Élan");
}

// --- TRANSLATION ---

#[test]
fn test_translate_pads_and_trims() {
    assert_eq!(translate_cells(&letters, &[0, A, B]).as_deref(), Some("ab"));
    assert_eq!(translate_cells(&letters, &[0, UNKNOWN]), None);
}

#[test]
fn test_translate_strips_placeholders() {
    assert_eq!(translate_cells(&with_placeholders, &[0, A, UNKNOWN]).as_deref(), Some("a"));
}

// --- TYPING ---

#[test]
fn test_first_cell_is_capitalized_at_sentence_start() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::new();

    assert_eq!(composer.type_cell(&mut field, A), composed("A"));
    assert_eq!(composer.cells(), &[0, A]);
    assert_eq!(field.text(), "A");
    assert_eq!(field.composing_region(), Some((0, 1)));
}

#[test]
fn test_word_grows_in_composing_region() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::new();

    let outcomes = type_all(&mut composer, &mut field, &[C, A, B]);
    assert_eq!(outcomes, vec![composed("C"), composed("a"), composed("b")]);
    assert_eq!(field.text(), "Cab");
    assert_eq!(composer.composing(), "Cab");
    assert!(composer.is_composing());
}

#[test]
fn test_no_caps_mid_sentence() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::with_text("see ");
    composer.type_cell(&mut field, B);
    assert_eq!(field.text(), "see b");
}

#[test]
fn test_caps_after_full_stop() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::with_text("Done. ");
    type_all(&mut composer, &mut field, &[B, E, D]);
    assert_eq!(field.text(), "Done. Bed");
}

#[test]
fn test_auto_caps_disabled() {
    let mut composer = composer(false, true);
    let mut field = MemoryTextField::new();
    type_all(&mut composer, &mut field, &[A, D, D]);
    assert_eq!(field.text(), "add");
}

#[test]
fn test_unrecognized_cell_rolls_back() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::new();

    composer.type_cell(&mut field, A);
    assert_eq!(composer.type_cell(&mut field, UNKNOWN), CellOutcome::Unrecognized);
    assert_eq!(composer.cells(), &[0, A]);
    assert_eq!(field.text(), "A");

    assert_eq!(composer.type_cell(&mut field, B), composed("b"));
    assert_eq!(field.text(), "Ab");
}

#[test]
fn test_unrecognized_first_cell_leaves_buffer_empty() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::new();
    assert_eq!(composer.type_cell(&mut field, UNKNOWN), CellOutcome::Unrecognized);
    assert!(composer.cells().is_empty());
    assert!(!composer.is_composing());
    assert_eq!(field.text(), "");
}

#[test]
fn test_placeholder_cells_compose_to_nothing_yet() {
    let mut composer = DotComposer::new(Box::new(with_placeholders), true, true);
    let mut field = MemoryTextField::new();
    assert_eq!(composer.type_cell(&mut field, UNKNOWN), composed(""));
    assert_eq!(composer.cells(), &[0, UNKNOWN]);
}

#[test]
fn test_non_predictive_commits_per_character() {
    let mut composer = composer(true, false);
    let mut field = MemoryTextField::new();

    let outcomes = type_all(&mut composer, &mut field, &[B, E, E]);
    assert_eq!(outcomes, vec![composed("B"), composed("e"), composed("e")]);
    assert_eq!(field.text(), "Bee");
    assert_eq!(field.composing_region(), None);
    assert_eq!(composer.composing(), "Bee");
}

#[test]
fn test_non_predictive_empty_text_keeps_field() {
    let mut composer = DotComposer::new(Box::new(with_placeholders), true, false);
    let mut field = MemoryTextField::with_text("x");
    composer.type_cell(&mut field, UNKNOWN);
    assert_eq!(field.text(), "x");
    assert_eq!(composer.composing(), "");
}

#[test]
fn test_unicode_translator_echoes_patterns() {
    let mut composer = DotComposer::new(Box::new(UnicodeBraille), false, true);
    let mut field = MemoryTextField::new();
    composer.type_cell(&mut field, A);
    composer.type_cell(&mut field, B);
    assert_eq!(field.text(), "\u{2801}\u{2803}");
}

// --- FINISHING ---

#[test]
fn test_finish_composing_commits_word() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::new();
    type_all(&mut composer, &mut field, &[A, D]);

    composer.finish_composing(&mut field, true);
    assert_eq!(field.text(), "Ad");
    assert_eq!(field.composing_region(), None);
    assert!(composer.cells().is_empty());
    assert_eq!(composer.composing(), "");

    // The next word starts a fresh buffer, mid-sentence now.
    composer.type_cell(&mut field, A);
    assert_eq!(field.text(), "Ada");
}

#[test]
fn test_on_key_finishes_word_first() {
    let mut composer = composer(false, true);
    let mut field = MemoryTextField::new();
    type_all(&mut composer, &mut field, &[B, E, D]);

    composer.on_key(&mut field, EditorKey::Char(' '));
    composer.type_cell(&mut field, A);
    composer.on_key(&mut field, EditorKey::Enter);
    assert_eq!(field.text(), "bed a\n");

    composer.on_key(&mut field, EditorKey::Delete);
    assert_eq!(field.text(), "bed a");
}

#[test]
fn test_commit_text_honours_caps() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::with_text("Hi. ");
    composer.commit_text(&mut field, "there");
    assert_eq!(field.text(), "Hi. There");

    let mut field = MemoryTextField::with_text("Hi ");
    composer.commit_text(&mut field, "there");
    assert_eq!(field.text(), "Hi there");
}

#[test]
fn test_closed_field_does_not_panic() {
    let mut composer = composer(true, true);
    let mut field = MemoryTextField::new();
    field.close();
    assert_eq!(composer.type_cell(&mut field, A), composed("a"));
    composer.finish_composing(&mut field, true);
    assert_eq!(field.text(), "");
}
