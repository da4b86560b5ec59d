//! One active input session: layout, tracker, decoder and composer together.

use crate::action::{Action, EditAction, HostAction};
use crate::composer::{CellOutcome, DotComposer, EditorKey};
use crate::config::{Config, KeyboardEcho, KeyboardFeedback};
use crate::editing::{self, Granularity};
use crate::error::PadResult;
use crate::feedback::{Announcement, Feedback};
use crate::geometry::Point;
use crate::gesture::{Gesture, GestureDecoder};
use crate::layout::{KeyLayout, LayoutKind, Viewport};
use crate::selection::Selection;
use crate::selector::LayoutSelector;
use crate::store::CalibrationStore;
use crate::text::TextField;
use crate::touch::{TouchEvent, TouchOutcome, TouchTracker};
use crate::translate::{BackTranslate, BrailleType, Cell};
use tracing::{debug, info, warn};

type Message = Option<(Announcement, bool)>;

pub struct InputSession<F: Feedback> {
    selector: LayoutSelector,
    store: Box<dyn CalibrationStore>,
    layout: KeyLayout,
    tracker: TouchTracker,
    decoder: GestureDecoder,
    composer: DotComposer,
    selection: Selection,
    edit_action: EditAction,
    feedback: F,
    braille_type: BrailleType,
    echo: KeyboardEcho,
    keyboard_feedback: KeyboardFeedback,
    double_space_period: bool,
}

impl<F: Feedback> InputSession<F> {
    /// Starts a session on the stored (or default) layout for `viewport`.
    pub fn new(
        config: &Config,
        viewport: Viewport,
        translator: Box<dyn BackTranslate>,
        mut store: Box<dyn CalibrationStore>,
        feedback: F,
    ) -> PadResult<Self> {
        let selector = LayoutSelector::new(config.pad.clone());
        let layout = selector.default_layout(viewport, store.as_mut())?;
        let input = &config.input;
        Ok(Self {
            selector,
            store,
            layout,
            tracker: TouchTracker::new(config.pad.voice_shortcut),
            decoder: GestureDecoder::default(),
            composer: DotComposer::new(translator, input.auto_caps, input.predictive),
            selection: Selection::default(),
            edit_action: EditAction::Copy,
            feedback,
            braille_type: input.braille_type,
            echo: input.echo,
            keyboard_feedback: input.feedback,
            double_space_period: input.double_space_period,
        })
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn tracker(&self) -> &TouchTracker {
        &self.tracker
    }

    pub fn composer(&self) -> &DotComposer {
        &self.composer
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn edit_action(&self) -> EditAction {
        self.edit_action
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    pub fn braille_type(&self) -> BrailleType {
        self.braille_type
    }

    pub fn echo(&self) -> KeyboardEcho {
        self.echo
    }

    pub fn keyboard_feedback(&self) -> KeyboardFeedback {
        self.keyboard_feedback
    }

    /// The view changed size or orientation; reload the layout for it.
    pub fn set_viewport(&mut self, field: &mut dyn TextField, viewport: Viewport) -> PadResult<()> {
        self.composer.finish_composing(field, true);
        self.layout = self.selector.default_layout(viewport, self.store.as_mut())?;
        Ok(())
    }

    pub fn handle_touch(&mut self, field: &mut dyn TextField, event: TouchEvent) -> TouchOutcome {
        let outcome = self
            .tracker
            .handle(event, &mut self.layout, self.braille_type.dots());
        match &outcome {
            TouchOutcome::Nothing => {}
            TouchOutcome::Gesture(gesture) => {
                self.handle_gesture(field, *gesture, event.time_ms());
            }
            TouchOutcome::UnrecognizedSwipe => {
                // Still a swipe, so it breaks a pending double.
                debug!("Dropping unrecognized swipe");
                self.decoder.reset();
            }
            TouchOutcome::Cell(cell) => {
                self.handle_cell(field, *cell);
            }
            TouchOutcome::Calibrate(points) => {
                if let Err(e) = self.calibrate(points) {
                    debug!("Calibration gesture ignored: {}", e);
                }
            }
            TouchOutcome::NextThree => {
                self.feedback.announce(&Announcement::PlaceNextThree, false);
                self.feedback.notify(true, false);
            }
            TouchOutcome::LongHold => self.feedback.host_action(HostAction::VoiceInput, false),
        }
        outcome
    }

    /// Rebuilds the layout from six calibration points.
    pub fn calibrate(&mut self, points: &[Point]) -> PadResult<LayoutKind> {
        match self
            .selector
            .select(points, self.layout.viewport(), self.store.as_mut())
        {
            Ok(layout) => {
                let kind = layout.kind();
                info!("Calibrated {} layout", kind);
                self.layout = layout;
                self.feedback.announce(&Announcement::LayoutReady(kind), false);
                self.feedback.notify(true, false);
                Ok(kind)
            }
            Err(e) => {
                warn!("Calibration rejected: {}", e);
                self.feedback.announce(&Announcement::CalibrationFailed, false);
                Err(e)
            }
        }
    }

    fn notify(&mut self) {
        let mode = self.keyboard_feedback;
        if mode.vibrates() || mode.sounds() {
            self.feedback.notify(mode.vibrates(), mode.sounds());
        }
    }

    /// Runs the action for `gesture`, returning what was done.
    pub fn handle_gesture(&mut self, field: &mut dyn TextField, gesture: Gesture, now_ms: u64) -> Action {
        if gesture == Gesture::None {
            return Action::None;
        }
        let (gesture, fast_double) = self.decoder.register(gesture, now_ms);
        let action = Action::from_gesture(gesture);
        debug!("Gesture {} -> {:?} (fast double: {})", gesture, action, fast_double);

        let message = self.perform(field, action, fast_double);
        self.notify();
        if let Some((announcement, secure)) = message {
            self.feedback.announce(&announcement, secure);
        }
        action
    }

    fn perform(&mut self, field: &mut dyn TextField, action: Action, fast_double: bool) -> Message {
        if action.needs_confirmation() && !fast_double {
            let prompt = match action {
                Action::Host(host) => Announcement::ConfirmHost(host),
                _ => Announcement::SwipeToConfirm,
            };
            return Some((prompt, false));
        }

        match action {
            Action::None => None,
            Action::MoveLeft(granularity) => {
                let granularity = self.prepare_move(field, granularity);
                let word = editing::move_left(field, granularity)?;
                if word.moved_left {
                    Some((Announcement::Text(word.text), field.is_password()))
                } else {
                    Some((Announcement::StartOfText, false))
                }
            }
            Action::MoveRight(granularity) => {
                let granularity = self.prepare_move(field, granularity);
                let word = editing::move_right(field, granularity)?;
                if word.moved_right {
                    Some((Announcement::Text(word.text), field.is_password()))
                } else {
                    Some((Announcement::EndOfText, false))
                }
            }
            Action::Read(granularity) => {
                let text = editing::read(field, granularity)?;
                let announcement = if text.is_empty() {
                    Announcement::Blank
                } else {
                    Announcement::Text(text)
                };
                Some((announcement, field.is_password()))
            }
            Action::Backspace(granularity) => self.backspace(field, granularity),
            Action::Space => {
                if fast_double && self.double_space_period {
                    if let Some(message) = self.double_space(field) {
                        return message;
                    }
                }
                self.type_character(field, EditorKey::Char(' '), "space")
            }
            Action::NewLine => self.type_character(field, EditorKey::Enter, "new line"),
            Action::CycleFeedback => {
                self.keyboard_feedback = self.keyboard_feedback.next();
                Some((Announcement::Feedback(self.keyboard_feedback), false))
            }
            Action::CycleEcho => {
                self.echo = self.echo.next();
                Some((Announcement::Echo(self.echo), false))
            }
            Action::SwitchBrailleType => {
                self.braille_type = self.braille_type.switched();
                info!("Switched to {} braille", self.braille_type);
                Some((Announcement::BrailleType(self.braille_type), false))
            }
            Action::ToggleAutoCaps => {
                let enabled = !self.composer.auto_caps();
                self.composer.set_auto_caps(enabled);
                Some((Announcement::AutoCaps(enabled), false))
            }
            Action::AnnounceCounts => {
                let text = field.all_text()?;
                let counts = Announcement::Counts {
                    lines: editing::line_count(&text),
                    words: editing::word_count(&text),
                    characters: editing::character_count(&text),
                };
                Some((counts, false))
            }
            Action::LatchDot7 => self.latch(true, false),
            Action::LatchDot8 => self.latch(false, true),
            Action::ToggleMark => {
                self.composer.finish_composing(field, true);
                let announcement = if self.selection.toggle_mark(field) {
                    Announcement::MarkSet
                } else {
                    Announcement::MarkCleared
                };
                Some((announcement, false))
            }
            Action::NextEditAction => {
                self.edit_action = self.edit_action.next(self.feedback.can_paste());
                Some((Announcement::EditAction(self.edit_action), false))
            }
            Action::PerformEditAction => {
                self.composer.finish_composing(field, true);
                self.perform_edit(field)
            }
            Action::Host(host) => {
                self.feedback.host_action(host, fast_double);
                None
            }
        }
    }

    /// Ends the word being composed. Under select-all every movement goes
    /// to the text's ends and starts from a plain caret.
    fn prepare_move(&mut self, field: &mut dyn TextField, granularity: Granularity) -> Granularity {
        self.composer.finish_composing(field, true);
        if self.selection.is_select_all() {
            self.selection.clear();
            field.set_selection(0, 0);
            Granularity::All
        } else {
            granularity
        }
    }

    /// Puts the caret back after a region was selected for an edit action.
    fn deselect(&self, field: &mut dyn TextField, caret: usize) {
        if !self.selection.is_select_all() {
            field.set_selection(caret, caret);
        }
    }

    fn perform_edit(&mut self, field: &mut dyn TextField) -> Message {
        let action = self.edit_action;
        debug!("Edit action {}", action);
        if action == EditAction::SelectAll {
            return self
                .selection
                .select_all(field)
                .then_some((Announcement::SelectedAll, false));
        }
        if action == EditAction::Paste {
            let ok = self.feedback.clipboard(action);
            if ok {
                self.selection.end_select_all();
                let caret = field.cursor()?;
                field.set_selection(caret, caret);
            }
            return Some((Announcement::Clipboard { action, ok }, false));
        }

        let caret = self.selection.caret(field)?;
        let Some((start, end)) = self.selection.apply(field) else {
            return Some((Announcement::MarkNotSet, false));
        };
        if action.uses_clipboard() {
            let ok = self.feedback.clipboard(action);
            match action {
                EditAction::Cut if ok => {
                    self.selection.end_select_all();
                    field.set_selection(start, start);
                }
                _ => self.deselect(field, caret),
            }
            return Some((Announcement::Clipboard { action, ok }, false));
        }

        let text = field.selected_text().unwrap_or_default();
        self.deselect(field, caret);
        match action {
            EditAction::Delete => {
                field.set_selection(end, end);
                let deleted = field.delete_surrounding(end - start, 0);
                self.selection.end_select_all();
                if deleted && !text.is_empty() {
                    Some((Announcement::Deleted(text), field.is_password()))
                } else {
                    Some((Announcement::NothingToDelete, false))
                }
            }
            _ if text.is_empty() => Some((Announcement::Blank, false)),
            _ => Some((Announcement::Text(text), field.is_password())),
        }
    }

    fn latch(&mut self, dot7: bool, dot8: bool) -> Message {
        if self.braille_type.dots() == 8 {
            self.tracker.set_latched_dots(dot7, dot8);
            None
        } else {
            Some((Announcement::UnknownCharacter, false))
        }
    }

    fn backspace(&mut self, field: &mut dyn TextField, granularity: Granularity) -> Message {
        self.composer.finish_composing(field, true);
        self.selection.end_select_all();
        let word = editing::backspace_target(field, granularity)?;
        if word.chars_before == 0 && word.chars_after == 0 {
            return Some((Announcement::NothingToDelete, false));
        }
        // The cursor already sits at the start of the doomed text.
        if field.delete_surrounding(0, word.chars_before) {
            Some((Announcement::Deleted(word.text), field.is_password()))
        } else {
            None
        }
    }

    /// Sends a space or newline and echoes the finished word or the key name.
    fn type_character(&mut self, field: &mut dyn TextField, key: EditorKey, name: &str) -> Message {
        self.composer.finish_composing(field, true);
        self.selection.end_select_all();
        let finished: Option<String> = editing::get_word(field)
            .map(|word| word.text.chars().take(word.chars_before).collect());
        self.composer.on_key(field, key);

        let text = match finished {
            Some(word) if self.echo.echoes_words() && !word.is_empty() => word,
            _ if self.echo.echoes_characters() => name.to_string(),
            _ => return None,
        };
        Some((Announcement::Text(text), field.is_password()))
    }

    /// A letter or digit then one space: swap the space for ". ".
    fn double_space(&mut self, field: &mut dyn TextField) -> Option<Message> {
        let before: Vec<char> = field.text_before_cursor(2)?.chars().collect();
        match before.as_slice() {
            [last, space] if last.is_alphanumeric() && space.is_whitespace() => {
                field.delete_surrounding(1, 0);
                self.composer.on_key(field, EditorKey::Char('.'));
                Some(self.type_character(field, EditorKey::Char(' '), "space"))
            }
            _ => None,
        }
    }

    /// Types one chord. Clears latched dots 7 and 8 either way.
    pub fn handle_cell(&mut self, field: &mut dyn TextField, cell: Cell) -> CellOutcome {
        self.decoder.reset();
        self.selection.end_select_all();
        let outcome = self.composer.type_cell(field, cell);
        match &outcome {
            CellOutcome::Unrecognized => {
                self.feedback.announce(&Announcement::UnknownCharacter, false);
            }
            CellOutcome::Composed { delta } => {
                self.notify();
                let delta = delta.trim();
                if self.echo.echoes_characters() && !delta.is_empty() {
                    self.feedback
                        .announce(&Announcement::Text(delta.to_string()), field.is_password());
                }
            }
        }
        self.tracker.set_latched_dots(false, false);
        outcome
    }

    /// Commits text from outside the cell stream, e.g. a dictation result,
    /// spaced off from a preceding word, and reads it back.
    pub fn commit_text(&mut self, field: &mut dyn TextField, text: &str) {
        if text.is_empty() {
            return;
        }
        self.selection.end_select_all();
        let follows_word = field
            .text_before_cursor(1)
            .and_then(|before| before.chars().last())
            .is_some_and(|c| !c.is_whitespace());
        if follows_word {
            self.composer.on_key(field, EditorKey::Char(' '));
        }
        self.composer.commit_text(field, text);
        self.feedback
            .announce(&Announcement::Text(text.to_string()), field.is_password());
    }

    /// Ends the current word, e.g. when the field loses focus.
    pub fn finish_input(&mut self, field: &mut dyn TextField) {
        self.composer.finish_composing(field, true);
        self.decoder.reset();
        self.selection.clear();
    }
}
