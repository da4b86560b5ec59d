//! Speech and notification sink.

use crate::action::{EditAction, HostAction};
use crate::config::{KeyboardEcho, KeyboardFeedback};
use crate::layout::LayoutKind;
use crate::translate::BrailleType;
use serde::Serialize;
use std::fmt;

/// Something to read to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// Text from the field: a read, a movement target or a typed delta.
    Text(String),
    Deleted(String),
    Blank,
    StartOfText,
    EndOfText,
    NothingToDelete,
    SwipeToConfirm,
    /// A host action waiting for its confirming repeat.
    ConfirmHost(HostAction),
    UnknownCharacter,
    Feedback(KeyboardFeedback),
    Echo(KeyboardEcho),
    BrailleType(BrailleType),
    AutoCaps(bool),
    Counts {
        lines: usize,
        words: usize,
        characters: usize,
    },
    LayoutReady(LayoutKind),
    PlaceNextThree,
    CalibrationFailed,
    MarkSet,
    MarkCleared,
    MarkNotSet,
    SelectedAll,
    /// The edit action now selected.
    EditAction(EditAction),
    /// Result of a clipboard action run by the host.
    Clipboard { action: EditAction, ok: bool },
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Announcement::Text(text) => write!(f, "{text}"),
            Announcement::Deleted(text) => write!(f, "{text} deleted"),
            Announcement::Blank => write!(f, "blank"),
            Announcement::StartOfText => write!(f, "start of text"),
            Announcement::EndOfText => write!(f, "end of text"),
            Announcement::NothingToDelete => write!(f, "nothing to delete"),
            Announcement::SwipeToConfirm => write!(f, "swipe again to confirm"),
            Announcement::ConfirmHost(action) => write!(f, "swipe again to confirm {action}"),
            Announcement::UnknownCharacter => write!(f, "unknown character"),
            Announcement::Feedback(mode) => write!(f, "keyboard feedback {mode}"),
            Announcement::Echo(mode) => write!(f, "echo {mode}"),
            Announcement::BrailleType(BrailleType::Computer) => write!(f, "computer braille"),
            Announcement::BrailleType(BrailleType::Literary) => write!(f, "literary braille"),
            Announcement::AutoCaps(true) => write!(f, "auto capitalization enabled"),
            Announcement::AutoCaps(false) => write!(f, "auto capitalization disabled"),
            Announcement::Counts {
                lines,
                words,
                characters,
            } => write!(f, "{lines} lines, {words} words, {characters} characters"),
            Announcement::LayoutReady(kind) => write!(f, "{kind} keyboard"),
            Announcement::PlaceNextThree => write!(f, "place next three fingers"),
            Announcement::CalibrationFailed => write!(f, "keyboard calibration failed"),
            Announcement::MarkSet => write!(f, "mark set"),
            Announcement::MarkCleared => write!(f, "mark cleared"),
            Announcement::MarkNotSet => write!(f, "mark not set"),
            Announcement::SelectedAll => write!(f, "selected all"),
            Announcement::EditAction(EditAction::SelectAll) => write!(f, "select all"),
            Announcement::EditAction(EditAction::Speak) => write!(f, "speak selection"),
            Announcement::EditAction(EditAction::Delete) => write!(f, "delete selection"),
            Announcement::EditAction(action) => write!(f, "{action}"),
            Announcement::Clipboard { action, ok: true } => match action {
                EditAction::Copy => write!(f, "copied"),
                EditAction::Paste => write!(f, "pasted"),
                _ => write!(f, "{action}"),
            },
            Announcement::Clipboard { action, ok: false } => write!(f, "{action} failed"),
        }
    }
}

/// Output collaborator for one session.
pub trait Feedback {
    /// `secure` is set when the text comes from a password field.
    fn announce(&mut self, announcement: &Announcement, secure: bool);

    fn notify(&mut self, vibrate: bool, sound: bool);

    fn host_action(&mut self, _action: HostAction, _fast_double: bool) {}

    /// Runs copy, cut or paste on the field's current selection. Returns
    /// whether the host managed it.
    fn clipboard(&mut self, _action: EditAction) -> bool {
        false
    }

    /// Whether the clipboard holds text worth offering paste for.
    fn can_paste(&self) -> bool {
        false
    }
}

/// Recorded feedback, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedbackEvent {
    Announce { text: String, secure: bool },
    Notify { vibrate: bool, sound: bool },
    Host { action: HostAction, fast_double: bool },
    Clipboard { action: EditAction },
}

/// Feedback sink that keeps everything it receives.
#[derive(Debug, Clone, Default)]
pub struct FeedbackLog {
    events: Vec<FeedbackEvent>,
    clipboard: bool,
}

impl FeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log whose clipboard actions succeed and which offers paste.
    pub fn with_clipboard() -> Self {
        Self {
            clipboard: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[FeedbackEvent] {
        &self.events
    }

    /// Announced texts only.
    pub fn announcements(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                FeedbackEvent::Announce { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_announcement(&self) -> Option<&str> {
        self.announcements().last().copied()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Feedback for FeedbackLog {
    fn announce(&mut self, announcement: &Announcement, secure: bool) {
        self.events.push(FeedbackEvent::Announce {
            text: announcement.to_string(),
            secure,
        });
    }

    fn notify(&mut self, vibrate: bool, sound: bool) {
        self.events.push(FeedbackEvent::Notify { vibrate, sound });
    }

    fn host_action(&mut self, action: HostAction, fast_double: bool) {
        self.events.push(FeedbackEvent::Host { action, fast_double });
    }

    fn clipboard(&mut self, action: EditAction) -> bool {
        self.events.push(FeedbackEvent::Clipboard { action });
        self.clipboard
    }

    fn can_paste(&self) -> bool {
        self.clipboard
    }
}
