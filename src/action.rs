//! What each gesture means to the editor.

use crate::editing::Granularity;
use crate::gesture::Gesture;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Platform concerns the session hands back to its host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HostAction {
    TogglePrivacy,
    InputSwitcher,
    Settings,
    TogglePasswordEcho,
    SwitchTable,
    VoiceInput,
    Shrink,
    SpellCheckLeft,
    SpellCheckRight,
    NextSuggestion,
    PreviousSuggestion,
}

impl HostAction {
    /// Actions that only run on a fast double; a single swipe asks the user
    /// to repeat it.
    pub fn needs_confirmation(self) -> bool {
        matches!(self, HostAction::InputSwitcher | HostAction::Settings)
    }
}

/// What the edit gesture does to the marked region. The clipboard actions
/// are carried out by the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    SelectAll,
    Copy,
    Cut,
    Paste,
    Speak,
    Delete,
}

impl EditAction {
    /// The following action, wrapping around. Paste is skipped while the
    /// clipboard is empty.
    pub fn next(self, can_paste: bool) -> Self {
        let next = match self {
            EditAction::SelectAll => EditAction::Copy,
            EditAction::Copy => EditAction::Cut,
            EditAction::Cut => EditAction::Paste,
            EditAction::Paste => EditAction::Speak,
            EditAction::Speak => EditAction::Delete,
            EditAction::Delete => EditAction::SelectAll,
        };
        if next == EditAction::Paste && !can_paste {
            EditAction::Speak
        } else {
            next
        }
    }

    pub fn uses_clipboard(self) -> bool {
        matches!(self, EditAction::Copy | EditAction::Cut | EditAction::Paste)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    None,
    MoveLeft(Granularity),
    MoveRight(Granularity),
    Read(Granularity),
    Backspace(Granularity),
    Space,
    NewLine,
    CycleFeedback,
    CycleEcho,
    SwitchBrailleType,
    ToggleAutoCaps,
    AnnounceCounts,
    LatchDot7,
    LatchDot8,
    ToggleMark,
    NextEditAction,
    PerformEditAction,
    Host(HostAction),
}

impl Action {
    pub fn from_gesture(gesture: Gesture) -> Action {
        use Granularity::*;
        match gesture.normalized() {
            Gesture::None => Action::None,

            Gesture::OneLeft => Action::MoveLeft(Character),
            Gesture::OneRight => Action::MoveRight(Character),
            Gesture::OneDown => Action::CycleFeedback,
            Gesture::OneUp => Action::Read(Character),

            Gesture::TwoLeft => Action::MoveLeft(Word),
            Gesture::TwoRight => Action::MoveRight(Word),
            Gesture::TwoDown => Action::CycleEcho,
            Gesture::TwoUp => Action::Read(Word),

            Gesture::ThreeLeft => Action::MoveLeft(Line),
            Gesture::ThreeRight => Action::MoveRight(Line),
            Gesture::ThreeDown => Action::LatchDot7,
            Gesture::ThreeUp => Action::Read(Line),

            Gesture::FourLeft => Action::Backspace(Character),
            Gesture::FourRight | Gesture::FiveRight => Action::Space,
            Gesture::FourDown => Action::NewLine,
            Gesture::FourUp => Action::Host(HostAction::TogglePrivacy),

            Gesture::FiveLeft => Action::Backspace(Word),
            Gesture::FiveDown => Action::Host(HostAction::InputSwitcher),
            Gesture::FiveUp => Action::Host(HostAction::Settings),

            Gesture::SixLeft => Action::Backspace(Line),
            Gesture::SixRight => Action::NextEditAction,
            Gesture::SixDown => Action::LatchDot8,
            Gesture::SixUp => Action::PerformEditAction,

            Gesture::HoldSixLeft => Action::MoveLeft(All),
            Gesture::HoldSixRight => Action::MoveRight(All),
            Gesture::HoldSixDown => Action::Host(HostAction::TogglePasswordEcho),
            Gesture::HoldSixUp => Action::Read(All),

            Gesture::HoldThreeLeft => Action::Backspace(All),
            Gesture::HoldThreeRight => Action::SwitchBrailleType,
            Gesture::HoldThreeDown => Action::Host(HostAction::SwitchTable),
            Gesture::HoldThreeUp => Action::Host(HostAction::VoiceInput),

            Gesture::HoldOneLeft => Action::Host(HostAction::Shrink),
            Gesture::HoldOneRight => Action::ToggleMark,
            Gesture::HoldOneDown => Action::AnnounceCounts,
            Gesture::HoldOneUp => Action::ToggleAutoCaps,

            Gesture::HoldFourLeft => Action::Host(HostAction::SpellCheckLeft),
            Gesture::HoldFourRight => Action::Host(HostAction::SpellCheckRight),
            Gesture::HoldFourDown => Action::Host(HostAction::NextSuggestion),
            Gesture::HoldFourUp => Action::Host(HostAction::PreviousSuggestion),
        }
    }

    /// Line and whole-text deletion must be repeated quickly to run.
    pub fn needs_confirmation(self) -> bool {
        match self {
            Action::Backspace(granularity) => matches!(granularity, Granularity::Line | Granularity::All),
            Action::Host(host) => host.needs_confirmation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_gesture_but_none_has_an_action() {
        for gesture in Gesture::iter().filter(|g| *g != Gesture::None) {
            assert_ne!(Action::from_gesture(gesture), Action::None, "{gesture}");
        }
    }

    #[test]
    fn test_edit_cycle_wraps() {
        let mut action = EditAction::SelectAll;
        let mut seen = Vec::new();
        for _ in 0..6 {
            action = action.next(true);
            seen.push(action);
        }
        assert_eq!(action, EditAction::SelectAll);
        assert_eq!(seen.len(), EditAction::iter().count());
    }

    #[test]
    fn test_edit_cycle_skips_empty_paste() {
        assert_eq!(EditAction::Cut.next(false), EditAction::Speak);
        assert_eq!(EditAction::Cut.next(true), EditAction::Paste);
    }

    #[test]
    fn test_five_right_is_space() {
        assert_eq!(Action::from_gesture(Gesture::FiveRight), Action::Space);
    }
}
