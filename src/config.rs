use crate::error::{PadError, PadResult};
use crate::geometry::Density;
use crate::translate::BrailleType;
use clap::{ArgAction, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::warn;

/// Which physical key arrangement to build when calibrating.
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
pub enum KeyboardType {
    #[default]
    Auto,
    Vertical,
    Horizontal,
}

/// Post-construction key reordering.
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
pub enum PadStyle {
    #[default]
    Normal,
    /// Columns swapped, as when writing with a slate and stylus.
    Slate,
    /// Top and bottom rows swapped.
    TopBottom,
}

/// What gets read back after typing. Bit 0 echoes characters, bit 1 words.
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
pub enum KeyboardEcho {
    None,
    #[default]
    Character,
    Word,
    All,
}

impl KeyboardEcho {
    pub const CHARACTER_BIT: u8 = 1;
    pub const WORD_BIT: u8 = 2;

    pub fn value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Character => 1,
            Self::Word => 2,
            Self::All => 3,
        }
    }

    pub fn echoes_characters(self) -> bool {
        self.value() & Self::CHARACTER_BIT != 0
    }

    pub fn echoes_words(self) -> bool {
        self.value() & Self::WORD_BIT != 0
    }

    /// Next setting in cycle order, wrapping to `None`.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Character,
            Self::Character => Self::Word,
            Self::Word => Self::All,
            Self::All => Self::None,
        }
    }
}

/// Non-speech feedback. Bit 0 vibrates, bit 1 plays a click.
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
pub enum KeyboardFeedback {
    None,
    Vibrate,
    Sound,
    #[default]
    All,
}

impl KeyboardFeedback {
    pub fn value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Vibrate => 1,
            Self::Sound => 2,
            Self::All => 3,
        }
    }

    pub fn vibrates(self) -> bool {
        self.value() & 1 != 0
    }

    pub fn sounds(self) -> bool {
        self.value() & 2 != 0
    }

    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Vibrate,
            Self::Vibrate => Self::Sound,
            Self::Sound => Self::All,
            Self::All => Self::None,
        }
    }
}

#[derive(Args, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[command(flatten)]
    #[serde(default)]
    pub pad: PadSettings,
    #[command(flatten)]
    #[serde(default)]
    pub input: InputSettings,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PadResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no layout can be built with.
    pub fn validate(&self) -> PadResult<()> {
        if self.pad.density.is_nan() || self.pad.density <= 0.0 {
            return Err(PadError::Config(format!("density must be positive, got {}", self.pad.density)));
        }
        if self.pad.swipe_sensitivity <= 0 {
            return Err(PadError::Config(format!(
                "swipe sensitivity must be positive, got {}",
                self.pad.swipe_sensitivity
            )));
        }
        if self.pad.eight_dots && self.input.braille_type.dots() < 8 {
            warn!("Eight-dot keys are only used with computer braille");
        }
        Ok(())
    }
}

/// Geometry and gesture settings for the touch pad.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PadSettings {
    /// Minimum travel (dp) before a touch counts as a swipe.
    #[arg(long, default_value_t = 40)]
    pub swipe_sensitivity: i32,

    /// Pixels per dp on the target display.
    #[arg(long, default_value_t = 1.0)]
    pub density: f32,

    #[arg(long, value_enum, default_value_t = KeyboardType::Auto)]
    pub keyboard_type: KeyboardType,

    /// Detect vertical vs horizontal from calibration touches even when a
    /// type is set.
    #[arg(long, default_value_t = false)]
    pub auto_match: bool,

    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Add keys for dots 7 and 8.
    #[arg(long, default_value_t = false)]
    pub eight_dots: bool,

    #[arg(long, value_enum, default_value_t = PadStyle::Normal)]
    pub style: PadStyle,

    /// A single long press starts voice input.
    #[arg(long, default_value_t = false)]
    pub voice_shortcut: bool,
}

impl PadSettings {
    pub fn density(&self) -> Density {
        Density(self.density)
    }
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            swipe_sensitivity: 40,
            density: 1.0,
            keyboard_type: KeyboardType::Auto,
            auto_match: false,
            invert: false,
            eight_dots: false,
            style: PadStyle::Normal,
            voice_shortcut: false,
        }
    }
}

/// Text composition and feedback preferences.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub auto_caps: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub double_space_period: bool,

    /// Use the host's composing region instead of committing per character.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub predictive: bool,

    #[arg(long, value_enum, default_value_t = KeyboardEcho::Character)]
    pub echo: KeyboardEcho,

    #[arg(long, value_enum, default_value_t = KeyboardFeedback::All)]
    pub feedback: KeyboardFeedback,

    #[arg(long, value_enum, default_value_t = BrailleType::Literary)]
    pub braille_type: BrailleType,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            auto_caps: true,
            double_space_period: true,
            predictive: true,
            echo: KeyboardEcho::Character,
            feedback: KeyboardFeedback::All,
            braille_type: BrailleType::Literary,
        }
    }
}
