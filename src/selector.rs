use crate::config::{KeyboardType, PadSettings};
use crate::error::PadResult;
use crate::geometry::Point;
use crate::layout::{store_key, vertical, Key, KeyLayout, LayoutKind, LayoutOptions, Viewport};
use crate::store::{decode_keys, encode_keys, CalibrationStore};
use tracing::{info, warn};

/// Column tolerance (dp) when guessing the layout kind from touches.
pub const COLUMN_MATCH_DP: i32 = 120;
/// Diagonal (dp) above which the default layout is horizontal, about 6 in.
pub const MAX_SCREEN_DP: i32 = 160 * 6;

/// Chooses and builds layouts, persisting every successful construction.
#[derive(Debug, Clone)]
pub struct LayoutSelector {
    settings: PadSettings,
}

impl LayoutSelector {
    pub fn new(settings: PadSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PadSettings {
        &self.settings
    }

    fn options(&self) -> LayoutOptions {
        LayoutOptions::from_settings(&self.settings)
    }

    /// Vertical when the touches split three and three into two columns.
    pub fn detect_kind(&self, points: &[Point]) -> LayoutKind {
        let margin = self.settings.density().px(COLUMN_MATCH_DP);
        match vertical::column_counts(points, margin) {
            (3, 3) => LayoutKind::Vertical,
            _ => LayoutKind::Horizontal,
        }
    }

    /// Kind for a fresh calibration.
    pub fn calibration_kind(&self, points: &[Point]) -> LayoutKind {
        if self.settings.auto_match || self.settings.keyboard_type == KeyboardType::Auto {
            return self.detect_kind(points);
        }
        match self.settings.keyboard_type {
            KeyboardType::Horizontal => LayoutKind::Horizontal,
            _ => LayoutKind::Vertical,
        }
    }

    /// Kind used when no calibration gesture is available.
    pub fn default_kind(&self, viewport: Viewport) -> LayoutKind {
        let large_screen = viewport.diagonal() > self.settings.density().px(MAX_SCREEN_DP);
        match self.settings.keyboard_type {
            KeyboardType::Horizontal => LayoutKind::Horizontal,
            KeyboardType::Auto if large_screen => LayoutKind::Horizontal,
            _ => LayoutKind::Vertical,
        }
    }

    /// Builds a layout from six live calibration points.
    pub fn select(
        &self,
        points: &[Point],
        viewport: Viewport,
        store: &mut dyn CalibrationStore,
    ) -> PadResult<KeyLayout> {
        let kind = self.calibration_kind(points);
        let mut layout = KeyLayout::from_points(kind, points, viewport, self.options())?;
        self.persist(&layout, store);
        layout.apply_style(self.settings.style);
        Ok(layout)
    }

    /// Restores the stored layout for this orientation, or builds one from
    /// default spacing.
    pub fn default_layout(
        &self,
        viewport: Viewport,
        store: &mut dyn CalibrationStore,
    ) -> PadResult<KeyLayout> {
        let kind = self.default_kind(viewport);
        let mut layout = match self.load(kind, viewport, store) {
            Some(layout) => layout,
            None => KeyLayout::with_default_geometry(kind, viewport, self.options())?,
        };
        self.persist(&layout, store);
        layout.apply_style(self.settings.style);
        Ok(layout)
    }

    fn load(&self, kind: LayoutKind, viewport: Viewport, store: &dyn CalibrationStore) -> Option<KeyLayout> {
        let key = store_key(kind, viewport.portrait, self.settings.invert);
        let entries = store.get(&key)?;
        let keys: Vec<Key> = match decode_keys(&entries, viewport.centre()) {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Ignoring stored calibration '{}': {}", key, e);
                return None;
            }
        };
        match KeyLayout::new(kind, keys, viewport, self.options()) {
            Ok(layout) => {
                info!("Restored {} layout from '{}'", kind, key);
                Some(layout)
            }
            Err(e) => {
                warn!("Stored calibration '{}' is unusable: {}", key, e);
                None
            }
        }
    }

    fn persist(&self, layout: &KeyLayout, store: &mut dyn CalibrationStore) {
        let viewport = layout.viewport();
        let key = store_key(layout.kind(), viewport.portrait, layout.invert());
        let entries = encode_keys(layout.calibration(), viewport.centre());
        if let Err(e) = store.put(&key, entries) {
            warn!("Could not save calibration '{}': {}", key, e);
        }
    }
}
