use braillepad::config::{KeyboardType, PadSettings, PadStyle};
use braillepad::geometry::Point;
use braillepad::layout::{store_key, LayoutKind, Viewport};
use braillepad::selector::LayoutSelector;
use braillepad::store::{decode_keys, CalibrationStore, JsonFileStore, MemoryStore};
use rstest::rstest;
use tempfile::tempdir;

const LANDSCAPE: Viewport = Viewport {
    width: 800,
    height: 480,
    portrait: false,
};
const TABLET: Viewport = Viewport {
    width: 1920,
    height: 1080,
    portrait: false,
};

fn columns() -> Vec<Point> {
    vec![
        Point::new(520, 90),
        Point::new(300, 200),
        Point::new(510, 300),
        Point::new(290, 80),
        Point::new(530, 190),
        Point::new(280, 310),
    ]
}

fn row() -> Vec<Point> {
    [100, 250, 400, 550, 700, 850]
        .iter()
        .map(|&x| Point::new(x, 500))
        .collect()
}

fn selector(keyboard_type: KeyboardType) -> LayoutSelector {
    LayoutSelector::new(PadSettings {
        keyboard_type,
        ..PadSettings::default()
    })
}

fn sorted(points: impl IntoIterator<Item = Point>) -> Vec<(i32, i32)> {
    let mut pairs: Vec<(i32, i32)> = points.into_iter().map(|p| (p.x, p.y)).collect();
    pairs.sort();
    pairs
}

fn stored_points(store: &dyn CalibrationStore, key: &str, viewport: Viewport) -> Vec<(i32, i32)> {
    let entries = store.get(key).expect("entry should be stored");
    sorted(decode_keys(&entries, viewport.centre()).unwrap().iter().map(|k| k.position()))
}

// --- KIND DETECTION ---

#[test]
fn test_detect_kind() {
    let selector = selector(KeyboardType::Auto);
    assert_eq!(selector.detect_kind(&columns()), LayoutKind::Vertical);
    assert_eq!(selector.detect_kind(&row()), LayoutKind::Horizontal);
}

#[rstest]
#[case::auto_small(KeyboardType::Auto, LANDSCAPE, LayoutKind::Vertical)]
#[case::auto_large(KeyboardType::Auto, TABLET, LayoutKind::Horizontal)]
#[case::forced_vertical(KeyboardType::Vertical, TABLET, LayoutKind::Vertical)]
#[case::forced_horizontal(KeyboardType::Horizontal, LANDSCAPE, LayoutKind::Horizontal)]
fn test_default_kind(#[case] keyboard_type: KeyboardType, #[case] viewport: Viewport, #[case] expected: LayoutKind) {
    assert_eq!(selector(keyboard_type).default_kind(viewport), expected);
}

#[test]
fn test_calibration_kind_respects_fixed_type() {
    let fixed = selector(KeyboardType::Horizontal);
    assert_eq!(fixed.calibration_kind(&columns()), LayoutKind::Horizontal);

    let matching = LayoutSelector::new(PadSettings {
        keyboard_type: KeyboardType::Horizontal,
        auto_match: true,
        ..PadSettings::default()
    });
    assert_eq!(matching.calibration_kind(&columns()), LayoutKind::Vertical);
}

// --- PERSISTENCE ---

#[test]
fn test_select_persists_raw_points() {
    let mut store = MemoryStore::new();
    let layout = selector(KeyboardType::Auto)
        .select(&columns(), LANDSCAPE, &mut store)
        .unwrap();
    assert_eq!(layout.kind(), LayoutKind::Vertical);

    let key = store_key(LayoutKind::Vertical, false, false);
    assert_eq!(key, "keyboard_save_vertical_landscape");
    assert_eq!(stored_points(&store, &key, LANDSCAPE), sorted(columns()));
}

#[test]
fn test_failed_select_stores_nothing() {
    let mut store = MemoryStore::new();
    let mut points = columns();
    points.truncate(4);
    let result = selector(KeyboardType::Auto).select(&points, LANDSCAPE, &mut store);
    assert!(result.is_err());
    assert_eq!(store.keys().count(), 0);
}

#[test]
fn test_style_applies_after_persisting() {
    let mut store = MemoryStore::new();
    let selector = LayoutSelector::new(PadSettings {
        style: PadStyle::Slate,
        ..PadSettings::default()
    });
    let layout = selector.select(&columns(), LANDSCAPE, &mut store).unwrap();
    // Slate swaps the columns, so dot 1 is in the right column.
    assert!(layout.keys()[0].position().x < 400);

    let restored = selector.default_layout(LANDSCAPE, &mut store).unwrap();
    assert_eq!(restored.key_positions(), layout.key_positions());
}

#[test]
fn test_default_layout_restores_calibration() {
    let mut store = MemoryStore::new();
    let selector = selector(KeyboardType::Auto);
    let calibrated = selector.select(&columns(), LANDSCAPE, &mut store).unwrap();
    let restored = selector.default_layout(LANDSCAPE, &mut store).unwrap();
    assert_eq!(restored.key_positions(), calibrated.key_positions());
}

#[test]
fn test_default_layout_persists_defaults() {
    let mut store = MemoryStore::new();
    let layout = selector(KeyboardType::Auto)
        .default_layout(LANDSCAPE, &mut store)
        .unwrap();
    let key = store_key(LayoutKind::Vertical, false, false);
    assert_eq!(stored_points(&store, &key, LANDSCAPE), sorted(layout.key_positions()));
}

#[test]
fn test_corrupt_entry_falls_back_to_defaults() {
    let mut store = MemoryStore::new();
    let key = store_key(LayoutKind::Vertical, false, false);
    store
        .put(&key, ["1,2".to_string(), "x,y,z".to_string()].into_iter().collect())
        .unwrap();

    let layout = selector(KeyboardType::Auto)
        .default_layout(LANDSCAPE, &mut store)
        .unwrap();
    assert_eq!(layout.keys()[0].position(), Point::new(520, 80));
    // The bad entry is replaced by the rebuilt layout.
    assert_eq!(store.get(&key).unwrap().len(), 6);
}

#[test]
fn test_orientations_use_separate_entries() {
    let mut store = MemoryStore::new();
    let selector = selector(KeyboardType::Vertical);
    selector.default_layout(LANDSCAPE, &mut store).unwrap();
    selector
        .default_layout(Viewport::new(480, 800, true), &mut store)
        .unwrap();
    let keys: Vec<&str> = store.keys().collect();
    assert_eq!(
        keys,
        vec!["keyboard_save_vertical_landscape", "keyboard_save_vertical_portrait"]
    );
}

#[test]
fn test_json_store_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("calibration.json");
    let key = store_key(LayoutKind::Vertical, false, false);

    let calibrated = {
        let mut store = JsonFileStore::open(&path).unwrap();
        selector(KeyboardType::Auto)
            .select(&columns(), LANDSCAPE, &mut store)
            .unwrap()
    };
    assert!(path.exists());

    let mut reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get(&key).unwrap().len(), 6);
    let restored = selector(KeyboardType::Auto)
        .default_layout(LANDSCAPE, &mut reopened)
        .unwrap();
    assert_eq!(restored.key_positions(), calibrated.key_positions());
}

#[test]
fn test_json_store_rejects_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("calibration.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(JsonFileStore::open(&path).is_err());
}
