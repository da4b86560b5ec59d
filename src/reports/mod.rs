use braillepad::feedback::FeedbackEvent;
use braillepad::gesture::Gesture;
use braillepad::layout::KeyLayout;
use braillepad::touch::TouchOutcome;
use braillepad::translate::dot_numbers;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_layout(layout: &KeyLayout) {
    let viewport = layout.viewport();
    println!(
        "\nLayout: {} ({}x{}, {})",
        layout.layout_id(),
        viewport.width,
        viewport.height,
        if viewport.portrait { "portrait" } else { "landscape" }
    );

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Dot").add_attribute(Attribute::Bold),
        Cell::new("X"),
        Cell::new("Y"),
    ]);
    for (index, key) in layout.keys().iter().enumerate() {
        let position = key.position();
        table.add_row(vec![
            Cell::new(index + 1).fg(Color::Cyan),
            Cell::new(position.x).set_alignment(CellAlignment::Right),
            Cell::new(position.y).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
    println!("Swipe threshold: {}px", layout.swipe_threshold());
}

pub fn print_gesture_table(rows: &[(u32, Gesture)]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Code").add_attribute(Attribute::Bold),
        Cell::new("Octal"),
        Cell::new("Gesture"),
    ]);
    for (code, gesture) in rows {
        let name = Cell::new(gesture);
        let name = if gesture.is_hold() { name.fg(Color::Green) } else { name };
        table.add_row(vec![
            Cell::new(code).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:08o}", code)).set_alignment(CellAlignment::Right),
            name,
        ]);
    }
    println!("{}", table);
    println!("{} codes", rows.len());
}

pub fn print_outcomes(outcomes: &[(u64, TouchOutcome)]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Time").add_attribute(Attribute::Bold),
        Cell::new("Outcome"),
    ]);
    for (time, outcome) in outcomes {
        let text = match outcome {
            TouchOutcome::Nothing => "-".to_string(),
            TouchOutcome::Gesture(gesture) => gesture.to_string(),
            TouchOutcome::UnrecognizedSwipe => "unrecognized swipe".to_string(),
            TouchOutcome::Cell(cell) => format!("dots {}", dot_numbers(*cell)),
            TouchOutcome::Calibrate(points) => format!("calibrate ({} points)", points.len()),
            TouchOutcome::NextThree => "next three".to_string(),
            TouchOutcome::LongHold => "long hold".to_string(),
        };
        table.add_row(vec![
            Cell::new(time).set_alignment(CellAlignment::Right),
            Cell::new(text),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_feedback(events: &[FeedbackEvent]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Kind").add_attribute(Attribute::Bold),
        Cell::new("Detail"),
    ]);
    for event in events {
        let row = match event {
            FeedbackEvent::Announce { text, secure } => vec![
                Cell::new("speak").fg(Color::Cyan),
                Cell::new(if *secure { format!("{} (secure)", text) } else { text.clone() }),
            ],
            FeedbackEvent::Notify { vibrate, sound } => vec![
                Cell::new("notify"),
                Cell::new(format!("vibrate={} sound={}", vibrate, sound)),
            ],
            FeedbackEvent::Host { action, fast_double } => vec![
                Cell::new("host").fg(Color::Green),
                Cell::new(format!("{}{}", action, if *fast_double { " (double)" } else { "" })),
            ],
            FeedbackEvent::Clipboard { action } => vec![
                Cell::new("clipboard").fg(Color::Yellow),
                Cell::new(action),
            ],
        };
        table.add_row(row);
    }
    println!("\n{}", table);
}
