use crate::reports;
use braillepad::gesture::gesture_table;
use braillepad::layout::LayoutKind;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct GesturesArgs {
    /// Show gestures as seen on this layout kind.
    #[arg(long, default_value = "vertical")]
    pub kind: LayoutKind,

    /// Only list gestures whose name contains this text.
    #[arg(short, long)]
    pub filter: Option<String>,
}

pub fn run(args: GesturesArgs) {
    let mut rows: Vec<_> = gesture_table()
        .iter()
        .map(|(&code, &gesture)| (code, gesture.for_layout(args.kind)))
        .filter(|(_, gesture)| match &args.filter {
            Some(filter) => gesture.to_string().contains(&filter.to_lowercase()),
            None => true,
        })
        .collect();
    rows.sort_by_key(|&(code, _)| code);

    if rows.is_empty() {
        println!("No gestures found matching criteria.");
        return;
    }
    reports::print_gesture_table(&rows);
}
