use super::ViewportArgs;
use crate::reports;
use braillepad::config::Config;
use braillepad::error::PadResult;
use braillepad::feedback::FeedbackLog;
use braillepad::layout::Viewport;
use braillepad::store::CalibrationStore;
use braillepad::text::MemoryTextField;
use braillepad::touch::{TouchEvent, TouchOutcome};
use braillepad::translate::UnicodeBraille;
use braillepad::InputSession;
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// JSON trace: `{"events": [...]}` with optional `viewport` and `text`.
    pub trace: PathBuf,

    /// Print every recorded feedback event as JSON instead of a table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Deserialize)]
struct Trace {
    #[serde(default)]
    viewport: Option<Viewport>,
    /// Initial field contents; the cursor starts at the end.
    #[serde(default)]
    text: String,
    events: Vec<TouchEvent>,
}

pub fn run(args: ReplayArgs, config: Config, store: Box<dyn CalibrationStore>) -> PadResult<()> {
    let content = fs::read_to_string(&args.trace)?;
    let trace: Trace = serde_json::from_str(&content)?;
    let viewport = trace.viewport.unwrap_or_else(|| args.viewport.viewport());
    info!(
        "Replaying {} events from {}",
        trace.events.len(),
        args.trace.display()
    );

    let mut field = MemoryTextField::with_text(&trace.text);
    let mut session = InputSession::new(
        &config,
        viewport,
        Box::new(UnicodeBraille),
        store,
        FeedbackLog::new(),
    )?;

    let mut outcomes = Vec::new();
    for event in trace.events {
        let outcome = session.handle_touch(&mut field, event);
        if outcome != TouchOutcome::Nothing {
            outcomes.push((event.time_ms(), outcome));
        }
    }
    session.finish_input(&mut field);

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.feedback().events())?);
    } else {
        reports::print_outcomes(&outcomes);
        reports::print_feedback(session.feedback().events());
    }
    println!("Text: {:?}", field.text());
    Ok(())
}
