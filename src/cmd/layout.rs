use super::ViewportArgs;
use crate::reports;
use braillepad::config::Config;
use braillepad::error::PadResult;
use braillepad::selector::LayoutSelector;
use braillepad::store::CalibrationStore;
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub viewport: ViewportArgs,
}

pub fn run(args: LayoutArgs, config: Config, mut store: Box<dyn CalibrationStore>) -> PadResult<()> {
    let viewport = args.viewport.viewport();
    info!("Selecting layout for {}x{}", viewport.width, viewport.height);

    let selector = LayoutSelector::new(config.pad);
    let layout = selector.default_layout(viewport, store.as_mut())?;
    reports::print_layout(&layout);
    Ok(())
}
