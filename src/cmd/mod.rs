pub mod gestures;
pub mod layout;
pub mod replay;

use braillepad::layout::Viewport;
use clap::Args;

/// Pad size in pixels.
#[derive(Args, Debug, Clone, Copy)]
pub struct ViewportArgs {
    #[arg(long, default_value_t = 1920)]
    pub width: i32,

    #[arg(long, default_value_t = 1080)]
    pub height: i32,

    #[arg(long, default_value_t = false)]
    pub portrait: bool,
}

impl ViewportArgs {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.portrait)
    }
}
