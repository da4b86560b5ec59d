pub mod action;
pub mod composer;
pub mod config;
pub mod editing;
pub mod error;
pub mod feedback;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod selection;
pub mod selector;
pub mod session;
pub mod store;
pub mod text;
pub mod touch;
pub mod translate;

pub use error::{PadError, PadResult};
pub use session::InputSession;
