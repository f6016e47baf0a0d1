//! Settings for the library, the position poller, the decks and the UI.
//!
//! Values are layered from `DUODECK__*` environment variables, an optional
//! TOML file and struct defaults; see [`Settings::load`].

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;
