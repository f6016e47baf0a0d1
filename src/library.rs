//! Track library: the known tracks, a search view over them and the file
//! that keeps them between sessions.

mod catalog;
pub mod import;
mod model;
mod store;

pub use catalog::{Outcome, Selection, TrackLibrary};
pub use model::{Track, normalize};
pub use store::LibraryStore;
