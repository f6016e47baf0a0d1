mod model;

pub use model::{App, GAIN_RANGE, InputMode, SPEED_RANGE};
