pub mod present;

pub use present::{fit_to_frame, fit_within, zoom};
