pub mod config;
pub mod params;

pub use config::AppConfig;
pub use params::{ParamSet, ParamUpdate};
