pub mod config;
pub mod model;
pub mod urls;

pub use config::{AppConfig, EndpointsConfig, OutputConfig};
pub use model::{ProfileState, TrackSnapshot};
