pub mod load;
pub mod schema;

pub use load::{load_config, CliOverrides};
pub use schema::{AppConfig, PollingConfig, ServerConfig, TranscriptionConfig};
