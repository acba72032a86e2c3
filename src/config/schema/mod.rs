mod core;
mod gateway;
mod history;

pub use self::core::Config;
pub use gateway::GatewayConfig;
pub use history::{HistoryBackend, HistoryConfig};
