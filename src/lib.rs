pub mod config;
pub mod dispatch;
pub mod eta;
pub mod geo;
pub mod logging;
pub mod report;
pub mod server;
pub mod stats;
pub mod zones;
