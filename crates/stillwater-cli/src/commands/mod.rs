pub mod checkin;
pub mod config;
pub mod quote;
pub mod reminders;
pub mod reset;
pub mod session;
pub mod stats;

use stillwater_core::{StatisticsEngine, TieredRepository};

/// Open the production storage stack and load the stats engine.
pub fn open_engine() -> Result<StatisticsEngine, Box<dyn std::error::Error>> {
    Ok(StatisticsEngine::new(TieredRepository::open()?))
}
