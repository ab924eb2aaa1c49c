use clap::Subcommand;
use serde::Serialize;

use super::open_engine;

#[derive(Subcommand)]
pub enum StatsAction {
    /// The full persisted aggregate
    All,
    /// Rolling 7-day summary
    Week,
}

#[derive(Serialize)]
struct WeekSummary {
    sessions_this_week: u32,
    average_mood_this_week: f64,
    current_streak: u32,
    longest_streak: u32,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;

    match action {
        StatsAction::All => {
            println!("{}", serde_json::to_string_pretty(engine.stats())?);
        }
        StatsAction::Week => {
            let summary = WeekSummary {
                sessions_this_week: engine.sessions_this_week(),
                average_mood_this_week: engine.average_mood_this_week(),
                current_streak: engine.current_streak(),
                longest_streak: engine.stats().longest_streak,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
