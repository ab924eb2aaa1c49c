use super::open_engine;

pub fn run(value: f64) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("mood value must be in 0.0..=1.0, got {value}").into());
    }
    let mut engine = open_engine()?;
    engine.record_mood_value(value)?;
    println!(
        "checked in at {value:.2} (streak: {} day(s))",
        engine.stats().current_streak
    );
    Ok(())
}
