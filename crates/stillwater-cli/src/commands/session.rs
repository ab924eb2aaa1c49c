use stillwater_core::Technique;

use super::open_engine;

pub fn run(technique: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(technique) = Technique::from_str_opt(technique) else {
        return Err(format!(
            "unknown technique '{technique}' (try box_breathing, four_seven_eight, \
             coherent_breathing, grounding, body_scan)"
        )
        .into());
    };
    let mut engine = open_engine()?;
    engine.record_session(technique)?;
    println!(
        "session recorded ({} total, {} this week)",
        engine.stats().total_sessions,
        engine.sessions_this_week()
    );
    Ok(())
}
