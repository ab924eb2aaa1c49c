use clap::Subcommand;
use stillwater_core::AppConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Set a config value
    Set {
        /// Config key (enabled, checkin_time, quote_time)
        key: String,
        /// New value ("true"/"false" or "HH:MM")
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = AppConfig::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = AppConfig::load()?;
            match key.as_str() {
                "enabled" => config.reminders.enabled = value.parse()?,
                "checkin_time" => {
                    let (hour, minute) = parse_time(&value)?;
                    config.reminders.checkin_hour = hour;
                    config.reminders.checkin_minute = minute;
                }
                "quote_time" => {
                    let (hour, minute) = parse_time(&value)?;
                    config.reminders.quote_hour = hour;
                    config.reminders.quote_minute = minute;
                }
                other => return Err(format!("unknown config key '{other}'").into()),
            }
            config.save()?;
            println!("{key} updated");
        }
    }
    Ok(())
}

fn parse_time(raw: &str) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let (hour, minute) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{raw}'"))?;
    let hour: u32 = hour.parse()?;
    let minute: u32 = minute.parse()?;
    if hour > 23 || minute > 59 {
        return Err(format!("time out of range: '{raw}'").into());
    }
    Ok((hour, minute))
}
