use std::sync::Arc;

use chrono::{DateTime, Duration, Local};
use clap::Subcommand;
use stillwater_core::reminders::QUOTE_WINDOW_DAYS;
use stillwater_core::{
    quote_for_date, AppConfig, Notifier, ReminderScheduler, SchedulingError,
};

use super::open_engine;

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Print the reminder window without scheduling anything
    Plan,
    /// Run a maintenance pass against the printing notifier
    Refresh,
}

/// Stand-in delivery collaborator: prints what an OS shell would schedule.
struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn permission_granted(&self) -> bool {
        true
    }

    fn cancel(&self, _id: &str) -> Result<(), SchedulingError> {
        Ok(())
    }

    fn cancel_all(&self, _ids: &[String]) -> Result<(), SchedulingError> {
        Ok(())
    }

    fn schedule_recurring_daily(
        &self,
        id: &str,
        hour: u32,
        minute: u32,
        title: &str,
        _body: &str,
    ) -> Result<(), SchedulingError> {
        println!("{id}: daily at {hour:02}:{minute:02} -- {title}");
        Ok(())
    }

    fn schedule_one_shot(
        &self,
        id: &str,
        fire_at: DateTime<Local>,
        _title: &str,
        body: &str,
    ) -> Result<(), SchedulingError> {
        println!("{id}: {} -- {body}", fire_at.format("%Y-%m-%d %H:%M"));
        Ok(())
    }

    fn count_pending(&self, _prefix: &str) -> usize {
        0
    }
}

pub fn run(action: RemindersAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    match action {
        RemindersAction::Plan => {
            let today = Local::now().date_naive();
            for offset in 0..QUOTE_WINDOW_DAYS {
                let date = today + Duration::days(offset as i64);
                let quote = quote_for_date(date);
                println!("{date}  [{}] {}", quote.category, quote.text);
            }
        }
        RemindersAction::Refresh => {
            let engine = open_engine()?;
            let scheduler = ReminderScheduler::new(Arc::new(PrintNotifier), config.reminders);
            let scheduled = scheduler.refresh_quote_window();
            let checkin = scheduler.schedule_checkin(&engine);
            println!("scheduled {scheduled} quote reminder(s), check-in: {checkin}");
        }
    }
    Ok(())
}
