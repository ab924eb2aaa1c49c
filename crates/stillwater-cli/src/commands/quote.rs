use chrono::{Local, NaiveDate};
use stillwater_core::quote_for_date;

pub fn run(date: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
        None => Local::now().date_naive(),
    };
    let quote = quote_for_date(date);
    println!("[{}] {}", quote.category, quote.text);
    Ok(())
}
