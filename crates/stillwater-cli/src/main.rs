use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stillwater-cli", version, about = "Stillwater CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's mood check-in
    Checkin {
        /// Mood on the calm(0.0)..anxious(1.0) scale
        value: f64,
    },
    /// Record a completed relief session
    Session {
        /// Technique identifier (e.g. "box_breathing", "grounding")
        technique: String,
    },
    /// Engagement statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Daily quote lookup
    Quote {
        /// Date to look up (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Reminder window management
    Reminders {
        #[command(subcommand)]
        action: commands::reminders::RemindersAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Wipe all recorded stats
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Checkin { value } => commands::checkin::run(value),
        Commands::Session { technique } => commands::session::run(&technique),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Quote { date } => commands::quote::run(date.as_deref()),
        Commands::Reminders { action } => commands::reminders::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
