use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use habitroom_core::HabitId;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "habitroom-cli", version, about = "Habitroom CLI")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Habits scheduled for a day, with progress and streaks
    Today {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Record daily check-ins
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Current streak of a habit
    Streak {
        /// Habit ID
        id: HabitId,
        /// Reference day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Reminder planning and delivery
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Today { date } => commands::today::run(date),
        Commands::Entry { action } => commands::entry::run(action),
        Commands::Streak { id, date } => commands::streak::run(id, date),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
