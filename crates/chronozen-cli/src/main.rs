use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod logging;
mod shell;

#[derive(Parser)]
#[command(name = "chronozen", version, about = "ChronoZen: pomodoro, stopwatch and to-do list")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive timer
    Run {
        /// Resume a shared timer location, e.g. "#pomodoro/work/1200"
        location: Option<String>,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Pomodoro status and settings
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Session statistics
    Stats,
    /// User profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Ask the message generator for a congratulation
    Congrats {
        /// Name to congratulate (defaults to the stored name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Commands::Run { .. });
    let _log_guard = logging::init(interactive);

    let result = match cli.command {
        Commands::Run { location } => commands::run::run(location.as_deref()),
        Commands::Task { action } => commands::task::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Congrats { name } => commands::congrats::run(name.as_deref()),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "chronozen", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
