use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stint",
    about = "Cycle-time statistics for Jira sprints from the terminal",
    long_about = None,
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Jira board to scan for sprints.
    #[arg(short, long)]
    board: u64,
    /// Regex selecting sprints by name, e.g. '^Platform Sprint \d+$'.
    #[arg(short = 'p', long)]
    sprint_pattern: String,
    /// Workflow status whose dwell time is measured. Repeatable.
    /// Defaults to "In Development", "In Review" and "In Testing".
    #[arg(long = "tracked-status", value_name = "NAME")]
    tracked_statuses: Vec<String>,
    /// A story is inflated when its tracked days exceed estimate times
    /// this multiplier.
    #[arg(long, default_value_t = 10.0)]
    inflation_multiplier: f64,
    /// Append a report of inflated stories.
    #[arg(long)]
    show_inflated: bool,
    /// Leave inflated stories out of the group statistics.
    #[arg(long)]
    exclude_inflated: bool,
    /// Output the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute cycle-time statistics for sprints matching a pattern.
    Report(ReportArgs),

    /// List the sprints on a board that a pattern selects.
    Sprints {
        #[arg(short, long)]
        board: u64,
        #[arg(short = 'p', long)]
        sprint_pattern: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report(args) => {
            stint::commands::report::run(
                args.board,
                args.sprint_pattern,
                args.tracked_statuses,
                args.inflation_multiplier,
                args.show_inflated,
                args.exclude_inflated,
                args.json,
            )
            .await
        }
        Commands::Sprints {
            board,
            sprint_pattern,
        } => stint::commands::sprints::run(board, sprint_pattern).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
