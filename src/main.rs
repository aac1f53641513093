use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use colored::Colorize;

use sleeplog::cli::args::{Cli, Commands, OutputFormat};
use sleeplog::cli::commands;
use sleeplog::config::Config;
use sleeplog::error::SleeplogError;
use sleeplog::logging;
use sleeplog::storage::SleepJournal;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {e:#}", "error".red().bold());

        let rejected_input = e
            .downcast_ref::<SleeplogError>()
            .is_some_and(SleeplogError::is_validation);
        if !rejected_input {
            eprintln!("{}", "Run again with --verbose for details.".dimmed());
        }

        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    logging::init(&config.general.log_level, cli.verbose)?;
    config.general.color.apply();

    let format = cli.output.unwrap_or(config.general.default_output);

    // Completions never touch the journal.
    let output = if let Commands::Completions { shell } = cli.command {
        commands::completions(shell)?
    } else {
        let mut journal = SleepJournal::new()?;
        dispatch(
            cli.command,
            &mut journal,
            Utc::now(),
            config.display.history_limit,
            format,
        )?
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn dispatch(
    command: Commands,
    journal: &mut SleepJournal,
    now: DateTime<Utc>,
    history_limit: usize,
    format: OutputFormat,
) -> Result<String> {
    let output = match command {
        Commands::Sleep(args) => commands::sleep(journal, &args, now, format)?,
        Commands::Wake(args) => commands::wake(journal, &args, now, format)?,
        Commands::Nap(args) => commands::nap(journal, &args, now, format)?,
        Commands::Log(args) => commands::log(journal, &args, now, format)?,
        Commands::Status => {
            let tracker = journal.tracker_state()?;
            commands::status(&*journal, tracker, now, history_limit, format)?
        }
        Commands::History(args) => commands::history(&*journal, &args, history_limit, format)?,
        Commands::Averages => commands::averages(&*journal, now, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };
    Ok(output)
}
