use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "sleeplog")]
#[command(about = "Track sleep sessions and see how rested you are")]
#[command(long_about = "sleeplog - a sleep journal for the terminal

Record when you fall asleep and wake up, log naps, and see how long you
have been awake along with your rolling weekly sleep averages.

QUICK START:
  sleeplog sleep            Start a sleep now
  sleeplog wake             End it and store the session
  sleeplog nap -d 25m       Log a 25 minute nap that just ended
  sleeplog status           Awake time, last sleep, weekly averages

TIMES:
  now, 23:30, 7am, 6:45pm, yesterday 23:10, 2024-03-01 22:45,
  or a full RFC 3339 timestamp. Bare times are read in local time.

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  sleeplog <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output, or 'json' for
    /// machine-readable output suitable for scripting. Defaults to the
    /// `general.default_output` config value.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a sleep
    ///
    /// Opens a sleep interval. Only one sleep can be open at a time; run
    /// 'sleeplog wake' to close it.
    ///
    /// # Examples
    ///
    ///   sleeplog sleep              Start now
    ///   sleeplog sleep --at 23:15   Fell asleep at 23:15
    #[command(alias = "s")]
    Sleep(SleepArgs),

    /// End the open sleep and store it
    ///
    /// Closes the interval started with 'sleeplog sleep'. Pass --nap to
    /// store it as a nap instead of a night's sleep.
    ///
    /// # Examples
    ///
    ///   sleeplog wake
    ///   sleeplog wake --at 06:50
    ///   sleeplog wake --nap
    #[command(alias = "w")]
    Wake(WakeArgs),

    /// Log a nap that already happened
    ///
    /// # Examples
    ///
    ///   sleeplog nap --duration 20m
    ///   sleeplog nap -d 1h15m --end 15:30
    #[command(alias = "n")]
    Nap(NapArgs),

    /// Add a finished session by hand
    ///
    /// # Examples
    ///
    ///   sleeplog log --start "yesterday 23:30" --end 07:10
    ///   sleeplog log --start 13:00 --end 13:40 --nap
    Log(LogArgs),

    /// Show awake time, last sleep, and weekly averages
    ///
    /// # Examples
    ///
    ///   sleeplog status
    ///   sleeplog status -o json
    #[command(alias = "st")]
    Status,

    /// List recent sessions, newest first
    ///
    /// # Examples
    ///
    ///   sleeplog history
    ///   sleeplog history -n 5
    #[command(alias = "h")]
    History(HistoryArgs),

    /// Show 1, 2, and 3-week average nightly sleep
    ///
    /// Naps are not counted.
    Averages,

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   sleeplog completions bash > ~/.local/share/bash-completion/completions/sleeplog
    ///   sleeplog completions zsh > ~/.zsh/completions/_sleeplog
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for starting a sleep.
#[derive(Args)]
pub struct SleepArgs {
    /// When the sleep started (default: now)
    #[arg(long)]
    pub at: Option<String>,
}

/// Arguments for ending a sleep.
#[derive(Args)]
pub struct WakeArgs {
    /// When the sleep ended (default: now)
    #[arg(long)]
    pub at: Option<String>,

    /// Store the session as a nap
    #[arg(long)]
    pub nap: bool,
}

/// Arguments for logging a nap.
#[derive(Args)]
pub struct NapArgs {
    /// How long the nap lasted (e.g. 20m, 1h30m, 45)
    #[arg(short, long)]
    pub duration: String,

    /// When the nap ended (default: now)
    #[arg(short, long)]
    pub end: Option<String>,
}

/// Arguments for a manual session entry.
#[derive(Args)]
pub struct LogArgs {
    /// When the sleep started
    #[arg(long)]
    pub start: String,

    /// When the sleep ended
    #[arg(long)]
    pub end: String,

    /// Store the session as a nap
    #[arg(long)]
    pub nap: bool,
}

/// Arguments for the history listing.
#[derive(Args)]
pub struct HistoryArgs {
    /// Number of sessions to show (default: `display.history_limit`)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
