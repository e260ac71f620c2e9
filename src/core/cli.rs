use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    /// Experiment paths in the output are also relative to it.
    #[arg(long, global = true)]
    pub cwd: Option<String>,

    /// Logging level (overrides config). One of: trace, debug, info, warn, error.
    /// Command summaries are logged at info, so "warn" and "error" hide them
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example multirun.toml in the current directory
    Init,

    /// Aggregate repeated runs into structured results and a report
    Aggregate(AggregateArgs),

    /// Print various information about metrics, config, and results
    Print {
        #[command(subcommand)]
        command: PrintArgs,
    },
}

/// Arguments for the aggregate command
#[derive(Parser, Debug)]
pub struct AggregateArgs {
    /// Aggregate a single experiment directory (one containing run_<n> directories)
    #[arg(long, conflicts_with = "results_root")]
    pub experiment: Option<String>,

    /// Aggregate every experiment found under this directory.
    /// Replaces config [paths].results_root if provided.
    #[arg(long = "results-root")]
    pub results_root: Option<String>,

    /// Where to write the structured results.
    /// Replaces config [paths].output_json if provided.
    #[arg(long = "output-json")]
    pub output_json: Option<String>,

    /// Where to write the text report.
    /// Replaces config [paths].output_report if provided.
    #[arg(long = "output-report")]
    pub output_report: Option<String>,

    /// Summary format: "table" (default) or "json".
    /// The table is logged at info level; json is always printed to stdout
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the print command
#[derive(Subcommand, Debug)]
pub enum PrintArgs {
    /// List the extracted metrics with their source fields and defaults
    Metrics(PrintFormatArgs),

    /// Print the effective configuration
    Config(PrintFormatArgs),

    /// Summarize a previously written structured results file
    Results(PrintResultsArgs),
}

/// Arguments for print subcommands that only take a format
#[derive(Parser, Debug)]
pub struct PrintFormatArgs {
    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the print results subcommand
#[derive(Parser, Debug)]
pub struct PrintResultsArgs {
    /// Structured results file. Defaults to config [paths].output_json
    #[arg(long)]
    pub input: Option<String>,

    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}
