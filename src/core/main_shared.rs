use std::env;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use crate::core::cli::{Args, Commands, PrintArgs};
use crate::core::cmds;
use crate::core::logging::init_logging;
use crate::types::AppResult;
use crate::types::config::{CliOverrides, init_with_overrides};

pub fn run_main() -> AppResult<()> {
    let args = Args::parse();

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }

    // Build CLI overrides for config precedence
    let cli_overrides = CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
    };

    // Initialize configuration (file, then CLI overrides)
    init_with_overrides(&cli_overrides);

    // Initialize logging after config so level/color are applied
    init_logging();

    let cwd = env::current_dir()?;
    debug!("Current working directory: {}", cwd.display());

    // Dispatch to appropriate command
    match args.command {
        Commands::Init => cmds::execute_init(),
        Commands::Aggregate(aggregate_args) => cmds::execute_aggregate(aggregate_args),
        Commands::Print {
            command: print_args,
        } => {
            let command = match print_args {
                PrintArgs::Metrics(args) => cmds::print::PrintCommand::Metrics(args.format),
                PrintArgs::Config(args) => cmds::print::PrintCommand::Config(args.format),
                PrintArgs::Results(args) => cmds::print::PrintCommand::Results {
                    input: args.input,
                    format: args.format,
                },
            };
            cmds::execute_print(command)
        }
    }
}
