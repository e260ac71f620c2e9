use crate::types::AppResult;

pub mod config;
pub mod metrics;
pub mod results;

pub enum PrintCommand {
    Metrics(String),
    Config(String),
    Results { input: Option<String>, format: String },
}

pub fn execute_print(command: PrintCommand) -> AppResult<()> {
    match command {
        PrintCommand::Metrics(format) => metrics::execute(&format),
        PrintCommand::Config(format) => config::execute(&format),
        PrintCommand::Results { input, format } => results::execute(input.as_deref(), &format),
    }
}
