use std::str::FromStr;

use console::style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config, flush_config_warnings};

/// Route info and below to stdout as plain command output,
/// warnings and errors to stderr with a level prefix.
pub fn init_logging() {
    let level = LevelFilter::from_str(config().log().level()).unwrap_or(LevelFilter::Info);
    console::set_colors_enabled(colors_enabled());
    console::set_colors_enabled_stderr(colors_enabled());

    let stdout = fern::Dispatch::new()
        .filter(|metadata| metadata.level() > Level::Warn)
        .format(|out, message, record| match record.level() {
            Level::Info => out.finish(format_args!("{message}")),
            level => out.finish(format_args!(
                "{} {message}",
                style(format!("[{}]", level.as_str().to_lowercase())).dim()
            )),
        })
        .chain(std::io::stdout());

    let stderr = fern::Dispatch::new()
        .filter(|metadata| metadata.level() <= Level::Warn)
        .format(|out, message, record| {
            let prefix = match record.level() {
                Level::Error => style("error:").red().bold(),
                _ => style("warning:").yellow().bold(),
            };
            out.finish(format_args!("{prefix} {message}"))
        })
        .chain(std::io::stderr());

    let result = fern::Dispatch::new()
        .level(level)
        .chain(stdout)
        .chain(stderr)
        .apply();

    // A logger may already be installed (e.g. tests); keep it
    if result.is_ok() {
        flush_config_warnings();
    }
}
