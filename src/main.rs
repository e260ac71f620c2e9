use log::{LevelFilter, error};

use multirun::run_main;

fn main() {
    if let Err(e) = run_main() {
        // Failures before logging starts still need to reach the user
        if log::max_level() == LevelFilter::Off {
            eprintln!("error: {e}");
        } else {
            error!("{e}");
        }
        std::process::exit(1);
    }
}
