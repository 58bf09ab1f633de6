use clap::Parser;

use crate::cli::HarnessCli;

/// Initialise logging and parse the command line for a scenario binary.
pub fn init() -> HarnessCli {
    env_logger::init();

    HarnessCli::parse()
}
