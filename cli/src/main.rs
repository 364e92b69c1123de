mod commands;
mod terminal;

use commands::CommandLine;
use macshift_common::config::Config;
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() {
    let commands = CommandLine::parse_args();

    let cfg = Config::from(&commands);

    logging::init_logging(cfg.verbosity);
    print::banner(cfg.no_banner);

    let result = commands::run(&commands, &cfg).await;
    if let Err(e) = &result {
        error!("{e:#}");
    }
    print::end_of_program();

    if result.is_err() {
        std::process::exit(1);
    }
}
