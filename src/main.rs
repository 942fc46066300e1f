use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use game_tracker_lib::cli::Cli;
use game_tracker_lib::utils::logs::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    if let Err(e) = game_tracker_lib::run(cli).await {
        log::error!("{}", e);
        eprintln!("{} {}", "Error:".if_supports_color(Stderr, |t| t.red()), e);
        std::process::exit(1);
    }
}
