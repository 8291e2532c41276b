use clap::Parser;
use std::process;
use ulsdk::cli::{Cli, CommandHandler};
use ulsdk::infrastructure::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = CommandHandler::from_cli(&cli).and_then(|mut handler| handler.run(&cli.run_request()));

    match result {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => {
            eprint!("{}", e.user_message());
            process::exit(1);
        }
    }
}
