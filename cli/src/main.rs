mod commands;
mod output;
mod terminal;

use commands::{CommandLine, Commands, hosts, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let quiet: u8 = commands.quiet;

    logging::init_logging();
    print::banner(quiet);

    let result = match commands.command {
        Commands::Scan(args) => {
            print::header("starting scanner", quiet);
            scan::scan(args, quiet).await
        }
        Commands::Hosts { file } => {
            print::header("parsing host list", quiet);
            hosts::hosts(&file, quiet)
        }
    };

    print::end_of_program(quiet);
    result
}
