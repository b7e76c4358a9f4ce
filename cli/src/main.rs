mod commands;
mod terminal;

use commands::{CommandLine, sweep};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = commands.to_config();
    let target = commands.target()?;

    print::header("getting ready for sweep");
    sweep::sweep(target, &cfg).await
}
