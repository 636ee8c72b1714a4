mod commands;
mod terminal;

use commands::{CommandLine, discover};
use hostsweep_core::Deadline;
use terminal::{logging, print};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet)?;
    print::banner(commands.quiet);

    let cfg = match commands.to_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            return Err(e);
        }
    };

    let deadline = Deadline::after(cfg.timeout);
    let interrupt = deadline.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received, stopping sweep");
            interrupt.cancel();
        }
    });

    discover::discover(commands.cidr, &cfg, &deadline).await
}
