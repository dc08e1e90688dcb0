use marklink_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse_args();

    // Initialize logging as early as possible; never let it stop the run.
    if let Err(err) = logging::init_logging(cli.verbose, cli.log_file.as_deref()) {
        logging::init_logging_stderr(cli.verbose);
        tracing::warn!("falling back to stderr logging: {:#}", err);
    }

    if let Err(err) = cli.run() {
        eprintln!("marklink error: {:#}", err);
        std::process::exit(1);
    }
}
