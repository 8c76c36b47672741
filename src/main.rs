// src/main.rs

use dagpipe::{cli, logging, run};

// Synchronous on purpose: `Pipeline::call` blocks until the run drains.
fn main() {
    if let Err(err) = run_main() {
        eprintln!("dagpipe error: {err:?}");
        std::process::exit(1);
    }
}

fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args)
}
