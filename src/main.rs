// src/main.rs

use hashwatch::cli::{self, Command};
use hashwatch::{logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("hashwatch error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    match args.command {
        Command::Start(start) => {
            logging::init_logging(start.log_level)?;
            run(start).await
        }
    }
}
