#![deny(unused_crate_dependencies)]
mod commands;
mod config;
mod errors;
mod setup;

use clock::SystemClock;
use config::Command;
use errors::Result;
use harness::alloc::CountingAllocator;
use setup::setup_logger;

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn main() -> Result<()> {
    setup_logger();

    match config::parse()? {
        Command::Generate(config) => {
            commands::generate(&config)?;
        }
        Command::Run(config) => {
            let written = commands::run(&config, &SystemClock)?;
            tracing::info!("benchmark run finished, {} results files written", written.len());
        }
        Command::Compare(files) => {
            print!("{}", commands::compare(&files)?);
        }
    }

    Ok(())
}
