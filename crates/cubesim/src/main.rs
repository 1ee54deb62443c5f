//! Headless N×N×N twisty cube simulator.
//!
//! Scrambles a puzzle, plays every turn at a fixed frame rate until the
//! puzzle comes to rest, and reports what happened. Set `RUST_LOG` for more
//! detail.

mod cli;

fn main() -> eyre::Result<()> {
    use clap::Parser;

    env_logger::builder().init();
    color_eyre::install()?;

    let args = cli::Args::parse();
    cli::exec(args)
}
