use anyhow::Result;
use clap::Parser;
use log::info;
use rolling_signal::cli::GenerateArgs;
use rolling_signal::generator::{GeneratorConfig, generate_bars, parse_start, seeded_rng, write_csv};
use rolling_signal::logging;

fn main() -> Result<()> {
    logging::init_stderr_logger();
    let args = GenerateArgs::parse();

    let config = GeneratorConfig {
        rows: args.rows,
        start: parse_start(&args.start)?,
        ..GeneratorConfig::default()
    };
    info!(
        "Generating {} bars from {} with seed {}",
        config.rows, args.start, args.seed
    );

    let mut rng = seeded_rng(args.seed);
    let bars = generate_bars(&config, &mut rng)?;
    write_csv(&bars, &args.output)?;

    println!("{} created with {} rows.", args.output.display(), bars.len());
    Ok(())
}
