use clap::Parser;
use rolling_signal::cli::JobArgs;
use rolling_signal::job::JobDriver;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let started = Instant::now();
    let args = JobArgs::parse();

    let outcome = JobDriver::started_at(args, started).run();

    // Echo the written document so callers see the result without reading the file
    match outcome.report().to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("{:#}", err),
    }

    ExitCode::from(outcome.exit_status())
}
