use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = gitlink::cli::Cli::parse();

    match gitlink::cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
