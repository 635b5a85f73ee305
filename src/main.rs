use clap::Parser;
use quantprimer::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    quantprimer::logging::init_logging();
    run(Cli::parse())
}
