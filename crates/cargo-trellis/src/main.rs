//! `cargo trellis` entrypoint.

use std::io;
use std::process::ExitCode;

use cargo_trellis::cli;
use cargo_trellis::config::CliConfig;
use cargo_trellis::logging::init_logging;

fn main() -> ExitCode {
    let args = cli::parse_from_env();

    let config = match CliConfig::from_env() {
        Ok(config) => config.apply_overrides(args.log_level),
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::from(2);
        }
    };
    init_logging(&config);

    match cli::run(&args, &mut io::stdout().lock()) {
        Ok(status) if status.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}
