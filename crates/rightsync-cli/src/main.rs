use rightsync_core::logging;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    // File logging when the state dir is writable, stderr only otherwise.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match cli::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("rightsync error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
