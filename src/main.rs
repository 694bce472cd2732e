use std::process::ExitCode;

use postcare::backend::BackendClient;
use postcare::{app, config, init_tracing};

fn main() -> ExitCode {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let client = BackendClient::from_env();
    match app::run(&client) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
