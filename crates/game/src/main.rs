use std::process::ExitCode;

use tracing::error;

mod app;

fn main() -> ExitCode {
    let wiring = match app::build_app() {
        Ok(wiring) => wiring,
        Err(err) => {
            error!(error = %err, "layout_failed");
            return ExitCode::FAILURE;
        }
    };

    let app::AppWiring {
        config,
        session,
        palette,
    } = wiring;
    if let Err(err) = engine::run_app(config, session, palette) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
