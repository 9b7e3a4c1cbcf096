use std::process::ExitCode;

use stage_engine::run_app;
use tracing::error;

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_app(
        app.config,
        app.render_settings,
        app.images_dir,
        app.audio,
        app.game,
    ) {
        error!(error = %err, "app_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
