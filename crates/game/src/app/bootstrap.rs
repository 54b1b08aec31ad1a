use std::env;
use std::path::PathBuf;

use engine::{LoopConfig, Palette, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::layout::{self, LayoutConfig, LayoutError, LAYOUT_ENV_VAR};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) session: Session,
    pub(crate) palette: Palette,
}

pub(crate) fn build_app() -> Result<AppWiring, LayoutError> {
    init_tracing();
    info!("=== Urban Game Startup ===");

    let layout = resolve_layout()?;
    let (session, palette) = layout::build_session(&layout)?;

    Ok(AppWiring {
        config: LoopConfig::default(),
        session,
        palette,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn resolve_layout() -> Result<LayoutConfig, LayoutError> {
    match layout_path_from_env() {
        Some(path) => {
            let layout = layout::load_layout(&path)?;
            info!(path = %path.display(), "layout_loaded");
            Ok(layout)
        }
        None => {
            info!("layout_default");
            Ok(LayoutConfig::default())
        }
    }
}

fn layout_path_from_env() -> Option<PathBuf> {
    env::var_os(LAYOUT_ENV_VAR)
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}
