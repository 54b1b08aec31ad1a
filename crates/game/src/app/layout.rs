use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::{
    GeometryError, Palette, Rect, Session, SessionError, SessionSetup, Viewport, WorldBounds,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const LAYOUT_ENV_VAR: &str = "URBAN_LAYOUT";

#[derive(Debug, Error)]
pub(crate) enum LayoutError {
    #[error("failed to read layout file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse layout json at {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid geometry at {field}: {source}")]
    InvalidGeometry {
        field: String,
        #[source]
        source: GeometryError,
    },
    #[error("layout rejected: {0}")]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SizeSpec {
    pub(crate) width: i32,
    pub(crate) height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ActorSpec {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) speed: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RectSpec {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl RectSpec {
    const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Startup layout of a session. Missing sections fall back to the built-in
/// city block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LayoutConfig {
    pub(crate) world: SizeSpec,
    pub(crate) viewport: SizeSpec,
    pub(crate) actor: ActorSpec,
    pub(crate) obstacles: Vec<RectSpec>,
    pub(crate) devices: Vec<RectSpec>,
    pub(crate) zones: Vec<RectSpec>,
    pub(crate) palette: Palette,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            world: SizeSpec {
                width: 1600,
                height: 1200,
            },
            viewport: SizeSpec {
                width: 800,
                height: 600,
            },
            actor: ActorSpec {
                width: 30,
                height: 30,
                speed: 5,
            },
            obstacles: vec![
                RectSpec::new(100, 100, 200, 100),
                RectSpec::new(400, 300, 100, 150),
                RectSpec::new(700, 50, 150, 200),
                RectSpec::new(1000, 400, 200, 120),
                RectSpec::new(50, 500, 300, 50),
                RectSpec::new(1300, 100, 50, 400),
            ],
            devices: vec![
                RectSpec::new(200, 50, 20, 20),
                RectSpec::new(500, 250, 20, 20),
                RectSpec::new(800, 400, 25, 25),
            ],
            zones: vec![
                RectSpec::new(300, 200, 150, 150),
                RectSpec::new(700, 500, 100, 200),
            ],
            palette: Palette::default(),
        }
    }
}

pub(crate) fn parse_layout_json(raw: &str) -> Result<LayoutConfig, LayoutError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, LayoutConfig>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        LayoutError::Parse {
            location,
            source: error.into_inner(),
        }
    })
}

pub(crate) fn load_layout(path: &Path) -> Result<LayoutConfig, LayoutError> {
    let raw = fs::read_to_string(path).map_err(|source| LayoutError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layout_json(&raw)
}

pub(crate) fn build_session(layout: &LayoutConfig) -> Result<(Session, Palette), LayoutError> {
    let world = WorldBounds::new(layout.world.width, layout.world.height)
        .map_err(|source| invalid_geometry("world", source))?;
    let viewport = Viewport::new(layout.viewport.width, layout.viewport.height)
        .map_err(|source| invalid_geometry("viewport", source))?;
    Rect::new(0, 0, layout.actor.width, layout.actor.height)
        .map_err(|source| invalid_geometry("actor", source))?;

    let setup = SessionSetup {
        world,
        viewport,
        actor_size: (layout.actor.width, layout.actor.height),
        actor_speed: layout.actor.speed,
        obstacles: to_rects("obstacles", &layout.obstacles)?,
        devices: to_rects("devices", &layout.devices)?,
        zones: to_rects("zones", &layout.zones)?,
    };
    let session = Session::new(setup)?;
    Ok((session, layout.palette))
}

fn to_rects(field: &str, specs: &[RectSpec]) -> Result<Vec<Rect>, LayoutError> {
    specs
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Rect::new(entry.x, entry.y, entry.width, entry.height)
                .map_err(|source| invalid_geometry(format!("{field}[{index}]"), source))
        })
        .collect()
}

fn invalid_geometry(field: impl Into<String>, source: GeometryError) -> LayoutError {
    LayoutError::InvalidGeometry {
        field: field.into(),
        source,
    }
}
