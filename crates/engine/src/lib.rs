pub mod app;
pub mod camera;
pub mod geometry;
pub mod projection;
pub mod session;
pub mod world;

pub use app::{
    run_app, AppError, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot, MoveIntent,
    Renderer,
};
pub use camera::{Camera, Viewport};
pub use geometry::{clamp_move, clamp_to_edges, overlaps, GeometryError, Rect};
pub use projection::{DrawCommand, DrawKind, Palette, Rgba};
pub use session::{Session, SessionError, SessionSetup, TickReport};
pub use world::{Actor, Detection, Device, DeviceState, Obstacle, Occupancy, WorldBounds, Zone};
