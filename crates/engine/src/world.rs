use crate::app::MoveIntent;
use crate::geometry::{clamp_to_edges, GeometryError, Rect};

/// Fixed size of the simulated world, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldBounds {
    rect: Rect,
}

impl WorldBounds {
    pub fn new(width: i32, height: i32) -> Result<Self, GeometryError> {
        Ok(Self {
            rect: Rect::new(0, 0, width, height)?,
        })
    }

    pub fn width(&self) -> i32 {
        self.rect.width()
    }

    pub fn height(&self) -> i32 {
        self.rect.height()
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Detection {
    #[default]
    Hidden,
    Detected,
}

impl Detection {
    pub fn from_flag(detected: bool) -> Self {
        if detected {
            Self::Detected
        } else {
            Self::Hidden
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceState {
    #[default]
    Idle,
    Hacked,
}

impl DeviceState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Idle => Self::Hacked,
            Self::Hacked => Self::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Occupancy {
    #[default]
    Vacant,
    Occupied,
}

#[derive(Debug, Clone)]
pub struct Actor {
    rect: Rect,
    speed: i32,
    detection: Detection,
}

impl Actor {
    /// Places an actor of the given size at the world center.
    pub(crate) fn spawn_centered(
        world: WorldBounds,
        size: (i32, i32),
        speed: i32,
    ) -> Result<Self, GeometryError> {
        let (width, height) = size;
        let rect = Rect::new(
            (world.width() - width).div_euclid(2),
            (world.height() - height).div_euclid(2),
            width,
            height,
        )?;
        Ok(Self {
            rect,
            speed,
            detection: Detection::Hidden,
        })
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn detection(&self) -> Detection {
        self.detection
    }

    pub fn is_detected(&self) -> bool {
        self.detection == Detection::Detected
    }

    /// Each held direction applies its own translation; opposing directions
    /// cancel. The result is edge-clamped into the world.
    pub fn apply_movement(&mut self, intent: MoveIntent, world: WorldBounds) {
        let mut moved = self.rect;
        if intent.left {
            moved = moved.translated(-self.speed, 0);
        }
        if intent.right {
            moved = moved.translated(self.speed, 0);
        }
        if intent.up {
            moved = moved.translated(0, -self.speed);
        }
        if intent.down {
            moved = moved.translated(0, self.speed);
        }
        self.rect = clamp_to_edges(moved, world.bounds());
    }

    pub(crate) fn place_at(&mut self, x: i32, y: i32, world: WorldBounds) {
        self.rect = clamp_to_edges(self.rect.with_position(x, y), world.bounds());
    }

    pub(crate) fn set_detection(&mut self, detection: Detection) {
        self.detection = detection;
    }
}

/// Decorative scenery. Does not block movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    rect: Rect,
}

impl Obstacle {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device {
    rect: Rect,
    state: DeviceState,
}

impl Device {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            state: DeviceState::Idle,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_hacked(&self) -> bool {
        self.state == DeviceState::Hacked
    }

    pub fn toggle(&mut self) {
        self.state = self.state.toggled();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    rect: Rect,
    occupancy: Occupancy,
}

impl Zone {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            occupancy: Occupancy::Vacant,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    pub fn is_occupied(&self) -> bool {
        self.occupancy == Occupancy::Occupied
    }

    pub fn update(&mut self, actor_rect: &Rect) {
        self.occupancy = if self.rect.overlaps(actor_rect) {
            Occupancy::Occupied
        } else {
            Occupancy::Vacant
        };
    }
}
