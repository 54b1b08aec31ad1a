use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::world::{Detection, DeviceState, Occupancy};

pub type Rgba = [u8; 4];

/// Colors for every entity state. Entities never store a color; it is
/// looked up from their current state each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub background: Rgba,
    pub obstacle: Rgba,
    pub device_idle: Rgba,
    pub device_hacked: Rgba,
    pub zone_vacant: Rgba,
    pub zone_occupied: Rgba,
    pub actor_normal: Rgba,
    pub actor_detected: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [50, 50, 50, 255],
            obstacle: [120, 120, 120, 255],
            device_idle: [200, 200, 0, 255],
            device_hacked: [0, 255, 0, 255],
            zone_vacant: [100, 0, 0, 255],
            zone_occupied: [180, 0, 0, 255],
            actor_normal: [100, 100, 255, 255],
            actor_detected: [255, 0, 0, 255],
        }
    }
}

impl Palette {
    pub fn device_color(&self, state: DeviceState) -> Rgba {
        match state {
            DeviceState::Idle => self.device_idle,
            DeviceState::Hacked => self.device_hacked,
        }
    }

    pub fn zone_color(&self, occupancy: Occupancy) -> Rgba {
        match occupancy {
            Occupancy::Vacant => self.zone_vacant,
            Occupancy::Occupied => self.zone_occupied,
        }
    }

    pub fn actor_color(&self, detection: Detection) -> Rgba {
        match detection {
            Detection::Hidden => self.actor_normal,
            Detection::Detected => self.actor_detected,
        }
    }
}

/// Which entity a draw command came from; indices refer to session storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Zone(usize),
    Obstacle(usize),
    Device(usize),
    Actor,
}

/// One filled rectangle in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub kind: DrawKind,
    pub color: Rgba,
    pub rect: Rect,
}
