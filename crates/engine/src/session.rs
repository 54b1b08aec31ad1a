use thiserror::Error;
use tracing::{info, trace};

use crate::app::InputSnapshot;
use crate::camera::{Camera, Viewport};
use crate::geometry::{GeometryError, Rect};
use crate::projection::{DrawCommand, DrawKind, Palette};
use crate::world::{Actor, Detection, Device, Obstacle, WorldBounds, Zone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(
        "actor size {actor_width}x{actor_height} does not fit in world {world_width}x{world_height}"
    )]
    ActorExceedsWorld {
        actor_width: i32,
        actor_height: i32,
        world_width: i32,
        world_height: i32,
    },
    #[error("actor speed must be non-negative, got {0}")]
    NegativeSpeed(i32),
}

/// Everything needed to start a session. Fixed for the session's lifetime.
#[derive(Debug, Clone)]
pub struct SessionSetup {
    pub world: WorldBounds,
    pub viewport: Viewport,
    pub actor_size: (i32, i32),
    pub actor_speed: i32,
    pub obstacles: Vec<Rect>,
    pub devices: Vec<Rect>,
    pub zones: Vec<Rect>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub detected: bool,
    pub detection_changed: bool,
    pub occupied_zones: usize,
    pub toggled_devices: Vec<usize>,
}

/// The whole mutable simulation state, threaded explicitly through each tick.
#[derive(Debug, Clone)]
pub struct Session {
    world: WorldBounds,
    actor: Actor,
    obstacles: Vec<Obstacle>,
    devices: Vec<Device>,
    zones: Vec<Zone>,
    camera: Camera,
    tick_counter: u64,
}

impl Session {
    pub fn new(setup: SessionSetup) -> Result<Self, SessionError> {
        let SessionSetup {
            world,
            viewport,
            actor_size,
            actor_speed,
            obstacles,
            devices,
            zones,
        } = setup;

        let (actor_width, actor_height) = actor_size;
        if actor_width > world.width() || actor_height > world.height() {
            return Err(SessionError::ActorExceedsWorld {
                actor_width,
                actor_height,
                world_width: world.width(),
                world_height: world.height(),
            });
        }
        if actor_speed < 0 {
            return Err(SessionError::NegativeSpeed(actor_speed));
        }

        let actor = Actor::spawn_centered(world, actor_size, actor_speed)?;
        let mut camera = Camera::new(viewport, world);
        camera.recenter(&actor.rect());

        let session = Self {
            world,
            actor,
            obstacles: obstacles.into_iter().map(Obstacle::new).collect(),
            devices: devices.into_iter().map(Device::new).collect(),
            zones: zones.into_iter().map(Zone::new).collect(),
            camera,
            tick_counter: 0,
        };
        info!(
            world_width = world.width(),
            world_height = world.height(),
            viewport_width = viewport.width(),
            viewport_height = viewport.height(),
            obstacle_count = session.obstacles.len(),
            device_count = session.devices.len(),
            zone_count = session.zones.len(),
            "session_created"
        );
        Ok(session)
    }

    pub fn world(&self) -> WorldBounds {
        self.world
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// Advances one frame: movement, camera, zone occupancy, detection,
    /// then device toggling when the snapshot carries a toggle press.
    pub fn tick(&mut self, input: &InputSnapshot) -> TickReport {
        self.actor.apply_movement(input.move_intent(), self.world);
        self.camera.recenter(&self.actor.rect());

        let actor_rect = self.actor.rect();
        let mut occupied_zones = 0usize;
        for zone in &mut self.zones {
            zone.update(&actor_rect);
            if zone.is_occupied() {
                occupied_zones += 1;
            }
        }

        let previous = self.actor.detection();
        let detection = Detection::from_flag(occupied_zones > 0);
        self.actor.set_detection(detection);
        let detection_changed = previous != detection;
        if detection_changed {
            match detection {
                Detection::Detected => info!(
                    tick = self.tick_counter,
                    occupied_zones, "actor_detected"
                ),
                Detection::Hidden => info!(tick = self.tick_counter, "actor_hidden"),
            }
        }

        let toggled_devices = if input.toggle_pressed() {
            self.request_toggle()
        } else {
            Vec::new()
        };

        let report = TickReport {
            tick: self.tick_counter,
            detected: self.actor.is_detected(),
            detection_changed,
            occupied_zones,
            toggled_devices,
        };
        trace!(
            tick = report.tick,
            actor_x = actor_rect.x(),
            actor_y = actor_rect.y(),
            view_x = self.camera.view_rect().x(),
            view_y = self.camera.view_rect().y(),
            detected = report.detected,
            "tick"
        );
        self.tick_counter = self.tick_counter.saturating_add(1);
        report
    }

    /// Flips every device the actor currently overlaps. Returns the indices
    /// of the flipped devices in storage order.
    pub fn request_toggle(&mut self) -> Vec<usize> {
        let actor_rect = self.actor.rect();
        let mut toggled = Vec::new();
        for (index, device) in self.devices.iter_mut().enumerate() {
            if !device.rect().overlaps(&actor_rect) {
                continue;
            }
            device.toggle();
            info!(device = index, state = ?device.state(), "device_toggled");
            toggled.push(index);
        }
        toggled
    }

    /// Moves the actor's top-left to `(x, y)`, edge-clamped into the world.
    /// Detection is left untouched until the next tick.
    pub fn teleport_actor(&mut self, x: i32, y: i32) {
        self.actor.place_at(x, y, self.world);
    }

    /// Viewport-space draw list in paint order: zones, obstacles, devices,
    /// then the actor.
    pub fn draw_list(&self, palette: &Palette) -> Vec<DrawCommand> {
        let mut commands =
            Vec::with_capacity(self.zones.len() + self.obstacles.len() + self.devices.len() + 1);
        for (index, zone) in self.zones.iter().enumerate() {
            commands.push(DrawCommand {
                kind: DrawKind::Zone(index),
                color: palette.zone_color(zone.occupancy()),
                rect: self.camera.project(&zone.rect()),
            });
        }
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            commands.push(DrawCommand {
                kind: DrawKind::Obstacle(index),
                color: palette.obstacle,
                rect: self.camera.project(&obstacle.rect()),
            });
        }
        for (index, device) in self.devices.iter().enumerate() {
            commands.push(DrawCommand {
                kind: DrawKind::Device(index),
                color: palette.device_color(device.state()),
                rect: self.camera.project(&device.rect()),
            });
        }
        commands.push(DrawCommand {
            kind: DrawKind::Actor,
            color: palette.actor_color(self.actor.detection()),
            rect: self.camera.project(&self.actor.rect()),
        });
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::InputAction;
    use crate::world::DeviceState;

    fn rect(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect::new(x, y, width, height).expect("rect")
    }

    fn setup() -> SessionSetup {
        SessionSetup {
            world: WorldBounds::new(1600, 1200).expect("world"),
            viewport: Viewport::new(800, 600).expect("viewport"),
            actor_size: (30, 30),
            actor_speed: 5,
            obstacles: vec![rect(100, 100, 200, 100), rect(400, 300, 100, 150)],
            devices: vec![
                rect(200, 50, 20, 20),
                rect(500, 250, 20, 20),
                rect(800, 400, 25, 25),
            ],
            zones: vec![rect(300, 200, 150, 150), rect(700, 500, 100, 200)],
        }
    }

    fn session() -> Session {
        Session::new(setup()).expect("session")
    }

    fn snapshot_from_actions(actions: &[InputAction]) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty();
        for action in actions {
            snapshot = snapshot.with_action_down(*action, true);
        }
        snapshot
    }

    #[test]
    fn new_session_is_centered_and_undetected() {
        let session = session();
        assert_eq!(session.actor().rect(), rect(785, 585, 30, 30));
        assert_eq!(session.camera().view_rect(), rect(400, 300, 800, 600));
        assert!(!session.actor().is_detected());
        assert!(session.devices().iter().all(|device| !device.is_hacked()));
        assert!(session.zones().iter().all(|zone| !zone.is_occupied()));
    }

    #[test]
    fn new_session_rejects_actor_larger_than_world() {
        let mut setup = setup();
        setup.world = WorldBounds::new(20, 1200).expect("world");
        assert_eq!(
            Session::new(setup).err(),
            Some(SessionError::ActorExceedsWorld {
                actor_width: 30,
                actor_height: 30,
                world_width: 20,
                world_height: 1200,
            })
        );
    }

    #[test]
    fn new_session_rejects_negative_speed() {
        let mut setup = setup();
        setup.actor_speed = -1;
        assert_eq!(
            Session::new(setup).err(),
            Some(SessionError::NegativeSpeed(-1))
        );
    }

    #[test]
    fn new_session_rejects_degenerate_actor() {
        let mut setup = setup();
        setup.actor_size = (0, 30);
        assert!(matches!(
            Session::new(setup),
            Err(SessionError::Geometry(GeometryError::InvalidGeometry { .. }))
        ));
    }

    #[test]
    fn tick_moves_actor_and_recenters_camera() {
        let mut session = session();
        let report = session.tick(&snapshot_from_actions(&[InputAction::MoveRight]));
        assert_eq!(report.tick, 0);
        assert_eq!(session.actor().rect().x(), 790);
        assert_eq!(session.camera().view_rect().x(), 405);
        assert_eq!(session.tick_count(), 1);
    }

    #[test]
    fn actor_inside_zone_is_detected_on_next_tick() {
        let mut session = session();
        session.teleport_actor(310, 210);
        assert!(!session.actor().is_detected());

        let report = session.tick(&InputSnapshot::empty());
        assert!(report.detected);
        assert!(report.detection_changed);
        assert_eq!(report.occupied_zones, 1);
        assert!(session.zones()[0].is_occupied());
        assert!(!session.zones()[1].is_occupied());
    }

    #[test]
    fn leaving_every_zone_clears_detection_without_lag() {
        let mut session = session();
        session.teleport_actor(310, 210);
        session.tick(&InputSnapshot::empty());
        assert!(session.actor().is_detected());

        session.teleport_actor(1000, 1000);
        let report = session.tick(&InputSnapshot::empty());
        assert!(!report.detected);
        assert!(report.detection_changed);
        assert_eq!(report.occupied_zones, 0);
    }

    #[test]
    fn overlapping_two_zones_counts_both() {
        let mut setup = setup();
        setup.zones = vec![rect(0, 0, 100, 100), rect(50, 50, 100, 100)];
        let mut session = Session::new(setup).expect("session");
        session.teleport_actor(60, 60);
        let report = session.tick(&InputSnapshot::empty());
        assert_eq!(report.occupied_zones, 2);
        assert!(report.detected);
    }

    #[test]
    fn touching_zone_edge_is_not_detection() {
        let mut session = session();
        session.teleport_actor(450, 210);
        let report = session.tick(&InputSnapshot::empty());
        assert!(!report.detected);
    }

    #[test]
    fn toggle_without_overlap_does_nothing() {
        let mut session = session();
        let report = session.tick(&InputSnapshot::empty().with_toggle_pressed(true));
        assert!(report.toggled_devices.is_empty());
        assert!(session.devices().iter().all(|device| !device.is_hacked()));
    }

    #[test]
    fn toggle_flips_overlapping_device_and_double_press_restores() {
        let mut session = session();
        session.teleport_actor(195, 45);

        let first = session.tick(&InputSnapshot::empty().with_toggle_pressed(true));
        assert_eq!(first.toggled_devices, vec![0]);
        assert_eq!(session.devices()[0].state(), DeviceState::Hacked);

        let second = session.tick(&InputSnapshot::empty().with_toggle_pressed(true));
        assert_eq!(second.toggled_devices, vec![0]);
        assert_eq!(session.devices()[0].state(), DeviceState::Idle);
    }

    #[test]
    fn held_toggle_action_without_edge_does_not_toggle() {
        let mut session = session();
        session.teleport_actor(195, 45);
        let report = session.tick(&snapshot_from_actions(&[InputAction::Toggle]));
        assert!(report.toggled_devices.is_empty());
        assert!(!session.devices()[0].is_hacked());
    }

    #[test]
    fn toggle_flips_every_overlapping_device() {
        let mut setup = setup();
        setup.devices = vec![
            rect(0, 0, 20, 20),
            rect(10, 10, 20, 20),
            rect(500, 500, 20, 20),
        ];
        let mut session = Session::new(setup).expect("session");
        session.teleport_actor(5, 5);
        let toggled = session.request_toggle();
        assert_eq!(toggled, vec![0, 1]);
        assert!(session.devices()[0].is_hacked());
        assert!(session.devices()[1].is_hacked());
        assert!(!session.devices()[2].is_hacked());
    }

    #[test]
    fn toggle_uses_post_move_position() {
        let mut session = session();
        session.teleport_actor(225, 45);
        let report = session.tick(
            &snapshot_from_actions(&[InputAction::MoveLeft]).with_toggle_pressed(true),
        );
        assert_eq!(session.actor().rect().x(), 220);
        assert!(report.toggled_devices.is_empty());

        let report = session.tick(
            &snapshot_from_actions(&[InputAction::MoveLeft]).with_toggle_pressed(true),
        );
        assert_eq!(report.toggled_devices, vec![0]);
    }

    #[test]
    fn obstacles_do_not_block_movement() {
        let mut session = session();
        session.teleport_actor(95, 140);
        session.tick(&snapshot_from_actions(&[InputAction::MoveRight]));
        assert_eq!(session.actor().rect().x(), 100);
        assert!(session.actor().rect().overlaps(&session.obstacles()[0].rect()));
    }

    #[test]
    fn draw_list_follows_paint_order_and_state_colors() {
        let mut session = session();
        let palette = Palette::default();
        session.teleport_actor(310, 210);
        session.tick(&InputSnapshot::empty());

        let commands = session.draw_list(&palette);
        let kinds: Vec<DrawKind> = commands.iter().map(|command| command.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DrawKind::Zone(0),
                DrawKind::Zone(1),
                DrawKind::Obstacle(0),
                DrawKind::Obstacle(1),
                DrawKind::Device(0),
                DrawKind::Device(1),
                DrawKind::Device(2),
                DrawKind::Actor,
            ]
        );
        assert_eq!(commands[0].color, palette.zone_occupied);
        assert_eq!(commands[1].color, palette.zone_vacant);
        assert_eq!(commands[4].color, palette.device_idle);
        let actor = commands.last().expect("actor command");
        assert_eq!(actor.color, palette.actor_detected);
    }

    #[test]
    fn draw_list_rects_are_camera_projected() {
        let session = session();
        let commands = session.draw_list(&Palette::default());
        let actor = commands.last().expect("actor command");
        assert_eq!(actor.rect, rect(385, 285, 30, 30));
        assert_eq!(commands[2].rect, rect(-300, -200, 200, 100));
    }

    #[test]
    fn maximum_speed_pins_actor_to_world_edges() {
        let mut session = Session::new(SessionSetup {
            actor_speed: i32::MAX,
            ..setup()
        })
        .expect("session");

        session.tick(&snapshot_from_actions(&[InputAction::MoveRight]));
        assert_eq!(session.actor().rect(), rect(1570, 585, 30, 30));

        session.tick(&snapshot_from_actions(&[InputAction::MoveLeft, InputAction::MoveUp]));
        assert_eq!(session.actor().rect(), rect(0, 0, 30, 30));
        assert_eq!(session.camera().view_rect(), rect(0, 0, 800, 600));
    }

    #[test]
    fn far_away_entities_tick_and_project_without_overflow() {
        let mut session = Session::new(SessionSetup {
            zones: vec![rect(i32::MAX - 10, 0, 10, 10), rect(i32::MIN, i32::MIN, 10, 10)],
            ..setup()
        })
        .expect("session");
        session.teleport_actor(i32::MAX, i32::MAX);

        let report = session.tick(&snapshot_from_actions(&[InputAction::MoveDown]));
        assert!(!report.detected);
        assert_eq!(session.actor().rect(), rect(1570, 1170, 30, 30));

        let commands = session.draw_list(&Palette::default());
        assert_eq!(commands[0].rect, rect(i32::MAX - 810, -600, 10, 10));
        assert_eq!(commands[1].rect.left(), i32::MIN);
    }
}
