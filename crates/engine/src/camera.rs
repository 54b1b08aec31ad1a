use crate::geometry::{GeometryError, Rect};
use crate::world::WorldBounds;

/// Size of the visible drawing surface in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    rect: Rect,
}

impl Viewport {
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
}

/// Scrolling camera that follows a target while staying inside the world.
#[derive(Debug, Clone)]
pub struct Camera {
    view_rect: Rect,
    world: WorldBounds,
}

impl Camera {
    pub fn new(viewport: Viewport, world: WorldBounds) -> Self {
        Self {
            view_rect: viewport.rect,
            world,
        }
    }

    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    pub fn world(&self) -> WorldBounds {
        self.world
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            rect: self.view_rect.with_position(0, 0),
        }
    }

    /// Centers the view on `target`, then clamps it into the world.
    ///
    /// Clamping order matters: the low edges are clamped first, then the
    /// high edges, and finally an axis on which the world is smaller than
    /// the view is centered on the world, overriding the edge clamps.
    pub fn recenter(&mut self, target: &Rect) {
        let (target_cx, target_cy) = target.center();
        let view_w = self.view_rect.width();
        let view_h = self.view_rect.height();
        let world_w = self.world.width();
        let world_h = self.world.height();

        let mut x = target_cx.saturating_sub(view_w.div_euclid(2)).max(0);
        let mut y = target_cy.saturating_sub(view_h.div_euclid(2)).max(0);

        if x > world_w - view_w {
            x = world_w - view_w;
        }
        if y > world_h - view_h {
            y = world_h - view_h;
        }

        if world_w < view_w {
            x = (world_w - view_w).div_euclid(2);
        }
        if world_h < view_h {
            y = (world_h - view_h).div_euclid(2);
        }

        self.view_rect = self.view_rect.with_position(x, y);
    }

    /// Maps a world-space rect into viewport space.
    pub fn project(&self, rect: &Rect) -> Rect {
        rect.translated(-self.view_rect.x(), -self.view_rect.y())
    }
}
