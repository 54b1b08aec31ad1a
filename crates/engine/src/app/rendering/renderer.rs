use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::camera::Viewport;
use crate::projection::{DrawCommand, Rgba};

/// Software renderer: one world unit maps to one frame-buffer pixel, and the
/// frame buffer is scaled onto the window surface by `pixels`.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    frame_width: u32,
    frame_height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>, viewport: Viewport) -> Result<Self, Error> {
        let frame_width = viewport.width() as u32;
        let frame_height = viewport.height() as u32;
        let size = window.inner_size();
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            (frame_width, frame_height),
            size.width,
            size.height,
        )?;
        Ok(Self {
            window,
            pixels,
            frame_width,
            frame_height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            Arc::clone(&self.window),
            (self.frame_width, self.frame_height),
            width,
            height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        frame_size: (u32, u32),
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(frame_size.0, frame_size.1, surface)
    }

    pub(crate) fn render(
        &mut self,
        commands: &[DrawCommand],
        background: Rgba,
    ) -> Result<(), Error> {
        let (width, height) = (self.frame_width, self.frame_height);
        let frame = self.pixels.frame_mut();
        paint_frame(frame, width, height, commands, background);
        self.pixels.render()
    }
}

fn paint_frame(
    frame: &mut [u8],
    width: u32,
    height: u32,
    commands: &[DrawCommand],
    background: Rgba,
) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&background);
    }
    for command in commands {
        fill_rect_clipped(frame, width, height, command);
    }
}

fn fill_rect_clipped(frame: &mut [u8], width: u32, height: u32, command: &DrawCommand) {
    let rect = command.rect;
    let start_x = rect.left().max(0);
    let start_y = rect.top().max(0);
    let end_x = rect.right().min(width as i32);
    let end_y = rect.bottom().min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let row_bytes = width as usize * 4;
    for py in start_y as usize..end_y as usize {
        let row_start = py * row_bytes;
        let span = (row_start + start_x as usize * 4)..(row_start + end_x as usize * 4);
        let Some(pixels) = frame.get_mut(span) else {
            return;
        };
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&command.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::projection::DrawKind;

    const BG: Rgba = [50, 50, 50, 255];
    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    fn command(x: i32, y: i32, w: i32, h: i32, color: Rgba) -> DrawCommand {
        DrawCommand {
            kind: DrawKind::Actor,
            color,
            rect: Rect::new(x, y, w, h).expect("rect"),
        }
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> Rgba {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn paint_clears_to_background() {
        let mut frame = vec![0u8; 8 * 4 * 4];
        paint_frame(&mut frame, 8, 4, &[], BG);
        assert!(frame.chunks_exact(4).all(|px| px == BG));
    }

    #[test]
    fn fill_covers_exclusive_right_and_bottom_edges() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        paint_frame(&mut frame, 8, 8, &[command(2, 3, 2, 1, RED)], BG);
        assert_eq!(pixel(&frame, 8, 2, 3), RED);
        assert_eq!(pixel(&frame, 8, 3, 3), RED);
        assert_eq!(pixel(&frame, 8, 4, 3), BG);
        assert_eq!(pixel(&frame, 8, 2, 4), BG);
    }

    #[test]
    fn partially_offscreen_rect_is_clipped() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        paint_frame(&mut frame, 8, 8, &[command(-300, 6, 302, 10, RED)], BG);
        assert_eq!(pixel(&frame, 8, 0, 6), RED);
        assert_eq!(pixel(&frame, 8, 1, 7), RED);
        assert_eq!(pixel(&frame, 8, 2, 7), BG);
        assert_eq!(pixel(&frame, 8, 0, 5), BG);
    }

    #[test]
    fn fully_offscreen_rect_draws_nothing() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        paint_frame(&mut frame, 8, 8, &[command(8, 0, 5, 5, RED)], BG);
        assert!(frame.chunks_exact(4).all(|px| px == BG));
    }

    #[test]
    fn later_commands_paint_over_earlier_ones() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        paint_frame(
            &mut frame,
            8,
            8,
            &[command(0, 0, 4, 4, RED), command(2, 2, 4, 4, BLUE)],
            BG,
        );
        assert_eq!(pixel(&frame, 8, 1, 1), RED);
        assert_eq!(pixel(&frame, 8, 3, 3), BLUE);
    }
}
