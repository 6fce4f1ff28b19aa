//! Render pass: markers, debug axis gizmo and center cursor
use log::trace;

use crate::{
    cfg::Config,
    constants::{GIZMO_ARROW_LENGTH, GIZMO_DISTANCE, GIZMO_DOT_RADIUS_PX, STROKE_WIDTH_PX},
    math::{multiply_matrix_vector, point, Matrix4, Vector4},
    projection::ScreenOffset,
    scene::Frame,
};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Satellite markers
    pub const MAGENTA: Self = Self::rgb(0xff, 0x00, 0xff);
    /// East gizmo arrow
    pub const GREEN: Self = Self::rgb(0x00, 0xff, 0x00);
    /// North gizmo arrow
    pub const BLUE: Self = Self::rgb(0x00, 0x00, 0xff);
    /// Up gizmo arrow
    pub const RED: Self = Self::rgb(0xff, 0x00, 0x00);
    /// Idle cursor
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Cursor while a target is selected
    pub const YELLOW: Self = Self::rgb(0xff, 0xff, 0x00);
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Any 2D drawing surface should implement [Canvas].
/// Coordinates are pixels, origin top left, Y growing downward.
pub trait Canvas {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    /// Filled circle
    fn draw_circle(&mut self, center: ScreenOffset, radius: f64, color: Color);

    fn draw_line(&mut self, from: ScreenOffset, to: ScreenOffset, color: Color, stroke_width: f64);
}

/// [RenderPass] draws one [Frame]. It keeps no state between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPass {
    marker_radius_px: f64,
    cursor_radius_px: f64,
    debug_gizmo: bool,
}

impl RenderPass {
    pub fn new(cfg: &Config) -> Self {
        Self {
            marker_radius_px: cfg.marker_radius_px,
            cursor_radius_px: cfg.cursor_radius_px,
            debug_gizmo: cfg.debug_gizmo,
        }
    }

    /// Draws this [Frame]. The gizmo follows the raw device `rotation`,
    /// not the combined ECI transform.
    pub fn draw<C: Canvas>(&self, canvas: &mut C, frame: &Frame, rotation: &Matrix4) {
        self.draw_markers(canvas, frame);
        if self.debug_gizmo {
            self.draw_gizmo(canvas, frame, rotation);
        }
        self.draw_cursor(canvas, frame);
    }

    fn draw_markers<C: Canvas>(&self, canvas: &mut C, frame: &Frame) {
        for drawable in frame.drawables.iter() {
            let center = frame.screen_offset(drawable);
            trace!("marker {} at {:?}", drawable.satellite, center);
            canvas.draw_circle(center, self.marker_radius_px, Color::MAGENTA);
        }
    }

    fn draw_gizmo<C: Canvas>(&self, canvas: &mut C, frame: &Frame, rotation: &Matrix4) {
        let axes = [
            (point(GIZMO_ARROW_LENGTH, 0.0, 0.0), Color::GREEN),
            (point(0.0, GIZMO_ARROW_LENGTH, 0.0), Color::BLUE),
            (point(0.0, 0.0, GIZMO_ARROW_LENGTH), Color::RED),
        ];

        for (tip, color) in axes {
            let start = self.gizmo_offset(frame, rotation, &point(0.0, 0.0, 0.0));
            let end = self.gizmo_offset(frame, rotation, &tip);
            canvas.draw_line(start, end, color, STROKE_WIDTH_PX);
            canvas.draw_circle(start, GIZMO_DOT_RADIUS_PX, color);
        }
    }

    /// Rotates, pushes in front of the camera, then projects
    fn gizmo_offset(&self, frame: &Frame, rotation: &Matrix4, vector: &Vector4) -> ScreenOffset {
        let mut rotated = multiply_matrix_vector(rotation, vector);
        rotated.z -= GIZMO_DISTANCE;
        frame
            .projection
            .to_screen_offset(frame.canvas_width, frame.canvas_height, &rotated, false)
    }

    fn draw_cursor<C: Canvas>(&self, canvas: &mut C, frame: &Frame) {
        let center = frame.center();
        let color = if frame.target.is_some() {
            Color::YELLOW
        } else {
            Color::WHITE
        };

        let r = self.cursor_radius_px;
        canvas.draw_circle(center, r, color);
        canvas.draw_line(
            ScreenOffset::new(center.x - r, center.y),
            ScreenOffset::new(center.x + r, center.y),
            color,
            STROKE_WIDTH_PX,
        );
        canvas.draw_line(
            ScreenOffset::new(center.x, center.y - r),
            ScreenOffset::new(center.x, center.y + r),
            color,
            STROKE_WIDTH_PX,
        );
    }
}
