//! Canvas port
//!
//! The interpreter draws through this trait and never touches a concrete
//! surface. A rasterizing implementation lives with the embedding shell;
//! this crate ships [`RecordingCanvas`], a pen-state tracker that records
//! every operation for tests and the CLI.

use crate::value::RuntimeError;
use std::fmt;

/// Default pen colour after `reset`
pub const DEFAULT_PEN: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Default surface size before any `set` command
pub const DEFAULT_SIZE: (i32, i32) = (640, 480);

/// An RGB pen colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Image encodings a canvas implementation may support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Bmp,
    Jpeg,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Bmp => write!(f, "bmp"),
            ImageFormat::Jpeg => write!(f, "jpeg"),
        }
    }
}

/// Drawing-surface capability required by the interpreter.
///
/// Triangle geometry is canonical across implementations: apex-top
/// isosceles with vertices `(x + w/2, y)`, `(x, y + h)` and `(x + w, y + h)`
/// where `(x, y)` is the current pen position.
pub trait Canvas {
    /// Current pen position
    fn position(&self) -> (i32, i32);
    /// Move the pen without drawing (same as `move_to`)
    fn set_position(&mut self, x: i32, y: i32);
    /// Current pen colour
    fn pen_colour(&self) -> Rgb;
    /// Change the pen colour
    fn set_pen_colour(&mut self, colour: Rgb);
    /// Blank the surface, keeping pen position and colour
    fn clear(&mut self);
    /// Blank the surface, pen to origin, colour to [`DEFAULT_PEN`]
    fn reset(&mut self);
    /// Resize the underlying surface
    fn resize(&mut self, width: i32, height: i32);
    /// Move the pen to (x, y) without drawing
    fn move_to(&mut self, x: i32, y: i32);
    /// Draw a line from the current position to (x, y), then move there
    fn draw_to(&mut self, x: i32, y: i32);
    /// Draw a circle centred on the current position
    fn circle(&mut self, radius: i32, filled: bool);
    /// Draw a rectangle from the current position
    fn rect(&mut self, width: i32, height: i32, filled: bool);
    /// Draw the canonical triangle (see trait docs)
    fn triangle(&mut self, width: i32, height: i32);
    /// Write text at the current position
    fn write_text(&mut self, text: &str);
    /// Encode the surface to a file
    fn save_image(&mut self, path: &str, format: ImageFormat) -> Result<(), RuntimeError>;
    /// Replace the surface with a decoded image; pen returns to origin
    fn load_image(&mut self, path: &str) -> Result<(), RuntimeError>;
    /// Snapshot of the surface for display (row-major RGBA). Non-raster
    /// implementations return an empty snapshot.
    fn raster(&self) -> Vec<u8>;
}

/// One recorded canvas operation
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    Clear,
    Reset,
    Resize { width: i32, height: i32 },
    MoveTo { x: i32, y: i32 },
    DrawTo { x: i32, y: i32 },
    Circle { radius: i32, filled: bool },
    Rect { width: i32, height: i32, filled: bool },
    Triangle { width: i32, height: i32 },
    Pen(Rgb),
    Text(String),
    SaveImage { path: String, format: ImageFormat },
    LoadImage { path: String },
}

/// Canvas implementation that tracks pen state and appends every operation
/// to a log instead of rasterizing.
#[derive(Debug)]
pub struct RecordingCanvas {
    position: (i32, i32),
    colour: Rgb,
    size: (i32, i32),
    ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            position: (0, 0),
            colour: DEFAULT_PEN,
            size: DEFAULT_SIZE,
            ops: Vec::new(),
        }
    }

    /// Every operation recorded so far, in execution order
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    pub fn size(&self) -> (i32, i32) {
        self.size
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_PEN
    }
}

impl Canvas for RecordingCanvas {
    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn pen_colour(&self) -> Rgb {
        self.colour
    }

    fn set_pen_colour(&mut self, colour: Rgb) {
        self.colour = colour;
        self.ops.push(CanvasOp::Pen(colour));
    }

    fn clear(&mut self) {
        self.ops.push(CanvasOp::Clear);
    }

    fn reset(&mut self) {
        self.position = (0, 0);
        self.colour = DEFAULT_PEN;
        self.ops.push(CanvasOp::Reset);
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.size = (width, height);
        self.ops.push(CanvasOp::Resize { width, height });
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.position = (x, y);
        self.ops.push(CanvasOp::MoveTo { x, y });
    }

    fn draw_to(&mut self, x: i32, y: i32) {
        self.ops.push(CanvasOp::DrawTo { x, y });
        self.position = (x, y);
    }

    fn circle(&mut self, radius: i32, filled: bool) {
        self.ops.push(CanvasOp::Circle { radius, filled });
    }

    fn rect(&mut self, width: i32, height: i32, filled: bool) {
        self.ops.push(CanvasOp::Rect {
            width,
            height,
            filled,
        });
    }

    fn triangle(&mut self, width: i32, height: i32) {
        self.ops.push(CanvasOp::Triangle { width, height });
    }

    fn write_text(&mut self, text: &str) {
        self.ops.push(CanvasOp::Text(text.to_string()));
    }

    fn save_image(&mut self, path: &str, format: ImageFormat) -> Result<(), RuntimeError> {
        self.ops.push(CanvasOp::SaveImage {
            path: path.to_string(),
            format,
        });
        Ok(())
    }

    fn load_image(&mut self, path: &str) -> Result<(), RuntimeError> {
        self.ops.push(CanvasOp::LoadImage {
            path: path.to_string(),
        });
        self.position = (0, 0);
        Ok(())
    }

    fn raster(&self) -> Vec<u8> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_to_updates_position() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw_to(10, 20);
        assert_eq!(canvas.position(), (10, 20));
        assert_eq!(canvas.ops(), &[CanvasOp::DrawTo { x: 10, y: 20 }]);
    }

    #[test]
    fn test_reset_restores_pen_state() {
        let mut canvas = RecordingCanvas::new();
        canvas.move_to(5, 5);
        canvas.set_pen_colour(Rgb { r: 255, g: 0, b: 0 });
        canvas.reset();
        assert_eq!(canvas.position(), (0, 0));
        assert_eq!(canvas.pen_colour(), DEFAULT_PEN);
    }

    #[test]
    fn test_default_matches_new() {
        let canvas = RecordingCanvas::default();
        assert_eq!(canvas.size(), DEFAULT_SIZE);
        assert_eq!(canvas.pen_colour(), DEFAULT_PEN);
    }

    #[test]
    fn test_clear_keeps_pen_state() {
        let mut canvas = RecordingCanvas::new();
        canvas.move_to(7, 9);
        canvas.clear();
        assert_eq!(canvas.position(), (7, 9));
    }

    #[test]
    fn test_load_image_resets_position() {
        let mut canvas = RecordingCanvas::new();
        canvas.move_to(3, 4);
        canvas.load_image("art.png").unwrap();
        assert_eq!(canvas.position(), (0, 0));
    }
}
