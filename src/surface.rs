//! Drawing surface abstraction.

use crate::measure::Font;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in surface coordinates, `(x1, y1)` top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn mid_y(&self) -> f64 {
        (self.y1 + self.y2) / 2.0
    }

    /// Right edge at half height.
    pub fn right_mid(&self) -> Point {
        Point::new(self.x2, self.mid_y())
    }

    /// Left edge at half height.
    pub fn left_mid(&self) -> Point {
        Point::new(self.x1, self.mid_y())
    }

    /// True when the interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }
}

/// Where the `(x, y)` given to [`Surface::draw_text`] sits on the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    Center,
}

/// Something the diagram can be drawn onto.
///
/// Implementations own every element drawn since the last [`Surface::clear`].
pub trait Surface {
    /// Drop every drawn element.
    fn clear(&mut self);

    /// Width currently visible to the user; the layout wraps rows at this width.
    fn visible_width(&self) -> f64;

    fn text_width(&self, text: &str, font: Font) -> f64;

    fn draw_rect(&mut self, rect: Rect);

    /// Draw a single line of text and return its bounds.
    fn draw_text(&mut self, at: Point, text: &str, font: Font, anchor: TextAnchor) -> Rect;

    /// Draw a straight line, with an arrowhead at `to` when `arrow` is set.
    fn draw_line(&mut self, from: Point, to: Point, arrow: bool);
}
