use crate::measure::{Font, TextMetrics};
use crate::surface::{Point, Rect, Surface, TextAnchor};
use std::fmt::Write;

/// Visible width of the original window's canvas.
pub const DEFAULT_VISIBLE_WIDTH: f64 = 1000.0;
const MIN_HEIGHT: f64 = 600.0;
const EDGE_MARGIN: f64 = 20.0;

#[derive(Debug, Clone)]
enum Shape {
    Rect(Rect),
    Text {
        at: Point,
        text: String,
        font: Font,
        anchor: TextAnchor,
        bounds: Rect,
    },
    Line {
        from: Point,
        to: Point,
        arrow: bool,
    },
}

/// Surface that records shapes and serializes them as an SVG document.
pub struct SvgSurface {
    metrics: TextMetrics,
    visible_width: f64,
    shapes: Vec<Shape>,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBLE_WIDTH)
    }
}

impl SvgSurface {
    pub fn new(visible_width: f64) -> Self {
        Self {
            metrics: TextMetrics::default(),
            visible_width,
            shapes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of lines drawn with an arrowhead.
    pub fn arrow_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Line { arrow: true, .. }))
            .count()
    }

    /// Document size: at least the visible width, grown to fit every shape.
    pub fn size(&self) -> (f64, f64) {
        let mut width = self.visible_width;
        let mut height = MIN_HEIGHT;
        for shape in &self.shapes {
            let (x, y) = match shape {
                Shape::Rect(r) => (r.x2, r.y2),
                Shape::Text { bounds, .. } => (bounds.x2, bounds.y2),
                Shape::Line { from, to, .. } => (from.x.max(to.x), from.y.max(to.y)),
            };
            width = width.max(x + EDGE_MARGIN);
            height = height.max(y + EDGE_MARGIN);
        }
        (width, height)
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let (width, height) = self.size();

        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<style>
  .canvas {{ fill: lightgray; }}
  .table-box {{ fill: lightblue; stroke: black; stroke-width: 2; }}
  .table-name {{ font: {}; fill: navy; }}
  .column {{ font: {}; fill: black; }}
  .relationship {{ stroke: blue; stroke-width: 2; fill: none; }}
</style>"#,
            Font::Header.css(),
            Font::Column.css()
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="blue" /></marker></defs>"#
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<rect class="canvas" x="0" y="0" width="{}" height="{}" />"#,
            width, height
        )
        .unwrap();

        for shape in &self.shapes {
            write_shape(&mut svg, shape);
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }
}

fn write_shape(svg: &mut String, shape: &Shape) {
    match shape {
        Shape::Rect(r) => {
            writeln!(
                svg,
                r#"<rect class="table-box" x="{}" y="{}" width="{}" height="{}" />"#,
                r.x1,
                r.y1,
                r.width(),
                r.height()
            )
            .unwrap();
        }
        Shape::Text {
            at,
            text,
            font,
            anchor,
            ..
        } => {
            let class = match font {
                Font::Header => "table-name",
                Font::Column => "column",
            };
            let placement = match anchor {
                TextAnchor::TopLeft => r#"dominant-baseline="hanging""#,
                TextAnchor::Center => r#"text-anchor="middle" dominant-baseline="central""#,
            };
            writeln!(
                svg,
                r#"<text class="{}" x="{}" y="{}" {}>{}</text>"#,
                class,
                at.x,
                at.y,
                placement,
                escape_xml(text)
            )
            .unwrap();
        }
        Shape::Line { from, to, arrow } => {
            let marker = if *arrow { r#" marker-end="url(#arrow)""# } else { "" };
            writeln!(
                svg,
                r#"<line class="relationship" x1="{}" y1="{}" x2="{}" y2="{}"{} />"#,
                from.x, from.y, to.x, to.y, marker
            )
            .unwrap();
        }
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn visible_width(&self) -> f64 {
        self.visible_width
    }

    fn text_width(&self, text: &str, font: Font) -> f64 {
        self.metrics.text_width(text, font)
    }

    fn draw_rect(&mut self, rect: Rect) {
        self.shapes.push(Shape::Rect(rect));
    }

    fn draw_text(&mut self, at: Point, text: &str, font: Font, anchor: TextAnchor) -> Rect {
        let w = self.metrics.text_width(text, font);
        let h = self.metrics.line_height(font);
        let bounds = match anchor {
            TextAnchor::TopLeft => Rect::from_size(at.x, at.y, w, h),
            TextAnchor::Center => Rect::from_size(at.x - w / 2.0, at.y - h / 2.0, w, h),
        };
        self.shapes.push(Shape::Text {
            at,
            text: text.to_string(),
            font,
            anchor,
            bounds,
        });
        bounds
    }

    fn draw_line(&mut self, from: Point, to: Point, arrow: bool) {
        self.shapes.push(Shape::Line { from, to, arrow });
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
