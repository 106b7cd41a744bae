//! Table sizing and flow placement.

use crate::measure::Font;
use crate::model::{ColumnDescriptor, KeyKind};
use crate::surface::{Rect, Surface};

/// Fixed dimensions of the diagram.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub margin: f64,
    pub gap: f64,
    pub header_height: f64,
    pub row_height: f64,
    pub text_padding: f64,
    pub rect_padding: f64,
    pub min_table_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            gap: 30.0,
            header_height: 30.0,
            row_height: 20.0,
            text_padding: 15.0,
            rect_padding: 10.0,
            min_table_width: 250.0,
        }
    }
}

/// A table's rectangle on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayoutBox {
    pub table: String,
    pub rect: Rect,
}

/// Format a column line as `name (TYPE(len)) [PK][FK]`.
///
/// At most one of `[PK]`/`[UN]` is shown; `[FK]` is appended for foreign-key
/// sources regardless.
pub fn column_label(column: &ColumnDescriptor, is_fk: bool) -> String {
    let mut data_type = column.data_type.to_uppercase();
    if let Some(len) = column.length.filter(|&l| l != 0) {
        data_type.push_str(&format!("({})", len));
    }

    let mut tags = String::new();
    match column.key {
        KeyKind::Primary => tags.push_str("[PK]"),
        KeyKind::Unique => tags.push_str("[UN]"),
        KeyKind::None => {}
    }
    if is_fk {
        tags.push_str("[FK]");
    }

    if tags.is_empty() {
        format!("{} ({})", column.name, data_type)
    } else {
        format!("{} ({}) {}", column.name, data_type, tags)
    }
}

/// Width and height of a table box holding `name` and the given column lines.
pub fn table_size(
    surface: &dyn Surface,
    name: &str,
    column_lines: &[String],
    config: &LayoutConfig,
) -> (f64, f64) {
    let content_width = column_lines
        .iter()
        .map(|line| surface.text_width(line, Font::Column))
        .fold(surface.text_width(name, Font::Header), f64::max);

    let width = (content_width + 2.0 * config.rect_padding + 2.0 * config.text_padding)
        .max(config.min_table_width);
    let height = config.header_height
        + column_lines.len() as f64 * config.row_height
        + 2.0 * config.rect_padding;

    (width, height)
}

/// Place boxes left to right, wrapping to a new row when the next box would
/// cross `visible_width`.
///
/// The first box of a row is never wrapped, so a surface narrower than a box
/// yields one box per row.
pub fn flow_layout(
    sizes: &[(String, (f64, f64))],
    visible_width: f64,
    config: &LayoutConfig,
) -> Vec<TableLayoutBox> {
    let mut boxes = Vec::with_capacity(sizes.len());
    let mut x = config.margin;
    let mut y = config.margin;
    let mut row_height: f64 = 0.0;
    let mut in_row = 0usize;

    for (name, (w, h)) in sizes {
        if in_row > 0 && x + w > visible_width {
            x = config.margin;
            y += row_height + config.gap;
            row_height = 0.0;
            in_row = 0;
        }

        boxes.push(TableLayoutBox {
            table: name.clone(),
            rect: Rect::from_size(x, y, *w, *h),
        });

        x += w + config.gap;
        row_height = row_height.max(*h);
        in_row += 1;
    }

    boxes
}
