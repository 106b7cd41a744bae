//! Diagram rendering: boxes, column anchors and foreign-key connectors.

use crate::layout::{LayoutConfig, TableLayoutBox, column_label, flow_layout, table_size};
use crate::measure::Font;
use crate::model::{ColumnRef, ForeignKeyEdge, Schema, Table};
use crate::surface::{Point, Rect, Surface, TextAnchor};
use std::collections::{HashMap, HashSet};

/// A drawn foreign-key line.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub source: ColumnRef,
    pub target: ColumnRef,
    pub from: Point,
    pub to: Point,
}

/// Everything computed by one render pass.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    pub boxes: Vec<TableLayoutBox>,
    /// Bounds of each drawn column line
    pub anchors: HashMap<ColumnRef, Rect>,
    pub connectors: Vec<Connector>,
    /// Edges that could not be drawn
    pub skipped: Vec<ForeignKeyEdge>,
}

impl Diagram {
    pub fn table_box(&self, table: &str) -> Option<&TableLayoutBox> {
        self.boxes.iter().find(|b| b.table == table)
    }
}

#[derive(Default)]
pub struct DiagramRenderer {
    config: LayoutConfig,
}

impl DiagramRenderer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Clear `surface` and draw the whole schema onto it.
    pub fn render(
        &self,
        surface: &mut dyn Surface,
        schema: &Schema,
        edges: &[ForeignKeyEdge],
    ) -> Diagram {
        surface.clear();
        let mut diagram = Diagram::default();

        let fk_sources: HashSet<ColumnRef> = edges.iter().map(|e| e.source()).collect();

        let labels: Vec<Vec<String>> = schema
            .tables()
            .iter()
            .map(|t| {
                t.columns
                    .iter()
                    .map(|c| {
                        let is_fk = fk_sources.contains(&ColumnRef::new(&t.name, &c.name));
                        column_label(c, is_fk)
                    })
                    .collect()
            })
            .collect();

        let measure: &dyn Surface = &*surface;
        let sizes: Vec<(String, (f64, f64))> = schema
            .tables()
            .iter()
            .zip(&labels)
            .map(|(t, lines)| (t.name.clone(), table_size(measure, &t.name, lines, &self.config)))
            .collect();

        diagram.boxes = flow_layout(&sizes, surface.visible_width(), &self.config);

        for ((table, lines), layout_box) in schema.tables().iter().zip(&labels).zip(&diagram.boxes) {
            self.draw_table(surface, layout_box, table, lines, &mut diagram.anchors);
        }

        tracing::debug!(tables = diagram.boxes.len(), "placed tables");

        let placed: HashSet<&str> = diagram.boxes.iter().map(|b| b.table.as_str()).collect();
        let mut connectors = Vec::new();
        let mut skipped = Vec::new();

        for edge in edges {
            if !placed.contains(edge.source_table.as_str()) || !placed.contains(edge.target_table.as_str()) {
                tracing::warn!(
                    source = %edge.source_table,
                    target = %edge.target_table,
                    "table position not found for foreign key, skipping"
                );
                skipped.push(edge.clone());
                continue;
            }

            let source = edge.source();
            let target = edge.target();
            match (diagram.anchors.get(&source), diagram.anchors.get(&target)) {
                (Some(from_rect), Some(to_rect)) => {
                    let from = from_rect.right_mid();
                    let to = to_rect.left_mid();
                    surface.draw_line(from, to, true);
                    connectors.push(Connector {
                        source,
                        target,
                        from,
                        to,
                    });
                }
                _ => {
                    tracing::warn!(
                        source = %source,
                        target = %target,
                        "column anchor not found for foreign key, skipping"
                    );
                    skipped.push(edge.clone());
                }
            }
        }

        diagram.connectors = connectors;
        diagram.skipped = skipped;
        diagram
    }

    fn draw_table(
        &self,
        surface: &mut dyn Surface,
        layout_box: &TableLayoutBox,
        table: &Table,
        lines: &[String],
        anchors: &mut HashMap<ColumnRef, Rect>,
    ) {
        let rect = layout_box.rect;
        surface.draw_rect(rect);

        let header_center = Point::new(
            rect.x1 + rect.width() / 2.0,
            rect.y1 + self.config.header_height / 2.0,
        );
        surface.draw_text(header_center, &table.name, Font::Header, TextAnchor::Center);

        let x = rect.x1 + self.config.text_padding;
        let mut y = rect.y1 + self.config.header_height + self.config.rect_padding;
        for (column, line) in table.columns.iter().zip(lines) {
            let bounds = surface.draw_text(Point::new(x, y), line, Font::Column, TextAnchor::TopLeft);
            anchors.insert(ColumnRef::new(&table.name, &column.name), bounds);
            y += self.config.row_height;
        }
    }
}
