pub mod fixture;
pub mod layout;
pub mod measure;
pub mod model;
pub mod reader;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod surface;
pub mod svg;

use wasm_bindgen::prelude::*;

use render::DiagramRenderer;
use snapshot::Snapshot;
use svg::{DEFAULT_VISIBLE_WIDTH, SvgSurface};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render a JSON schema snapshot to SVG
#[wasm_bindgen(js_name = "schemaToSvg")]
pub fn render_snapshot(json: &str, width: Option<f64>) -> Result<String, String> {
    let snapshot = Snapshot::from_json(json).map_err(|e| e.to_string())?;
    let (schema, edges) = snapshot.into_parts();

    let mut surface = SvgSurface::new(width.unwrap_or(DEFAULT_VISIBLE_WIDTH));
    DiagramRenderer::default().render(&mut surface, &schema, &edges);

    Ok(surface.to_svg())
}
