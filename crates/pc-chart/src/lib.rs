//! Chart renderers for POV Count.
//!
//! A renderer turns a [`Chart`] built by `pc-core` into text: coloured
//! terminal output, a standalone SVG document, or JSON. Styling is passed in
//! explicitly through [`ChartStyle`]; nothing here keeps global state.

use std::path::Path;

use pc_core::Chart;

/// Error types for rendering.
pub mod error;
/// JSON output.
pub mod json;
pub mod style;
/// SVG output.
pub mod svg;
/// Coloured terminal output.
pub mod terminal;

/// Re-export error types.
pub use error::{ChartError, ChartResult};
/// Re-export the JSON renderer.
pub use json::JsonRenderer;
/// Re-export styling types.
pub use style::{ChartStyle, Palette, Rgb};
/// Re-export the SVG renderer.
pub use svg::SvgRenderer;
/// Re-export the terminal renderer.
pub use terminal::TerminalRenderer;

/// Something that can draw a chart.
pub trait ChartRenderer {
    /// Render `chart` to a string.
    fn render(&self, chart: &Chart) -> ChartResult<String>;

    /// Render `chart` and write it to `path`.
    fn render_to_file(&self, chart: &Chart, path: &Path) -> ChartResult<()> {
        let content = self.render(chart)?;
        std::fs::write(path, content).map_err(|source| ChartError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), kind = %chart.kind(), "chart written");
        Ok(())
    }
}
