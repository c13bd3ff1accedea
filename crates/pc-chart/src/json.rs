use pc_core::Chart;

use crate::{ChartRenderer, ChartResult};

/// Renders the chart dataset as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ChartRenderer for JsonRenderer {
    fn render(&self, chart: &Chart) -> ChartResult<String> {
        let mut out = serde_json::to_string_pretty(chart)?;
        out.push('\n');
        Ok(out)
    }
}
