use std::path::Path;

use pc_chart::{ChartRenderer, JsonRenderer, SvgRenderer, TerminalRenderer};

use crate::config::Settings;
use crate::{ChartArgs, OutputFormat};

pub fn run(
    settings: &Settings,
    args: &ChartArgs,
    format: Option<OutputFormat>,
    output: Option<&Path>,
) -> Result<(), String> {
    let corpus = super::load_corpus(settings)?;
    let chart = corpus
        .chart(&super::request(settings, args))
        .map_err(|e| e.to_string())?;

    let format = format.unwrap_or_else(|| infer_format(output));
    let renderer: Box<dyn ChartRenderer> = match format {
        OutputFormat::Terminal => Box::new(TerminalRenderer::new(settings.style.clone())),
        OutputFormat::Svg => Box::new(SvgRenderer::new(settings.style.clone())),
        OutputFormat::Json => Box::new(JsonRenderer),
    };

    if let Some(path) = output {
        renderer
            .render_to_file(&chart, path)
            .map_err(|e| e.to_string())?;
        println!("  Wrote {} chart to {}", chart.kind(), path.display());
    } else {
        print!("{}", renderer.render(&chart).map_err(|e| e.to_string())?);
    }

    Ok(())
}

/// Pick a format from the output file extension.
fn infer_format(output: Option<&Path>) -> OutputFormat {
    match output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("svg") => OutputFormat::Svg,
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Terminal,
    }
}
