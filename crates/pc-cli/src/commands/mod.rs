pub mod characters;
pub mod chart;
pub mod check;
pub mod interactive;

use pc_core::{ChartRequest, CountMode, Corpus};

use crate::ChartArgs;
use crate::config::Settings;

/// Load both input tables named by the settings.
pub fn load_corpus(settings: &Settings) -> Result<Corpus, String> {
    let corpus = Corpus::load(&settings.lookup, &settings.scenes).map_err(|e| e.to_string())?;
    tracing::info!(
        lookup = %settings.lookup.display(),
        scenes = corpus.scenes.len(),
        "inputs loaded"
    );
    Ok(corpus)
}

/// Build a chart request from command-line options.
pub fn request(settings: &Settings, args: &ChartArgs) -> ChartRequest {
    ChartRequest::new(args.kind)
        .with_chapters(args.chapters.clone())
        .with_title(args.title.clone())
        .with_mode(
            CountMode::default()
                .with_alternate_identities(args.alternate)
                .with_pov_only(args.pov_only),
        )
        .with_count(args.count.unwrap_or(settings.count))
}
