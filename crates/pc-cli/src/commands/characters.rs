use std::collections::HashMap;

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use pc_core::{ChapterFilter, CountMode, aggregate};

use crate::config::Settings;

pub fn run(settings: &Settings) -> Result<(), String> {
    let corpus = super::load_corpus(settings)?;
    let registry = &corpus.registry;
    let scenes = corpus.scenes.scenes();

    let pov_words = aggregate(
        registry.known_names(),
        scenes,
        &ChapterFilter::All,
        CountMode::default().with_pov_only(true),
    )
    .map_err(|e| e.to_string())?;
    let all_words = aggregate(
        registry.known_names(),
        scenes,
        &ChapterFilter::All,
        CountMode::default(),
    )
    .map_err(|e| e.to_string())?;

    let mut pov_scenes: HashMap<&str, usize> = HashMap::new();
    for scene in scenes {
        *pov_scenes.entry(scene.pov.canonical.as_str()).or_default() += 1;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Character",
        "Aliases",
        "POV scenes",
        "POV words",
        "All words",
    ]);

    for name in registry.canonical_names() {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(registry.aliases_of(name).join(", ")),
            Cell::new(pov_scenes.get(name).copied().unwrap_or(0))
                .set_alignment(CellAlignment::Right),
            Cell::new(pov_words.get(name).unwrap_or(0)).set_alignment(CellAlignment::Right),
            Cell::new(all_words.get(name).unwrap_or(0)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} characters", registry.character_count());

    Ok(())
}
