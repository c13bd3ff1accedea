use colored::Colorize;

use crate::config::Settings;

pub fn run(settings: &Settings) -> Result<(), String> {
    let corpus = super::load_corpus(settings)?;
    let registry = &corpus.registry;
    let scenes = &corpus.scenes;

    println!(
        "  {} {} and {}",
        "OK".green().bold(),
        settings.lookup.display(),
        settings.scenes.display()
    );
    println!(
        "  {} aliases, {} characters, {} alternate identities",
        registry.alias_count(),
        registry.character_count(),
        registry.alternate_identities().count()
    );

    let words = scenes
        .total_words()
        .ok_or_else(|| "scene word counts add up to more than 2^64 - 1".to_string())?;
    let chapters = scenes.chapters();
    match (chapters.first(), chapters.last()) {
        (Some(first), Some(last)) => println!(
            "  {} scenes in {} chapters ({first}-{last}), {words} words",
            scenes.len(),
            chapters.len()
        ),
        _ => println!("  {}", "No scenes found.".dimmed()),
    }

    Ok(())
}
