use std::collections::BTreeSet;

use crate::error::{Location, PovError, PovResult};
use crate::registry::{NameRegistry, is_alternate_identity};

/// Which identity view to count and whether featured characters count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountMode {
    /// Track alternate identities separately from their canonical character.
    pub alternate_identities: bool,
    /// Count only the point-of-view character of each scene.
    pub pov_only: bool,
}

impl CountMode {
    /// Toggle alternate-identity tracking.
    pub fn with_alternate_identities(mut self, enabled: bool) -> Self {
        self.alternate_identities = enabled;
        self
    }

    /// Toggle point-of-view-only counting.
    pub fn with_pov_only(mut self, enabled: bool) -> Self {
        self.pov_only = enabled;
        self
    }
}

/// One character's presence in a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    /// Canonical display name.
    pub canonical: String,
    /// The raw alias when the character appears under an alternate identity.
    pub alternate: Option<String>,
}

impl Appearance {
    /// Resolve a raw alias token through the registry.
    pub fn resolve(alias: &str, registry: &NameRegistry) -> PovResult<Self> {
        let canonical = registry.resolve(alias)?.to_string();
        let alternate = is_alternate_identity(alias).then(|| alias.to_string());
        Ok(Self {
            canonical,
            alternate,
        })
    }

    /// The name this appearance counts under.
    pub fn name(&self, alternate_identities: bool) -> &str {
        match (&self.alternate, alternate_identities) {
            (Some(alias), true) => alias,
            _ => &self.canonical,
        }
    }
}

/// A single scene from the word-count log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// Chapter the scene belongs to.
    pub chapter: u32,
    /// Number of words in the scene.
    pub word_count: u64,
    /// Point-of-view character.
    pub pov: Appearance,
    /// Other characters featured in the scene, in log order.
    pub featured: Vec<Appearance>,
}

impl Scene {
    /// Parse a `chapter;pov;featured,csv;word_count` line.
    ///
    /// Errors carry no location; [`SceneLog::parse`] adds the file and line.
    pub fn parse(line: &str, registry: &NameRegistry) -> PovResult<Self> {
        Self::parse_at(line, registry, None)
    }

    fn parse_at(
        line: &str,
        registry: &NameRegistry,
        location: Option<Location>,
    ) -> PovResult<Self> {
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(PovError::MalformedLine {
                location: location.clone(),
                reason: format!("expected 4 fields, found {}", fields.len()),
            });
        }

        let chapter = fields[0]
            .parse::<u32>()
            .map_err(|_| PovError::InvalidNumber {
                location: location.clone(),
                field: "chapter",
                value: fields[0].to_string(),
            })?;
        let word_count = fields[3]
            .parse::<u64>()
            .map_err(|_| PovError::InvalidNumber {
                location: location.clone(),
                field: "word count",
                value: fields[3].to_string(),
            })?;

        let resolve = |alias: &str| {
            Appearance::resolve(alias, registry).map_err(|err| match err {
                PovError::UnknownAlias { alias, .. } => PovError::UnknownAlias {
                    alias,
                    location: location.clone(),
                },
                other => other,
            })
        };

        if fields[1].is_empty() {
            return Err(PovError::MalformedLine {
                location: location.clone(),
                reason: "missing point-of-view character".into(),
            });
        }
        let pov = resolve(fields[1])?;

        let mut featured = Vec::new();
        if !fields[2].is_empty() {
            for token in fields[2].split(',').map(str::trim) {
                if token.is_empty() {
                    return Err(PovError::MalformedLine {
                        location: location.clone(),
                        reason: "empty name in featured character list".into(),
                    });
                }
                featured.push(resolve(token)?);
            }
        }

        Ok(Self {
            chapter,
            word_count,
            pov,
            featured,
        })
    }

    /// Names this scene's words are attributed to: the point-of-view
    /// character first, then featured characters in log order.
    pub fn get_all_chars(&self, mode: CountMode) -> Vec<&str> {
        let pov = self.pov.name(mode.alternate_identities);
        if mode.pov_only {
            return vec![pov];
        }
        std::iter::once(pov)
            .chain(
                self.featured
                    .iter()
                    .map(|a| a.name(mode.alternate_identities)),
            )
            .collect()
    }
}

/// Every scene of the work, in log order.
#[derive(Debug, Clone, Default)]
pub struct SceneLog {
    scenes: Vec<Scene>,
}

impl SceneLog {
    /// Parse a whole scene log. Blank lines are skipped.
    pub fn parse(source: &str, text: &str, registry: &NameRegistry) -> PovResult<Self> {
        let mut scenes = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let scene = Scene::parse_at(line, registry, Some(Location::new(source, idx + 1)))?;
            tracing::trace!(
                line = idx + 1,
                chapter = scene.chapter,
                words = scene.word_count,
                "parsed scene"
            );
            scenes.push(scene);
        }
        tracing::debug!(source, scenes = scenes.len(), "loaded scene log");
        Ok(Self { scenes })
    }

    /// All scenes.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Distinct chapter numbers present, ascending.
    pub fn chapters(&self) -> Vec<u32> {
        self.scenes
            .iter()
            .map(|s| s.chapter)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sum of word counts over every scene, or `None` if it overflows.
    pub fn total_words(&self) -> Option<u64> {
        self.scenes
            .iter()
            .try_fold(0u64, |total, s| total.checked_add(s.word_count))
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the log has no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl From<Vec<Scene>> for SceneLog {
    fn from(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }
}
