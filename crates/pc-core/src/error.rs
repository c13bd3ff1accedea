use std::fmt;
use std::path::PathBuf;

/// Alias for `Result<T, PovError>`.
pub type PovResult<T> = Result<T, PovError>;

/// A position in one of the input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Label of the source (usually the file path).
    pub source: String,
    /// 1-based line number.
    pub line: usize,
}

impl Location {
    /// Create a location for `line` in `source`.
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        Self {
            source: source.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

/// Errors raised while loading input tables or building charts.
#[derive(Debug, thiserror::Error)]
pub enum PovError {
    /// A line does not split into the expected fields.
    #[error("{}malformed line: {reason}", location_prefix(.location))]
    MalformedLine {
        /// Where the line was read, if known.
        location: Option<Location>,
        /// What is wrong with it.
        reason: String,
    },

    /// A numeric field could not be parsed.
    #[error("{}invalid {field} \"{value}\"", location_prefix(.location))]
    InvalidNumber {
        /// Where the line was read, if known.
        location: Option<Location>,
        /// Name of the field (`chapter`, `word count`).
        field: &'static str,
        /// The raw text.
        value: String,
    },

    /// An alias is not present in the character lookup table.
    #[error("{}unknown character alias \"{alias}\"", location_prefix(.location))]
    UnknownAlias {
        /// The unresolved alias.
        alias: String,
        /// Where the alias was referenced, if known.
        location: Option<Location>,
    },

    /// Aggregation produced a name outside the known character set.
    #[error("unknown character name \"{0}\"")]
    UnknownCharacterName(String),

    /// Summed word counts no longer fit in a `u64`.
    #[error("word count total overflows while counting \"{0}\"")]
    WordCountOverflow(String),

    /// The lookup table has no `Other` canonical name.
    #[error("lookup table has no \"Other\" character")]
    MissingOtherBucket,

    /// A chapter specification could not be parsed.
    #[error("invalid chapter spec \"{0}\" (expected e.g. \"5\", \"1-4\", \"1,3,7\" or \"all\")")]
    InvalidChapterSpec(String),

    /// The number of characters to display is not a non-negative integer.
    #[error("invalid character count \"{0}\"")]
    InvalidCount(String),

    /// Unrecognised chart kind.
    #[error("unknown chart kind \"{0}\" (expected bar, pie or stacked bar)")]
    InvalidChartKind(String),

    /// An input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

fn location_prefix(location: &Option<Location>) -> String {
    match location {
        Some(loc) => format!("{loc}: "),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_line_mentions_location() {
        let err = PovError::MalformedLine {
            location: Some(Location::new("POVCounts.txt", 12)),
            reason: "expected 4 fields, found 3".into(),
        };
        assert_eq!(
            err.to_string(),
            "POVCounts.txt:12: malformed line: expected 4 fields, found 3"
        );
    }

    #[test]
    fn unknown_alias_without_location() {
        let err = PovError::UnknownAlias {
            alias: "Zed".into(),
            location: None,
        };
        assert_eq!(err.to_string(), "unknown character alias \"Zed\"");
    }

    #[test]
    fn invalid_number_without_location() {
        let err = PovError::InvalidNumber {
            location: None,
            field: "chapter",
            value: "one".into(),
        };
        assert_eq!(err.to_string(), "invalid chapter \"one\"");
    }
}
