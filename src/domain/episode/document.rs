use std::collections::HashMap;
use std::path::Path;

/// Separator between the optional header block and the spoken body
pub const HEADER_DELIMITER: &str = "---";

/// Extension of every synthesized artifact
pub const AUDIO_EXTENSION: &str = "mp3";

/// A raw text document as handed over by a document source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Options from a document header, keyed by lower-cased option name.
///
/// Every key found in the header is kept, recognized or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeConfig {
    options: HashMap<String, String>,
}

impl EpisodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.options
            .insert(key.as_ref().trim().to_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for EpisodeConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = EpisodeConfig::new();
        for (key, value) in iter {
            config.insert(key, value);
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub config: EpisodeConfig,
    pub body: String,
}

/// Split a document into its header options and body.
///
/// Only the first `---` separates header from body. Header lines without a
/// `:` are skipped; a malformed header never fails the parse.
pub fn parse_document(content: &str) -> ParsedDocument {
    let Some((header, body)) = content.split_once(HEADER_DELIMITER) else {
        return ParsedDocument {
            config: EpisodeConfig::new(),
            body: content.trim().to_string(),
        };
    };

    let config = header
        .trim()
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    ParsedDocument {
        config,
        body: body.trim().to_string(),
    }
}

/// Output key for a document: `<stem>.mp3`, or `<stem>_<lang>.mp3` when a
/// target language is set.
pub fn output_key(document_name: &str, language: &str) -> String {
    let stem = Path::new(document_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(document_name);

    if language.is_empty() {
        format!("{}.{}", stem, AUDIO_EXTENSION)
    } else {
        format!("{}_{}.{}", stem, language, AUDIO_EXTENSION)
    }
}
