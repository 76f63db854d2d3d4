use crate::core::index::{IngestStats, RelationalIndex};
use crate::core::layout::SourceLayout;
use crate::core::translation::TranslationAttacher;
use crate::core::types::{CharacterAnalysis, WordRecord};
use crate::error::Result;
use crate::persistence::{load_from_disk, save_to_disk};
use crate::source::{read_source, Row};
use log::info;
use std::borrow::Cow;
use std::path::Path;

/// Owns the index and runs the two ingestion passes in order:
/// the words source completely, then the translation source.
pub struct DeckEngine {
    pub index: RelationalIndex,
    layout: SourceLayout,
    attacher: TranslationAttacher,
}

impl DeckEngine {
    pub fn new() -> Self {
        Self::with_layout(SourceLayout::default())
    }

    pub fn with_layout(layout: SourceLayout) -> Self {
        Self {
            index: RelationalIndex::new(),
            attacher: TranslationAttacher::new(layout.clone()),
            layout,
        }
    }

    /// Builds an engine from already-parsed rows.
    pub fn from_rows(word_rows: &[Row], translation_rows: &[Row]) -> Self {
        let mut engine = Self::new();
        engine.ingest(word_rows, translation_rows);
        engine
    }

    /// Builds an engine from the two source files.
    pub fn from_files(words_path: &Path, translations_path: &Path) -> Result<Self> {
        let word_rows = read_source(words_path)?;
        let translation_rows = read_source(translations_path)?;
        Ok(Self::from_rows(&word_rows, &translation_rows))
    }

    /// Restores an engine from an index snapshot.
    pub fn from_snapshot(path: &Path) -> Result<Self> {
        let mut engine = Self::new();
        engine.index = load_from_disk(path)?;
        info!("Loaded {} words from snapshot {}", engine.index.word_count(), path.display());
        Ok(engine)
    }

    /// Runs both passes. The translation pass must come last so its
    /// pronunciations overwrite, and are never overwritten by, the words pass.
    pub fn ingest(&mut self, word_rows: &[Row], translation_rows: &[Row]) -> (IngestStats, IngestStats) {
        let words = self.index.ingest_character_rows(word_rows, &self.layout);
        let translations = self.attacher.attach_rows(&mut self.index, translation_rows);
        (words, translations)
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        save_to_disk(&self.index, path)
    }

    pub fn get_word(&self, word: &str) -> Cow<'_, WordRecord> {
        self.index.get_word(word)
    }

    pub fn list_all_words(&self) -> Vec<&str> {
        self.index.list_all_words()
    }

    pub fn analyze_character(&self, character: &str, word: Option<&str>) -> CharacterAnalysis {
        self.index.analyze_character(character, word)
    }
}

impl Default for DeckEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_source;

    #[test]
    fn translation_pass_runs_after_words_pass() {
        let words = parse_source("A;wo3;我;;;;;;;;;我们,你好\n");
        let translations = parse_source("我们;wo3men;pronoun: we, us\n新词;xin1ci2;noun: neologism\n");
        let mut engine = DeckEngine::new();
        let (w, t) = engine.ingest(&words, &translations);
        assert_eq!(w.accepted, 1);
        assert_eq!(t.accepted, 2);
        assert_eq!(engine.list_all_words(), vec!["我们", "你好", "新词"]);
        let record = engine.get_word("我们");
        assert_eq!(record.pronunciation.as_deref(), Some("wo3men"));
        assert_eq!(record.pronunciation_of("我"), Some("wo3"));
    }
}
