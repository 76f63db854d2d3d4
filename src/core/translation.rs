// src/core/translation.rs
use crate::core::index::{IngestStats, RelationalIndex};
use crate::core::layout::SourceLayout;
use crate::core::types::{decompose_literal, Translations};
use log::{debug, info};

/// Parses `category: gloss, gloss | category: gloss` into a category map.
/// Segments without a `:` or with an empty category are dropped; empty glosses
/// are dropped but their category is still recorded.
pub fn parse_translations(blob: &str) -> Translations {
    let mut translations = Translations::new();
    for segment in blob.split('|').map(str::trim) {
        let Some((category, glosses)) = segment.split_once(':') else {
            continue;
        };
        let category = category.trim();
        let glosses: Vec<String> = glosses
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect();
        if category.is_empty() {
            continue;
        }
        translations.extend_category(category, glosses);
    }
    translations
}

/// Second ingestion pass: whole-word pronunciations and glosses.
/// Never touches the character/pronunciation maps.
pub struct TranslationAttacher {
    layout: SourceLayout,
}

impl TranslationAttacher {
    pub fn new(layout: SourceLayout) -> Self {
        Self { layout }
    }

    /// Applies one translation row. Returns false if the row was skipped.
    pub fn attach(&self, index: &mut RelationalIndex, row: &[String]) -> bool {
        if row.len() < 3 || row.len() < self.layout.min_translation_row_len() {
            return false;
        }
        let word = row[self.layout.translation_word_column].trim();
        let pronunciation = row[self.layout.translation_pronunciation_column].trim();
        let blob = row[self.layout.translation_blob_column].trim();
        if word.is_empty() || blob.is_empty() {
            return false;
        }

        let translations = parse_translations(blob);
        // Unlike the words source, punctuation stays in the seed here.
        let id = index.get_or_create_word(word, decompose_literal);
        let record = index.word_mut(id);
        record.pronunciation = Some(pronunciation.to_string());
        record.translations = Some(translations);
        true
    }

    pub fn attach_rows<'a, I>(&self, index: &mut RelationalIndex, rows: I) -> IngestStats
    where
        I: IntoIterator<Item = &'a Vec<String>>,
    {
        let mut stats = IngestStats::default();
        for (line, row) in rows.into_iter().enumerate() {
            if self.attach(index, row) {
                stats.accepted += 1;
            } else {
                debug!("Skipping malformed translation row {}: {:?}", line + 1, row);
                stats.skipped += 1;
            }
        }
        info!(
            "Translation source: {} rows accepted, {} skipped",
            stats.accepted, stats.skipped
        );
        stats
    }
}

impl Default for TranslationAttacher {
    fn default() -> Self {
        Self::new(SourceLayout::default())
    }
}
