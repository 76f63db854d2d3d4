// src/core/layout.rs
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Column positions of the two tabular sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLayout {
    pub pronunciation_column: usize,
    /// Half-open range of the character columns in the words source.
    pub character_columns: Range<usize>,
    /// Half-open range of the comma-separated word-group columns.
    pub word_group_columns: Range<usize>,
    pub translation_word_column: usize,
    pub translation_pronunciation_column: usize,
    pub translation_blob_column: usize,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            pronunciation_column: 1,
            character_columns: 2..11,
            word_group_columns: 11..16,
            translation_word_column: 0,
            translation_pronunciation_column: 1,
            translation_blob_column: 2,
        }
    }
}

impl SourceLayout {
    /// Minimum number of columns a words-source row needs to be considered.
    pub fn min_word_row_len(&self) -> usize {
        self.pronunciation_column + 1
    }

    /// Minimum number of columns a translation row needs to be considered.
    pub fn min_translation_row_len(&self) -> usize {
        self.translation_word_column
            .max(self.translation_pronunciation_column)
            .max(self.translation_blob_column)
            + 1
    }

    /// The cells of `row` inside `range`, clipped to the row's length.
    /// An inverted range selects nothing.
    pub fn slice<'a>(row: &'a [String], range: &Range<usize>) -> &'a [String] {
        let end = range.end.min(row.len());
        let start = range.start.min(end);
        &row[start..end]
    }
}
