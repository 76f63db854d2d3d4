// src/core/index.rs
use crate::core::layout::SourceLayout;
use crate::core::types::{
    decompose_filtered, is_punctuation, CharacterAnalysis, OrderedSet, WordId, WordRecord,
};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// How many rows a pass accepted and how many it dropped as malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub accepted: usize,
    pub skipped: usize,
}

/// Character / pronunciation / word relationships derived from the sources.
/// Entries are only ever added; nothing is pruned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationalIndex {
    word_store: Vec<WordRecord>,
    word_ids: HashMap<String, WordId>,
    char_to_pron: HashMap<String, OrderedSet>,
    pron_to_chars: HashMap<String, OrderedSet>,
    char_to_words: HashMap<String, OrderedSet>,
}

impl RelationalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_word_id(&self, word: &str) -> Option<WordId> {
        self.word_ids.get(word).copied()
    }

    /// Gets or creates the record for `word`, seeding its characters only on creation.
    pub(crate) fn get_or_create_word<F>(&mut self, word: &str, seed: F) -> WordId
    where
        F: FnOnce(&str) -> Vec<String>,
    {
        if let Some(id) = self.find_word_id(word) {
            return id;
        }
        let characters: OrderedSet = seed(word).iter().map(String::as_str).collect();
        self.word_store.push(WordRecord::new(word, characters));
        let id = self.word_store.len() - 1;
        self.word_ids.insert(word.to_string(), id);
        trace!("New word '{}' (id {})", word, id);
        id
    }

    pub(crate) fn word_mut(&mut self, id: WordId) -> &mut WordRecord {
        &mut self.word_store[id]
    }

    /// Records a (character, pronunciation) pair in both directions.
    fn link_pronunciation(&mut self, character: &str, pronunciation: &str) {
        self.char_to_pron
            .entry(character.to_string())
            .or_default()
            .insert(pronunciation);
        self.pron_to_chars
            .entry(pronunciation.to_string())
            .or_default()
            .insert(character);
    }

    /// Ingests one row of the characters/words source.
    /// Returns false if the row was skipped as malformed.
    pub fn ingest_character_row(&mut self, row: &[String], layout: &SourceLayout) -> bool {
        if row.len() < 2 || row.len() < layout.min_word_row_len() {
            return false;
        }
        let pronunciation = row[layout.pronunciation_column].trim();
        if pronunciation.is_empty() {
            return false;
        }

        let characters: Vec<&str> = SourceLayout::slice(row, &layout.character_columns)
            .iter()
            .map(|cell| cell.trim())
            .filter(|c| !c.is_empty() && !is_punctuation(c))
            .collect();

        for character in &characters {
            self.link_pronunciation(character, pronunciation);
        }

        for group in SourceLayout::slice(row, &layout.word_group_columns) {
            for word in group.split(',').map(str::trim).filter(|w| !w.is_empty()) {
                let id = self.get_or_create_word(word, decompose_filtered);

                for character in decompose_filtered(word) {
                    self.char_to_words
                        .entry(character)
                        .or_default()
                        .insert(word);
                }

                // Ties this occurrence of a polyphonic character to this row's reading.
                let record = &mut self.word_store[id];
                for character in characters.iter().filter(|c| word.contains(**c)) {
                    record
                        .char_pronunciation
                        .insert(character.to_string(), pronunciation.to_string());
                }
            }
        }
        true
    }

    /// Ingests a whole characters/words source in order.
    pub fn ingest_character_rows<'a, I>(&mut self, rows: I, layout: &SourceLayout) -> IngestStats
    where
        I: IntoIterator<Item = &'a Vec<String>>,
    {
        let mut stats = IngestStats::default();
        for (line, row) in rows.into_iter().enumerate() {
            if self.ingest_character_row(row, layout) {
                stats.accepted += 1;
            } else {
                debug!("Skipping malformed words row {}: {:?}", line + 1, row);
                stats.skipped += 1;
            }
        }
        info!(
            "Words source: {} rows accepted, {} skipped, {} words known",
            stats.accepted,
            stats.skipped,
            self.word_store.len()
        );
        stats
    }

    /// The record for `word`, if the index has seen it.
    pub fn word(&self, word: &str) -> Option<&WordRecord> {
        self.find_word_id(word).map(|id| &self.word_store[id])
    }

    /// The record for `word`, or an empty record for unknown words.
    pub fn get_word(&self, word: &str) -> Cow<'_, WordRecord> {
        match self.word(word) {
            Some(record) => Cow::Borrowed(record),
            None => Cow::Owned(WordRecord::default()),
        }
    }

    /// All word keys in first-insertion order across both sources.
    pub fn list_all_words(&self) -> Vec<&str> {
        self.word_store.iter().map(|w| w.text.as_str()).collect()
    }

    pub fn words(&self) -> impl Iterator<Item = &WordRecord> {
        self.word_store.iter()
    }

    pub fn word_count(&self) -> usize {
        self.word_store.len()
    }

    pub fn pronunciations_of(&self, character: &str) -> &[String] {
        self.char_to_pron
            .get(character)
            .map(OrderedSet::as_slice)
            .unwrap_or(&[])
    }

    pub fn characters_with(&self, pronunciation: &str) -> &[String] {
        self.pron_to_chars
            .get(pronunciation)
            .map(OrderedSet::as_slice)
            .unwrap_or(&[])
    }

    pub fn words_containing(&self, character: &str) -> &[String] {
        self.char_to_words
            .get(character)
            .map(OrderedSet::as_slice)
            .unwrap_or(&[])
    }

    /// Other words sharing `character`, and characters that sound like it.
    ///
    /// With a `word` whose row tied `character` to a reading, homophones are
    /// limited to that reading. Otherwise every attested reading contributes.
    pub fn analyze_character(&self, character: &str, word: Option<&str>) -> CharacterAnalysis {
        let co_occurring_words: Vec<String> = self
            .words_containing(character)
            .iter()
            .filter(|w| Some(w.as_str()) != word)
            .cloned()
            .collect();

        let scoped = word
            .and_then(|w| self.word(w))
            .and_then(|record| record.pronunciation_of(character));

        let homophone_characters: Vec<String> = match scoped {
            Some(pronunciation) => self
                .characters_with(pronunciation)
                .iter()
                .filter(|c| c.as_str() != character)
                .cloned()
                .collect(),
            None => {
                let mut union = OrderedSet::new();
                for pronunciation in self.pronunciations_of(character) {
                    for other in self.characters_with(pronunciation) {
                        if other != character {
                            union.insert(other);
                        }
                    }
                }
                union.into()
            }
        };

        CharacterAnalysis {
            co_occurring_words,
            homophone_characters,
        }
    }

    /// Checks that the character/pronunciation maps mirror each other.
    pub fn is_symmetric(&self) -> bool {
        let forward = self.char_to_pron.iter().all(|(c, prons)| {
            prons
                .iter()
                .all(|p| self.pron_to_chars.get(p).map_or(false, |cs| cs.contains(c)))
        });
        let backward = self.pron_to_chars.iter().all(|(p, chars)| {
            chars
                .iter()
                .all(|c| self.char_to_pron.get(c).map_or(false, |ps| ps.contains(p)))
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a words-source row: label, reading, character cells, word groups.
    fn row(pronunciation: &str, characters: &[&str], groups: &[&str]) -> Vec<String> {
        let mut cells = vec!["L".to_string(), pronunciation.to_string()];
        for i in 0..9 {
            cells.push(characters.get(i).unwrap_or(&"").to_string());
        }
        cells.extend(groups.iter().map(|g| g.to_string()));
        cells
    }

    fn index_from(rows: &[Vec<String>]) -> RelationalIndex {
        let mut index = RelationalIndex::new();
        index.ingest_character_rows(rows, &SourceLayout::default());
        index
    }

    #[test]
    fn rows_without_pronunciation_are_skipped() {
        let rows = vec![
            vec!["A".to_string()],
            row("  ", &["我"], &["我们"]),
        ];
        let mut index = RelationalIndex::new();
        let stats = index.ingest_character_rows(&rows, &SourceLayout::default());
        assert_eq!(stats, IngestStats { accepted: 0, skipped: 2 });
        assert_eq!(index.word_count(), 0);
        assert!(index.pronunciations_of("我").is_empty());
    }

    #[test]
    fn character_row_links_pronunciations_and_words() {
        let index = index_from(&[row("wo3", &["我"], &["我们, 我的"])]);
        assert_eq!(index.pronunciations_of("我"), &["wo3".to_string()]);
        assert_eq!(index.characters_with("wo3"), &["我".to_string()]);
        assert_eq!(index.list_all_words(), vec!["我们", "我的"]);
        assert_eq!(index.words_containing("们"), &["我们".to_string()]);
        let record = index.word("我们").unwrap();
        assert_eq!(record.pronunciation, None);
        assert_eq!(record.characters.as_slice(), &["我".to_string(), "们".to_string()]);
        assert_eq!(record.pronunciation_of("我"), Some("wo3"));
        assert_eq!(record.pronunciation_of("们"), None);
    }

    #[test]
    fn short_rows_still_contribute_characters() {
        let short = vec!["L".to_string(), "ni3".to_string(), " 你 ".to_string()];
        let index = index_from(&[short]);
        assert_eq!(index.pronunciations_of("你"), &["ni3".to_string()]);
        assert_eq!(index.word_count(), 0);
    }

    #[test]
    fn punctuation_never_becomes_a_character() {
        let index = index_from(&[row("ma1", &["妈", ",", ";", "?"], &["妈-妈"])]);
        assert!(index.pronunciations_of(",").is_empty());
        assert!(index.pronunciations_of(";").is_empty());
        assert!(index.words_containing("-").is_empty());
        assert_eq!(index.characters_with("ma1"), &["妈".to_string()]);
        assert_eq!(index.word("妈-妈").unwrap().characters.as_slice(), &["妈".to_string()]);
    }

    #[test]
    fn existing_words_are_not_reseeded() {
        let mut index = index_from(&[
            row("fen1", &["分"], &["分钟"]),
            row("zhong1", &["钟"], &["分钟"]),
        ]);
        assert_eq!(index.word_count(), 1);
        let record = index.word("分钟").unwrap();
        assert_eq!(record.characters.len(), 2);
        assert_eq!(record.pronunciation_of("分"), Some("fen1"));
        assert_eq!(record.pronunciation_of("钟"), Some("zhong1"));

        let id = index.find_word_id("分钟").unwrap();
        let again = index.get_or_create_word("分钟", |_| vec!["x".to_string()]);
        assert_eq!(id, again);
        assert!(!index.word("分钟").unwrap().characters.contains("x"));
    }

    #[test]
    fn repeated_row_is_idempotent() {
        let hao = row("hao3", &["好"], &["你好,好人", "好人"]);
        let once = index_from(&[hao.clone()]);
        let twice = index_from(&[hao.clone(), hao]);
        assert_eq!(once.char_to_pron, twice.char_to_pron);
        assert_eq!(once.pron_to_chars, twice.pron_to_chars);
        assert_eq!(once.char_to_words, twice.char_to_words);
        assert_eq!(once.list_all_words(), twice.list_all_words());
    }

    #[test]
    fn later_row_wins_for_in_word_reading() {
        let index = index_from(&[
            row("hang2", &["行"], &["银行"]),
            row("xing2", &["行"], &["银行"]),
        ]);
        assert_eq!(index.word("银行").unwrap().pronunciation_of("行"), Some("xing2"));
    }

    #[test]
    fn homophones_are_scoped_by_word() {
        let index = index_from(&[
            row("hang2", &["行", "航"], &["银行"]),
            row("xing2", &["行", "形", "型"], &["行人"]),
        ]);
        let scoped = index.analyze_character("行", Some("银行"));
        assert_eq!(scoped.homophone_characters, vec!["航"]);
        assert_eq!(scoped.co_occurring_words, vec!["行人"]);

        let other = index.analyze_character("行", Some("行人"));
        assert_eq!(other.homophone_characters, vec!["形", "型"]);

        let unscoped = index.analyze_character("行", None);
        assert_eq!(unscoped.homophone_characters, vec!["航", "形", "型"]);
        assert_eq!(unscoped.co_occurring_words, vec!["银行", "行人"]);
        assert_ne!(scoped.homophone_characters, unscoped.homophone_characters);
    }

    #[test]
    fn unknown_entities_give_empty_results() {
        let index = index_from(&[row("hao3", &["好"], &["你好"])]);
        assert_eq!(index.analyze_character("猫", None), CharacterAnalysis::default());
        assert_eq!(*index.get_word("猫咪"), WordRecord::default());
        // Unknown word context falls back to every reading.
        let analysis = index.analyze_character("好", Some("猫咪"));
        assert_eq!(analysis.co_occurring_words, vec!["你好"]);
    }

    #[test]
    fn maps_stay_symmetric() {
        let index = index_from(&[
            row("a1", &["阿", "啊"], &["阿姨"]),
            row("a5", &["啊"], &["好啊"]),
            row("", &["无"], &[]),
            row("hao3", &["好"], &["你好,好啊"]),
        ]);
        assert!(index.is_symmetric());
        assert_eq!(index.pronunciations_of("啊"), &["a1".to_string(), "a5".to_string()]);
        assert!(index.pronunciations_of("无").is_empty());
    }

    #[test]
    fn maps_stay_symmetric_under_any_row_order() {
        let rows = vec![
            row("hang2", &["行", "航"], &["银行"]),
            row("xing2", &["行", "形", "型"], &["行人,行动"]),
            row("", &["无"], &["无人"]),
            row("xing2", &["行", "星"], &["银行", "星星"]),
            row("hang2", &["杭", ",", "-"], &["杭州"]),
            vec!["short".to_string()],
        ];
        let layout = SourceLayout::default();
        let n = rows.len();
        for rotation in 0..n {
            for reversed in [false, true] {
                let mut order: Vec<&Vec<String>> = rows.iter().cycle().skip(rotation).take(n).collect();
                if reversed {
                    order.reverse();
                }
                let mut index = RelationalIndex::new();
                for step in order {
                    index.ingest_character_row(step, &layout);
                    assert!(index.is_symmetric());
                    // Replaying the same row leaves the tables unchanged.
                    let before = (index.char_to_pron.clone(), index.pron_to_chars.clone(), index.char_to_words.clone());
                    index.ingest_character_row(step, &layout);
                    assert_eq!(before, (index.char_to_pron.clone(), index.pron_to_chars.clone(), index.char_to_words.clone()));
                }
                assert_eq!(index.pronunciations_of("行").len(), 2);
                assert!(index.pronunciations_of(",").is_empty());
            }
        }
    }
}
