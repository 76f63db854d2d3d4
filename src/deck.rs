// File: src/deck.rs
//! Card data for the deck renderer.
//!
//! Markup, packaging and audio live elsewhere; this module only decides which
//! words become cards and gathers what each card shows.

use crate::core::engine::DeckEngine;
use crate::core::types::{Translations, WordRecord};
use crate::error::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const DEFAULT_MAX_LISTED: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOptions {
    pub deck_name: String,
    /// Cap on co-occurring words and homophones listed per character.
    pub max_listed: usize,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            deck_name: "Chinese Dictionary".to_string(),
            max_listed: DEFAULT_MAX_LISTED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCard {
    pub character: String,
    pub co_occurring_words: Vec<String>,
    pub homophone_characters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub word: String,
    pub pronunciation: Option<String>,
    pub translations: Translations,
    pub characters: Vec<CharacterCard>,
    /// Other words pronounced exactly like this one.
    pub same_pronunciation_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntranslatedWord {
    pub word: String,
    pub pronunciation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckPlan {
    pub deck_name: String,
    pub cards: Vec<CardData>,
    #[serde(skip)]
    pub untranslated: Vec<UntranslatedWord>,
}

pub struct DeckPlanner {
    options: DeckOptions,
}

impl DeckPlanner {
    pub fn new(options: DeckOptions) -> Self {
        Self { options }
    }

    pub fn plan(&self, engine: &DeckEngine) -> DeckPlan {
        let homophones = same_pronunciation_groups(engine);
        let mut cards = Vec::new();
        let mut untranslated = Vec::new();

        for word in engine.list_all_words() {
            let record = engine.get_word(word);
            let translations = match &record.translations {
                Some(t) if t.has_glosses() => t.clone(),
                _ => {
                    untranslated.push(UntranslatedWord {
                        word: word.to_string(),
                        pronunciation: record.pronunciation.clone().unwrap_or_default(),
                    });
                    continue;
                }
            };
            cards.push(CardData {
                word: word.to_string(),
                pronunciation: record.pronunciation.clone(),
                translations,
                characters: self.character_cards(engine, &record),
                same_pronunciation_words: record
                    .pronunciation
                    .as_deref()
                    .and_then(|p| homophones.get(p))
                    .map(|words| words.iter().filter(|w| **w != word).map(|w| w.to_string()).collect())
                    .unwrap_or_default(),
            });
        }

        info!("Planned {} cards, {} words without translation", cards.len(), untranslated.len());
        DeckPlan {
            deck_name: self.options.deck_name.clone(),
            cards,
            untranslated,
        }
    }

    fn character_cards(&self, engine: &DeckEngine, record: &WordRecord) -> Vec<CharacterCard> {
        let limit = self.options.max_listed;
        record
            .characters
            .iter()
            .map(|character| {
                let analysis = engine.analyze_character(character, Some(record.text.as_str()));
                CharacterCard {
                    character: character.clone(),
                    co_occurring_words: analysis.co_occurring_words.into_iter().take(limit).collect(),
                    homophone_characters: analysis.homophone_characters.into_iter().take(limit).collect(),
                }
            })
            .collect()
    }
}

impl Default for DeckPlanner {
    fn default() -> Self {
        Self::new(DeckOptions::default())
    }
}

/// Whole-word pronunciation -> words carrying it, in list order.
fn same_pronunciation_groups(engine: &DeckEngine) -> HashMap<&str, Vec<&str>> {
    let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();
    for record in engine.index.words() {
        if let Some(pronunciation) = record.pronunciation.as_deref() {
            groups.entry(pronunciation).or_default().push(record.text.as_str());
        }
    }
    groups
}

impl DeckPlan {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        create_parent(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        debug!("Wrote {} cards to {}", self.cards.len(), path.display());
        Ok(())
    }

    /// Writes `word,pronunciation` rows for every word that got no card.
    pub fn write_untranslated_csv(&self, path: &Path) -> Result<()> {
        create_parent(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&csv_line(&["word", "pronunciation"]))?;
        for entry in &self.untranslated {
            writer.write_all(&csv_line(&[entry.word.as_str(), entry.pronunciation.as_str()]))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Encodes one CSV record, quoting fields as needed, terminated by `\n`.
fn csv_line(fields: &[&str]) -> Vec<u8> {
    let mut writer = csv_core::Writer::new();
    let mut out = Vec::new();
    let mut buf = [0u8; 1024];
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            let (_, n) = writer.delimiter(&mut buf);
            out.extend_from_slice(&buf[..n]);
        }
        let mut input = field.as_bytes();
        loop {
            let (result, nin, nout) = writer.field(input, &mut buf);
            out.extend_from_slice(&buf[..nout]);
            input = &input[nin..];
            if result == csv_core::WriteResult::InputEmpty {
                break;
            }
        }
    }
    let (_, n) = writer.finish(&mut buf);
    out.extend_from_slice(&buf[..n]);
    out.push(b'\n');
    out
}
