// src/core/types.rs
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Index of a word inside the index's word store.
pub type WordId = usize;

/// Tokens that never count as characters.
pub const PUNCTUATION: [&str; 6] = [",", ".", "!", ";", "-", "?"];

pub fn is_punctuation(token: &str) -> bool {
    PUNCTUATION.contains(&token)
}

/// Splits a word into its one-glyph character keys, dropping punctuation.
pub fn decompose_filtered(word: &str) -> Vec<String> {
    word.chars()
        .map(String::from)
        .filter(|c| !is_punctuation(c))
        .collect()
}

/// Splits a word into its one-glyph character keys, punctuation included.
pub fn decompose_literal(word: &str) -> Vec<String> {
    word.chars().map(String::from).collect()
}

/// A set of strings that remembers the order of first insertion.
/// Serialized as a plain list so snapshots and exports stay readable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `item` unless already present. Returns true if it was new.
    pub fn insert(&mut self, item: &str) -> bool {
        if self.seen.contains(item) {
            return false;
        }
        self.seen.insert(item.to_string());
        self.items.push(item.to_string());
        true
    }

    pub fn contains(&self, item: &str) -> bool {
        self.seen.contains(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl PartialEq for OrderedSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for OrderedSet {}

impl From<Vec<String>> for OrderedSet {
    fn from(items: Vec<String>) -> Self {
        let mut set = OrderedSet::new();
        for item in &items {
            set.insert(item);
        }
        set
    }
}

impl From<OrderedSet> for Vec<String> {
    fn from(set: OrderedSet) -> Self {
        set.items
    }
}

impl<'a> FromIterator<&'a str> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

/// Category -> glosses, in the order categories first appeared.
/// Serialized as a map, keeping that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations(Vec<(String, Vec<String>)>);

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends glosses to a category, creating it on first use.
    pub fn extend_category(&mut self, category: &str, glosses: impl IntoIterator<Item = String>) {
        match self.0.iter_mut().find(|(name, _)| name == category) {
            Some((_, existing)) => existing.extend(glosses),
            None => self.0.push((category.to_string(), glosses.into_iter().collect())),
        }
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, glosses)| glosses.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(name, glosses)| (name.as_str(), glosses.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if at least one category carries a gloss.
    pub fn has_glosses(&self) -> bool {
        self.0.iter().any(|(_, glosses)| !glosses.is_empty())
    }
}

impl<const N: usize> From<[(&str, &[&str]); N]> for Translations {
    fn from(entries: [(&str, &[&str]); N]) -> Self {
        let mut translations = Translations::new();
        for (category, glosses) in entries {
            translations.extend_category(category, glosses.iter().map(|g| g.to_string()));
        }
        translations
    }
}

impl Serialize for Translations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, glosses) in &self.0 {
            map.serialize_entry(category, glosses)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Translations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TranslationsVisitor;

        impl<'de> Visitor<'de> for TranslationsVisitor {
            type Value = Translations;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category to glosses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Translations, A::Error> {
                let mut translations = Translations::new();
                while let Some((category, glosses)) = access.next_entry::<String, Vec<String>>()? {
                    translations.extend_category(&category, glosses);
                }
                Ok(translations)
            }
        }

        deserializer.deserialize_map(TranslationsVisitor)
    }
}

/// Everything the index knows about a single word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub text: String,
    /// Whole-word pronunciation. Only the translation source sets it.
    pub pronunciation: Option<String>,
    pub characters: OrderedSet,
    pub translations: Option<Translations>,
    /// Pronunciation of each character as used inside this word.
    pub char_pronunciation: BTreeMap<String, String>,
}

impl WordRecord {
    pub fn new(text: &str, characters: OrderedSet) -> Self {
        Self {
            text: text.to_string(),
            pronunciation: None,
            characters,
            translations: None,
            char_pronunciation: BTreeMap::new(),
        }
    }

    /// Pronunciation of `character` inside this word, if a source row tied them.
    pub fn pronunciation_of(&self, character: &str) -> Option<&str> {
        self.char_pronunciation.get(character).map(String::as_str)
    }
}

/// Result of a character lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterAnalysis {
    pub co_occurring_words: Vec<String>,
    pub homophone_characters: Vec<String>,
}
