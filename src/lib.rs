// src/lib.rs

pub mod core;
pub mod deck;
pub mod error;
pub mod persistence;
pub mod source;

pub use crate::core::engine::DeckEngine;
pub use crate::core::index::{IngestStats, RelationalIndex};
pub use crate::core::layout::SourceLayout;
pub use crate::core::translation::{parse_translations, TranslationAttacher};
pub use crate::core::types::{CharacterAnalysis, OrderedSet, Translations, WordRecord};
pub use crate::error::{DeckError, Result};
