// File: src/persistence.rs
use crate::core::index::RelationalIndex;
use crate::error::{DeckError, Result};
use log::debug;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Bumped whenever the serialized index layout changes.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Writes the index to `path` atomically: version header, then the bincode body.
pub fn save_to_disk(index: &RelationalIndex, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        writer.write_all(&SNAPSHOT_FORMAT_VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut writer, index)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| DeckError::Io(e.error))?;
    debug!("Saved index snapshot to {}", path.display());
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<RelationalIndex> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut version = [0u8; 4];
    reader.read_exact(&mut version)?;
    let found = u32::from_le_bytes(version);
    if found != SNAPSHOT_FORMAT_VERSION {
        return Err(DeckError::SnapshotVersion {
            expected: SNAPSHOT_FORMAT_VERSION,
            found,
        });
    }

    Ok(bincode::deserialize_from(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::SourceLayout;
    use crate::core::translation::TranslationAttacher;
    use crate::source::parse_source;
    use tempfile::tempdir;

    fn sample_index() -> RelationalIndex {
        let mut index = RelationalIndex::new();
        index.ingest_character_rows(
            &parse_source("H;hang2;行;航;;;;;;;;银行\nX;xing2;行;;;;;;;;;行人\n"),
            &SourceLayout::default(),
        );
        TranslationAttacher::default()
            .attach_rows(&mut index, &parse_source("银行;yin2hang2;noun: bank\n"));
        index
    }

    #[test]
    fn snapshot_round_trip_answers_identically() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("index.bin");
        let original = sample_index();

        save_to_disk(&original, &path).unwrap();
        let loaded = load_from_disk(&path).unwrap();

        assert_eq!(loaded.list_all_words(), original.list_all_words());
        assert_eq!(*loaded.get_word("银行"), *original.get_word("银行"));
        for word in [Some("银行"), Some("行人"), None] {
            assert_eq!(
                loaded.analyze_character("行", word),
                original.analyze_character("行", word)
            );
        }
        assert!(loaded.is_symmetric());
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(&(SNAPSHOT_FORMAT_VERSION + 1).to_le_bytes()).unwrap();
        file.write_all(b"garbage").unwrap();
        drop(file);

        let err = load_from_disk(&path).unwrap_err();
        assert!(matches!(
            err,
            DeckError::SnapshotVersion { found, .. } if found == SNAPSHOT_FORMAT_VERSION + 1
        ));
    }
}
