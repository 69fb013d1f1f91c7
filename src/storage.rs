use crate::config::atomic_rename;
use crate::model::{PetState, SaveFile};
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::warn;
use std::{fs, path::Path};

/// A missing or unreadable save is never an error: the pet just starts
/// at its midpoint defaults.
pub(crate) fn load_or_init(path: &Path) -> (PetState, Option<DateTime<Utc>>) {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<SaveFile>(&s) {
            Ok(save) => return (PetState::from_row(save.pet), Some(save.last_seen_utc)),
            Err(e) => warn!("save file unreadable, starting fresh: {e}"),
        }
    }
    (PetState::default(), None)
}

pub(crate) fn save_atomic(path: &Path, save: &SaveFile) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(save)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PetRow, SAVE_VERSION};
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("digipet-{}-{}.json", std::process::id(), name))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (pet, last_seen) = load_or_init(Path::new("/nonexistent/digipet-save.json"));
        assert_eq!(pet.row(), PetRow::default());
        assert!(last_seen.is_none());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let path = scratch("malformed");
        fs::write(&path, b"{ not json").unwrap();
        let (pet, last_seen) = load_or_init(&path);
        assert_eq!(pet.row(), PetRow::default());
        assert!(last_seen.is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_restores_the_row() {
        let path = scratch("roundtrip");
        let row = PetRow {
            hunger: 20,
            thirst: 30,
            energy: 95,
        };
        let save = SaveFile {
            version: SAVE_VERSION,
            last_seen_utc: Utc::now(),
            pet: row,
        };
        save_atomic(&path, &save).unwrap();
        let (pet, last_seen) = load_or_init(&path);
        assert_eq!(pet.row(), row);
        assert!(last_seen.is_some());
        let _ = fs::remove_file(&path);
    }
}
