//! Save file for completion progress
//!
//! Format: one byte per stage holding its `Completion`, then one byte for the ending
//! tier already shown. Writes go to a temporary file that is renamed over the save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::consts::MAX_ENDING_TIER;
use crate::progress::{Completion, CompletionInfo};

/// Default save file name
pub const DEFAULT_SAVE_PATH: &str = "save.dat";

pub fn encode(info: &CompletionInfo) -> Vec<u8> {
    let mut bytes: Vec<u8> = info.states.iter().map(|s| s.as_byte()).collect();
    bytes.push(info.ending_tier);
    bytes
}

/// Overwrite `info` with saved data.
///
/// A short file fills only the stages it covers; the ending tier is read only when
/// the file has a byte for every stage plus one. Extra bytes are ignored.
pub fn decode_into(info: &mut CompletionInfo, bytes: &[u8]) {
    let count = info.stage_count();
    for (i, &b) in bytes.iter().take(count).enumerate() {
        info.states[i] = Completion::from_byte(b).unwrap_or_else(|| {
            log::warn!("stage {}: unknown completion byte {b}, treating as not cleared", i + 1);
            Completion::NotCleared
        });
    }
    if let Some(&tier) = bytes.get(count) {
        info.ending_tier = tier.min(MAX_ENDING_TIER);
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

pub fn save_progress(info: &CompletionInfo, path: &Path) -> anyhow::Result<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, encode(info)).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move {} to {}", tmp.display(), path.display()))?;
    log::info!("Progress saved ({} stages)", info.stage_count());
    Ok(())
}

pub fn load_progress(info: &mut CompletionInfo, path: &Path) -> anyhow::Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decode_into(info, &bytes);
    log::info!(
        "Loaded progress for {} stages, ending tier {}",
        bytes.len().min(info.stage_count()),
        info.ending_tier()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let mut info = CompletionInfo::new(3);
        info.update_state(1, Completion::Cleared);
        info.update_state(3, Completion::ClearedWithBonus);
        assert_eq!(encode(&info), vec![1, 0, 2, 0]);
    }

    #[test]
    fn test_decode_short_file() {
        let mut info = CompletionInfo::new(3);
        decode_into(&mut info, &[2, 1]);
        assert_eq!(
            info.states(),
            &[
                Completion::ClearedWithBonus,
                Completion::Cleared,
                Completion::NotCleared
            ]
        );
        assert_eq!(info.ending_tier(), 0);
    }

    #[test]
    fn test_decode_full_file_and_garbage() {
        let mut info = CompletionInfo::new(2);
        decode_into(&mut info, &[7, 1, 1, 99]);
        assert_eq!(info.get_state(1), Completion::NotCleared);
        assert_eq!(info.get_state(2), Completion::Cleared);
        assert_eq!(info.ending_tier(), 1);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("blocked-save-{}.dat", std::process::id()));
        let mut info = CompletionInfo::new(2);
        info.update_state(1, Completion::Cleared);
        info.update_state(2, Completion::Cleared);
        assert!(info.check_if_new_ending_obtained());
        save_progress(&info, &path).unwrap();
        assert!(!tmp_path(&path).exists());

        let mut loaded = CompletionInfo::new(2);
        load_progress(&mut loaded, &path).unwrap();
        assert_eq!(loaded.states(), info.states());
        assert_eq!(loaded.ending_tier(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let mut info = CompletionInfo::new(1);
        let path = std::env::temp_dir().join("blocked-definitely-missing-save.dat");
        assert!(load_progress(&mut info, &path).is_err());
    }
}
