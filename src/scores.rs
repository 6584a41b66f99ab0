//! Score history stored as a JSON array of integers.
//!
//! Reads never fail: a missing, unreadable or malformed file means "no
//! records yet". Writes are read-modify-write and report I/O errors to the
//! caller, who logs them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const RECORDS_PATH: &str = "Extras/scoreRecords.json";

#[derive(Debug, Clone)]
pub struct ScoreRecords {
    path: PathBuf,
    scores: Vec<u32>,
}

impl ScoreRecords {
    /// Load from `path`, falling back to an empty history.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = read_scores(&path).unwrap_or_else(|e| {
            if e.kind() != io::ErrorKind::NotFound {
                log::warn!("ignoring score records at {}: {}", path.display(), e);
            }
            Vec::new()
        });
        log::info!("loaded {} score records", scores.len());
        ScoreRecords { path, scores }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn best(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    /// Append `score` to the file, picking up anything another session
    /// wrote since we loaded.
    pub fn append(&mut self, score: u32) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let mut scores = match read_scores(&self.path) {
            Ok(scores) => scores,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("rewriting unreadable score records: {}", e);
                Vec::new()
            }
        };
        scores.push(score);

        fs::write(&self.path, serde_json::to_string(&scores)?)?;
        log::info!("recorded score {} ({} total)", score, scores.len());
        self.scores = scores;
        Ok(())
    }
}

fn read_scores(path: &Path) -> io::Result<Vec<u32>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
