use crate::analyze::rationale::sanitize_rationale;
use crate::analyze::validate_result;
use crate::error::{JudgeError, Result};
use crate::types::report::AnalyzeResponse;
use crate::types::scoring::Mode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    stored_at: String,
    agent_version: String,
    mode: Mode,
    rubric_version: String,
    response: AnalyzeResponse,
}

#[derive(Debug, Clone)]
pub struct AnalysisCache {
    dir: PathBuf,
}

impl AnalysisCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn fingerprint(
        identity: &str,
        agent_version: &str,
        mode: Mode,
        rubric_version: &str,
        settings: &str,
    ) -> String {
        let mut hasher = Sha256::new();
        for part in [identity, agent_version, mode.as_str(), rubric_version, settings] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("{fingerprint}.json"))
    }

    /// Unreadable or invalid entries count as a miss.
    pub fn get(&self, fingerprint: &str) -> Option<AnalyzeResponse> {
        let path = self.entry_path(fingerprint);
        let content = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable cache entry");
                return None;
            }
        };

        let mut response = entry.response;
        for item in &mut response.result.scores {
            item.rationale = sanitize_rationale(&item.rationale);
        }
        if let Err(err) = validate_result(&response.result) {
            warn!(path = %path.display(), error = %err, "ignoring invalid cache entry");
            return None;
        }

        debug!(fingerprint, stored_at = %entry.stored_at, "cache hit");
        response.from_cache = true;
        Some(response)
    }

    pub fn put(&self, fingerprint: &str, response: &AnalyzeResponse) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(JudgeError::Io)?;
        let entry = CacheEntry {
            stored_at: Utc::now().to_rfc3339(),
            agent_version: response.version.clone(),
            mode: response.result.mode,
            rubric_version: response.rubric_version.clone(),
            response: AnalyzeResponse {
                from_cache: false,
                ..response.clone()
            },
        };
        let path = self.entry_path(fingerprint);
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&path, json).map_err(JudgeError::Io)?;
        debug!(path = %path.display(), "cache entry written");
        Ok(path)
    }

    pub fn clear(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
