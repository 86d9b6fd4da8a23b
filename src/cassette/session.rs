//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, warn};

use super::recorder::CassetteRecorder;

/// Per-port `CassetteRecorder` instances for one recording run.
///
/// Each port writes to its own `<port>.cassette.yaml` in the session
/// directory, which [`CassetteConfig::from_dir`](super::config::CassetteConfig::from_dir)
/// reads back.
pub struct RecordingSession {
    /// Recorder for contacts interactions.
    pub contacts: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for response plan interactions.
    pub plans: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for identity interactions.
    pub identity: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates a session in a timestamped directory under
    /// `.oncall/cassettes/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new() -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        Self::at(&PathBuf::from(".oncall/cassettes").join(timestamp))
    }

    /// Creates a session writing into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn at(output_dir: &Path) -> Result<Self, String> {
        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = get_commit_hash();
        let session = output_dir
            .file_name()
            .map_or_else(|| "session".to_string(), |n| n.to_string_lossy().into_owned());

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            let name = format!("{session}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(path, name, &commit)))
        };

        Ok(Self {
            contacts: make_recorder("contacts"),
            plans: make_recorder("plans"),
            identity: make_recorder("identity"),
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every port's cassette file.
    ///
    /// The recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            if recorder.is_empty() {
                debug!("No {port} calls recorded");
            } else {
                debug!("Recorded {} {port} call(s)", recorder.len());
            }
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.contacts, "contacts")?;
        finish_one(self.plans, "plans")?;
        finish_one(self.identity, "identity")?;
        Ok(self.output_dir)
    }
}

/// Current git commit hash, or "unknown" when not in a repository.
fn get_commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        warn!("Could not get git commit hash, using 'unknown'");
        "unknown".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_writes_one_cassette_per_port() {
        let dir = std::env::temp_dir()
            .join(format!("oncall_session_test_{}", uuid::Uuid::new_v4().simple()));

        let session = RecordingSession::at(&dir).unwrap();
        assert!(session.output_dir().exists());
        session.contacts.lock().unwrap().record(
            "contacts",
            "delete_contact",
            serde_json::json!("arn:a"),
            serde_json::json!({"Ok": null}),
        );

        let out = session.finish().unwrap();
        for port in ["contacts", "plans", "identity"] {
            assert!(out.join(format!("{port}.cassette.yaml")).is_file());
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn existing_directory_is_refused() {
        let dir = std::env::temp_dir();
        assert!(RecordingSession::at(&dir).is_err());
    }

    #[test]
    fn held_recorder_blocks_finish() {
        let dir = std::env::temp_dir()
            .join(format!("oncall_session_held_{}", uuid::Uuid::new_v4().simple()));
        let session = RecordingSession::at(&dir).unwrap();
        let _held = Arc::clone(&session.plans);

        let err = session.finish().unwrap_err();
        assert!(err.contains("plans"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
