//! Request-scoped working areas.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::common::Result;

/// Lifecycle of a single conversion request.
///
/// `Received → Staged → EngineInvoked → {Succeeded, EngineFailed,
/// ContainerInvalid} → Released`. `Released` is reached when the working
/// area is dropped, whatever happened before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Received,
    Staged,
    EngineInvoked,
    Succeeded,
    EngineFailed,
    ContainerInvalid,
    Released,
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionState::Received => "received",
            ConversionState::Staged => "staged",
            ConversionState::EngineInvoked => "engine-invoked",
            ConversionState::Succeeded => "succeeded",
            ConversionState::EngineFailed => "engine-failed",
            ConversionState::ContainerInvalid => "container-invalid",
            ConversionState::Released => "released",
        };
        f.write_str(name)
    }
}

/// Temporary directory owned by one request.
///
/// The directory and everything in it is removed when the area is dropped,
/// on success and on every error path.
pub struct WorkingArea {
    dir: TempDir,
    state: ConversionState,
}

impl WorkingArea {
    /// Create a fresh area below `base`, or below the system temp directory.
    pub fn create(base: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("yconvert-");
        let dir = match base {
            Some(base) => {
                fs::create_dir_all(base)?;
                builder.tempdir_in(base)?
            },
            None => builder.tempdir()?,
        };
        tracing::debug!(path = %dir.path().display(), "created working area");
        Ok(Self {
            dir,
            state: ConversionState::Received,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory for unpacked y-format input.
    pub fn input_dir(&self) -> PathBuf {
        self.path().join("input")
    }

    /// Directory the engine writes y-format output into.
    pub fn output_dir(&self) -> PathBuf {
        self.path().join("output")
    }

    /// Write `data` to `name` inside the area.
    pub fn stage_file(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, data)?;
        Ok(path)
    }

    #[inline]
    pub fn state(&self) -> ConversionState {
        self.state
    }

    pub fn advance(&mut self, next: ConversionState) {
        tracing::debug!(from = %self.state, to = %next, "conversion state");
        self.state = next;
    }
}

impl fmt::Debug for WorkingArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkingArea")
            .field("path", &self.path())
            .field("state", &self.state)
            .finish()
    }
}

impl Drop for WorkingArea {
    fn drop(&mut self) {
        // TempDir removes the directory right after this.
        tracing::debug!(
            from = %self.state,
            to = %ConversionState::Released,
            path = %self.dir.path().display(),
            "conversion state"
        );
        self.state = ConversionState::Released;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_is_removed_on_drop() {
        let base = tempfile::tempdir().unwrap();
        let area = WorkingArea::create(Some(base.path())).unwrap();
        let staged = area.stage_file("document.xlsx", b"data").unwrap();
        let path = area.path().to_path_buf();
        assert!(staged.starts_with(&path));
        assert!(staged.is_file());

        drop(area);
        assert!(!path.exists());
    }

    #[test]
    fn test_state_transitions() {
        let mut area = WorkingArea::create(None).unwrap();
        assert_eq!(area.state(), ConversionState::Received);
        area.advance(ConversionState::Staged);
        area.advance(ConversionState::EngineInvoked);
        assert_eq!(area.state(), ConversionState::EngineInvoked);
        assert!(area.output_dir().starts_with(area.path()));
    }
}
