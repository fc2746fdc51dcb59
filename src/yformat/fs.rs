//! Moving containers in and out of engine working directories.
//!
//! Engines read and write y-format bodies as plain files: `body.txt` with a
//! sibling `media/` directory holding the attachments.

use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{BODY_ENTRY, MEDIA_PREFIX};
use super::container::YContainer;
use crate::common::{Error, Result};

impl YContainer {
    /// Write `body.txt` and `media/*` into `dir`, returning the body path.
    ///
    /// The metadata sidecar is not written; engines never read it.
    pub fn unpack_into(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let body_path = dir.join(BODY_ENTRY);
        fs::write(&body_path, self.body())?;

        let media_dir = dir.join(MEDIA_PREFIX.trim_end_matches('/'));
        for (name, data) in self.media() {
            let path = media_dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, data)?;
        }
        Ok(body_path)
    }

    /// Build a container from an engine output directory holding `body.txt`
    /// and optionally `media/`.
    pub fn collect_from(dir: &Path) -> Result<Self> {
        let body_path = dir.join(BODY_ENTRY);
        let body = fs::read(&body_path).map_err(|e| {
            Error::malformed_at(format!("cannot read body: {e}"), BODY_ENTRY)
        })?;
        let mut container = YContainer::new(body)?;

        let media_dir = dir.join(MEDIA_PREFIX.trim_end_matches('/'));
        if media_dir.is_dir() {
            let mut pending = vec![media_dir.clone()];
            while let Some(current) = pending.pop() {
                for entry in fs::read_dir(&current)? {
                    let path = entry?.path();
                    if path.is_dir() {
                        pending.push(path);
                        continue;
                    }
                    let name = media_name(&media_dir, &path)?;
                    container.insert_media(name, fs::read(&path)?)?;
                }
            }
        }

        container.validate()?;
        Ok(container)
    }
}

fn media_name(media_dir: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(media_dir)
        .map_err(|_| Error::malformed_at("media file outside media directory", path.display().to_string()))?;
    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str()
                .to_str()
                .ok_or_else(|| Error::malformed_at("media file name is not UTF-8", path.display().to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_then_collect() {
        let dir = tempfile::tempdir().unwrap();
        let container = YContainer::new(&b"DOCY;v10;0;media/image1.png media/charts/c1.bin"[..])
            .unwrap()
            .with_media("image1.png", vec![1, 2, 3])
            .unwrap()
            .with_media("charts/c1.bin", vec![4])
            .unwrap();

        let body_path = container.unpack_into(dir.path()).unwrap();
        assert_eq!(body_path, dir.path().join("body.txt"));
        assert!(dir.path().join("media/image1.png").is_file());
        assert!(dir.path().join("media/charts/c1.bin").is_file());

        let collected = YContainer::collect_from(dir.path()).unwrap();
        assert_eq!(collected, container);
    }

    #[test]
    fn test_collect_without_body() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            YContainer::collect_from(dir.path()),
            Err(Error::MalformedContainer { .. })
        ));
    }
}
