use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{Error, Result};

/// Output written into a hidden sibling directory and moved next to the target
/// only when `publish` is called. Dropping an unpublished stage deletes it, so
/// a failed operation never leaves a half-written file behind.
pub struct StagedOutput {
    dir: TempDir,
    parent: PathBuf,
    file_name: OsString,
}

impl StagedOutput {
    pub fn new(target: &Path) -> Result<Self> {
        let file_name = target
            .file_name()
            .ok_or_else(|| Error::InvalidArgument {
                arg: "output",
                value: target.display().to_string(),
            })?
            .to_os_string();
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = tempfile::Builder::new()
            .prefix(".geostretch-")
            .tempdir_in(&parent)?;
        debug!("Staging {:?} in {:?}", file_name, dir.path());
        Ok(Self {
            dir,
            parent,
            file_name,
        })
    }

    /// Path the producer should write to
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(&self.file_name)
    }

    /// Move every staged file (primary output plus sidecars) next to the target,
    /// replacing files of the same name.
    ///
    /// Sidecars move first and the primary file last, so an interrupted publish
    /// never exposes a new primary next to missing sidecars.
    pub fn publish(self) -> Result<Vec<PathBuf>> {
        let mut names = fs::read_dir(self.dir.path())?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<std::io::Result<Vec<OsString>>>()?;
        names.sort_by_key(|name| *name == self.file_name);

        let mut published = Vec::with_capacity(names.len());
        for name in names {
            let dest = self.parent.join(&name);
            fs::rename(self.dir.path().join(&name), &dest)
                .map_err(|e| Error::Persist(format!("{}: {}", dest.display(), e)))?;
            published.push(dest);
        }
        published.sort();
        debug!("Published {} file(s) from staging", published.len());
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_moves_all_staged_files() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("out.shp");
        let stage = StagedOutput::new(&target).unwrap();
        fs::write(stage.path(), b"shp").unwrap();
        fs::write(stage.path().with_extension("dbf"), b"dbf").unwrap();

        let files = stage.publish().unwrap();
        assert_eq!(files, vec![root.path().join("out.dbf"), root.path().join("out.shp")]);
        assert_eq!(fs::read(&target).unwrap(), b"shp");
    }

    #[test]
    fn dropping_a_stage_leaves_nothing() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("out.tif");
        {
            let stage = StagedOutput::new(&target).unwrap();
            fs::write(stage.path(), b"partial").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn publish_replaces_existing_output() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("out.tif");
        fs::write(&target, b"old").unwrap();
        let stage = StagedOutput::new(&target).unwrap();
        fs::write(stage.path(), b"new").unwrap();
        stage.publish().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn failed_sidecar_keeps_primary_unpublished() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("out.shp");
        // a non-empty directory cannot be replaced by a file
        fs::create_dir(root.path().join("out.dbf")).unwrap();
        fs::write(root.path().join("out.dbf").join("keep"), b"x").unwrap();

        let stage = StagedOutput::new(&target).unwrap();
        fs::write(stage.path(), b"shp").unwrap();
        fs::write(stage.path().with_extension("dbf"), b"dbf").unwrap();

        assert!(matches!(stage.publish(), Err(Error::Persist(_))));
        assert!(!target.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
    }
}
