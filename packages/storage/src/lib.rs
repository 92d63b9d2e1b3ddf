//! On-disk fixtures: `{kind}-{preset}.ssz` plus `{kind}-{preset}-meta.json`, and the
//! `{preset}-preset.yaml` files the fixtures were generated against.

mod error;
mod fixture;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub use error::{Error, Result};
pub use fixture::{Digest, Fixture, FixtureId, InvalidDigest, ObjectKind, UnknownObjectKind};
use fixture::Metadata;
use presets::{Preset, PresetName};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct FixtureStore {
    dir: PathBuf,
}

impl FixtureStore {
    /// A store over an existing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A store over `dir`, creating the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn data_path(&self, id: FixtureId) -> PathBuf {
        self.dir.join(id.data_file_name())
    }

    pub fn meta_path(&self, id: FixtureId) -> PathBuf {
        self.dir.join(id.meta_file_name())
    }

    pub fn preset_path(&self, name: PresetName) -> PathBuf {
        self.dir.join(name.file_name())
    }

    /// Writes a fixture and its metadata.
    ///
    /// Both files are staged next to their destination and renamed into place, data first and
    /// metadata last. A metadata file that can be read therefore always describes a complete
    /// data file.
    pub fn store(&self, id: FixtureId, bytes: &[u8], digest: Digest) -> Result<()> {
        let data_path = self.data_path(id);
        let meta_path = self.meta_path(id);

        let metadata = Metadata {
            htr: digest.to_string(),
        };
        let meta_bytes = serde_json::to_vec_pretty(&metadata)
            .map_err(|e| Error::corrupt(&meta_path, e))?;

        let data = self.stage(&data_path, bytes)?;
        let meta = self.stage(&meta_path, &meta_bytes)?;

        match std::fs::remove_file(&meta_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(&meta_path, e)),
        }

        data.persist(&data_path)
            .map_err(|e| Error::io(&data_path, e.error))?;
        meta.persist(&meta_path)
            .map_err(|e| Error::io(&meta_path, e.error))?;

        tracing::debug!(
            "stored {id}: {} bytes, digest {digest}",
            bytes.len()
        );

        Ok(())
    }

    pub fn load(&self, id: FixtureId) -> Result<Fixture> {
        let meta_path = self.meta_path(id);
        let data_path = self.data_path(id);

        let meta_bytes = std::fs::read(&meta_path).map_err(|e| Error::io(&meta_path, e))?;
        let metadata: Metadata =
            serde_json::from_slice(&meta_bytes).map_err(|e| Error::corrupt(&meta_path, e))?;
        let digest = metadata
            .htr
            .parse::<Digest>()
            .map_err(|e| Error::corrupt(&meta_path, e))?;

        let bytes = std::fs::read(&data_path).map_err(|e| Error::io(&data_path, e))?;

        Ok(Fixture { id, bytes, digest })
    }

    /// Writes the YAML rendition of `preset` and returns its path.
    pub fn store_preset(&self, preset: &Preset) -> Result<PathBuf> {
        let path = self.preset_path(preset.name);
        let staged = self.stage(&path, preset.to_yaml().as_bytes())?;
        staged.persist(&path).map_err(|e| Error::io(&path, e.error))?;
        Ok(path)
    }

    pub fn load_preset(&self, name: PresetName) -> Result<Preset> {
        let path = self.preset_path(name);
        let yaml = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Preset::from_yaml(name, &yaml).map_err(|e| Error::corrupt(&path, e))
    }

    fn stage(&self, destination: &Path, contents: &[u8]) -> Result<NamedTempFile> {
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(|e| Error::io(destination, e))?;
        staged
            .write_all(contents)
            .and_then(|()| staged.flush())
            .map_err(|e| Error::io(destination, e))?;
        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BLOCK: FixtureId = FixtureId::new(ObjectKind::Block, PresetName::Minimal);

    fn store() -> (tempfile::TempDir, FixtureStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn metadata_is_pretty_json_with_the_hex_digest() {
        // given
        let (_dir, store) = store();

        // when
        store.store(BLOCK, &[1, 2, 3], Digest::new([0x0f; 32])).unwrap();

        // then
        let meta = std::fs::read_to_string(store.meta_path(BLOCK)).unwrap();
        assert_eq!(meta, format!("{{\n  \"htr\": \"{}\"\n}}", "0f".repeat(32)));
    }

    #[test]
    fn leaves_no_staging_files_behind() {
        // given
        let (dir, store) = store();

        // when
        store.store(BLOCK, &[1], Digest::new([0; 32])).unwrap();

        // then
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["block-minimal-meta.json", "block-minimal.ssz"]);
    }

    #[test]
    fn creates_missing_directories() {
        // given
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        // when
        let store = FixtureStore::create(&nested).unwrap();

        // then
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested);
    }
}
