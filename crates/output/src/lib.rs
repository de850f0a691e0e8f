pub mod template;

use anyhow::{bail, Context, Result};
use deezer_overlay_core::{OutputConfig, ProfileState};
use image::codecs::jpeg::JpegEncoder;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const JPEG_QUALITY: u8 = 80;

/// Writes `<base>.json`, `<base>.txt` and `<base>.jpg` for overlay tools.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    base: PathBuf,
    txt_format: String,
}

impl OutputWriter {
    /// `None` when no base name is configured.
    pub fn from_config(cfg: &OutputConfig) -> Option<Self> {
        if cfg.save_name.is_empty() {
            return None;
        }
        Some(Self {
            base: PathBuf::from(&cfg.save_name),
            txt_format: cfg.txt_format.clone(),
        })
    }

    pub fn json_path(&self) -> PathBuf {
        self.with_suffix(".json")
    }

    pub fn txt_path(&self) -> PathBuf {
        self.with_suffix(".txt")
    }

    pub fn jpg_path(&self) -> PathBuf {
        self.with_suffix(".jpg")
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut path = self.base.clone().into_os_string();
        path.push(suffix);
        PathBuf::from(path)
    }

    /// Attempts all three files even when one of them fails.
    pub fn write(&self, state: &ProfileState) -> Result<()> {
        let results = [
            self.write_json(state),
            self.write_txt(state),
            self.write_jpg(state),
        ];

        let mut failed = 0;
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            warn!(error = %format!("{err:#}"), "failed to write output file");
            failed += 1;
        }
        if failed > 0 {
            bail!("{failed} of {} output files could not be written", results.len());
        }
        Ok(())
    }

    fn write_json(&self, state: &ProfileState) -> Result<()> {
        let data = match state.now_playing() {
            Some(snapshot) => serde_json::to_vec(snapshot)?,
            None => serde_json::to_vec(&serde_json::json!({ "online": "false" }))?,
        };
        write_file(&self.json_path(), &data)
    }

    fn write_txt(&self, state: &ProfileState) -> Result<()> {
        if self.txt_format.is_empty() {
            return Ok(());
        }
        let text = state
            .now_playing()
            .map(|snapshot| template::render(&self.txt_format, snapshot))
            .unwrap_or_default();
        write_file(&self.txt_path(), text.as_bytes())
    }

    fn write_jpg(&self, state: &ProfileState) -> Result<()> {
        let path = self.jpg_path();
        let Some(artwork) = state
            .now_playing()
            .and_then(|snapshot| snapshot.album_artwork.as_ref())
        else {
            return remove_if_exists(&path);
        };

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
            .encode_image(&artwork.to_rgb8())
            .with_context(|| format!("failed to encode {}", path.display()))?;
        write_file(&path, &jpeg)
    }
}

/// Readers of `path` see either the old or the new content, never a partial file.
fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(data)
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    debug!(path = %path.display(), bytes = data.len(), "output written");
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
    }
}
