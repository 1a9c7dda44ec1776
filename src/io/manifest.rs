use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;

use crate::foundation::{
    core::{Canvas, Delay},
    error::GifFramesResult,
};

/// File name of the manifest written next to extracted frames.
pub const MANIFEST_FILE: &str = "frames.json";

/// Per-frame delays for a directory of extracted frames.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameManifest {
    /// Canvas the frames were composited on.
    pub canvas: Canvas,
    /// One entry per frame file, in playback order.
    pub frames: Vec<ManifestEntry>,
}

/// One frame file and its display time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    /// File name relative to the manifest's directory.
    pub file: String,
    /// Display time in hundredths of a second.
    pub delay: Delay,
}

impl FrameManifest {
    /// Load `dir/frames.json`, or `None` when the directory has no manifest.
    pub fn read(dir: &Path) -> GifFramesResult<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let file =
            File::open(&path).with_context(|| format!("open manifest '{}'", path.display()))?;
        let manifest = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parse manifest '{}'", path.display()))?;
        Ok(Some(manifest))
    }

    /// Write `dir/frames.json`.
    pub fn write(&self, dir: &Path) -> GifFramesResult<()> {
        let path = dir.join(MANIFEST_FILE);
        let file =
            File::create(&path).with_context(|| format!("create manifest '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("serialize manifest '{}'", path.display()))?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .with_context(|| format!("write manifest '{}'", path.display()))?;
        Ok(())
    }

    /// Delay recorded for `file`, if any.
    pub fn delay_for(&self, file: &str) -> Option<Delay> {
        self.frames.iter().find(|e| e.file == file).map(|e| e.delay)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/manifest.rs"]
mod tests;
