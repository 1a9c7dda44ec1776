use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::error::{GifFramesError, GifFramesResult},
    frame::raster::RasterFrame,
    io::manifest::MANIFEST_FILE,
};

/// Load every image file in `dir`, sorted by file name.
///
/// Subdirectories and the frame manifest are skipped. Any format the `image` crate can decode
/// is accepted; pixels are converted to straight RGBA8. Returns `(file name, frame)` pairs.
#[tracing::instrument]
pub fn read_frame_dir(dir: &Path) -> GifFramesResult<Vec<(String, RasterFrame)>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("list '{}'", dir.display()))? {
        let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() || entry.file_name() == MANIFEST_FILE {
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    if paths.is_empty() {
        return Err(GifFramesError::empty(format!(
            "no frame files in '{}'",
            dir.display()
        )));
    }

    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let img = image::open(&path)
            .with_context(|| format!("decode frame '{}'", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        let frame = RasterFrame::from_raw(width, height, img.into_raw())?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::trace!(file = %name, width, height, "loaded frame");
        out.push((name, frame));
    }
    Ok(out)
}

/// Write frames as `000.png`, `001.png`, ... into `dir`, creating it if needed.
///
/// Returns the written file names in frame order.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn write_png_dir(dir: &Path, frames: &[RasterFrame]) -> GifFramesResult<Vec<String>> {
    std::fs::create_dir_all(dir).with_context(|| format!("create dir '{}'", dir.display()))?;

    let width = frames.len().saturating_sub(1).to_string().len().max(3);
    let mut names = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let name = format!("{i:0width$}.png");
        let path = dir.join(&name);
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        names.push(name);
    }
    Ok(names)
}

#[cfg(test)]
#[path = "../../tests/unit/io/png_dir.rs"]
mod tests;
