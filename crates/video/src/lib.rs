#![deny(clippy::all, clippy::pedantic)]
//! # Trajectory Videos
//!
//! Helpers that turn rollout frames into an animated video. Two sources are
//! supported:
//!
//! -   a directory of PNG frames written during a rollout, read back in
//!     frame index order (see [`frame_file_name`] for the naming scheme),
//!     via [`make_video_from_image_dir`];
//! -   frames already held in memory, via [`make_video_from_rgb_imgs`].
//!
//! Videos are written as looping animated GIFs through the `image` crate.

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, DynamicImage, Frame, RgbImage};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const VIDEO_EXTENSION: &str = "gif";

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("no frames to encode")]
    NoFrames,
    #[error("frames per second must be positive")]
    InvalidFps,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Zero-padded name of the frame written at `index`, e.g. `frame000042.png`.
#[must_use]
pub fn frame_file_name(index: usize) -> String {
    format!("frame{index:06}.png")
}

/// Index encoded in a [`frame_file_name`], or `None` for other names.
#[must_use]
pub fn frame_index(path: &Path) -> Option<usize> {
    path.file_stem()?.to_str()?.strip_prefix("frame")?.parse().ok()
}

/// The `.png` files in `img_dir`, ordered by [`frame_index`]. Indices are
/// compared numerically, so padding overflow past six digits keeps its order.
/// Files without an index follow, sorted by name.
///
/// # Errors
///
/// Propagates I/O failures while reading the directory.
pub fn list_frames(img_dir: &Path) -> Result<Vec<PathBuf>, VideoError> {
    let mut paths = fs::read_dir(img_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| p.extension().is_some_and(|ext| ext == "png"));
    paths.sort_by_cached_key(|p| {
        let index = frame_index(p);
        (index.is_none(), index, p.clone())
    });
    Ok(paths)
}

/// Encodes every `.png` in `img_dir`, in [`list_frames`] order, into
/// `<vid_path>/<video_name>.gif`.
///
/// # Errors
///
/// Returns [`VideoError::NoFrames`] when the directory holds no PNG files,
/// [`VideoError::InvalidFps`] when `fps` is zero, and propagates I/O and
/// decoding failures.
pub fn make_video_from_image_dir(
    vid_path: &Path,
    img_dir: &Path,
    fps: u32,
    video_name: &str,
) -> Result<PathBuf, VideoError> {
    let paths = list_frames(img_dir)?;
    tracing::debug!("Reading {} frames from {}", paths.len(), img_dir.display());

    let frames = paths
        .iter()
        .map(|p| Ok(image::open(p)?.to_rgb8()))
        .collect::<Result<Vec<_>, VideoError>>()?;
    write_gif(&frames, vid_path, fps, video_name)
}

/// Encodes in-memory frames into `<vid_path>/<video_name>.gif`, optionally
/// resizing each frame to `resize = (width, height)` with nearest-neighbour
/// sampling so grid cells stay crisp.
///
/// # Errors
///
/// Returns [`VideoError::NoFrames`] for an empty slice,
/// [`VideoError::InvalidFps`] when `fps` is zero, and propagates I/O and
/// encoding failures.
pub fn make_video_from_rgb_imgs(
    frames: &[RgbImage],
    vid_path: &Path,
    fps: u32,
    video_name: &str,
    resize: Option<(u32, u32)>,
) -> Result<PathBuf, VideoError> {
    match resize {
        Some((width, height)) => {
            let resized: Vec<RgbImage> = frames
                .iter()
                .map(|f| imageops::resize(f, width, height, FilterType::Nearest))
                .collect();
            write_gif(&resized, vid_path, fps, video_name)
        }
        None => write_gif(frames, vid_path, fps, video_name),
    }
}

fn write_gif(
    frames: &[RgbImage],
    vid_path: &Path,
    fps: u32,
    video_name: &str,
) -> Result<PathBuf, VideoError> {
    if fps == 0 {
        return Err(VideoError::InvalidFps);
    }
    if frames.is_empty() {
        return Err(VideoError::NoFrames);
    }

    fs::create_dir_all(vid_path)?;
    let path = vid_path.join(format!("{video_name}.{VIDEO_EXTENSION}"));
    let delay = Delay::from_numer_denom_ms(1000, fps);
    {
        let mut encoder = GifEncoder::new(BufWriter::new(File::create(&path)?));
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(frames.iter().map(|f| {
            let rgba = DynamicImage::ImageRgb8(f.clone()).to_rgba8();
            Frame::from_parts(rgba, 0, 0, delay)
        }))?;
    }

    tracing::info!(
        "Wrote {} frames at {} fps to {}",
        frames.len(),
        fps,
        path.display()
    );
    Ok(path)
}
