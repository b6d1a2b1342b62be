//! Helpers for edge maps stored as `image::GrayImage`.

use image::{GrayImage, Luma};
use log::info;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    EdgeMap, EdgeMapError, EdgeMapView, HoughGrid, SymmetryConfig, SymmetryDetector, SymmetryError,
    SymmetryResults,
};

/// Errors produced by the `image`-based helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    EdgeMap(#[from] EdgeMapError),

    #[error(transparent)]
    Symmetry(#[from] SymmetryError),
}

/// Borrow a grayscale edge image as an edge map. Non-zero pixels are edges.
pub fn edge_view(img: &GrayImage) -> EdgeMapView<'_> {
    EdgeMapView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Copy a grayscale edge image into an owned edge map.
pub fn edge_map_from_gray(img: &GrayImage) -> Result<EdgeMap, DetectError> {
    Ok(EdgeMap::from_raw(
        img.width() as usize,
        img.height() as usize,
        img.as_raw().clone(),
    )?)
}

/// Render an edge map as a black/white image.
pub fn edge_map_to_gray(map: &EdgeMapView<'_>) -> GrayImage {
    GrayImage::from_fn(map.width as u32, map.height as u32, |x, y| {
        Luma([if map.is_edge(x as usize, y as usize) { 255 } else { 0 }])
    })
}

/// Render a vote grid with r along x and θ along y, scaled so the largest
/// count is white.
pub fn accumulator_to_gray(grid: &HoughGrid<u32>) -> GrayImage {
    let max = grid.max_value().max(1) as f32;
    GrayImage::from_fn(grid.r_bins() as u32, grid.theta_bins() as u32, |x, y| {
        let v = grid.get(x as usize, y as usize).unwrap_or(0) as f32;
        Luma([(v / max * 255.0).round() as u8])
    })
}

/// Render a suppression mask: masked bins are white.
pub fn mask_to_gray(mask: &HoughGrid<bool>) -> GrayImage {
    GrayImage::from_fn(mask.r_bins() as u32, mask.theta_bins() as u32, |x, y| {
        Luma([if mask.get(x as usize, y as usize).unwrap_or(false) {
            255
        } else {
            0
        }])
    })
}

/// Run voting and extraction on one edge image with a fresh detector.
///
/// At most `capacity` axes are returned, and no more than
/// `config.peaks.num_peaks`.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, config),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn detect_symmetry(
    img: &GrayImage,
    config: &SymmetryConfig,
    capacity: usize,
) -> Result<SymmetryResults, DetectError> {
    let view = edge_view(img);
    let mut detector =
        SymmetryDetector::from_config(view.width, view.height, &config.accumulator)?;
    let stats = detector.vote(&view, &config.vote)?;
    let mut results = SymmetryResults::with_capacity(capacity);
    detector.get_result(&mut results, &config.peaks);
    info!(
        "{} edge points, {} votes, {} axes",
        stats.edge_points,
        stats.votes,
        results.len()
    );
    Ok(results)
}
