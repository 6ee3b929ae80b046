//! Checker thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds and policy knobs shared by all checkers.
///
/// Loadable from TOML with every field optional; missing fields fall
/// back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Area (box pixels or mask pixel count) below which a label is
    /// flagged as too small.
    pub small_flag_area: i64,
    /// Stricter area below which auto-fix deletes the label outright.
    pub small_delete_area: i64,
    /// Per-coordinate tolerance for near-duplicate corner matching.
    pub duplicate_tolerance_px: i64,
    /// Thickness of the border reserved for the watermark overlay.
    pub watermark_border_px: i64,
    pub aspect_ratio_min: f64,
    pub aspect_ratio_max: f64,
    /// Labels carrying any of these tags skip the aspect-ratio check.
    pub aspect_ratio_skip_tags: Vec<String>,
    /// Tags that must not appear on the image itself.
    pub illegal_image_tags: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            small_flag_area: 25,
            small_delete_area: 10,
            duplicate_tolerance_px: 2,
            watermark_border_px: 140,
            aspect_ratio_min: 0.5,
            aspect_ratio_max: 3.0,
            aspect_ratio_skip_tags: vec!["truncated".to_string()],
            illegal_image_tags: vec![
                "truncated".to_string(),
                "knocked_over".to_string(),
                "sticker_band_removed".to_string(),
            ],
        }
    }
}
