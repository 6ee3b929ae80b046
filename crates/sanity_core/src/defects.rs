//! Defect texts carried in `Issue` tag values.

pub const SMALL_LABEL: &str = "Small label";
pub const REPEATED_LABEL: &str = "Repeated label";
pub const INSIDE_WATERMARK: &str = "Inside watermark";
pub const ASPECT_RATIO_OUTLIER: &str = "Aspect ratio outlier";
pub const GHOST_BOUNDING_BOX: &str = "Ghost bounding box";
pub const PERFORATED_LABEL: &str = "Perforated label";
pub const OVERLAPPING_LABEL: &str = "Overlapping label";
