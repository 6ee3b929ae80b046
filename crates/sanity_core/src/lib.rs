//! Label sanity-check engine.
//!
//! One [`CheckSession`] per image owns the annotation under mutation;
//! [`BoundingBoxChecker`] and [`SegmentationChecker`] run a fixed
//! sequence of geometric defect predicates per label, tagging defects
//! with `Issue` tags and, in auto-fix mode, correcting or deleting the
//! offending labels in place. Sessions are independent, so callers may
//! check many images in parallel as long as each image keeps its own
//! checker pair.

pub mod bbox;
pub mod config;
pub mod defects;
pub mod error;
pub mod image_check;
pub mod runner;
pub mod segmentation;
pub mod session;
pub mod stats;

pub use bbox::BoundingBoxChecker;
pub use config::CheckerConfig;
pub use error::CheckError;
pub use image_check::ImageChecker;
pub use runner::{check_image, count_labels, GeometryCounts, ImageOutcome};
pub use segmentation::{fill_holes, SegmentationChecker};
pub use session::CheckSession;
pub use stats::{pseudo_job_name, JobStatistics, JobStats};
