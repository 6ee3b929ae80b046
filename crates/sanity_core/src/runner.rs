//! Per-image orchestration: dispatch labels to the matching checker
//! and aggregate the verdict.

use std::collections::BTreeMap;

use label_model::{Annotation, GeometryKind};

use crate::bbox::BoundingBoxChecker;
use crate::config::CheckerConfig;
use crate::error::CheckError;
use crate::image_check::ImageChecker;
use crate::segmentation::SegmentationChecker;
use crate::session::CheckSession;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryCounts {
    pub labels: usize,
    pub issues: usize,
}

/// Result of checking one image.
#[derive(Debug)]
pub struct ImageOutcome {
    pub image_name: String,
    /// The annotation after all checks; persist it only when `mutated`.
    pub annotation: Annotation,
    pub mutated: bool,
    /// True when no unfixed defect remains on any checked label.
    pub ok: bool,
    /// Label/issue counts per geometry kind over the final annotation.
    pub counts: BTreeMap<GeometryKind, GeometryCounts>,
}

/// Check all labels of one image, restricted to the selected geometry
/// kinds. Builds one session and one checker pair; callers wanting
/// parallelism run one `check_image` per image.
pub fn check_image(
    image_name: &str,
    annotation: Annotation,
    kinds: &[GeometryKind],
    config: &CheckerConfig,
    auto_fix: bool,
) -> Result<ImageOutcome, CheckError> {
    let mut session = CheckSession::new(image_name, annotation, auto_fix);
    let mut bbox_checker = BoundingBoxChecker::new(config.clone());
    let mut seg_checker = SegmentationChecker::new(config.clone(), session.size());

    let mut ok = ImageChecker::new(config.clone()).run(&mut session);

    // Snapshot the labels up front: checkers only ever delete the label
    // currently under test, never an earlier one.
    let labels = session.annotation().objects.clone();
    for label in &labels {
        if !kinds.contains(&label.kind()) {
            continue;
        }
        let label_ok = match label.kind() {
            GeometryKind::Rectangle => bbox_checker.run(&mut session, label)?,
            GeometryKind::Bitmap => seg_checker.run(&mut session, label)?,
        };
        ok &= label_ok;
    }

    let counts = count_labels(session.annotation());
    let (annotation, mutated) = session.into_annotation();
    Ok(ImageOutcome {
        image_name: image_name.to_string(),
        annotation,
        mutated,
        ok,
        counts,
    })
}

/// Count labels and open issues per geometry kind. Labels with an
/// "unknown" class are not counted; a label with a `Resolved` tag never
/// counts as an issue.
pub fn count_labels(annotation: &Annotation) -> BTreeMap<GeometryKind, GeometryCounts> {
    let mut counts: BTreeMap<GeometryKind, GeometryCounts> = BTreeMap::new();
    for label in &annotation.objects {
        if label.class_title.contains("unknown") {
            continue;
        }
        let entry = counts.entry(label.kind()).or_default();
        entry.labels += 1;
        if label.has_issue_tag(None) && !label.is_resolved() {
            entry.issues += 1;
        }
    }
    counts
}
