//! Defect predicates for rectangle labels.

use label_model::{Geometry, GeometryKind, Label, Points, Rect, Tag, ISSUE_TAG_NAME, RESOLVED_TAG_NAME};

use crate::config::CheckerConfig;
use crate::defects;
use crate::error::CheckError;
use crate::session::CheckSession;

/// Checker-local view of the label under test. Geometry mutations are
/// applied here first and written back through the session.
struct BoxState {
    id: u64,
    class_title: String,
    tags: Vec<(String, Option<String>)>,
    rect: Rect,
    deleted: bool,
}

struct SeenBox {
    class_title: String,
    tags: Vec<(String, Option<String>)>,
    rect: Rect,
}

/// Runs the rectangle predicates in a fixed order, remembering every
/// box it has checked in the current image for duplicate detection.
pub struct BoundingBoxChecker {
    config: CheckerConfig,
    seen: Vec<SeenBox>,
}

impl BoundingBoxChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            seen: Vec::new(),
        }
    }

    /// Check one rectangle label. Returns whether the label is free of
    /// (unfixed) defects. Resolved labels pass without any predicate
    /// running.
    pub fn run(&mut self, session: &mut CheckSession, label: &Label) -> Result<bool, CheckError> {
        if label.kind() != GeometryKind::Rectangle {
            return Err(CheckError::TypeMismatch {
                expected: GeometryKind::Rectangle,
                found: label.kind(),
            });
        }
        if session.is_resolved(label.id) {
            return Ok(true);
        }
        let rect = label.rect().ok_or(CheckError::MalformedRectangle(label.id))?;
        let mut state = BoxState {
            id: label.id,
            class_title: label.class_title.clone(),
            tags: comparable_tags(&label.tags),
            rect,
            deleted: false,
        };

        let mut is_ok = true;
        is_ok &= !self.is_repeated(session, &mut state);
        is_ok &= !self.is_small(session, &mut state);
        is_ok &= !self.is_inside_watermark(session, &mut state);
        is_ok &= !self.is_aspect_outlier(session, &state);

        if !state.deleted {
            self.seen.push(SeenBox {
                class_title: state.class_title,
                tags: state.tags,
                rect: state.rect,
            });
        }
        Ok(is_ok)
    }

    /// Exact (class, tags, corners) match against an earlier box means
    /// the label is redundant; a match within the pixel tolerance is
    /// only flagged, never deleted.
    fn is_repeated(&mut self, session: &mut CheckSession, state: &mut BoxState) -> bool {
        if state.deleted {
            return false;
        }
        let tol = self.config.duplicate_tolerance_px;
        let mut exact = false;
        let mut near = false;
        for seen in &self.seen {
            if seen.class_title != state.class_title || seen.tags != state.tags {
                continue;
            }
            if seen.rect == state.rect {
                exact = true;
                break;
            }
            if (seen.rect.x1 - state.rect.x1).abs() <= tol
                && (seen.rect.y1 - state.rect.y1).abs() <= tol
                && (seen.rect.x2 - state.rect.x2).abs() <= tol
                && (seen.rect.y2 - state.rect.y2).abs() <= tol
            {
                near = true;
            }
        }

        if exact && session.auto_fix() {
            session.delete_label(state.id);
            state.deleted = true;
            log::info!(
                "{} | bounding box | repeated label --> deleted",
                session.image_name()
            );
            return false;
        }
        let repeated = exact || near;
        session.set_issue(state.id, defects::REPEATED_LABEL, repeated);
        if repeated {
            log::info!("{} | bounding box | repeated label", session.image_name());
        }
        repeated
    }

    fn is_small(&self, session: &mut CheckSession, state: &mut BoxState) -> bool {
        if state.deleted {
            return false;
        }
        let area = state.rect.area();
        if session.auto_fix() && area < self.config.small_delete_area {
            session.delete_label(state.id);
            state.deleted = true;
            log::info!(
                "{} | bounding box | small label ({} < {}) --> deleted",
                session.image_name(),
                area,
                self.config.small_delete_area
            );
            return false;
        }
        let small = area < self.config.small_flag_area;
        session.set_issue(state.id, defects::SMALL_LABEL, small);
        if small {
            log::info!(
                "{} | bounding box | small label ({} < {})",
                session.image_name(),
                area,
                self.config.small_flag_area
            );
        }
        small
    }

    fn is_inside_watermark(&self, session: &mut CheckSession, state: &mut BoxState) -> bool {
        if state.deleted {
            return false;
        }
        let Some(interior) = interior_rect(session.size(), self.config.watermark_border_px) else {
            // Border swallows the whole image; nothing to clip to.
            session.set_issue(state.id, defects::INSIDE_WATERMARK, true);
            return true;
        };
        let inside = state.rect.exceeds(&interior);
        if inside && session.auto_fix() {
            state.rect = state.rect.clamped_to(&interior);
            let corners = state.rect.corners();
            session.set_geometry(
                state.id,
                Geometry::Rectangle {
                    points: Points::from_corners(corners[0], corners[1]),
                },
            );
            session.set_issue(state.id, defects::INSIDE_WATERMARK, false);
            log::info!(
                "{} | bounding box | inside watermark --> cropped",
                session.image_name()
            );
            return false;
        }
        session.set_issue(state.id, defects::INSIDE_WATERMARK, inside);
        if inside {
            log::info!("{} | bounding box | inside watermark", session.image_name());
        }
        inside
    }

    fn is_aspect_outlier(&self, session: &mut CheckSession, state: &BoxState) -> bool {
        if state.deleted {
            return false;
        }
        if state
            .tags
            .iter()
            .any(|(name, _)| self.config.aspect_ratio_skip_tags.contains(name))
        {
            return false;
        }
        let ratio = state.rect.aspect_ratio();
        let outlier = ratio < self.config.aspect_ratio_min || ratio > self.config.aspect_ratio_max;
        session.set_issue(state.id, defects::ASPECT_RATIO_OUTLIER, outlier);
        if outlier {
            log::info!(
                "{} | bounding box | aspect ratio outlier ({:.2})",
                session.image_name(),
                ratio
            );
        }
        outlier
    }
}

/// Tags relevant for duplicate comparison: everything except the
/// checker's own reserved tags, order-independent.
fn comparable_tags(tags: &[Tag]) -> Vec<(String, Option<String>)> {
    let mut out: Vec<(String, Option<String>)> = tags
        .iter()
        .filter(|t| t.name != ISSUE_TAG_NAME && t.name != RESOLVED_TAG_NAME)
        .map(|t| (t.name.clone(), t.value.clone()))
        .collect();
    out.sort();
    out
}

/// Border-free interior of the image, as corner bounds; `None` when the
/// border covers everything.
fn interior_rect(size: label_model::ImageSize, border: i64) -> Option<Rect> {
    let x2 = size.width as i64 - 1 - border;
    let y2 = size.height as i64 - 1 - border;
    if x2 < border || y2 < border {
        return None;
    }
    Some(Rect {
        x1: border,
        y1: border,
        x2,
        y2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_model::{Annotation, ImageSize};

    fn rect_label(id: u64, a: [i64; 2], b: [i64; 2]) -> Label {
        Label {
            id,
            class_title: "blue_cone".to_string(),
            tags: vec![],
            geometry: Geometry::Rectangle {
                points: Points::from_corners(a, b),
            },
        }
    }

    fn session_for(labels: Vec<Label>, auto_fix: bool) -> CheckSession {
        let mut ann = Annotation::new(ImageSize {
            height: 1000,
            width: 1600,
        });
        ann.objects = labels;
        CheckSession::new("img.png", ann, auto_fix)
    }

    #[test]
    fn wrong_geometry_kind_is_a_type_mismatch() {
        let label = Label {
            id: 1,
            class_title: "blue_cone".to_string(),
            tags: vec![],
            geometry: Geometry::Bitmap {
                bitmap: label_model::BitmapData {
                    data: String::new(),
                    origin: [0, 0],
                },
            },
        };
        let mut session = session_for(vec![label.clone()], false);
        let mut checker = BoundingBoxChecker::new(CheckerConfig::default());
        assert!(matches!(
            checker.run(&mut session, &label),
            Err(CheckError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn near_duplicate_is_flagged_but_not_deleted() {
        let first = rect_label(1, [200, 200], [260, 300]);
        let second = rect_label(2, [201, 201], [261, 301]);
        let mut session = session_for(vec![first.clone(), second.clone()], true);
        let mut checker = BoundingBoxChecker::new(CheckerConfig::default());

        assert!(checker.run(&mut session, &first).unwrap());
        assert!(!checker.run(&mut session, &second).unwrap());
        assert_eq!(session.annotation().objects.len(), 2);
        assert!(session.has_issue(2, Some(defects::REPEATED_LABEL)));
    }

    #[test]
    fn watermark_clip_recomputes_area() {
        // Straddles the left border; auto-fix clips x to the interior.
        let label = rect_label(1, [100, 400], [300, 600]);
        let mut session = session_for(vec![label.clone()], true);
        let mut checker = BoundingBoxChecker::new(CheckerConfig::default());
        assert!(checker.run(&mut session, &label).unwrap());

        let clipped = session.annotation().label(1).unwrap().rect().unwrap();
        assert_eq!(clipped, Rect::from_corners([140, 400], [300, 600]));
        assert!(!session.has_issue(1, None));
    }

    #[test]
    fn truncated_labels_skip_the_aspect_check() {
        let mut label = rect_label(1, [200, 200], [220, 400]); // ratio 10.0
        label.tags.push(Tag::new("truncated", None));
        let mut session = session_for(vec![label.clone()], false);
        let mut checker = BoundingBoxChecker::new(CheckerConfig::default());
        assert!(checker.run(&mut session, &label).unwrap());
        assert!(!session.has_issue(1, Some(defects::ASPECT_RATIO_OUTLIER)));
    }

    #[test]
    fn extreme_aspect_ratio_is_flagged() {
        let label = rect_label(1, [200, 200], [220, 400]); // ratio 10.0
        let mut session = session_for(vec![label.clone()], false);
        let mut checker = BoundingBoxChecker::new(CheckerConfig::default());
        assert!(!checker.run(&mut session, &label).unwrap());
        assert!(session.has_issue(1, Some(defects::ASPECT_RATIO_OUTLIER)));
    }
}
