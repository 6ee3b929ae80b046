//! Per-image check session: issue-tag ledger plus mutation log.

use label_model::{Annotation, Geometry, ImageSize, Tag, ISSUE_TAG_NAME};

/// Owns one image's annotation for the duration of a check run.
///
/// All label mutations flow through this type so the caller knows
/// whether the annotation needs to be persisted afterwards. One session
/// per image; never shared across images or threads.
#[derive(Debug)]
pub struct CheckSession {
    image_name: String,
    size: ImageSize,
    auto_fix: bool,
    annotation: Annotation,
    mutated: bool,
}

impl CheckSession {
    pub fn new(image_name: impl Into<String>, annotation: Annotation, auto_fix: bool) -> Self {
        Self {
            image_name: image_name.into(),
            size: annotation.size,
            auto_fix,
            annotation,
            mutated: false,
        }
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn auto_fix(&self) -> bool {
        self.auto_fix
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn mutated(&self) -> bool {
        self.mutated
    }

    pub fn into_annotation(self) -> (Annotation, bool) {
        (self.annotation, self.mutated)
    }

    pub fn is_resolved(&self, label_id: u64) -> bool {
        self.annotation
            .label(label_id)
            .is_some_and(|l| l.is_resolved())
    }

    pub fn has_issue(&self, label_id: u64, text: Option<&str>) -> bool {
        self.annotation
            .label(label_id)
            .is_some_and(|l| l.has_issue_tag(text))
    }

    /// Idempotently add or remove the `Issue` tag with the given defect
    /// text. A no-op for unknown label ids (the label may have been
    /// deleted earlier in the run).
    pub fn set_issue(&mut self, label_id: u64, text: &str, present: bool) {
        let Some(label) = self.annotation.label_mut(label_id) else {
            return;
        };
        let exists = label
            .tags
            .iter()
            .any(|t| t.name == ISSUE_TAG_NAME && t.value.as_deref() == Some(text));
        if present && !exists {
            label.tags.push(Tag::issue(text));
            self.mutated = true;
        } else if !present && exists {
            label
                .tags
                .retain(|t| !(t.name == ISSUE_TAG_NAME && t.value.as_deref() == Some(text)));
            self.mutated = true;
        }
    }

    /// Remove the label from the annotation. Returns false if it was
    /// already gone.
    pub fn delete_label(&mut self, label_id: u64) -> bool {
        let before = self.annotation.objects.len();
        self.annotation.objects.retain(|l| l.id != label_id);
        let removed = self.annotation.objects.len() != before;
        if removed {
            self.mutated = true;
        }
        removed
    }

    /// Replace the label's geometry after an auto-fix.
    pub fn set_geometry(&mut self, label_id: u64, geometry: Geometry) {
        if let Some(label) = self.annotation.label_mut(label_id) {
            if label.geometry != geometry {
                label.geometry = geometry;
                self.mutated = true;
            }
        }
    }

    /// Remove image-level tags by name; returns the names actually
    /// removed, sorted.
    pub fn clear_annotation_tags(&mut self, names: &[String]) -> Vec<String> {
        let mut removed: Vec<String> = self
            .annotation
            .tags
            .iter()
            .filter(|t| names.contains(&t.name))
            .map(|t| t.name.clone())
            .collect();
        if !removed.is_empty() {
            self.annotation.tags.retain(|t| !names.contains(&t.name));
            self.mutated = true;
        }
        removed.sort();
        removed.dedup();
        removed
    }
}
