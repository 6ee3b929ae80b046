//! Image-level tag check.
//!
//! Some tags only make sense on labels; finding them on the image
//! itself means the annotator tagged the wrong thing.

use crate::config::CheckerConfig;
use crate::session::CheckSession;

pub struct ImageChecker {
    config: CheckerConfig,
}

impl ImageChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    /// Returns whether the image is free of illegal tags; auto-fix
    /// removes them and counts as fixed.
    pub fn run(&self, session: &mut CheckSession) -> bool {
        let mut wrong: Vec<String> = session
            .annotation()
            .tags
            .iter()
            .filter(|t| self.config.illegal_image_tags.contains(&t.name))
            .map(|t| t.name.clone())
            .collect();
        if wrong.is_empty() {
            return true;
        }
        wrong.sort();
        if session.auto_fix() {
            let removed = session.clear_annotation_tags(&wrong);
            log::info!(
                "{} | image | illegal tag ({}) --> fixed",
                session.image_name(),
                removed.join(", ")
            );
            return true;
        }
        log::info!(
            "{} | image | illegal tag ({})",
            session.image_name(),
            wrong.join(", ")
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_model::{Annotation, ImageSize, Tag};

    fn session_with_tags(tags: Vec<Tag>, auto_fix: bool) -> CheckSession {
        let mut ann = Annotation::new(ImageSize {
            height: 100,
            width: 100,
        });
        ann.tags = tags;
        CheckSession::new("img.png", ann, auto_fix)
    }

    #[test]
    fn illegal_image_tags_fail_the_check() {
        let mut session = session_with_tags(vec![Tag::new("truncated", None)], false);
        let checker = ImageChecker::new(CheckerConfig::default());
        assert!(!checker.run(&mut session));
        assert!(!session.mutated());
    }

    #[test]
    fn auto_fix_strips_illegal_image_tags() {
        let mut session = session_with_tags(
            vec![Tag::new("truncated", None), Tag::new("daylight", None)],
            true,
        );
        let checker = ImageChecker::new(CheckerConfig::default());
        assert!(checker.run(&mut session));
        assert!(session.mutated());
        let names: Vec<_> = session
            .annotation()
            .tags
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["daylight"]);
    }
}
