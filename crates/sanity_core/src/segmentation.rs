//! Defect predicates for bitmap-mask labels.

use std::collections::BTreeSet;

use label_model::{BitmapData, Geometry, GeometryKind, ImageSize, Label};
use mask_codec::Mask;

use crate::config::CheckerConfig;
use crate::defects;
use crate::error::CheckError;
use crate::session::CheckSession;

struct MaskState {
    id: u64,
    origin: [i64; 2],
    mask: Mask,
    tag_names: Vec<String>,
    deleted: bool,
}

/// Runs the bitmap predicates in a fixed order. Holds the per-image
/// pixel-claim buffer used for overlap detection, so one instance must
/// serve exactly one image.
pub struct SegmentationChecker {
    config: CheckerConfig,
    width: usize,
    height: usize,
    /// Label id claiming each image pixel. Cells keep their first owner
    /// so an overlap is never re-attributed to a later label.
    claimed: Vec<Option<u64>>,
}

impl SegmentationChecker {
    pub fn new(config: CheckerConfig, size: ImageSize) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            config,
            width,
            height,
            claimed: vec![None; width * height],
        }
    }

    /// Check one bitmap label. Returns whether the label is free of
    /// (unfixed) defects. Resolved labels pass without any predicate
    /// running.
    pub fn run(&mut self, session: &mut CheckSession, label: &Label) -> Result<bool, CheckError> {
        let Geometry::Bitmap { bitmap } = &label.geometry else {
            return Err(CheckError::TypeMismatch {
                expected: GeometryKind::Bitmap,
                found: label.kind(),
            });
        };
        if session.is_resolved(label.id) {
            return Ok(true);
        }
        let mask = mask_codec::decode(&bitmap.data).map_err(|source| CheckError::Codec {
            label_id: label.id,
            source,
        })?;
        let mut state = MaskState {
            id: label.id,
            origin: bitmap.origin,
            mask,
            tag_names: label.tags.iter().map(|t| t.name.clone()).collect(),
            deleted: false,
        };

        let mut is_ok = true;
        is_ok &= !self.is_small(session, &mut state);
        is_ok &= !self.is_inside_watermark(session, &mut state)?;
        is_ok &= !self.is_ghost_box(session, &mut state)?;
        is_ok &= !self.is_perforated(session, &mut state)?;
        is_ok &= !self.is_overlapping(session, &mut state);
        is_ok &= !self.is_aspect_outlier(session, &state);
        Ok(is_ok)
    }

    fn write_back(&self, session: &mut CheckSession, state: &MaskState) -> Result<(), CheckError> {
        let data = mask_codec::encode(&state.mask).map_err(|source| CheckError::Codec {
            label_id: state.id,
            source,
        })?;
        session.set_geometry(
            state.id,
            Geometry::Bitmap {
                bitmap: BitmapData {
                    data,
                    origin: state.origin,
                },
            },
        );
        Ok(())
    }

    fn is_small(&self, session: &mut CheckSession, state: &mut MaskState) -> bool {
        if state.deleted {
            return false;
        }
        let area = state.mask.area() as i64;
        if session.auto_fix() && area < self.config.small_delete_area {
            session.delete_label(state.id);
            state.deleted = true;
            log::info!(
                "{} | segmentation | small label ({} < {}) --> deleted",
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
                "{} | segmentation | small label ({} < {})",
                session.image_name(),
                area,
                self.config.small_flag_area
            );
        }
        small
    }

    fn is_inside_watermark(
        &self,
        session: &mut CheckSession,
        state: &mut MaskState,
    ) -> Result<bool, CheckError> {
        if state.deleted {
            return Ok(false);
        }
        let Some(bounds) = state.mask.bounds() else {
            return Ok(false);
        };
        let border = self.config.watermark_border_px;
        let x_max = self.width as i64 - 1 - border;
        let y_max = self.height as i64 - 1 - border;
        let gx0 = state.origin[0] + bounds.x0 as i64;
        let gy0 = state.origin[1] + bounds.y0 as i64;
        let gx1 = state.origin[0] + bounds.x1 as i64;
        let gy1 = state.origin[1] + bounds.y1 as i64;
        let inside = gx0 < border || gy0 < border || gx1 > x_max || gy1 > y_max;

        if inside && session.auto_fix() {
            for y in 0..state.mask.height() {
                for x in 0..state.mask.width() {
                    let gx = state.origin[0] + x as i64;
                    let gy = state.origin[1] + y as i64;
                    if gx < border || gy < border || gx > x_max || gy > y_max {
                        state.mask.set(x, y, false);
                    }
                }
            }
            if state.mask.area() == 0 {
                session.delete_label(state.id);
                state.deleted = true;
                log::info!(
                    "{} | segmentation | inside watermark --> deleted (no pixels left)",
                    session.image_name()
                );
                return Ok(false);
            }
            self.write_back(session, state)?;
            session.set_issue(state.id, defects::INSIDE_WATERMARK, false);
            log::info!(
                "{} | segmentation | inside watermark --> cleared border pixels",
                session.image_name()
            );
            return Ok(false);
        }
        session.set_issue(state.id, defects::INSIDE_WATERMARK, inside);
        if inside {
            log::info!("{} | segmentation | inside watermark", session.image_name());
        }
        Ok(inside)
    }

    /// The stored mask canvas is larger than the set pixels actually
    /// need: an upstream encoding artifact that inflates the label's
    /// bounding box.
    fn is_ghost_box(
        &self,
        session: &mut CheckSession,
        state: &mut MaskState,
    ) -> Result<bool, CheckError> {
        if state.deleted {
            return Ok(false);
        }
        if !state.mask.has_zero_border() {
            session.set_issue(state.id, defects::GHOST_BOUNDING_BOX, false);
            return Ok(false);
        }
        if session.auto_fix() {
            match state.mask.bounds() {
                None => {
                    // No pixels at all; the label is pure ghost.
                    session.delete_label(state.id);
                    state.deleted = true;
                    log::info!(
                        "{} | segmentation | ghost bounding box --> deleted (empty mask)",
                        session.image_name()
                    );
                }
                Some(bounds) => {
                    state.mask = state.mask.cropped(&bounds);
                    state.origin[0] += bounds.x0 as i64;
                    state.origin[1] += bounds.y0 as i64;
                    self.write_back(session, state)?;
                    session.set_issue(state.id, defects::GHOST_BOUNDING_BOX, false);
                    log::info!(
                        "{} | segmentation | ghost bounding box --> cropped to pixels",
                        session.image_name()
                    );
                }
            }
            return Ok(false);
        }
        session.set_issue(state.id, defects::GHOST_BOUNDING_BOX, true);
        log::info!("{} | segmentation | ghost bounding box", session.image_name());
        Ok(true)
    }

    fn is_perforated(
        &self,
        session: &mut CheckSession,
        state: &mut MaskState,
    ) -> Result<bool, CheckError> {
        if state.deleted {
            return Ok(false);
        }
        let filled = fill_holes(&state.mask);
        let perforated = filled != state.mask;
        if perforated && session.auto_fix() {
            state.mask = filled;
            self.write_back(session, state)?;
            session.set_issue(state.id, defects::PERFORATED_LABEL, false);
            log::info!(
                "{} | segmentation | perforated label --> holes filled",
                session.image_name()
            );
            return Ok(false);
        }
        session.set_issue(state.id, defects::PERFORATED_LABEL, perforated);
        if perforated {
            log::info!("{} | segmentation | perforated label", session.image_name());
        }
        Ok(perforated)
    }

    /// Stamp the mask into the image-wide claim buffer; any pixel
    /// already owned by another label means both labels share it. The
    /// earlier claimant is flagged as well.
    fn is_overlapping(&mut self, session: &mut CheckSession, state: &mut MaskState) -> bool {
        if state.deleted {
            return false;
        }
        let mut owners: BTreeSet<u64> = BTreeSet::new();
        for (x, y) in state.mask.iter_set() {
            let gx = state.origin[0] + x as i64;
            let gy = state.origin[1] + y as i64;
            if gx < 0 || gy < 0 || gx >= self.width as i64 || gy >= self.height as i64 {
                continue;
            }
            let cell = &mut self.claimed[gy as usize * self.width + gx as usize];
            match *cell {
                None => *cell = Some(state.id),
                Some(owner) if owner != state.id => {
                    owners.insert(owner);
                }
                Some(_) => {}
            }
        }
        let overlapping = !owners.is_empty();
        session.set_issue(state.id, defects::OVERLAPPING_LABEL, overlapping);
        for owner in owners {
            session.set_issue(owner, defects::OVERLAPPING_LABEL, true);
        }
        if overlapping {
            log::info!("{} | segmentation | overlapping label", session.image_name());
        }
        overlapping
    }

    /// Evaluated after the ghost fix so the ratio reflects corrected
    /// geometry.
    fn is_aspect_outlier(&self, session: &mut CheckSession, state: &MaskState) -> bool {
        if state.deleted {
            return false;
        }
        if state
            .tag_names
            .iter()
            .any(|name| self.config.aspect_ratio_skip_tags.contains(name))
        {
            return false;
        }
        let Some(bounds) = state.mask.bounds() else {
            return false;
        };
        let ratio = bounds.height() as f64 / bounds.width() as f64;
        let outlier = ratio < self.config.aspect_ratio_min || ratio > self.config.aspect_ratio_max;
        session.set_issue(state.id, defects::ASPECT_RATIO_OUTLIER, outlier);
        if outlier {
            log::info!(
                "{} | segmentation | aspect ratio outlier ({:.2})",
                session.image_name(),
                ratio
            );
        }
        outlier
    }
}

/// Fill topological holes: zero regions not reachable from the mask
/// border become set pixels.
pub fn fill_holes(mask: &Mask) -> Mask {
    let width = mask.width();
    let height = mask.height();
    if width == 0 || height == 0 {
        return mask.clone();
    }
    let mut outside = vec![false; width * height];
    let mut stack = Vec::new();
    for x in 0..width {
        for &y in &[0, height - 1] {
            if !mask.get(x, y) && !outside[y * width + x] {
                outside[y * width + x] = true;
                stack.push((x, y));
            }
        }
    }
    for y in 0..height {
        for &x in &[0, width - 1] {
            if !mask.get(x, y) && !outside[y * width + x] {
                outside[y * width + x] = true;
                stack.push((x, y));
            }
        }
    }
    while let Some((x, y)) = stack.pop() {
        let mut visit = |nx: usize, ny: usize, stack: &mut Vec<(usize, usize)>| {
            if !mask.get(nx, ny) && !outside[ny * width + nx] {
                outside[ny * width + nx] = true;
                stack.push((nx, ny));
            }
        };
        if x > 0 {
            visit(x - 1, y, &mut stack);
        }
        if x + 1 < width {
            visit(x + 1, y, &mut stack);
        }
        if y > 0 {
            visit(x, y - 1, &mut stack);
        }
        if y + 1 < height {
            visit(x, y + 1, &mut stack);
        }
    }
    let mut filled = mask.clone();
    for y in 0..height {
        for x in 0..width {
            if !mask.get(x, y) && !outside[y * width + x] {
                filled.set(x, y, true);
            }
        }
    }
    filled
}
