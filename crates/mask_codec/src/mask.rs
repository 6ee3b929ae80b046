//! Row-major binary mask with set-pixel bookkeeping.

/// Inclusive bounds of the set pixels within a mask, in mask-local
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskBounds {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl MaskBounds {
    pub fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0 + 1
    }
}

/// Binary 2D mask; cells are strictly 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Build from raw bytes; any non-zero byte counts as set.
    pub fn from_raw(width: usize, height: usize, raw: &[u8]) -> Self {
        debug_assert_eq!(raw.len(), width * height);
        Self {
            width,
            height,
            data: raw.iter().map(|&b| u8::from(b != 0)).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.data[y * self.width + x] = u8::from(value);
    }

    /// Count of set pixels.
    pub fn area(&self) -> u64 {
        self.data.iter().map(|&b| b as u64).sum()
    }

    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &b)| b != 0)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Inclusive bounding box of the set pixels; `None` when empty.
    pub fn bounds(&self) -> Option<MaskBounds> {
        let mut bounds: Option<MaskBounds> = None;
        for (x, y) in self.iter_set() {
            bounds = Some(match bounds {
                None => MaskBounds {
                    x0: x,
                    y0: y,
                    x1: x,
                    y1: y,
                },
                Some(b) => MaskBounds {
                    x0: b.x0.min(x),
                    y0: b.y0.min(y),
                    x1: b.x1.max(x),
                    y1: b.y1.max(y),
                },
            });
        }
        bounds
    }

    /// Copy of the given region.
    pub fn cropped(&self, bounds: &MaskBounds) -> Mask {
        let mut out = Mask::new(bounds.width(), bounds.height());
        for y in bounds.y0..=bounds.y1 {
            for x in bounds.x0..=bounds.x1 {
                if self.get(x, y) {
                    out.set(x - bounds.x0, y - bounds.y0, true);
                }
            }
        }
        out
    }

    /// True when the canvas is strictly larger than the bounding box of
    /// its set pixels (padding rows or columns of zeros exist).
    pub fn has_zero_border(&self) -> bool {
        match self.bounds() {
            Some(b) => b.width() < self.width || b.height() < self.height,
            None => self.width > 0 || self.height > 0,
        }
    }

    pub(crate) fn luma_bytes(&self) -> Vec<u8> {
        self.data.iter().map(|&b| b * 255).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_grid(rows: &[&[u8]]) -> Mask {
        let height = rows.len();
        let width = rows[0].len();
        let mut mask = Mask::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                mask.set(x, y, cell != 0);
            }
        }
        mask
    }

    #[test]
    fn bounds_track_set_pixels() {
        let mask = mask_from_grid(&[
            &[0, 0, 0, 0],
            &[0, 1, 1, 0],
            &[0, 1, 0, 0],
            &[0, 0, 0, 0],
        ]);
        let bounds = mask.bounds().unwrap();
        assert_eq!(
            bounds,
            MaskBounds {
                x0: 1,
                y0: 1,
                x1: 2,
                y1: 2
            }
        );
        assert_eq!(mask.area(), 3);
        assert!(mask.has_zero_border());
    }

    #[test]
    fn cropping_removes_the_zero_border() {
        let mask = mask_from_grid(&[&[0, 0, 0], &[0, 1, 1], &[0, 0, 1]]);
        let bounds = mask.bounds().unwrap();
        let tight = mask.cropped(&bounds);
        assert_eq!((tight.width(), tight.height()), (2, 2));
        assert!(!tight.has_zero_border());
        assert_eq!(tight.area(), mask.area());
    }

    #[test]
    fn empty_mask_has_no_bounds() {
        let mask = Mask::new(3, 3);
        assert!(mask.bounds().is_none());
        assert_eq!(mask.area(), 0);
    }
}
