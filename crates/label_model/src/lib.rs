//! Data contracts for image annotations.
//!
//! Mirrors the JSON representation used by the annotation server: one
//! annotation per image, holding labels that are either axis-aligned
//! rectangles or offset bitmap masks, each carrying a class title and a
//! set of named tags.

pub mod annotation;
pub mod rect;

pub use annotation::{
    Annotation, BitmapData, Geometry, GeometryKind, ImageSize, Label, Points, Tag,
    ISSUE_TAG_NAME, RESOLVED_TAG_NAME,
};
pub use rect::Rect;
