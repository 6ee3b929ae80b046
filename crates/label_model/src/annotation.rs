//! Annotation, label, and tag types with their server JSON layout.

use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// Tag name marking a detected defect; the value holds the defect text.
pub const ISSUE_TAG_NAME: &str = "Issue";
/// Tag name set by a human reviewer; suppresses all further checking.
pub const RESOLVED_TAG_NAME: &str = "Resolved";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn issue(text: impl Into<String>) -> Self {
        Self::new(ISSUE_TAG_NAME, Some(text.into()))
    }

    pub fn resolved() -> Self {
        Self::new(RESOLVED_TAG_NAME, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub height: u32,
    pub width: u32,
}

/// Rectangle payload: two corner points in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Points {
    pub exterior: Vec<[i64; 2]>,
    #[serde(default)]
    pub interior: Vec<Vec<[i64; 2]>>,
}

impl Points {
    pub fn from_corners(a: [i64; 2], b: [i64; 2]) -> Self {
        Self {
            exterior: vec![a, b],
            interior: Vec::new(),
        }
    }
}

/// Bitmap payload: encoded mask string plus its top-left origin within
/// the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmapData {
    pub data: String,
    pub origin: [i64; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "geometryType")]
pub enum Geometry {
    #[serde(rename = "rectangle")]
    Rectangle { points: Points },
    #[serde(rename = "bitmap")]
    Bitmap { bitmap: BitmapData },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Rectangle { .. } => GeometryKind::Rectangle,
            Geometry::Bitmap { .. } => GeometryKind::Bitmap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Rectangle,
    Bitmap,
}

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Rectangle => "rectangle",
            GeometryKind::Bitmap => "bitmap",
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    #[serde(rename = "classTitle")]
    pub class_title: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl Label {
    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// True if an `Issue` tag exists, optionally matching a specific
    /// defect text.
    pub fn has_issue_tag(&self, text: Option<&str>) -> bool {
        self.tags.iter().any(|t| {
            t.name == ISSUE_TAG_NAME
                && match text {
                    Some(wanted) => t.value.as_deref() == Some(wanted),
                    None => true,
                }
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.has_tag(RESOLVED_TAG_NAME)
    }

    /// Rectangle corners as a normalized [`Rect`], if this is a
    /// rectangle label with at least two exterior points.
    pub fn rect(&self) -> Option<Rect> {
        match &self.geometry {
            Geometry::Rectangle { points } if points.exterior.len() >= 2 => {
                Some(Rect::from_corners(points.exterior[0], points.exterior[1]))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub size: ImageSize,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub objects: Vec<Label>,
}

impl Annotation {
    pub fn new(size: ImageSize) -> Self {
        Self {
            size,
            tags: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn label(&self, id: u64) -> Option<&Label> {
        self.objects.iter().find(|l| l.id == id)
    }

    pub fn label_mut(&mut self, id: u64) -> Option<&mut Label> {
        self.objects.iter_mut().find(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_label_round_trips_through_json() {
        let raw = r#"{
            "id": 17,
            "classTitle": "blue_cone",
            "tags": [{"name": "truncated"}],
            "geometryType": "rectangle",
            "points": {"exterior": [[10, 20], [40, 80]], "interior": []}
        }"#;
        let label: Label = serde_json::from_str(raw).unwrap();
        assert_eq!(label.kind(), GeometryKind::Rectangle);
        assert_eq!(label.rect().unwrap().area(), 30 * 60);
        assert!(label.has_tag("truncated"));

        let encoded = serde_json::to_string(&label).unwrap();
        let back: Label = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, label);
    }

    #[test]
    fn bitmap_label_round_trips_through_json() {
        let raw = r#"{
            "id": 3,
            "classTitle": "yellow_cone",
            "tags": [],
            "geometryType": "bitmap",
            "bitmap": {"data": "eJw=", "origin": [5, 9]}
        }"#;
        let label: Label = serde_json::from_str(raw).unwrap();
        match &label.geometry {
            Geometry::Bitmap { bitmap } => assert_eq!(bitmap.origin, [5, 9]),
            other => panic!("unexpected geometry: {other:?}"),
        }
        assert_eq!(label.kind(), GeometryKind::Bitmap);
    }

    #[test]
    fn issue_tag_lookup_matches_on_value() {
        let label = Label {
            id: 1,
            class_title: "orange_cone".to_string(),
            tags: vec![Tag::issue("Small label")],
            geometry: Geometry::Rectangle {
                points: Points::from_corners([0, 0], [10, 10]),
            },
        };
        assert!(label.has_issue_tag(None));
        assert!(label.has_issue_tag(Some("Small label")));
        assert!(!label.has_issue_tag(Some("Repeated label")));
        assert!(!label.is_resolved());
    }
}
