//! One entry of an exported world description.
//!
//! World dumps are flat JSON arrays of heterogeneous objects. Every object has
//! a `Type` discriminator and a `Name`; most carry an `Outer` naming their
//! parent scope and a free-form `Properties` object.

use serde::Deserialize;
use serde_json::Value;

use crate::geometry::{Rotator, Size, Vector};

pub const LANDSCAPE: &str = "Landscape";
pub const LANDSCAPE_COMPONENT: &str = "LandscapeComponent";
pub const TEXTURE_2D: &str = "Texture2D";
pub const SCENE_COMPONENT: &str = "SceneComponent";
pub const ROOT_COMPONENT: &str = "RootComponent0";

#[derive(Clone, Debug, Deserialize)]
pub struct Record {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Outer", default)]
    pub outer: Option<String>,
    #[serde(rename = "Properties", default)]
    pub properties: Value,
}

impl Record {
    pub fn new(kind: &str, name: &str, outer: Option<&str>, properties: Value) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            outer: outer.map(str::to_string),
            properties,
        }
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn is_scoped_to(&self, outer: &str) -> bool {
        self.outer.as_deref() == Some(outer)
    }

    /// Walk nested `Properties` keys.
    pub fn property(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.properties, |value, key| value.get(key))
    }

    pub fn property_f64(&self, path: &[&str]) -> Option<f64> {
        self.property(path).and_then(Value::as_f64)
    }

    pub fn property_str(&self, path: &[&str]) -> Option<&str> {
        self.property(path).and_then(Value::as_str)
    }

    /// `ImportedSize` of a `Texture2D` record.
    pub fn imported_size(&self) -> Option<Size> {
        let width = self.property_f64(&["ImportedSize", "X"])?;
        let height = self.property_f64(&["ImportedSize", "Y"])?;
        Some(Size::new(width as u32, height as u32))
    }
}

/// Placement of a landscape, read once from its root scene component.
///
/// Every field the record lacks defaults to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LandscapeTransform {
    pub location: Vector,
    pub rotation: Rotator,
}

impl LandscapeTransform {
    pub fn from_root_component(root: Option<&Record>) -> Self {
        let Some(root) = root else {
            return Self::default();
        };
        let location = Vector::new(
            root.property_f64(&["RelativeLocation", "X"]).unwrap_or(0.0),
            root.property_f64(&["RelativeLocation", "Y"]).unwrap_or(0.0),
            root.property_f64(&["RelativeLocation", "Z"]).unwrap_or(0.0),
        );
        let rotation = Rotator::new(
            root.property_f64(&["RelativeRotation", "Pitch"]).unwrap_or(0.0),
            root.property_f64(&["RelativeRotation", "Yaw"]).unwrap_or(0.0),
            root.property_f64(&["RelativeRotation", "Roll"]).unwrap_or(0.0),
        );
        Self { location, rotation }
    }
}
