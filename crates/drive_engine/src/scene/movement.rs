//! Movement deltas applied to placed nodes
//!
//! A [`Movement`] is the unit of change produced by input key maps and by
//! auto-drive. Every field is optional; a missing field changes nothing.

use crate::foundation::math::{axis_rotation, non_uniform_scale, translation, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Rotation delta as axis and angle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation axis (need not be normalized)
    pub axis: Vec3,
    /// Angle in degrees
    pub degrees: f32,
    /// Accumulate into the pivot matrix instead of the local rotation
    #[serde(default)]
    pub pivot: bool,
}

impl Rotation {
    /// Local rotation around `axis`
    pub fn new(axis: Vec3, degrees: f32) -> Self {
        Self { axis, degrees, pivot: false }
    }

    /// Pivot rotation around `axis`
    pub fn pivot(axis: Vec3, degrees: f32) -> Self {
        Self { axis, degrees, pivot: true }
    }

    /// Rotation matrix for this delta
    pub fn to_matrix(&self) -> Mat4 {
        axis_rotation(&self.axis, self.degrees)
    }
}

/// Structured movement delta
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Translation offset
    #[serde(default)]
    pub translate: Option<Vec3>,
    /// Rotation delta
    #[serde(default)]
    pub rotate: Option<Rotation>,
    /// Per-axis scale factors
    #[serde(default)]
    pub scale: Option<Vec3>,
}

impl Movement {
    /// Movement that only translates
    pub fn translate(offset: Vec3) -> Self {
        Self { translate: Some(offset), ..Self::default() }
    }

    /// Movement that only rotates
    pub fn rotate(rotation: Rotation) -> Self {
        Self { rotate: Some(rotation), ..Self::default() }
    }

    /// Movement that only scales
    pub fn scale(factors: Vec3) -> Self {
        Self { scale: Some(factors), ..Self::default() }
    }

    /// Builder pattern: add a translation
    pub fn with_translate(mut self, offset: Vec3) -> Self {
        self.translate = Some(offset);
        self
    }

    /// Whether applying this movement changes nothing
    pub fn is_empty(&self) -> bool {
        self.translate.is_none() && self.rotate.is_none() && self.scale.is_none()
    }

    /// Translation matrix, if any
    pub fn translation_matrix(&self) -> Option<Mat4> {
        self.translate.as_ref().map(translation)
    }

    /// Scale matrix, if any
    pub fn scale_matrix(&self) -> Option<Mat4> {
        self.scale.as_ref().map(non_uniform_scale)
    }
}
