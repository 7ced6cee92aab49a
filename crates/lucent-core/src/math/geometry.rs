// Copyright 2025 the lucent authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides geometric primitive shapes for spatial calculations.
//!
//! This module contains the structures used by the visibility-culling path:
//! axis-aligned bounding boxes and half-space planes.

use serde::{Deserialize, Serialize};

use super::vector::{Vec3, Vec4};
use super::EPSILON;

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// An AABB is a rectangular prism aligned with the coordinate axes, defined
/// by its minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new `Aabb` from two corner points.
    ///
    /// This constructor automatically ensures that the `min` field holds the
    /// component-wise minimum and `max` holds the component-wise maximum,
    /// regardless of the order the points are passed in.
    #[inline]
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a new `Aabb` from a center point and its half-extents.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let he = Vec3::new(
            half_extents.x.abs(),
            half_extents.y.abs(),
            half_extents.z.abs(),
        );
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// A unit cube centered on the origin.
    #[inline]
    pub fn unit() -> Self {
        Self::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5))
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents (half the size on each axis).
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Maps the box through a per-axis scale followed by a translation.
    ///
    /// Each corner is mapped as `corner * scale + translation`, with no
    /// rotation component. This is the cheap world-space approximation the
    /// culling path uses; a rotated entity may end up with a box that does
    /// not tightly enclose it.
    #[inline]
    pub fn scale_translate(&self, scale: Vec3, translation: Vec3) -> Self {
        Self {
            min: self.min * scale + translation,
            max: self.max * scale + translation,
        }
    }
}

/// A plane in 3D space, stored as a normal and a signed distance.
///
/// A point `p` lies on the plane when `normal.dot(p) + d == 0`. Points with
/// a positive signed distance are on the side of the plane the normal points
/// towards (for frustum planes: the inside of the frustum).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Plane {
    /// The plane normal. Not necessarily unit-length unless the plane has
    /// been normalized.
    pub normal: Vec3,
    /// The signed distance term.
    pub d: f32,
}

impl Plane {
    /// Creates a plane directly from its four coefficients
    /// `(a, b, c, d)` where the plane equation is `ax + by + cz + d = 0`.
    #[inline]
    pub const fn from_coefficients(v: Vec4) -> Self {
        Self {
            normal: Vec3::new(v.x, v.y, v.z),
            d: v.w,
        }
    }

    /// Returns a copy of the plane with a unit-length normal.
    ///
    /// A degenerate plane (zero normal) is returned unchanged.
    #[inline]
    pub fn normalized(&self) -> Self {
        let len = self.normal.length();
        if len > EPSILON {
            let inv = 1.0 / len;
            Self {
                normal: self.normal * inv,
                d: self.d * inv,
            }
        } else {
            *self
        }
    }

    /// Returns the signed distance from the plane to a point.
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}
