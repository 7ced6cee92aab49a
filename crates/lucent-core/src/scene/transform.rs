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

//! A hierarchical TRS transform node.
//!
//! Entities hold an `Arc<Transform>`; the renderer reads transforms from
//! worker threads during the parallel cull phase, so all state sits behind
//! an `RwLock` and every accessor takes `&self`.

use crate::math::{Mat4, Quaternion, Vec3};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy)]
struct TransformState {
    position: Vec3,
    rotation: Quaternion,
    scale: Vec3,
    active: bool,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vec3::ONE,
            active: true,
        }
    }
}

/// A transform node carrying translation, rotation, scale, an active flag,
/// and an optional parent.
///
/// An entity whose transform — or any ancestor transform — is inactive is
/// treated as invisible by the renderer.
#[derive(Debug, Default)]
pub struct Transform {
    state: RwLock<TransformState>,
    parent: RwLock<Option<Arc<Transform>>>,
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Transform {
    /// Creates an active transform at the origin with identity rotation and
    /// unit scale.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates an active transform at `position`.
    pub fn at(position: Vec3) -> Arc<Self> {
        let t = Self::new();
        t.set_position(position);
        t
    }

    /// Returns this node's own active flag (parents not considered).
    pub fn is_active(&self) -> bool {
        read_lock(&self.state).active
    }

    /// Returns `true` only when this node and every ancestor are active.
    pub fn is_active_in_hierarchy(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        let mut parent = read_lock(&self.parent).clone();
        while let Some(node) = parent {
            if !node.is_active() {
                return false;
            }
            parent = read_lock(&node.parent).clone();
        }
        true
    }

    /// Sets this node's active flag.
    pub fn set_active(&self, active: bool) {
        write_lock(&self.state).active = active;
    }

    /// Returns the local position.
    pub fn position(&self) -> Vec3 {
        read_lock(&self.state).position
    }

    /// Sets the local position.
    pub fn set_position(&self, position: Vec3) {
        write_lock(&self.state).position = position;
    }

    /// Returns the local rotation.
    pub fn rotation(&self) -> Quaternion {
        read_lock(&self.state).rotation
    }

    /// Sets the local rotation.
    pub fn set_rotation(&self, rotation: Quaternion) {
        write_lock(&self.state).rotation = rotation;
    }

    /// Returns the local scale.
    pub fn scale(&self) -> Vec3 {
        read_lock(&self.state).scale
    }

    /// Sets the local scale.
    pub fn set_scale(&self, scale: Vec3) {
        write_lock(&self.state).scale = scale;
    }

    /// Returns the parent node, if any.
    pub fn parent(&self) -> Option<Arc<Transform>> {
        read_lock(&self.parent).clone()
    }

    /// Reparents this node. Callers are responsible for not introducing
    /// cycles; `model_matrix` would not terminate on one.
    pub fn set_parent(&self, parent: Option<Arc<Transform>>) {
        *write_lock(&self.parent) = parent;
    }

    /// The local transform matrix (`translation * rotation * scale`).
    pub fn local_matrix(&self) -> Mat4 {
        let state = *read_lock(&self.state);
        Mat4::from_translation(state.position)
            * Mat4::from_quat(state.rotation)
            * Mat4::from_scale(state.scale)
    }

    /// The world matrix: the product of every ancestor's local matrix down
    /// to this node.
    pub fn model_matrix(&self) -> Mat4 {
        let mut matrix = self.local_matrix();
        let mut parent = read_lock(&self.parent).clone();
        while let Some(node) = parent {
            matrix = node.local_matrix() * matrix;
            parent = read_lock(&node.parent).clone();
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FRAC_PI_2;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_active_identity() {
        let t = Transform::new();
        assert!(t.is_active_in_hierarchy());
        assert_eq!(t.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_world_position_composes_through_parent() {
        let parent = Transform::at(Vec3::new(10.0, 0.0, 0.0));
        let child = Transform::at(Vec3::new(0.0, 5.0, 0.0));
        child.set_parent(Some(parent.clone()));

        assert_eq!(
            child.model_matrix().translation(),
            Vec3::new(10.0, 5.0, 0.0)
        );
    }

    #[test]
    fn test_parent_rotation_moves_child() {
        let parent = Transform::new();
        parent.set_rotation(Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2));
        let child = Transform::at(Vec3::X);
        child.set_parent(Some(parent));

        let world = child.model_matrix().translation();
        assert_relative_eq!(world.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(world.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_inactive_ancestor_deactivates_hierarchy() {
        let grandparent = Transform::new();
        let parent = Transform::new();
        let child = Transform::new();
        parent.set_parent(Some(grandparent.clone()));
        child.set_parent(Some(parent.clone()));

        assert!(child.is_active_in_hierarchy());
        grandparent.set_active(false);
        assert!(!child.is_active_in_hierarchy());
        // The child's own flag is untouched.
        assert!(child.is_active());
    }

    #[test]
    fn test_scale_does_not_leak_into_position() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        t.set_scale(Vec3::splat(4.0));
        assert_eq!(t.model_matrix().translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale(), Vec3::splat(4.0));
    }
}
