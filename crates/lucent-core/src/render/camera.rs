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

//! Per-frame camera data: view/projection matrices and frustum planes.
//!
//! [`FrameData`] is transient; it is recomputed every frame from the camera
//! and never persisted. The projection formula follows the camera's tagged
//! variant, and the frustum-plane extraction formula follows the active
//! backend's normalized-device-coordinate depth convention — the wrong
//! convention produces a silently incorrect frustum, not an error, so the
//! mapping is keyed off [`RenderDevice::depth_convention`] and nothing else.
//!
//! [`RenderDevice::depth_convention`]: crate::gpu::RenderDevice::depth_convention

use crate::gpu::DepthConvention;
use crate::math::{Aabb, Mat4, Plane, Vec3};

/// The projection variant of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// A perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov_y_radians: f32,
        /// Width divided by height of the viewport.
        aspect_ratio: f32,
        /// Distance to the near clipping plane.
        z_near: f32,
        /// Distance to the far clipping plane.
        z_far: f32,
    },
    /// An orthographic projection.
    Orthographic {
        /// Left edge of the view volume.
        left: f32,
        /// Right edge of the view volume.
        right: f32,
        /// Bottom edge of the view volume.
        bottom: f32,
        /// Top edge of the view volume.
        top: f32,
        /// Distance to the near clipping plane.
        z_near: f32,
        /// Distance to the far clipping plane.
        z_far: f32,
    },
}

impl Projection {
    /// Builds the projection matrix for the given depth convention.
    pub fn matrix(&self, convention: DepthConvention) -> Mat4 {
        match (*self, convention) {
            (
                Projection::Perspective {
                    fov_y_radians,
                    aspect_ratio,
                    z_near,
                    z_far,
                },
                DepthConvention::ZeroToOne,
            ) => Mat4::perspective_rh_zo(fov_y_radians, aspect_ratio, z_near, z_far),
            (
                Projection::Perspective {
                    fov_y_radians,
                    aspect_ratio,
                    z_near,
                    z_far,
                },
                DepthConvention::NegativeOneToOne,
            ) => Mat4::perspective_rh_no(fov_y_radians, aspect_ratio, z_near, z_far),
            (
                Projection::Orthographic {
                    left,
                    right,
                    bottom,
                    top,
                    z_near,
                    z_far,
                },
                DepthConvention::ZeroToOne,
            ) => Mat4::orthographic_rh_zo(left, right, bottom, top, z_near, z_far),
            (
                Projection::Orthographic {
                    left,
                    right,
                    bottom,
                    top,
                    z_near,
                    z_far,
                },
                DepthConvention::NegativeOneToOne,
            ) => Mat4::orthographic_rh_no(left, right, bottom, top, z_near, z_far),
        }
    }
}

/// A camera: a view matrix plus a tagged projection variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The world-to-view matrix.
    pub view: Mat4,
    /// The projection variant.
    pub projection: Projection,
}

/// The per-frame bundle consumed by the render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameData {
    /// The world-to-view matrix.
    pub view: Mat4,
    /// The projection matrix under the active depth convention.
    pub projection: Mat4,
    /// `projection * view`.
    pub view_projection: Mat4,
    /// The camera reference point used for distance sorting: the negated
    /// translation column of the view matrix.
    pub camera_position: Vec3,
    /// The six frustum planes (left, right, bottom, top, near, far), or
    /// `None` when extraction was not requested.
    pub planes: Option<[Plane; 6]>,
}

impl FrameData {
    /// Computes the frame bundle for `camera`.
    ///
    /// Plane extraction is optional; callers that never cull (overlay
    /// renderers) skip the cost by passing `extract_planes = false`.
    pub fn compute(camera: &Camera, convention: DepthConvention, extract_planes: bool) -> Self {
        let projection = camera.projection.matrix(convention);
        let view_projection = projection * camera.view;
        let planes = if extract_planes {
            Some(frustum_planes(&view_projection, convention))
        } else {
            None
        };
        Self {
            view: camera.view,
            projection,
            view_projection,
            camera_position: -camera.view.translation(),
            planes,
        }
    }

    /// Tests a world-space box against the frustum planes.
    ///
    /// Returns `true` when the box is at least partially inside the
    /// frustum, or when no planes were extracted.
    pub fn aabb_visible(&self, aabb: &Aabb) -> bool {
        let Some(planes) = &self.planes else {
            return true;
        };
        for plane in planes {
            // The box corner furthest along the plane normal; if even that
            // corner is behind the plane, the whole box is outside.
            let positive_vertex = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            if plane.distance_to_point(positive_vertex) < 0.0 {
                return false;
            }
        }
        true
    }
}

/// Extracts the six frustum planes from a combined view-projection matrix.
///
/// Gribb-Hartmann extraction over the matrix rows. The near-plane formula
/// differs between the two clip-space depth conventions; left/right/
/// bottom/top/far are shared. All planes are returned normalized, with
/// normals pointing into the frustum.
pub fn frustum_planes(view_projection: &Mat4, convention: DepthConvention) -> [Plane; 6] {
    let row0 = view_projection.get_row(0);
    let row1 = view_projection.get_row(1);
    let row2 = view_projection.get_row(2);
    let row3 = view_projection.get_row(3);

    let near = match convention {
        DepthConvention::ZeroToOne => row2,
        DepthConvention::NegativeOneToOne => row3 + row2,
    };

    [
        Plane::from_coefficients(row3 + row0).normalized(), // left
        Plane::from_coefficients(row3 - row0).normalized(), // right
        Plane::from_coefficients(row3 + row1).normalized(), // bottom
        Plane::from_coefficients(row3 - row1).normalized(), // top
        Plane::from_coefficients(near).normalized(),        // near
        Plane::from_coefficients(row3 - row2).normalized(), // far
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FRAC_PI_2, Vec4};
    use approx::assert_relative_eq;

    fn plane_approx_eq(a: &Plane, b: &Plane) {
        assert_relative_eq!(a.normal.x, b.normal.x, epsilon = 1e-5);
        assert_relative_eq!(a.normal.y, b.normal.y, epsilon = 1e-5);
        assert_relative_eq!(a.normal.z, b.normal.z, epsilon = 1e-5);
        assert_relative_eq!(a.d, b.d, epsilon = 1e-4);
    }

    #[test]
    fn test_orthographic_planes_match_hand_computed_values() {
        // View = identity, ortho volume x in [-2, 2], y in [-1, 1],
        // camera looking down -Z with near 0 and far 10.
        let camera = Camera {
            view: Mat4::IDENTITY,
            projection: Projection::Orthographic {
                left: -2.0,
                right: 2.0,
                bottom: -1.0,
                top: 1.0,
                z_near: 0.0,
                z_far: 10.0,
            },
        };
        let frame = FrameData::compute(&camera, DepthConvention::ZeroToOne, true);
        let planes = frame.planes.unwrap();

        plane_approx_eq(&planes[0], &Plane { normal: Vec3::X, d: 2.0 }); // left: x >= -2
        plane_approx_eq(&planes[1], &Plane { normal: -Vec3::X, d: 2.0 }); // right: x <= 2
        plane_approx_eq(&planes[2], &Plane { normal: Vec3::Y, d: 1.0 }); // bottom
        plane_approx_eq(&planes[3], &Plane { normal: -Vec3::Y, d: 1.0 }); // top
        plane_approx_eq(&planes[4], &Plane { normal: -Vec3::Z, d: 0.0 }); // near: z <= 0
        plane_approx_eq(&planes[5], &Plane { normal: Vec3::Z, d: 10.0 }); // far: z >= -10
    }

    #[test]
    fn test_perspective_side_planes_at_45_degrees() {
        // 90 degree vertical FOV at aspect 1: every side plane leans 45
        // degrees, so its normal is (±1/√2) in two axes.
        let camera = Camera {
            view: Mat4::IDENTITY,
            projection: Projection::Perspective {
                fov_y_radians: FRAC_PI_2,
                aspect_ratio: 1.0,
                z_near: 0.1,
                z_far: 100.0,
            },
        };
        let frame = FrameData::compute(&camera, DepthConvention::ZeroToOne, true);
        let planes = frame.planes.unwrap();
        let inv_sqrt2 = 1.0 / 2.0_f32.sqrt();

        plane_approx_eq(
            &planes[0],
            &Plane {
                normal: Vec3::new(inv_sqrt2, 0.0, -inv_sqrt2),
                d: 0.0,
            },
        );
        plane_approx_eq(
            &planes[3],
            &Plane {
                normal: Vec3::new(0.0, -inv_sqrt2, -inv_sqrt2),
                d: 0.0,
            },
        );
    }

    #[test]
    fn test_near_plane_formula_depends_on_convention() {
        // The same view-projection matrix must yield different near planes
        // under the two conventions, while the shared planes agree.
        let m = Mat4::perspective_rh_zo(FRAC_PI_2, 1.0, 0.5, 50.0);
        let zo = frustum_planes(&m, DepthConvention::ZeroToOne);
        let no = frustum_planes(&m, DepthConvention::NegativeOneToOne);

        for i in [0usize, 1, 2, 3, 5] {
            plane_approx_eq(&zo[i], &no[i]);
        }
        // Under ZO the near plane of this matrix sits at z = -0.5.
        assert_relative_eq!(zo[4].distance_to_point(Vec3::new(0.0, 0.0, -0.5)), 0.0, epsilon = 1e-5);
        // Interpreting the same matrix with the NO formula moves the plane.
        assert!(no[4].distance_to_point(Vec3::new(0.0, 0.0, -0.5)) > 0.1);
    }

    #[test]
    fn test_aabb_visibility_against_ortho_frustum() {
        let camera = Camera {
            view: Mat4::IDENTITY,
            projection: Projection::Orthographic {
                left: -1.0,
                right: 1.0,
                bottom: -1.0,
                top: 1.0,
                z_near: 0.0,
                z_far: 10.0,
            },
        };
        let frame = FrameData::compute(&camera, DepthConvention::ZeroToOne, true);

        let inside = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -5.0), Vec3::splat(0.5));
        let outside_left =
            Aabb::from_center_half_extents(Vec3::new(-5.0, 0.0, -5.0), Vec3::splat(0.5));
        let straddling =
            Aabb::from_center_half_extents(Vec3::new(1.0, 0.0, -5.0), Vec3::splat(0.5));
        let behind = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 3.0), Vec3::splat(0.5));

        assert!(frame.aabb_visible(&inside));
        assert!(!frame.aabb_visible(&outside_left));
        assert!(frame.aabb_visible(&straddling));
        assert!(!frame.aabb_visible(&behind));
    }

    #[test]
    fn test_no_planes_means_everything_visible() {
        let camera = Camera {
            view: Mat4::IDENTITY,
            projection: Projection::Orthographic {
                left: -1.0,
                right: 1.0,
                bottom: -1.0,
                top: 1.0,
                z_near: 0.0,
                z_far: 1.0,
            },
        };
        let frame = FrameData::compute(&camera, DepthConvention::ZeroToOne, false);
        assert!(frame.planes.is_none());
        let far_away = Aabb::from_center_half_extents(Vec3::splat(1000.0), Vec3::splat(0.5));
        assert!(frame.aabb_visible(&far_away));
    }

    #[test]
    fn test_camera_position_is_negated_view_translation() {
        let camera = Camera {
            view: Mat4::from_translation(Vec3::new(-3.0, -4.0, -5.0)),
            projection: Projection::Orthographic {
                left: -1.0,
                right: 1.0,
                bottom: -1.0,
                top: 1.0,
                z_near: 0.0,
                z_far: 1.0,
            },
        };
        let frame = FrameData::compute(&camera, DepthConvention::ZeroToOne, false);
        assert_eq!(frame.camera_position, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_view_projection_composition_order() {
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0));
        let camera = Camera {
            view,
            projection: Projection::Perspective {
                fov_y_radians: FRAC_PI_2,
                aspect_ratio: 1.0,
                z_near: 0.1,
                z_far: 100.0,
            },
        };
        let frame = FrameData::compute(&camera, DepthConvention::ZeroToOne, false);
        // A world-space origin point passes through view first.
        let clip = frame.view_projection * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let expected = frame.projection * (view * Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(clip, expected);
    }
}
