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

//! The scene render pass: visibility filtering, distance sorting, and draw
//! submission for one pipeline.
//!
//! Each [`Renderer`] owns a growable collection of drawable entities bound
//! to one pipeline flavor. A pass filters the active + visible entities
//! (optionally fanning the filter out over a caller-supplied thread pool),
//! sorts the survivors by camera distance, binds the pipeline exactly once,
//! and issues one draw per survivor.
//!
//! During the parallel filter, workers append survivors to one shared
//! scratch buffer by claiming slots from a single shared atomic counter
//! (one fetch-add per survivor). That counter is the only concurrent
//! mutation point of the whole pass; there are no locks on the hot path.
//! The append order under the parallel filter is scheduling-dependent, so
//! "no sorting" combined with a thread pool yields frame-to-frame unstable
//! draw order; callers that need determinism disable the pool or enable
//! sorting.

use super::camera::FrameData;
use super::pipeline::{Flavor, Pipeline};
use crate::gpu::DeviceError;
use crate::math::{Aabb, Vec3};
use crate::scene::Transform;
use std::cmp::Ordering;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

/// The draw-order policy of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Entities draw in collection order (or scheduling order when the
    /// parallel filter ran).
    #[default]
    None,
    /// Nearest entities draw first (ascending camera distance).
    FrontToBack,
    /// Farthest entities draw first (descending camera distance); the
    /// painter's order required for alpha blending.
    BackToFront,
}

/// The result of one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Entities whose draw emitted at least one index.
    pub draw_count: u32,
    /// Total indices drawn.
    pub index_count: u32,
    /// Passes executed (0 when the pass exited early with nothing to do).
    pub pass_count: u32,
}

/// A drawable entity: a transform reference, a local-space bounding box,
/// and the flavor-specific payload.
///
/// A `Render` is exclusively owned by the renderer it was added to and
/// never outlives it.
#[derive(Debug)]
pub struct Render<P> {
    transform: Arc<Transform>,
    bounds: Aabb,
    payload: P,
}

impl<P> Render<P> {
    /// The entity's transform.
    pub fn transform(&self) -> &Arc<Transform> {
        &self.transform
    }

    /// The entity's local-space bounding box.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Replaces the local-space bounding box.
    pub fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }

    /// The flavor payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Exclusive access to the flavor payload.
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }
}

/// A survivor of the visibility filter, staged in the scratch buffer.
#[derive(Debug, Clone, Copy)]
struct Survivor {
    /// Index into the entity array.
    index: usize,
    /// The entity's world position at filter time.
    position: Vec3,
    /// Squared camera distance, filled in by the sort step.
    distance_sq: f32,
}

/// Shared survivor output for the parallel filter.
///
/// Workers claim distinct slots with one `fetch_add` per survivor and write
/// without further synchronization.
struct SurvivorSink {
    slots: *mut MaybeUninit<Survivor>,
    capacity: usize,
    cursor: AtomicUsize,
}

// SAFETY: every slot write is preceded by a unique index claim from
// `cursor`, so no two threads ever write the same slot, and the slot
// storage outlives the filter scope.
unsafe impl Sync for SurvivorSink {}

impl SurvivorSink {
    fn push(&self, survivor: Survivor) {
        let index = self.cursor.fetch_add(1, AtomicOrdering::Relaxed);
        debug_assert!(index < self.capacity);
        // SAFETY: `index` was claimed exclusively above and is within the
        // reserved spare capacity.
        unsafe {
            (*self.slots.add(index)).write(survivor);
        }
    }
}

/// Compares two survivors under a sort mode.
///
/// Equal distances compare `Equal` — the sort is allowed to be unstable,
/// but the comparator itself never invents a strict order for equal
/// inputs. `f32::total_cmp` provides the total order, so there is no
/// unreachable arm.
fn compare_distance(mode: SortMode, a: f32, b: f32) -> Ordering {
    match mode {
        SortMode::None => Ordering::Equal,
        SortMode::FrontToBack => a.total_cmp(&b),
        SortMode::BackToFront => b.total_cmp(&a),
    }
}

/// Runs the per-entity visibility filter.
///
/// The world-space test box applies the entity's scale and world position
/// to the local bounds; no rotation is applied. This is the documented
/// cheap approximation, not an oversight — rotating entities that need
/// tight culling should widen their local bounds.
fn filter_entity<P>(
    entity: &Render<P>,
    index: usize,
    frame: &FrameData,
    culling: bool,
) -> Option<Survivor> {
    if !entity.transform.is_active_in_hierarchy() {
        return None;
    }
    let position = entity.transform.model_matrix().translation();
    if culling {
        let world_bounds = entity
            .bounds
            .scale_translate(entity.transform.scale(), position);
        if !frame.aabb_visible(&world_bounds) {
            return None;
        }
    }
    Some(Survivor {
        index,
        position,
        distance_sq: 0.0,
    })
}

/// A dynamic collection of drawable entities sharing one pipeline flavor,
/// plus the pass that culls, sorts and draws them.
pub struct Renderer<F: Flavor> {
    entities: Vec<Render<F::Payload>>,
    /// Reused per-pass survivor staging. Contents never outlive one
    /// `render` call; only the capacity persists.
    scratch: Vec<Survivor>,
    sort_mode: SortMode,
    culling: bool,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl<F: Flavor> std::fmt::Debug for Renderer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("entities", &self.entities.len())
            .field("sort_mode", &self.sort_mode)
            .field("culling", &self.culling)
            .field("thread_pool", &self.pool.is_some())
            .finish()
    }
}

impl<F: Flavor> Renderer<F> {
    /// Creates an empty renderer.
    pub fn new(sort_mode: SortMode, culling: bool) -> Self {
        Self {
            entities: Vec::new(),
            scratch: Vec::new(),
            sort_mode,
            culling,
            pool: None,
        }
    }

    /// Creates an empty renderer with pre-reserved entity capacity.
    pub fn with_capacity(
        capacity: usize,
        sort_mode: SortMode,
        culling: bool,
    ) -> Result<Self, DeviceError> {
        let mut renderer = Self::new(sort_mode, culling);
        renderer.entities.try_reserve_exact(capacity)?;
        Ok(renderer)
    }

    /// Attaches (or detaches) a shared thread pool for the parallel filter
    /// phase. The pool is only used when the entity count exceeds its
    /// thread count.
    pub fn set_thread_pool(&mut self, pool: Option<Arc<rayon::ThreadPool>>) {
        self.pool = pool;
    }

    /// The configured sort mode.
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Changes the sort mode.
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    /// Whether frustum culling is enabled.
    pub fn culling(&self) -> bool {
        self.culling
    }

    /// Enables or disables frustum culling.
    pub fn set_culling(&mut self, culling: bool) {
        self.culling = culling;
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` when the renderer holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Current entity capacity.
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Shared access to an entity.
    pub fn get(&self, index: usize) -> Option<&Render<F::Payload>> {
        self.entities.get(index)
    }

    /// Exclusive access to an entity.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Render<F::Payload>> {
        self.entities.get_mut(index)
    }

    /// Adds an entity and returns its index.
    ///
    /// Growth is fallible: when the collection is full, capacity is doubled
    /// with `try_reserve`, and an allocation failure is reported as
    /// [`DeviceError::OutOfHostMemory`] while leaving every stored entity
    /// untouched — the renderer stays in its prior valid state.
    pub fn add(
        &mut self,
        transform: Arc<Transform>,
        bounds: Aabb,
        payload: F::Payload,
    ) -> Result<usize, DeviceError> {
        if self.entities.len() == self.entities.capacity() {
            let additional = self.entities.len().max(1);
            self.entities.try_reserve(additional)?;
        }
        let index = self.entities.len();
        self.entities.push(Render {
            transform,
            bounds,
            payload,
        });
        Ok(index)
    }

    /// Removes the entity at `index` and returns it, preserving the
    /// relative order of the remaining entities.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Render<F::Payload> {
        self.entities.remove(index)
    }

    /// Runs one render pass against `pipeline`.
    ///
    /// 1. With no entities, returns a zero result without touching the
    ///    device (no allocation, no pipeline bind).
    /// 2. Filters active + visible entities, in entity order on the serial
    ///    path; round-robin strided across the pool's workers on the
    ///    parallel path (taken only when a pool is attached and the entity
    ///    count exceeds its thread count).
    /// 3. With zero survivors, returns a zero result — the bind is skipped
    ///    entirely for an empty draw.
    /// 4. Sorts survivors by squared camera distance per the sort mode.
    /// 5. Binds the pipeline exactly once, then draws every survivor in
    ///    final order, re-reading each model matrix at draw time (the
    ///    filter may have observed an older one, and on the parallel path
    ///    a transform may have changed since).
    pub fn render(
        &mut self,
        pipeline: &mut Pipeline<F>,
        frame: &FrameData,
    ) -> Result<RenderStats, DeviceError> {
        let entity_count = self.entities.len();
        if entity_count == 0 {
            return Ok(RenderStats::default());
        }

        self.scratch.clear();
        self.scratch.try_reserve(entity_count)?;

        let parallel_pool = match &self.pool {
            Some(pool) if entity_count > pool.current_num_threads() => Some(pool.clone()),
            _ => None,
        };

        if let Some(pool) = parallel_pool {
            let threads = pool.current_num_threads();
            let entities = &self.entities;
            let culling = self.culling;
            let sink = SurvivorSink {
                slots: self.scratch.spare_capacity_mut().as_mut_ptr(),
                capacity: entity_count,
                cursor: AtomicUsize::new(0),
            };

            // The scope blocks the calling thread until every worker task
            // has finished; the survivor count is only read after that.
            pool.scope(|scope| {
                for worker in 0..threads {
                    let sink = &sink;
                    scope.spawn(move |_| {
                        let mut index = worker;
                        while index < entity_count {
                            if let Some(survivor) =
                                filter_entity(&entities[index], index, frame, culling)
                            {
                                sink.push(survivor);
                            }
                            index += threads;
                        }
                    });
                }
            });

            let survivor_count = sink.cursor.into_inner();
            // SAFETY: slots 0..survivor_count were each claimed exactly
            // once and written before the scope barrier released us.
            unsafe {
                self.scratch.set_len(survivor_count);
            }
        } else {
            for (index, entity) in self.entities.iter().enumerate() {
                if let Some(survivor) = filter_entity(entity, index, frame, self.culling) {
                    self.scratch.push(survivor);
                }
            }
        }

        if self.scratch.is_empty() {
            return Ok(RenderStats::default());
        }

        if self.sort_mode != SortMode::None && self.scratch.len() > 1 {
            for survivor in &mut self.scratch {
                survivor.distance_sq = (survivor.position - frame.camera_position).length_squared();
            }
            let mode = self.sort_mode;
            self.scratch
                .sort_unstable_by(|a, b| compare_distance(mode, a.distance_sq, b.distance_sq));
        }

        pipeline.bind()?;

        let mut stats = RenderStats {
            pass_count: 1,
            ..RenderStats::default()
        };
        for survivor in &self.scratch {
            let entity = &self.entities[survivor.index];
            let model = entity.transform.model_matrix();
            let drawn = pipeline.draw_payload(&entity.payload, &model, &frame.view_projection);
            if drawn > 0 {
                stats.draw_count += 1;
            }
            stats.index_count += drawn;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::testing::MockDevice;
    use crate::gpu::{
        DepthConvention, Mesh, PipelineId, PipelineState, RenderDevice, ShaderId, VertexLayout,
    };
    use crate::math::{Extent2D, Mat4};
    use crate::render::camera::{Camera, Projection};

    /// Draws the payload mesh; no flavor-owned GPU state.
    struct MeshFlavor;

    impl Flavor for MeshFlavor {
        type Payload = Mesh;

        fn draw(
            &mut self,
            device: &dyn RenderDevice,
            pipeline: PipelineId,
            payload: &Mesh,
            _model: &Mat4,
            _view_projection: &Mat4,
        ) -> u32 {
            device.draw_mesh(pipeline, payload)
        }

        fn on_resize(
            &mut self,
            _device: &dyn RenderDevice,
            _size: Extent2D,
            _frame_count: usize,
        ) -> Result<(), DeviceError> {
            Ok(())
        }

        fn on_destroy(&mut self, _device: &dyn RenderDevice) {}
    }

    fn test_pipeline(device: Arc<MockDevice>) -> Pipeline<MeshFlavor> {
        Pipeline::new(
            device,
            "pass-test",
            PipelineState::default(),
            VertexLayout::default(),
            vec![ShaderId(1)],
            Extent2D::new(640, 480),
            MeshFlavor,
        )
        .unwrap()
    }

    fn mesh(index_count: u32) -> Mesh {
        Mesh {
            vertex_buffer: crate::gpu::BufferId(900),
            index_buffer: crate::gpu::BufferId(901),
            index_count,
        }
    }

    fn ortho_frame() -> FrameData {
        FrameData::compute(
            &Camera {
                view: Mat4::IDENTITY,
                projection: Projection::Orthographic {
                    left: -10.0,
                    right: 10.0,
                    bottom: -10.0,
                    top: 10.0,
                    z_near: 0.0,
                    z_far: 100.0,
                },
            },
            DepthConvention::ZeroToOne,
            true,
        )
    }

    fn add_at<F>(renderer: &mut Renderer<F>, position: Vec3, payload: F::Payload) -> usize
    where
        F: Flavor,
    {
        renderer
            .add(Transform::at(position), Aabb::unit(), payload)
            .unwrap()
    }

    #[test]
    fn test_empty_render_is_idempotent_and_binds_nothing() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::None, true);

        let stats = renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        assert_eq!(stats, RenderStats::default());
        assert_eq!(device.stats().pipeline_binds, 0);
        assert_eq!(device.stats().draw_calls, 0);
    }

    #[test]
    fn test_all_entities_culled_skips_the_bind() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::None, true);
        add_at(&mut renderer, Vec3::new(500.0, 0.0, -5.0), mesh(6));
        add_at(&mut renderer, Vec3::new(0.0, 500.0, -5.0), mesh(6));

        let stats = renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        assert_eq!(stats, RenderStats::default());
        assert_eq!(device.stats().pipeline_binds, 0);
    }

    #[test]
    fn test_inactive_hierarchy_is_filtered_even_without_culling() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::None, false);

        let parent = Transform::new();
        let child = Transform::at(Vec3::new(0.0, 0.0, -5.0));
        child.set_parent(Some(parent.clone()));
        renderer.add(child, Aabb::unit(), mesh(6)).unwrap();
        add_at(&mut renderer, Vec3::new(0.0, 0.0, -5.0), mesh(9));

        parent.set_active(false);
        let stats = renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        assert_eq!(stats.draw_count, 1);
        assert_eq!(stats.index_count, 9);
    }

    #[test]
    fn test_pipeline_is_bound_exactly_once_per_pass() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::None, false);
        for i in 0..5 {
            add_at(&mut renderer, Vec3::new(i as f32, 0.0, -5.0), mesh(6));
        }

        let stats = renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        assert_eq!(stats.draw_count, 5);
        assert_eq!(stats.index_count, 30);
        assert_eq!(stats.pass_count, 1);
        assert_eq!(device.stats().pipeline_binds, 1);
        assert_eq!(device.stats().draw_calls, 5);
    }

    #[test]
    fn test_capacity_doubles_and_preserves_insertion_order() {
        let mut renderer: Renderer<MeshFlavor> =
            Renderer::with_capacity(4, SortMode::None, false).unwrap();
        assert_eq!(renderer.capacity(), 4);

        for i in 0..6 {
            add_at(&mut renderer, Vec3::new(i as f32, 0.0, 0.0), mesh(i as u32));
        }
        assert_eq!(renderer.len(), 6);
        assert!(renderer.capacity() >= 8, "capacity must have doubled");
        for i in 0..6 {
            assert_eq!(renderer.get(i).unwrap().payload().index_count, i as u32);
        }
    }

    #[test]
    fn test_round_trip_insertion_growth_removal() {
        // Capacity 4, culling disabled, no thread pool, sort mode none:
        // the deterministic single-threaded path.
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> =
            Renderer::with_capacity(4, SortMode::None, false).unwrap();

        for i in 0..6u32 {
            add_at(&mut renderer, Vec3::new(i as f32, 0.0, -5.0), mesh(10 + i));
        }

        // All 6 draw in insertion order.
        device.clear_ops();
        let stats = renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        assert_eq!(stats.draw_count, 6);
        let draws: Vec<String> = device
            .ops()
            .into_iter()
            .filter(|op| op.starts_with("draw_mesh"))
            .collect();
        let expected: Vec<String> = (0..6u32).map(|i| format!("draw_mesh:{}", 10 + i)).collect();
        assert_eq!(draws, expected);

        // Destroy entities 2 and 5 (payload ids 12 and 15); the remaining
        // four stay contiguous and in relative order.
        renderer.remove(5);
        renderer.remove(2);
        assert_eq!(renderer.len(), 4);
        let remaining: Vec<u32> = (0..4)
            .map(|i| renderer.get(i).unwrap().payload().index_count)
            .collect();
        assert_eq!(remaining, vec![10, 11, 13, 14]);
    }

    #[test]
    fn test_sort_orders_by_camera_distance() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::FrontToBack, false);

        // Insertion order is far, near, middle; index counts tag them.
        add_at(&mut renderer, Vec3::new(0.0, 0.0, -50.0), mesh(3));
        add_at(&mut renderer, Vec3::new(0.0, 0.0, -1.0), mesh(1));
        add_at(&mut renderer, Vec3::new(0.0, 0.0, -20.0), mesh(2));

        device.clear_ops();
        renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        let draws: Vec<String> = device
            .ops()
            .into_iter()
            .filter(|op| op.starts_with("draw_mesh"))
            .collect();
        assert_eq!(draws, vec!["draw_mesh:1", "draw_mesh:2", "draw_mesh:3"]);

        renderer.set_sort_mode(SortMode::BackToFront);
        device.clear_ops();
        renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        let draws: Vec<String> = device
            .ops()
            .into_iter()
            .filter(|op| op.starts_with("draw_mesh"))
            .collect();
        assert_eq!(draws, vec!["draw_mesh:3", "draw_mesh:2", "draw_mesh:1"]);
    }

    #[test]
    fn test_comparator_reports_equal_for_equal_distances() {
        assert_eq!(
            compare_distance(SortMode::FrontToBack, 4.0, 4.0),
            Ordering::Equal
        );
        assert_eq!(
            compare_distance(SortMode::BackToFront, 4.0, 4.0),
            Ordering::Equal
        );
        assert_eq!(
            compare_distance(SortMode::FrontToBack, 1.0, 2.0),
            Ordering::Less
        );
        assert_eq!(
            compare_distance(SortMode::BackToFront, 1.0, 2.0),
            Ordering::Greater
        );
    }

    #[test]
    fn test_parallel_filter_matches_serial_filter() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let pool = Arc::new(
            rayon::ThreadPoolBuilder::new()
                .num_threads(4)
                .build()
                .unwrap(),
        );

        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::FrontToBack, true);
        // A mix of visible, culled and inactive entities, far more than the
        // pool has threads.
        for i in 0..64u32 {
            let z = -(1.0 + i as f32);
            let visible = i % 3 != 0;
            let position = if visible {
                Vec3::new(0.0, 0.0, z)
            } else {
                Vec3::new(1000.0, 0.0, z)
            };
            let index = add_at(&mut renderer, position, mesh(1 + i));
            if i % 7 == 0 {
                renderer.get(index).unwrap().transform().set_active(false);
            }
        }

        let serial = renderer.render(&mut pipeline, &ortho_frame()).unwrap();

        renderer.set_thread_pool(Some(pool));
        let parallel = renderer.render(&mut pipeline, &ortho_frame()).unwrap();

        // Same survivors, same sorted order, so identical stats.
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_small_collections_stay_on_the_serial_path() {
        let pool = Arc::new(
            rayon::ThreadPoolBuilder::new()
                .num_threads(8)
                .build()
                .unwrap(),
        );
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::None, false);
        renderer.set_thread_pool(Some(pool));

        // Fewer entities than pool threads: the deterministic serial loop
        // runs, so draw order is insertion order.
        for i in 0..4u32 {
            add_at(&mut renderer, Vec3::new(0.0, 0.0, -1.0 - i as f32), mesh(1 + i));
        }
        device.clear_ops();
        renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        let draws: Vec<String> = device
            .ops()
            .into_iter()
            .filter(|op| op.starts_with("draw_mesh"))
            .collect();
        assert_eq!(
            draws,
            vec!["draw_mesh:1", "draw_mesh:2", "draw_mesh:3", "draw_mesh:4"]
        );
    }

    #[test]
    fn test_zero_index_draws_do_not_count() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::None, false);
        add_at(&mut renderer, Vec3::new(0.0, 0.0, -5.0), mesh(0));
        add_at(&mut renderer, Vec3::new(0.0, 0.0, -6.0), mesh(12));

        let stats = renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        // The empty mesh "drew nothing": it contributes no indices and does
        // not count as a rendered entity, but the pass still ran.
        assert_eq!(stats.draw_count, 1);
        assert_eq!(stats.index_count, 12);
        assert_eq!(stats.pass_count, 1);
    }

    #[test]
    fn test_scale_only_world_bounds() {
        // An entity scaled up enough must survive culling even when its
        // untransformed box would not reach the frustum.
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = test_pipeline(device.clone());
        let mut renderer: Renderer<MeshFlavor> = Renderer::new(SortMode::None, true);

        let transform = Transform::at(Vec3::new(14.0, 0.0, -5.0));
        renderer
            .add(transform.clone(), Aabb::unit(), mesh(6))
            .unwrap();

        // Frustum x extent is [-10, 10]; box max.x = 14 + 0.5: culled.
        let stats = renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        assert_eq!(stats.draw_count, 0);

        // Scaling by 10 widens the box to 14 ± 5: visible.
        transform.set_scale(Vec3::splat(10.0));
        let stats = renderer.render(&mut pipeline, &ortho_frame()).unwrap();
        assert_eq!(stats.draw_count, 1);
    }
}
