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

//! The two graphics devices.
//!
//! Both implement the full resource, state and frames-in-flight semantics
//! of [`RenderDevice`]; the driver-submission layer below them is outside
//! the engine's boundary. The backend is chosen once, at context creation,
//! and held as a trait object from then on.

pub mod explicit;
pub mod immediate;

pub use explicit::ExplicitDevice;
pub use immediate::ImmediateDevice;

use lucent_core::gpu::{BackendKind, RenderDevice};
use std::sync::Arc;

/// Creates the device for the given backend kind.
///
/// This is the single point where the backend choice is resolved; callers
/// hold the returned trait object and never re-derive the decision.
pub fn create_device(kind: BackendKind) -> Arc<dyn RenderDevice> {
    match kind {
        BackendKind::Explicit => Arc::new(ExplicitDevice::new()),
        BackendKind::Immediate => Arc::new(ImmediateDevice::new()),
    }
}

/// A slot-reusing handle registry shared by both devices.
#[derive(Debug)]
pub(crate) struct Registry<T> {
    slots: Vec<Option<T>>,
}

impl<T> Registry<T> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Stores `value`, reusing the first free slot.
    pub(crate) fn insert(&mut self, value: T) -> usize {
        match self.slots.iter().position(|slot| slot.is_none()) {
            Some(index) => {
                self.slots[index] = Some(value);
                index
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    pub(crate) fn get(&self, id: usize) -> Option<&T> {
        self.slots.get(id).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut T> {
        self.slots.get_mut(id).and_then(|slot| slot.as_mut())
    }

    pub(crate) fn remove(&mut self, id: usize) -> Option<T> {
        self.slots.get_mut(id).and_then(|slot| slot.take())
    }

    /// Number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|value| (index, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucent_core::gpu::DepthConvention;

    #[test]
    fn test_registry_reuses_freed_slots() {
        let mut registry = Registry::new();
        let a = registry.insert("a");
        let b = registry.insert("b");
        assert_ne!(a, b);
        assert_eq!(registry.remove(a), Some("a"));
        assert_eq!(registry.insert("c"), a);
        assert_eq!(registry.len(), 2);
        assert!(registry.get(b).is_some());
    }

    #[test]
    fn test_create_device_resolves_backend_once() {
        let explicit = create_device(BackendKind::Explicit);
        assert_eq!(explicit.kind(), BackendKind::Explicit);
        assert_eq!(explicit.depth_convention(), DepthConvention::ZeroToOne);

        let immediate = create_device(BackendKind::Immediate);
        assert_eq!(immediate.kind(), BackendKind::Immediate);
        assert_eq!(
            immediate.depth_convention(),
            DepthConvention::NegativeOneToOne
        );
    }
}
