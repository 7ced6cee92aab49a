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

//! Per-frame-in-flight uniform storage.
//!
//! A [`UniformRing`] pre-allocates one buffer + binding pair per frame in
//! flight and cycles through them, so the GPU can still read a previous
//! frame's data while the CPU writes the current slot. When the platform
//! reports a different frames-in-flight count, [`UniformRing::resize`]
//! reconciles the slot array: the complete new set is built first, then the
//! old set is destroyed, never the other way round — an in-flight frame may
//! still be reading the old set while the new one is being built.

use super::binding::{BindingDescriptor, BindingEntry, BindingId, BindingResource};
use super::buffer::{BufferDescriptor, BufferId, BufferUsage};
use super::device::RenderDevice;
use super::error::DeviceError;
use std::borrow::Cow;

/// A single slot of the ring: a uniform buffer and the binding group that
/// references it.
#[derive(Debug)]
struct RingSlot {
    buffer: BufferId,
    binding: BindingId,
}

/// Per-frame-in-flight uniform buffer array with pre-created bindings.
#[derive(Debug)]
pub struct UniformRing {
    slots: Vec<RingSlot>,
    current: usize,
    binding_index: u32,
    data_size: u64,
    label: &'static str,
}

impl UniformRing {
    /// Creates a ring with one slot per frame in flight.
    ///
    /// `extra` entries (textures, samplers) are appended to every slot's
    /// binding group alongside the slot's uniform buffer at
    /// `binding_index`.
    ///
    /// On failure, every slot already built is released before the error is
    /// returned.
    pub fn new(
        device: &dyn RenderDevice,
        binding_index: u32,
        data_size: u64,
        extra: &[BindingEntry],
        label: &'static str,
    ) -> Result<Self, DeviceError> {
        let slots = Self::build_slots(
            device,
            device.frame_count(),
            binding_index,
            data_size,
            extra,
            label,
        )?;
        Ok(Self {
            slots,
            current: 0,
            binding_index,
            data_size,
            label,
        })
    }

    fn build_slots(
        device: &dyn RenderDevice,
        count: usize,
        binding_index: u32,
        data_size: u64,
        extra: &[BindingEntry],
        label: &'static str,
    ) -> Result<Vec<RingSlot>, DeviceError> {
        let mut slots: Vec<RingSlot> = Vec::with_capacity(count);

        for i in 0..count {
            let result = Self::build_one_slot(device, i, binding_index, data_size, extra, label);
            match result {
                Ok(slot) => slots.push(slot),
                Err(err) => {
                    Self::destroy_slots(device, &slots, label);
                    return Err(err);
                }
            }
        }
        Ok(slots)
    }

    fn build_one_slot(
        device: &dyn RenderDevice,
        index: usize,
        binding_index: u32,
        data_size: u64,
        extra: &[BindingEntry],
        label: &'static str,
    ) -> Result<RingSlot, DeviceError> {
        let buffer_label = match index {
            0 => Cow::Borrowed(label),
            _ => Cow::Owned(format!("{label} [slot {index}]")),
        };

        let buffer = device.create_buffer(&BufferDescriptor {
            label: Some(buffer_label),
            size: data_size,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        })?;

        let mut entries = Vec::with_capacity(1 + extra.len());
        entries.push(BindingEntry {
            binding: binding_index,
            resource: BindingResource::UniformBuffer {
                buffer,
                offset: 0,
                size: data_size,
            },
        });
        entries.extend_from_slice(extra);

        let binding = match device.create_binding(&BindingDescriptor {
            label: Some(label),
            entries: &entries,
        }) {
            Ok(binding) => binding,
            Err(err) => {
                if let Err(e) = device.destroy_buffer(buffer) {
                    log::warn!("UniformRing({label}): failed to release buffer on unwind: {e:?}");
                }
                return Err(err);
            }
        };

        Ok(RingSlot { buffer, binding })
    }

    fn destroy_slots(device: &dyn RenderDevice, slots: &[RingSlot], label: &str) {
        for slot in slots {
            if let Err(e) = device.destroy_binding(slot.binding) {
                log::warn!("UniformRing({label}): failed to destroy binding: {e:?}");
            }
            if let Err(e) = device.destroy_buffer(slot.buffer) {
                log::warn!("UniformRing({label}): failed to destroy buffer: {e:?}");
            }
        }
    }

    /// Advances to the next slot. Call once per frame before writing.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.slots.len();
    }

    /// Writes uniform data into the current slot's buffer. The data must be
    /// exactly the ring's `data_size`.
    pub fn write(&self, device: &dyn RenderDevice, data: &[u8]) -> Result<(), DeviceError> {
        debug_assert_eq!(
            data.len() as u64,
            self.data_size,
            "UniformRing({}) write size mismatch: expected {}, got {}",
            self.label,
            self.data_size,
            data.len()
        );
        let slot = &self.slots[self.current];
        device.write_buffer(slot.buffer, 0, data)
    }

    /// Returns the binding group of the current slot.
    pub fn current_binding(&self) -> BindingId {
        self.slots[self.current].binding
    }

    /// Returns the number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current slot index.
    pub fn current_slot_index(&self) -> usize {
        self.current
    }

    /// Reconciles the slot array to a new frames-in-flight count.
    ///
    /// The complete new slot set (with the given `extra` entries) is built
    /// first; only if every slot succeeded is the old set destroyed and
    /// swapped out. On failure the ring is left untouched and still valid.
    pub fn resize(
        &mut self,
        device: &dyn RenderDevice,
        frame_count: usize,
        extra: &[BindingEntry],
    ) -> Result<(), DeviceError> {
        let new_slots = Self::build_slots(
            device,
            frame_count,
            self.binding_index,
            self.data_size,
            extra,
            self.label,
        )?;
        let old_slots = std::mem::replace(&mut self.slots, new_slots);
        Self::destroy_slots(device, &old_slots, self.label);
        self.current = 0;
        Ok(())
    }

    /// Destroys all slots. The ring must not be used afterwards.
    pub fn destroy(&mut self, device: &dyn RenderDevice) {
        let slots = std::mem::take(&mut self.slots);
        Self::destroy_slots(device, &slots, self.label);
    }
}
