//! Host mirror of the fragment stage's uniform block.
//!
//! Slots are not hard-coded: [`UniformBindings`] is filled by reflecting the
//! compiled fragment module, and [`UniformBlock`] writes values at whatever
//! offsets the compiler assigned. A name the shader does not declare has no
//! slot and writing it does nothing.

use std::collections::HashMap;

use bytemuck::Pod;

/// Member names of the `OceanParams` block.
pub mod names {
    pub const RESOLUTION: &str = "iResolution";
    pub const TIME: &str = "iTime";
    pub const POINTER: &str = "iPointer";
    pub const STEP_BUDGET: &str = "uStepBudget";
    pub const GEOMETRY_OCTAVES: &str = "uGeometryOctaves";
    pub const FRAGMENT_OCTAVES: &str = "uFragmentOctaves";
    pub const SEA_HEIGHT: &str = "uSeaHeight";
    pub const SEA_CHOPPY: &str = "uSeaChoppy";
    pub const SEA_SPEED: &str = "uSeaSpeed";
    pub const SEA_FREQ: &str = "uSeaFreq";
    pub const CAMERA_SPEED: &str = "uCameraSpeed";
    pub const POINTER_SENSITIVITY: &str = "uPointerSensitivity";

    pub const ALL: [&str; 12] = [
        RESOLUTION,
        TIME,
        POINTER,
        STEP_BUDGET,
        GEOMETRY_OCTAVES,
        FRAGMENT_OCTAVES,
        SEA_HEIGHT,
        SEA_CHOPPY,
        SEA_SPEED,
        SEA_FREQ,
        CAMERA_SPEED,
        POINTER_SENSITIVITY,
    ];
}

/// std140 alignment of a uniform buffer binding.
const BLOCK_ALIGN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Int,
    Vec3,
    Vec4,
}

impl UniformKind {
    pub fn byte_len(self) -> usize {
        match self {
            UniformKind::Float | UniformKind::Int => 4,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
        }
    }
}

/// Resolved location of one uniform inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    pub offset: u32,
    pub kind: UniformKind,
}

/// Name to slot map, resolved once after the program is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformBindings {
    slots: HashMap<String, UniformSlot>,
    block_size: u32,
}

impl UniformBindings {
    pub fn new(block_size: u32) -> Self {
        Self {
            slots: HashMap::new(),
            block_size,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, slot: UniformSlot) {
        self.slots.insert(name.into(), slot);
    }

    pub fn slot(&self, name: &str) -> Option<UniformSlot> {
        self.slots.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Size of the block in bytes, padded to a whole std140 row.
    pub fn block_size(&self) -> u32 {
        let size = (self.block_size as usize).max(BLOCK_ALIGN);
        size.next_multiple_of(BLOCK_ALIGN) as u32
    }

    /// Names from `expected` that have no slot.
    pub fn missing<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|name| !self.slots.contains_key(*name))
            .collect()
    }
}

/// CPU-side bytes of the uniform buffer.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    bindings: UniformBindings,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(bindings: UniformBindings) -> Self {
        let bytes = vec![0; bindings.block_size() as usize];
        Self { bindings, bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.write(name, UniformKind::Float, &value);
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.write(name, UniformKind::Int, &value);
    }

    pub fn set_vec3(&mut self, name: &str, value: [f32; 3]) {
        self.write(name, UniformKind::Vec3, &value);
    }

    pub fn set_vec4(&mut self, name: &str, value: [f32; 4]) {
        self.write(name, UniformKind::Vec4, &value);
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.read(name, UniformKind::Float)
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        self.read(name, UniformKind::Int)
    }

    pub fn vec3(&self, name: &str) -> Option<[f32; 3]> {
        self.read(name, UniformKind::Vec3)
    }

    pub fn vec4(&self, name: &str) -> Option<[f32; 4]> {
        self.read(name, UniformKind::Vec4)
    }

    fn range(&self, name: &str, kind: UniformKind) -> Option<std::ops::Range<usize>> {
        let slot = self.bindings.slot(name)?;
        if slot.kind != kind {
            tracing::trace!(name, ?kind, actual = ?slot.kind, "uniform kind mismatch");
            return None;
        }
        let start = slot.offset as usize;
        let end = start + kind.byte_len();
        (end <= self.bytes.len()).then_some(start..end)
    }

    fn write<T: Pod>(&mut self, name: &str, kind: UniformKind, value: &T) {
        if let Some(range) = self.range(name, kind) {
            self.bytes[range].copy_from_slice(bytemuck::bytes_of(value));
        }
    }

    fn read<T: Pod>(&self, name: &str, kind: UniformKind) -> Option<T> {
        let range = self.range(name, kind)?;
        Some(bytemuck::pod_read_unaligned(&self.bytes[range]))
    }
}
