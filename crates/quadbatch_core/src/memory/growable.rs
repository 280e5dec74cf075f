//! # Growable Vertex Storage
//!
//! Fixed-stride storage that grows in whole increments and never shrinks.
//!
//! Capacity is counted in vertices; each vertex owns `stride` components.
//! Growth reallocates and copies, so everything written before a growth
//! is bit-identical afterwards.

/// Capacity planning shared by every growable buffer.
///
/// Capacity always moves up by the minimum number of whole `step`s needed
/// to reach the requested vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    step: usize,
}

impl GrowthPolicy {
    /// Default increment: 50 quads.
    pub const DEFAULT_STEP_VERTICES: usize = 200;

    /// Creates a policy with the given vertex increment.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    #[must_use]
    pub const fn new(step: usize) -> Self {
        assert!(step > 0, "growth step must be greater than zero");
        Self { step }
    }

    /// Creates a policy growing by whole quads.
    ///
    /// # Panics
    ///
    /// Panics if `quads` is zero or its vertex count overflows `usize`.
    #[must_use]
    pub const fn quads(quads: usize) -> Self {
        match quads.checked_mul(4) {
            Some(step) => Self::new(step),
            None => panic!("growth step overflows usize"),
        }
    }

    /// Vertex increment.
    #[inline]
    #[must_use]
    pub const fn step(self) -> usize {
        self.step
    }

    /// Plans a new capacity for `required` vertices.
    ///
    /// Returns `None` when `current` already fits.
    #[inline]
    #[must_use]
    pub const fn plan(self, current: usize, required: usize) -> Option<usize> {
        if required <= current {
            return None;
        }
        let steps = (required - current).div_ceil(self.step);
        Some(current + steps * self.step)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_VERTICES)
    }
}

/// Vertex-strided buffer with explicit capacity.
///
/// Storage is always fully initialized up to capacity. Slots past the
/// caller's write cursor hold stale or default data and are never read.
///
/// # Thread Safety
///
/// Plain owned data. Hand it between threads whole; never share it.
#[derive(Debug, Clone)]
pub struct GrowableBuffer<T> {
    /// Backing storage, `capacity * stride` components.
    storage: Vec<T>,
    /// Components per vertex.
    stride: usize,
    /// Number of reallocations so far.
    generation: u64,
}

impl<T: Copy + Default> GrowableBuffer<T> {
    /// Creates a buffer holding `vertices` vertices of `stride` components.
    ///
    /// # Panics
    ///
    /// Panics if `stride` is zero.
    #[must_use]
    pub fn new(vertices: usize, stride: usize) -> Self {
        assert!(stride > 0, "stride must be greater than zero");
        Self {
            storage: vec![T::default(); vertices * stride],
            stride,
            generation: 0,
        }
    }

    /// Capacity in vertices.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len() / self.stride
    }

    /// Components per vertex.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// How many times the storage has been reallocated.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Grows to exactly `vertices` capacity, preserving contents.
    ///
    /// Returns `false` (and does nothing) if already that large.
    pub fn grow_to(&mut self, vertices: usize) -> bool {
        let components = vertices * self.stride;
        if components <= self.storage.len() {
            return false;
        }
        self.storage.resize(components, T::default());
        self.generation += 1;
        true
    }

    /// Ensures room for `required` vertices under `policy`.
    ///
    /// Returns the new capacity if a growth happened.
    pub fn reserve_vertices(&mut self, policy: GrowthPolicy, required: usize) -> Option<usize> {
        let planned = policy.plan(self.capacity(), required)?;
        self.grow_to(planned);
        Some(planned)
    }

    /// Components of vertices `[first, first + count)`.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds capacity.
    #[inline]
    #[must_use]
    pub fn vertices(&self, first: usize, count: usize) -> &[T] {
        &self.storage[first * self.stride..(first + count) * self.stride]
    }

    /// Mutable components of vertices `[first, first + count)`.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds capacity.
    #[inline]
    pub fn vertices_mut(&mut self, first: usize, count: usize) -> &mut [T] {
        &mut self.storage[first * self.stride..(first + count) * self.stride]
    }

    /// The whole backing storage.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }
}
