//! # Double-Buffered Frame Handoff
//!
//! Producer/consumer exchange for per-frame geometry.
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │       DoubleBuffer<T>       │
//!                    │                             │
//!                    │  ┌─────────┐  ┌─────────┐   │
//!                    │  │ Slot A  │  │ Slot B  │   │
//!                    │  └────┬────┘  └────┬────┘   │
//!                    │       │            │        │
//!                    │  ┌────┴────────────┴────┐   │
//!                    │  │   Atomic Index (0/1) │   │
//!                    │  └──────────────────────┘   │
//!                    └─────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//!      ┌──────────────┐ ┌──────────────┐ ┌────────────┐
//!      │ProducerHandle│ │ConsumerHandle│ │ FrameSync  │
//!      │ (simulation) │ │   (render)   │ │   (swap)   │
//!      └──────────────┘ └──────────────┘ └────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! - `ProducerHandle`: exclusive access to the write slot (one at a time)
//! - `ConsumerHandle`: exclusive access to the read slot (one at a time)
//! - `swap_buffers`: only at the frame boundary, with both handles dropped
//!
//! Each slot sits behind its own `parking_lot::Mutex`, so the two roles
//! never contend during a frame; the locks only make misuse block instead
//! of race.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

/// Two slots of `T`: one written by the producer, one drained by the consumer.
///
/// ## Usage
///
/// ```rust,ignore
/// let frames = DoubleBuffer::from_fn(|| vec![QuadStagingBuffer::<f32>::new(200); 2]);
///
/// // Simulation thread fills the write slot
/// let mut producer = frames.producer_handle();
/// producer[0].append_quad(0.0, 0.0, 64.0, 64.0, 0.0, &region);
/// drop(producer);
///
/// // Render thread drains last frame's slot
/// let mut consumer = frames.consumer_handle();
/// batcher.merge(&mut consumer)?;
/// drop(consumer);
///
/// // Frame boundary
/// frames.swap_buffers();
/// ```
pub struct DoubleBuffer<T> {
    /// The two slots.
    buffers: [Mutex<T>; 2],

    /// Index of the current write slot (0 or 1).
    /// Read slot is always `write_index ^ 1`.
    write_index: AtomicUsize,

    /// Whether a producer handle is currently held.
    write_locked: AtomicBool,

    /// Whether a consumer handle is currently held.
    read_locked: AtomicBool,

    /// Completed swaps.
    frame_count: AtomicUsize,
}

impl<T> DoubleBuffer<T> {
    /// Creates a double buffer from the initial write and read slot values.
    #[must_use]
    pub fn new(write: T, read: T) -> Arc<Self> {
        Arc::new(Self {
            buffers: [Mutex::new(write), Mutex::new(read)],
            write_index: AtomicUsize::new(0),
            write_locked: AtomicBool::new(false),
            read_locked: AtomicBool::new(false),
            frame_count: AtomicUsize::new(0),
        })
    }

    /// Creates both slots with `make`.
    #[must_use]
    pub fn from_fn(mut make: impl FnMut() -> T) -> Arc<Self> {
        let write = make();
        let read = make();
        Self::new(write, read)
    }

    /// Returns the number of completed swaps.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count.load(Ordering::Relaxed)
    }

    /// Returns whether a producer handle is currently active.
    #[inline]
    #[must_use]
    pub fn is_write_locked(&self) -> bool {
        self.write_locked.load(Ordering::Acquire)
    }

    /// Returns whether a consumer handle is currently active.
    #[inline]
    #[must_use]
    pub fn is_read_locked(&self) -> bool {
        self.read_locked.load(Ordering::Acquire)
    }

    /// Gets exclusive access to the write slot.
    ///
    /// # Panics
    ///
    /// Panics if a producer handle is already held.
    #[must_use]
    pub fn producer_handle(&self) -> ProducerHandle<'_, T> {
        let was_locked = self.write_locked.swap(true, Ordering::AcqRel);
        assert!(!was_locked, "Double producer handle! Only one producer handle allowed at a time.");

        let index = self.write_index.load(Ordering::Acquire);
        ProducerHandle {
            guard: self.buffers[index].lock(),
            flag: &self.write_locked,
            buffer_index: index,
        }
    }

    /// Gets exclusive access to the read slot (last frame's writes).
    ///
    /// # Panics
    ///
    /// Panics if a consumer handle is already held.
    #[must_use]
    pub fn consumer_handle(&self) -> ConsumerHandle<'_, T> {
        let was_locked = self.read_locked.swap(true, Ordering::AcqRel);
        assert!(!was_locked, "Double consumer handle! Only one consumer handle allowed at a time.");

        let index = self.write_index.load(Ordering::Acquire) ^ 1;
        ConsumerHandle {
            guard: self.buffers[index].lock(),
            flag: &self.read_locked,
            buffer_index: index,
        }
    }

    /// Swaps the write and read slots.
    ///
    /// The slot the producer just filled becomes the consumer's; the slot
    /// the consumer just drained goes back to the producer.
    ///
    /// # Panics
    ///
    /// Panics if either handle is still active.
    pub fn swap_buffers(&self) {
        assert!(
            !self.write_locked.load(Ordering::Acquire) && !self.read_locked.load(Ordering::Acquire),
            "Cannot swap buffers while a handle is active!"
        );

        self.write_index.fetch_xor(1, Ordering::AcqRel);
        let frame = self.frame_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(frame, "double buffer swapped");
    }

    /// Gets a `FrameSync` helper for managing the frame lifecycle.
    #[must_use]
    pub fn frame_sync(self: &Arc<Self>) -> FrameSync<T> {
        FrameSync {
            buffer: Arc::clone(self),
        }
    }

    /// Consumes the double buffer, returning `(write, read)` slot values.
    ///
    /// # Errors
    ///
    /// Returns the `Arc` back if other references are still alive.
    pub fn into_inner(this: Arc<Self>) -> Result<(T, T), Arc<Self>> {
        let inner = Arc::try_unwrap(this)?;
        let index = inner.write_index.load(Ordering::Acquire);
        let [a, b] = inner.buffers;
        let (a, b) = (a.into_inner(), b.into_inner());
        Ok(if index == 0 { (a, b) } else { (b, a) })
    }
}

/// Producer-side handle to the write slot.
///
/// The producer lock is released when the handle drops.
pub struct ProducerHandle<'a, T> {
    guard: MutexGuard<'a, T>,
    flag: &'a AtomicBool,
    buffer_index: usize,
}

impl<T> ProducerHandle<'_, T> {
    /// Returns the slot index this handle writes to (for debugging).
    #[inline]
    #[must_use]
    pub fn buffer_index(&self) -> usize {
        self.buffer_index
    }
}

impl<T> Deref for ProducerHandle<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T> DerefMut for ProducerHandle<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<T> Drop for ProducerHandle<'_, T> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Consumer-side handle to the read slot.
///
/// Mutable so the consumer can reset what it drained.
pub struct ConsumerHandle<'a, T> {
    guard: MutexGuard<'a, T>,
    flag: &'a AtomicBool,
    buffer_index: usize,
}

impl<T> ConsumerHandle<'_, T> {
    /// Returns the slot index this handle reads from (for debugging).
    #[inline]
    #[must_use]
    pub fn buffer_index(&self) -> usize {
        self.buffer_index
    }
}

impl<T> Deref for ConsumerHandle<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T> DerefMut for ConsumerHandle<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<T> Drop for ConsumerHandle<'_, T> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Frame synchronization helper.
///
/// ## Usage
///
/// ```rust,ignore
/// let sync = frames.frame_sync();
///
/// loop {
///     // Producer and consumer work in parallel...
///
///     sync.wait_for_swap_ready();
///     sync.end_frame(); // Swaps slots
/// }
/// ```
pub struct FrameSync<T> {
    buffer: Arc<DoubleBuffer<T>>,
}

impl<T> FrameSync<T> {
    /// Marks the end of a frame and swaps slots.
    ///
    /// # Panics
    ///
    /// Panics if a handle is still active.
    #[inline]
    pub fn end_frame(&self) {
        self.buffer.swap_buffers();
    }

    /// Returns the current frame number.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.buffer.frame_count()
    }

    /// Checks if it's safe to swap (no active handles).
    #[inline]
    #[must_use]
    pub fn can_swap(&self) -> bool {
        !self.buffer.is_write_locked() && !self.buffer.is_read_locked()
    }

    /// Waits until it's safe to swap (spin loop).
    ///
    /// # Warning
    ///
    /// This spins forever if a handle is never dropped.
    pub fn wait_for_swap_ready(&self) {
        while !self.can_swap() {
            std::hint::spin_loop();
        }
    }
}
