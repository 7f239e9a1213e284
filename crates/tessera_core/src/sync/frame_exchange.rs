//! # Frame Exchange
//!
//! Hands the flattened instance data of each frame from the simulation
//! thread to the render thread.
//!
//! ```text
//! Simulation:  extract_instances(world, &mut scratch)
//!              exchange.publish(&mut scratch)     // swap in, get old buffers back
//!
//! Render:      exchange.take_into(&mut local)     // swap out the latest frame
//!              upload(local.as_bytes())
//! ```
//!
//! Publishing and taking are buffer swaps under a short lock, so no instance
//! data is copied and both sides reuse their allocations.

use std::ops::Deref;

use parking_lot::{Mutex, MutexGuard};

use crate::systems::InstanceBuffers;

/// Latest published instance buffers plus their frame number.
#[derive(Debug, Default)]
struct Published {
    frame: u64,
    buffers: InstanceBuffers,
}

/// Single-slot mailbox for per-frame render data.
///
/// Share it between threads with `Arc<FrameExchange>` or a scoped borrow.
#[derive(Debug, Default)]
pub struct FrameExchange {
    slot: Mutex<Published>,
}

impl FrameExchange {
    /// Creates an exchange with nothing published (frame 0).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `buffers` as the next frame.
    ///
    /// `buffers` receives the previously published allocation, ready to be
    /// refilled.
    ///
    /// # Returns
    ///
    /// The new frame number (first publish is frame 1).
    pub fn publish(&self, buffers: &mut InstanceBuffers) -> u64 {
        let mut slot = self.slot.lock();
        std::mem::swap(&mut slot.buffers, buffers);
        slot.frame += 1;
        tracing::debug!(
            "FrameExchange: published frame {} ({} instances)",
            slot.frame,
            slot.buffers.len()
        );
        slot.frame
    }

    /// Locks the latest frame for reading in place.
    ///
    /// Hold the guard briefly; the simulation thread blocks on publish while
    /// it is alive.
    pub fn read(&self) -> FrameGuard<'_> {
        FrameGuard {
            guard: self.slot.lock(),
        }
    }

    /// Swaps the latest frame into `out`.
    ///
    /// The slot is left empty until the next publish.
    ///
    /// # Returns
    ///
    /// The frame number now held by `out`.
    pub fn take_into(&self, out: &mut InstanceBuffers) -> u64 {
        let mut slot = self.slot.lock();
        std::mem::swap(&mut slot.buffers, out);
        slot.buffers.clear();
        slot.frame
    }

    /// Number of frames published so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.slot.lock().frame
    }
}

/// Read access to the latest published frame.
pub struct FrameGuard<'a> {
    guard: MutexGuard<'a, Published>,
}

impl FrameGuard<'_> {
    /// Frame number of the data behind this guard.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.guard.frame
    }
}

impl Deref for FrameGuard<'_> {
    type Target = InstanceBuffers;

    fn deref(&self) -> &InstanceBuffers {
        &self.guard.buffers
    }
}
