//! # Render Handoff
//!
//! The store itself is single-threaded. This module moves the flattened
//! output of a frame to another thread without sharing the world.
//!
//! ```text
//! Simulation thread:  world -> extract_instances -> publish
//! Render thread:                                  take_into -> draw
//! ```

mod frame_exchange;

pub use frame_exchange::{FrameExchange, FrameGuard};
