//! Mounting, ticking and compositing of the visual layers.

pub mod dispatcher;
pub mod scheduler;
