//! Systems that keep components in sync with each other and with physics

pub mod transform_sync;

pub use transform_sync::{propagate, update_transform, SyncOrigin, WorldMotionState};
