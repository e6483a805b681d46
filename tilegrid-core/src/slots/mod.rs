//! Slot Bookkeeping
//!
//! Maps SDK tile ids onto a fixed set of display slots.

mod allocator;
mod visibility;

pub use allocator::*;
pub use visibility::*;
