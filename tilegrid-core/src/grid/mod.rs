//! Remote Video Grid
//!
//! Wires SDK tile events to slot allocation and tells the rendering layer
//! which sink to bind and which slots to show.

mod handlers;
mod session;
mod types;

pub use session::*;
pub use types::*;
