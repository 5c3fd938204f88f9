//! CAD kernel backends
//!
//! The in-memory kernel is always available. The Truck backend is compiled
//! in with the `truck` feature.

mod memory;
mod traits;
#[cfg(feature = "truck")]
mod truck;

pub use memory::MemoryKernel;
pub use traits::*;
#[cfg(feature = "truck")]
pub use truck::TruckKernel;
