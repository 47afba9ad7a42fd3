//! Event dispatch adapters.
//!
//! - `InMemoryEventBus` - Synchronous, in-process typed registry bus

mod in_memory;

pub use in_memory::InMemoryEventBus;
