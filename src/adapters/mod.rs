// Adapters layer: concrete stores and consoles behind the domain ports.

#[cfg(feature = "cli")]
pub mod console;
pub mod fs;
pub mod memory;
