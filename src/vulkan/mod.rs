//! The loader-backed implementation of the Vulkan seam, and the Vulkan names it works with.
pub mod entry;
pub mod enum_impl;
pub mod extensions;
pub mod functions;
pub mod layers;

pub use entry::Entry;
pub use functions::LoadedFunctions;
