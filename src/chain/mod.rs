//! Typed capability structures and the chains that carry them through Vulkan.
pub mod capability;
pub mod struct_chain;

pub use capability::{Capability, ChainStruct, StructKind, VK_FALSE, VK_TRUE};
pub use struct_chain::{StructChain, gather_tags};
