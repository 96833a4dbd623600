//! Vulkan profile support queries and profile-aware instance and device creation.
//!
//! A profile bundles extensions, features, properties and format capabilities under one
//! name. [`Capabilities`] answers whether an instance or a physical device meets a profile,
//! and creates instances and devices with everything a profile needs enabled.
pub mod aggregator;
pub mod capabilities;
pub mod chain;
pub mod config;
pub mod enumerate;
pub mod errors;
pub mod factory;
pub mod functions;
pub mod logging;
pub mod matcher;
pub mod profiles;
pub mod version;
pub mod vulkan;

pub use capabilities::Capabilities;
pub use config::DeviceCreateFlags;
pub use errors::{ProfileError, ProfileResult};
pub use factory::{DeviceCreateConfig, InstanceCreateConfig};
pub use functions::{ApplicationInfo, QueueRequest, VulkanFunctions};
pub use matcher::SupportReport;
pub use profiles::{BlockProperties, ProfileProperties};
