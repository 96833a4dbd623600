use crate::config::{API_DUMP_ENABLED, VALIDATION_ENABLED};
use vulkanalia::vk;

crate::enum_impl! {
    /// # Vulkan Layers
    ///
    /// Layers are optional components that augment the Vulkan system.
    /// They can intercept, evaluate, and modify Vulkan functions, attaching behavior to the
    /// normal Vulkan API.
    ///
    /// # Details
    /// Layers also expose their own instance extensions, which is why the profile instance
    /// query takes an optional layer name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum InstanceLayer {
        /// # `VK_LAYER_KHRONOS_validation`
        /// The official, all-in-one validation layer maintained by the Khronos Group.
        Validation = vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation"),
        /// # `VK_LAYER_LUNARG_api_dump`
        /// Logs every Vulkan call (and its parameters) as it happens.
        ApiDump = vk::ExtensionName::from_bytes(b"VK_LAYER_LUNARG_api_dump"),
    }
}

impl InstanceLayer {
    /// Layers switched on by the crate features.
    pub fn configured() -> Vec<InstanceLayer> {
        let mut layers = Vec::new();
        if VALIDATION_ENABLED {
            layers.push(InstanceLayer::Validation);
        }
        if API_DUMP_ENABLED {
            layers.push(InstanceLayer::ApiDump);
        }
        layers
    }
}
