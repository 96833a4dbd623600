use vulkanalia::vk;

/// Type alias for the extension names.
/// Vulkan provides a type for Extension ([`vk::ExtensionName`]) that is defined as
/// `StringArray<MAX_EXTENSION_NAME_SIZE>`
pub type ExtensionStr = vk::ExtensionName;

crate::enum_impl! {
    /// # Vulkan Instance Extensions
    /// Instance extensions profile-aware instance creation and support checks inject on
    /// their own.
    ///
    /// # Details
    /// Instance extensions must be enabled during `vkCreateInstance`.
    /// Their availability is queried with `vkEnumerateInstanceExtensionProperties`, either for the
    /// loader and implicit layers, or for one named layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum InstanceExtension {
        /// # VK_KHR_get_physical_device_properties2
        /// Extended querying for physical-device features and properties.
        ///
        /// # Details
        /// Adds the chained `vkGetPhysicalDevice*2` queries every profile check relies on.
        /// Promoted to core in Vulkan 1.1; still needed when targeting `VK_API_VERSION_1_0`.
        KhrGetPhysicalDeviceProperties2 = vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name,
        /// # VK_KHR_portability_enumeration
        /// Opt-in enumeration of portability-subset (non-conformant) devices, such as MoltenVK.
        KhrPortabilityEnumeration = vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name,
    }
}

/// Builds the `VkExtensionProperties` a profile table declares.
pub const fn extension(name: vk::ExtensionName, spec_version: u32) -> vk::ExtensionProperties {
    vk::ExtensionProperties {
        extension_name: name,
        spec_version,
    }
}

/// Exact name match against an enumerated extension list.
///
/// `specVersion` is ignored: drivers do not keep it up to date.
pub fn has_extension(available: &[vk::ExtensionProperties], name: &ExtensionStr) -> bool {
    available.iter().any(|e| &e.extension_name == name)
}

/// Appends the names of `extensions` that `names` does not hold yet.
pub fn gather_names(names: &mut Vec<ExtensionStr>, extensions: &[vk::ExtensionProperties]) {
    for extension in extensions {
        if !names.contains(&extension.extension_name) {
            names.push(extension.extension_name);
        }
    }
}
