//! The Vulkan entry points profile queries and profile-aware creation go through.
use crate::chain::StructChain;
use crate::errors::ProfileResult;
use crate::vulkan::extensions::ExtensionStr;
use vulkanalia::vk;

/// Application description forwarded as `VkApplicationInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationInfo {
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub engine_version: u32,
    /// `0` lets instance creation pick the highest minimum of the requested profiles.
    pub api_version: u32,
}

/// Instance creation parameters after the profiles have been folded in.
#[derive(Debug, Clone, Default)]
pub struct InstanceParams {
    pub application: ApplicationInfo,
    pub layers: Vec<ExtensionStr>,
    pub extensions: Vec<ExtensionStr>,
    pub flags: vk::InstanceCreateFlags,
}

/// One `VkDeviceQueueCreateInfo`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRequest {
    pub family_index: u32,
    pub priorities: Vec<f32>,
}

impl QueueRequest {
    pub fn single(family_index: u32) -> Self {
        Self {
            family_index,
            priorities: vec![1.0],
        }
    }
}

/// Device creation parameters after the profiles have been folded in.
///
/// `features` is headed by `VkPhysicalDeviceFeatures2` and becomes the `pNext` chain of
/// `VkDeviceCreateInfo`; `pEnabledFeatures` is never set.
#[derive(Debug, Clone)]
pub struct DeviceParams {
    pub queues: Vec<QueueRequest>,
    pub extensions: Vec<ExtensionStr>,
    pub features: StructChain,
}

/// # Vulkan Functions
/// The subset of Vulkan a profile session calls into.
///
/// # Details
/// [`LoadedFunctions`](crate::vulkan::LoadedFunctions) implements it on top of the system
/// loader; tests implement it over canned capabilities. Every chain argument is filled in
/// place, the way the `vkGetPhysicalDevice*2` queries fill their `pNext` chains.
pub trait VulkanFunctions {
    /// What [`VulkanFunctions::create_instance`] hands back.
    type Instance;
    /// What [`VulkanFunctions::create_device`] hands back.
    type Device;

    /// Packed version reported by `vkEnumerateInstanceVersion`, `1.0` on loaders without it.
    fn instance_version(&self) -> ProfileResult<u32>;

    /// Instance extensions of the loader and implicit layers, or of `layer` alone.
    fn instance_extension_properties(
        &self,
        layer: Option<&ExtensionStr>,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>>;

    fn device_extension_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>>;

    /// `vkGetPhysicalDeviceFeatures2` over a chain headed by `VkPhysicalDeviceFeatures2`.
    fn physical_device_features2(
        &self,
        physical_device: vk::PhysicalDevice,
        chain: &mut StructChain,
    ) -> ProfileResult<()>;

    /// `vkGetPhysicalDeviceProperties2` over a chain headed by `VkPhysicalDeviceProperties2`.
    fn physical_device_properties2(
        &self,
        physical_device: vk::PhysicalDevice,
        chain: &mut StructChain,
    ) -> ProfileResult<()>;

    /// `vkGetPhysicalDeviceFormatProperties2` over a chain headed by `VkFormatProperties2`.
    fn physical_device_format_properties2(
        &self,
        physical_device: vk::PhysicalDevice,
        format: vk::Format,
        chain: &mut StructChain,
    ) -> ProfileResult<()>;

    fn create_instance(&mut self, params: &InstanceParams) -> ProfileResult<Self::Instance>;

    fn create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        params: &DeviceParams,
    ) -> ProfileResult<Self::Device>;

    /// Checks that the device queries can be served.
    ///
    /// # Errors
    /// - [`ProfileError::InitializationFailed`](crate::errors::ProfileError::InitializationFailed)
    ///   when a required entry point is missing.
    /// - [`ProfileError::ExtensionNotPresent`](crate::errors::ProfileError::ExtensionNotPresent)
    ///   when a Vulkan 1.0 instance was created without `VK_KHR_get_physical_device_properties2`.
    fn validate(&self) -> ProfileResult<()> {
        Ok(())
    }
}
