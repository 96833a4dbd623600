use crate::errors::{ProfileResult, vk_call};
use crate::version::from_loader;
use crate::vulkan::extensions::ExtensionStr;
use crate::vulkan::layers::InstanceLayer;
use anyhow::{Context, anyhow};
use log::trace;
use vulkanalia::loader::{LIBRARY, LibloadingLoader};
use vulkanalia::vk;
use vulkanalia::vk::EntryV1_0;

/// # Vulkan Entry
/// The entry point for Vulkan: the object that dynamically loads the Vulkan API.
///
/// # Details
/// At the point of creating the `Entry`, the ICDs have not been loaded yet (the ICDs are Vulkan
/// front-ends for the GPU driver), so only the loader's global symbols are available:
/// `vkEnumerateInstanceVersion`, the instance extension and layer queries, and
/// `vkCreateInstance`. That is all the instance-level profile queries need.
#[derive(Clone)]
pub struct Entry {
    entry: vulkanalia::Entry,
}

impl Entry {
    /// Loads the system Vulkan loader.
    ///
    /// # Details
    /// Two steps in order:
    /// 1. It searches the [Loader](https://github.com/KhronosGroup/Vulkan-Loader)
    ///    inside the OS (the name and location of the loader is platform-dependent) and loads it.
    /// 2. It dynamically dispatches the global Vulkan symbols.
    ///
    /// # Errors
    /// - If the loader is not found.
    /// - If it fails to load the Vulkan entry.
    pub fn new() -> anyhow::Result<Self> {
        let loader = unsafe {
            LibloadingLoader::new(LIBRARY)
                .with_context(|| format!("Failed to load Vulkan library: {}", LIBRARY))?
        };
        let entry = unsafe {
            vulkanalia::Entry::new(loader).map_err(|b| anyhow!("Failed to load Vulkan entry: {}", b))?
        };
        Ok(Self { entry })
    }

    pub fn get(&self) -> &vulkanalia::Entry {
        &self.entry
    }

    /// The (maximum) Vulkan version the loader supports, packed.
    ///
    /// > Note:
    /// > The ICDs could support a different version. The device query compares against the
    /// > version the device reports instead.
    pub fn version(&self) -> ProfileResult<u32> {
        self.entry
            .version()
            .map(from_loader)
            .map_err(vk_call("vkEnumerateInstanceVersion"))
    }

    /// Extensions exposed by the loader and the implicit layers, or by `layer` alone.
    ///
    /// # Errors
    /// `VK_ERROR_LAYER_NOT_PRESENT` when `layer` is not installed.
    pub fn extension_properties(
        &self,
        layer: Option<&ExtensionStr>,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>> {
        let extensions = unsafe {
            self.entry
                .enumerate_instance_extension_properties(layer.map(|name| name.as_bytes()))
        }
        .map_err(vk_call("vkEnumerateInstanceExtensionProperties"))?;
        trace!("{} instance extension(s) available", extensions.len());
        Ok(extensions)
    }

    /// The given layers that are installed, in the order the loader lists them.
    pub fn available_layers(&self, wanted: &[InstanceLayer]) -> ProfileResult<Vec<InstanceLayer>> {
        let installed = unsafe { self.entry.enumerate_instance_layer_properties() }
            .map_err(vk_call("vkEnumerateInstanceLayerProperties"))?;
        Ok(installed
            .iter()
            .filter_map(|properties| InstanceLayer::from_name(&properties.layer_name))
            .filter(|layer| wanted.contains(layer))
            .collect())
    }

    pub(crate) fn create_instance(&self, info: &vk::InstanceCreateInfo) -> ProfileResult<vulkanalia::Instance> {
        unsafe { self.entry.create_instance(info, None) }.map_err(vk_call("vkCreateInstance"))
    }
}
