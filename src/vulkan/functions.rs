use crate::chain::{Capability, StructChain};
use crate::errors::{ProfileError, ProfileResult, vk_call};
use crate::functions::{DeviceParams, InstanceParams, VulkanFunctions};
use crate::version::{API_VERSION_1_0, API_VERSION_1_1, ApiVersion};
use crate::vulkan::entry::Entry;
use crate::vulkan::extensions::{ExtensionStr, InstanceExtension};
use crate::{debug_success, trace_success};
use log::{debug, trace};
use std::ffi::CString;
use vulkanalia::vk::{HasBuilder, InstanceV1_0, InstanceV1_1, KhrGetPhysicalDeviceProperties2Extension};
use vulkanalia::{Device, Instance, vk};

/// Handle of an instance created or adopted by [`LoadedFunctions`], with what it was created with.
#[derive(Clone)]
struct LoadedInstance {
    instance: Instance,
    api_version: u32,
    extensions: Vec<ExtensionStr>,
}

impl LoadedInstance {
    /// The `vkGetPhysicalDevice*2` entry points are core from 1.1 and KHR-suffixed before.
    fn core_properties2(&self) -> bool {
        self.api_version >= API_VERSION_1_1
    }
}

/// # Loaded Functions
/// [`VulkanFunctions`] over the system Vulkan loader.
///
/// # Details
/// Instance-level queries only need the [`Entry`]. Device queries and device creation go
/// through the instance this object created with [`VulkanFunctions::create_instance`], or
/// one adopted with [`LoadedFunctions::with_instance`].
pub struct LoadedFunctions {
    entry: Entry,
    instance: Option<LoadedInstance>,
}

impl LoadedFunctions {
    pub fn new(entry: Entry) -> Self {
        Self { entry, instance: None }
    }

    /// Adopts an instance created elsewhere, with the API version and extensions it was
    /// created with.
    pub fn with_instance(entry: Entry, instance: Instance, api_version: u32, extensions: Vec<ExtensionStr>) -> Self {
        Self {
            entry,
            instance: Some(LoadedInstance {
                instance,
                api_version,
                extensions,
            }),
        }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref().map(|loaded| &loaded.instance)
    }

    /// Physical devices of the current instance.
    pub fn physical_devices(&self) -> ProfileResult<Vec<vk::PhysicalDevice>> {
        let loaded = self.loaded("vkEnumeratePhysicalDevices")?;
        unsafe { loaded.instance.enumerate_physical_devices() }.map_err(vk_call("vkEnumeratePhysicalDevices"))
    }

    /// `VkPhysicalDeviceProperties::deviceName` of `physical_device`.
    pub fn device_name(&self, physical_device: vk::PhysicalDevice) -> ProfileResult<String> {
        let loaded = self.loaded("vkGetPhysicalDeviceProperties")?;
        let properties = unsafe { loaded.instance.get_physical_device_properties(physical_device) };
        Ok(properties.device_name.to_string_lossy().into_owned())
    }

    /// Destroys the current instance, if this object owns one.
    pub fn destroy(&mut self) {
        if let Some(loaded) = self.instance.take() {
            debug!("Destroying instance");
            unsafe { loaded.instance.destroy_instance(None) };
        }
    }

    fn loaded(&self, call: &'static str) -> ProfileResult<&LoadedInstance> {
        self.instance.as_ref().ok_or(ProfileError::InitializationFailed(call))
    }
}

impl VulkanFunctions for LoadedFunctions {
    type Instance = Instance;
    type Device = Device;

    fn instance_version(&self) -> ProfileResult<u32> {
        self.entry.version()
    }

    fn instance_extension_properties(
        &self,
        layer: Option<&ExtensionStr>,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>> {
        self.entry.extension_properties(layer)
    }

    fn device_extension_properties(
        &self,
        physical_device: vk::PhysicalDevice,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>> {
        let loaded = self.loaded("vkEnumerateDeviceExtensionProperties")?;
        unsafe {
            loaded
                .instance
                .enumerate_device_extension_properties(physical_device, None)
        }
        .map_err(vk_call("vkEnumerateDeviceExtensionProperties"))
    }

    fn physical_device_features2(
        &self,
        physical_device: vk::PhysicalDevice,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        let loaded = self.loaded("vkGetPhysicalDeviceFeatures2")?;
        trace!("Querying {} feature structure(s)", chain.len());
        chain.with_linked(|head| match head {
            Capability::Features2(features) => {
                unsafe {
                    if loaded.core_properties2() {
                        loaded.instance.get_physical_device_features2(physical_device, features);
                    } else {
                        loaded
                            .instance
                            .get_physical_device_features2_khr(physical_device, features);
                    }
                }
                Ok(())
            }
            other => Err(ProfileError::UnregisteredStructure(other.tag())),
        })
    }

    fn physical_device_properties2(
        &self,
        physical_device: vk::PhysicalDevice,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        let loaded = self.loaded("vkGetPhysicalDeviceProperties2")?;
        trace!("Querying {} property structure(s)", chain.len());
        chain.with_linked(|head| match head {
            Capability::Properties2(properties) => {
                unsafe {
                    if loaded.core_properties2() {
                        loaded
                            .instance
                            .get_physical_device_properties2(physical_device, properties);
                    } else {
                        loaded
                            .instance
                            .get_physical_device_properties2_khr(physical_device, properties);
                    }
                }
                Ok(())
            }
            other => Err(ProfileError::UnregisteredStructure(other.tag())),
        })
    }

    fn physical_device_format_properties2(
        &self,
        physical_device: vk::PhysicalDevice,
        format: vk::Format,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        let loaded = self.loaded("vkGetPhysicalDeviceFormatProperties2")?;
        chain.with_linked(|head| match head {
            Capability::FormatProperties2(properties) => {
                unsafe {
                    if loaded.core_properties2() {
                        loaded.instance.get_physical_device_format_properties2(
                            physical_device,
                            format,
                            properties,
                        );
                    } else {
                        loaded.instance.get_physical_device_format_properties2_khr(
                            physical_device,
                            format,
                            properties,
                        );
                    }
                }
                Ok(())
            }
            other => Err(ProfileError::UnregisteredStructure(other.tag())),
        })
    }

    /// Creates the instance and keeps a handle to it for the device queries.
    fn create_instance(&mut self, params: &InstanceParams) -> ProfileResult<Instance> {
        let application = &params.application;
        let application_name = CString::new(application.application_name.as_str())
            .map_err(|_| ProfileError::InitializationFailed("application name contains a NUL byte"))?;
        let engine_name = CString::new(application.engine_name.as_str())
            .map_err(|_| ProfileError::InitializationFailed("engine name contains a NUL byte"))?;
        let api_version = match application.api_version {
            0 => API_VERSION_1_0,
            version => version,
        };

        trace!("Building application info");
        let application_info = vk::ApplicationInfo::builder()
            .application_name(application_name.as_bytes_with_nul())
            .application_version(application.application_version)
            .engine_name(engine_name.as_bytes_with_nul())
            .engine_version(application.engine_version)
            .api_version(api_version);

        let layer_names = params.layers.iter().map(|name| name.as_ptr()).collect::<Vec<_>>();
        let extension_names = params.extensions.iter().map(|name| name.as_ptr()).collect::<Vec<_>>();
        let info = vk::InstanceCreateInfo::builder()
            .application_info(&application_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names)
            .flags(params.flags);
        trace_success!("InstanceCreateInfo built!: \n\t{:?}", info);

        let instance = self.entry.create_instance(&info)?;
        debug_success!("Vulkan {} instance created", ApiVersion(api_version));
        self.instance = Some(LoadedInstance {
            instance: instance.clone(),
            api_version,
            extensions: params.extensions.clone(),
        });
        Ok(instance)
    }

    fn create_device(&self, physical_device: vk::PhysicalDevice, params: &DeviceParams) -> ProfileResult<Device> {
        let loaded = self.loaded("vkCreateDevice")?;

        let queue_infos = params
            .queues
            .iter()
            .map(|queue| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(queue.family_index)
                    .queue_priorities(&queue.priorities)
            })
            .collect::<Vec<_>>();
        let extension_names = params.extensions.iter().map(|name| name.as_ptr()).collect::<Vec<_>>();

        let mut features = params.features.clone();
        features.with_linked(|head| match head {
            Capability::Features2(features2) => {
                let info = vk::DeviceCreateInfo::builder()
                    .queue_create_infos(&queue_infos)
                    .enabled_extension_names(&extension_names)
                    .push_next(features2);
                unsafe { loaded.instance.create_device(physical_device, &info, None) }
                    .map_err(vk_call("vkCreateDevice"))
            }
            other => Err(ProfileError::UnregisteredStructure(other.tag())),
        })
    }

    fn validate(&self) -> ProfileResult<()> {
        let loaded = self.loaded("vkGetPhysicalDeviceFeatures2")?;
        let properties2 = InstanceExtension::KhrGetPhysicalDeviceProperties2.name();
        if !loaded.core_properties2() && !loaded.extensions.contains(properties2) {
            return Err(ProfileError::ExtensionNotPresent(properties2.to_string_lossy().into_owned()));
        }
        Ok(())
    }
}
