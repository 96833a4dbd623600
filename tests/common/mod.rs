#![allow(dead_code)]

use vk_profiles::chain::{Capability, StructChain};
use vk_profiles::functions::{DeviceParams, InstanceParams, VulkanFunctions};
use vk_profiles::vulkan::extensions::{ExtensionStr, extension};
use vk_profiles::{ProfileError, ProfileResult};
use vulkanalia::vk;
use vulkanalia::vk::Handle;

pub fn device() -> vk::PhysicalDevice {
    vk::PhysicalDevice::from_raw(0x1)
}

pub fn ext(name: &str) -> vk::ExtensionProperties {
    extension(vk::ExtensionName::from_bytes(name.as_bytes()), 1)
}

/// Canned Vulkan: whatever the fields say is what the queries report.
///
/// Records of a queried chain are overwritten by the same-tagged record of `features`,
/// `properties` or `formats`; records with no canned counterpart keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct FakeFunctions {
    pub loader_version: u32,
    pub instance_extensions: Vec<vk::ExtensionProperties>,
    pub layers: Vec<(ExtensionStr, Vec<vk::ExtensionProperties>)>,
    pub device_version: u32,
    pub device_extensions: Vec<vk::ExtensionProperties>,
    pub features: Vec<Capability>,
    pub properties: Vec<Capability>,
    pub formats: Vec<(vk::Format, Vec<Capability>)>,
    pub created_instance: Option<InstanceParams>,
}

fn report(chain: &mut StructChain, canned: &[Capability]) {
    chain.for_each_mut(|record| {
        if let Some(value) = canned.iter().find(|value| value.tag() == record.tag()) {
            *record = *value;
        }
    });
}

impl VulkanFunctions for FakeFunctions {
    type Instance = InstanceParams;
    type Device = DeviceParams;

    fn instance_version(&self) -> ProfileResult<u32> {
        Ok(self.loader_version)
    }

    fn instance_extension_properties(
        &self,
        layer: Option<&ExtensionStr>,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>> {
        let Some(layer) = layer else {
            return Ok(self.instance_extensions.clone());
        };
        self.layers
            .iter()
            .find(|(name, _)| name == layer)
            .map(|(_, extensions)| extensions.clone())
            .ok_or(ProfileError::Vulkan {
                call: "vkEnumerateInstanceExtensionProperties",
                source: vk::ErrorCode::LAYER_NOT_PRESENT,
            })
    }

    fn device_extension_properties(
        &self,
        _physical_device: vk::PhysicalDevice,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>> {
        Ok(self.device_extensions.clone())
    }

    fn physical_device_features2(
        &self,
        _physical_device: vk::PhysicalDevice,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        report(chain, &self.features);
        Ok(())
    }

    fn physical_device_properties2(
        &self,
        _physical_device: vk::PhysicalDevice,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        report(chain, &self.properties);
        if let Some(properties2) = chain.get_mut::<vk::PhysicalDeviceProperties2>() {
            properties2.properties.api_version = self.device_version;
        }
        Ok(())
    }

    fn physical_device_format_properties2(
        &self,
        _physical_device: vk::PhysicalDevice,
        format: vk::Format,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        if let Some((_, canned)) = self.formats.iter().find(|(known, _)| *known == format) {
            report(chain, canned);
        }
        Ok(())
    }

    fn create_instance(&mut self, params: &InstanceParams) -> ProfileResult<InstanceParams> {
        self.created_instance = Some(params.clone());
        Ok(params.clone())
    }

    fn create_device(
        &self,
        _physical_device: vk::PhysicalDevice,
        params: &DeviceParams,
    ) -> ProfileResult<DeviceParams> {
        Ok(params.clone())
    }
}
