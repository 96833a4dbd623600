use crate::chain::StructChain;
use crate::errors::ProfileResult;
use crate::functions::VulkanFunctions;
use crate::profiles::{BlockProperties, ProfileDesc, ProfileProperties, ProfileTable, VariantDesc};
use crate::version::{API_VERSION_1_1, ApiVersion, meets_minimum};
use crate::vulkan::extensions::{ExtensionStr, InstanceExtension, has_extension};
use crate::{debug_success, debug_warning};
use log::{debug, info, trace};
use vulkanalia::vk;

/// Outcome of a profile support query.
///
/// Both block lists are kept whatever the verdict, so a supported profile still shows
/// which alternatives were skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportReport {
    pub supported: bool,
    pub supported_blocks: Vec<BlockProperties>,
    pub unsupported_blocks: Vec<BlockProperties>,
}

fn tagged(block: &BlockProperties, variant: &VariantDesc) -> BlockProperties {
    BlockProperties {
        block_name: variant.block_name.into(),
        ..block.clone()
    }
}

fn missing_extension<'a>(
    required: &'a [vk::ExtensionProperties],
    available: &[vk::ExtensionProperties],
) -> Option<&'a ExtensionStr> {
    required
        .iter()
        .map(|extension| &extension.extension_name)
        .find(|name| !has_extension(available, name))
}

/// Checks a profile and its required profiles against the instance-level capabilities of
/// the loader, or of one layer when `layer` is given.
pub fn instance_support<F: VulkanFunctions>(
    functions: &F,
    table: ProfileTable,
    layer: Option<&ExtensionStr>,
    profile: &ProfileProperties,
) -> ProfileResult<SupportReport> {
    let api_version = functions.instance_version()?;
    let available = functions.instance_extension_properties(layer)?;
    let desc = table.get(&profile.name)?;
    debug!(
        "Checking instance support of {} against loader {}",
        profile,
        ApiVersion(api_version)
    );

    let mut supported = true;
    if api_version < API_VERSION_1_1
        && !has_extension(&available, InstanceExtension::KhrGetPhysicalDeviceProperties2.name())
    {
        debug_warning!(
            "Vulkan 1.0 loader without {}",
            InstanceExtension::KhrGetPhysicalDeviceProperties2
        );
        supported = false;
    }

    let mut report = SupportReport::default();
    supported &= check_instance_profile(table, api_version, &available, profile, &mut report)?;
    for required in desc.required_profiles {
        // The API version requirement is carried by the root profile only.
        supported &= check_instance_profile(table, 0, &available, required, &mut report)?;
    }

    info!(
        "Instance {} {}",
        if supported { "supports" } else { "does not support" },
        profile.name
    );
    report.supported = supported;
    Ok(report)
}

fn check_instance_profile(
    table: ProfileTable,
    api_version: u32,
    available: &[vk::ExtensionProperties],
    profile: &ProfileProperties,
    report: &mut SupportReport,
) -> ProfileResult<bool> {
    let desc = table.get(&profile.name)?;
    let block = BlockProperties {
        api_version,
        ..BlockProperties::whole(profile.clone())
    };
    let mut supported = true;

    if desc.props.spec_version < profile.spec_version {
        debug_warning!(
            "{} is compiled at revision {}, {} was requested",
            desc.props.name,
            desc.props.spec_version,
            profile.spec_version
        );
        supported = false;
        report.unsupported_blocks.push(block.clone());
    }
    if api_version != 0 && !meets_minimum(api_version, desc.min_api_version) {
        debug_warning!(
            "{} needs Vulkan {}, the loader offers {}",
            desc.props.name,
            ApiVersion(desc.min_api_version),
            ApiVersion(api_version)
        );
        supported = false;
        report.unsupported_blocks.push(block.clone());
    }

    for capabilities in desc.required_capabilities {
        let matched = capabilities.variants.iter().find(|variant| {
            match missing_extension(variant.instance_extensions, available) {
                Some(missing) => {
                    debug!(
                        "Block `{}` misses instance extension {}",
                        variant.block_name,
                        missing.to_string_lossy()
                    );
                    report.unsupported_blocks.push(tagged(&block, variant));
                    false
                }
                None => true,
            }
        });
        match matched {
            Some(variant) => {
                debug_success!("Block `{}` of {} is supported", variant.block_name, desc.props.name);
                report.supported_blocks.push(tagged(&block, variant));
            }
            None => return Ok(false),
        }
    }
    Ok(supported)
}

/// Checks a profile and its required profiles against what `physical_device` reports.
pub fn device_support<F: VulkanFunctions>(
    functions: &F,
    table: ProfileTable,
    physical_device: vk::PhysicalDevice,
    profile: &ProfileProperties,
) -> ProfileResult<SupportReport> {
    functions.validate()?;
    let available = functions.device_extension_properties(physical_device)?;
    let descs = table.gather_descs(profile, None)?;
    let gathered = table.gather(profile, None)?;

    let mut properties = StructChain::of(vk::PhysicalDeviceProperties2::default());
    functions.physical_device_properties2(physical_device, &mut properties)?;
    let device_version = properties
        .get::<vk::PhysicalDeviceProperties2>()
        .map(|p| p.properties.api_version)
        .unwrap_or_default();

    let mut supported = true;
    let mut report = SupportReport::default();
    for (desc, requested) in descs.into_iter().zip(gathered) {
        supported &= check_device_profile(
            functions,
            physical_device,
            device_version,
            &available,
            desc,
            &requested,
            &mut report,
        )?;
    }

    info!(
        "Device {:?} {} {}",
        physical_device,
        if supported { "supports" } else { "does not support" },
        profile.name
    );
    report.supported = supported;
    Ok(report)
}

fn check_device_profile<F: VulkanFunctions>(
    functions: &F,
    physical_device: vk::PhysicalDevice,
    device_version: u32,
    available: &[vk::ExtensionProperties],
    desc: &ProfileDesc,
    requested: &ProfileProperties,
    report: &mut SupportReport,
) -> ProfileResult<bool> {
    let block = BlockProperties {
        api_version: device_version,
        ..BlockProperties::whole(requested.clone())
    };
    let mut supported = true;
    if desc.props.spec_version < requested.spec_version {
        debug_warning!("{} is older than the requested revision", desc.props.name);
        supported = false;
        report.unsupported_blocks.push(block.clone());
    }
    if !meets_minimum(device_version, desc.min_api_version) {
        debug_warning!(
            "{} needs Vulkan {}, the device offers {}",
            desc.props.name,
            ApiVersion(desc.min_api_version),
            ApiVersion(device_version)
        );
        supported = false;
        report.unsupported_blocks.push(block.clone());
    }

    for capabilities in desc.required_capabilities {
        let mut matched = false;
        for variant in capabilities.variants {
            if check_device_variant(functions, physical_device, available, variant)? {
                debug_success!("Block `{}` of {} is supported", variant.block_name, desc.props.name);
                report.supported_blocks.push(tagged(&block, variant));
                matched = true;
                break;
            }
            report.unsupported_blocks.push(tagged(&block, variant));
        }
        supported &= matched;
    }
    Ok(supported)
}

/// Extension presence first, then the feature, property and format chains of `variant`,
/// each queried from the device and run through the variant's comparator.
pub(crate) fn check_device_variant<F: VulkanFunctions>(
    functions: &F,
    physical_device: vk::PhysicalDevice,
    available: &[vk::ExtensionProperties],
    variant: &VariantDesc,
) -> ProfileResult<bool> {
    if let Some(missing) = missing_extension(variant.device_extensions, available) {
        debug!(
            "Block `{}` misses device extension {}",
            variant.block_name,
            missing.to_string_lossy()
        );
        return Ok(false);
    }

    let mut features = StructChain::from_tags(
        vk::StructureType::PHYSICAL_DEVICE_FEATURES_2,
        variant.feature_struct_types,
    )?;
    functions.physical_device_features2(physical_device, &mut features)?;
    if let Some(failed) = features.iter().find(|record| !variant.feature.compare(record)) {
        debug!("Block `{}` fails on {:?}", variant.block_name, failed.tag());
        return Ok(false);
    }

    let mut properties = StructChain::from_tags(
        vk::StructureType::PHYSICAL_DEVICE_PROPERTIES_2,
        variant.property_struct_types,
    )?;
    functions.physical_device_properties2(physical_device, &mut properties)?;
    if let Some(failed) = properties.iter().find(|record| !variant.property.compare(record)) {
        debug!("Block `{}` fails on {:?}", variant.block_name, failed.tag());
        return Ok(false);
    }

    for format in variant.formats {
        let mut chain = StructChain::from_tags(
            vk::StructureType::FORMAT_PROPERTIES_2,
            variant.format_struct_types,
        )?;
        functions.physical_device_format_properties2(physical_device, format.format, &mut chain)?;
        trace!("Comparing {:?} of block `{}`", format.format, variant.block_name);
        if !chain.iter().all(|record| format.desc.compare(record)) {
            debug!("Block `{}` fails on format {:?}", variant.block_name, format.format);
            return Ok(false);
        }
    }
    Ok(true)
}
