use crate::aggregator::FeaturesChain;
use crate::chain::{StructChain, gather_tags};
use crate::config::DeviceCreateFlags;
use crate::errors::ProfileResult;
use crate::functions::{ApplicationInfo, DeviceParams, InstanceParams, QueueRequest, VulkanFunctions};
use crate::info_success;
use crate::profiles::{BlockProperties, ProfileProperties, ProfileTable, VariantDesc};
use crate::version::{API_VERSION_1_1, ApiVersion, max_components};
use crate::vulkan::extensions::{ExtensionStr, InstanceExtension, gather_names};
use log::{debug, trace};
use vulkanalia::vk;

/// # Instance Create Config
/// What the application wants from `vkCreateInstance`, before the profiles are folded in.
///
/// # Details
/// `full_profiles` enable every block of a profile and of the profiles it requires;
/// `blocks` enable single blocks. Without `application`, the API version defaults to the
/// highest minimum among the enabled profiles.
#[derive(Debug, Clone)]
pub struct InstanceCreateConfig {
    pub full_profiles: Vec<ProfileProperties>,
    pub blocks: Vec<BlockProperties>,
    pub application: Option<ApplicationInfo>,
    pub layers: Vec<ExtensionStr>,
    pub extensions: Vec<ExtensionStr>,
    pub flags: vk::InstanceCreateFlags,
    /// Enables `VK_KHR_portability_enumeration`, so portability-subset drivers are listed.
    pub enumerate_portability: bool,
}

impl Default for InstanceCreateConfig {
    fn default() -> Self {
        Self {
            full_profiles: Vec::new(),
            blocks: Vec::new(),
            application: None,
            layers: Vec::new(),
            extensions: Vec::new(),
            flags: vk::InstanceCreateFlags::empty(),
            enumerate_portability: cfg!(target_os = "macos"),
        }
    }
}

/// # Device Create Config
/// What the application wants from `vkCreateDevice`, before the profiles are folded in.
///
/// # Details
/// `requested` is the caller's own feature chain. Every structure in it must be a
/// registered feature structure; its flags are OR-merged with the profile requirements.
#[derive(Debug, Clone, Default)]
pub struct DeviceCreateConfig {
    pub full_profiles: Vec<ProfileProperties>,
    pub blocks: Vec<BlockProperties>,
    pub queues: Vec<QueueRequest>,
    pub extensions: Vec<ExtensionStr>,
    pub enabled_features: Option<vk::PhysicalDeviceFeatures>,
    pub requested: Option<StructChain>,
    pub flags: DeviceCreateFlags,
}

fn enabled_variants(
    table: ProfileTable,
    full_profiles: &[ProfileProperties],
    blocks: &[BlockProperties],
) -> ProfileResult<Vec<&'static VariantDesc>> {
    let mut variants = Vec::new();
    for block in table.gather_blocks(full_profiles, blocks)? {
        trace!("Enabling {}", block);
        variants.extend(table.block_variants(&block)?);
    }
    Ok(variants)
}

fn push_unique(names: &mut Vec<ExtensionStr>, name: &ExtensionStr) {
    if !names.contains(name) {
        names.push(*name);
    }
}

/// Folds the enabled profiles into the instance creation parameters.
pub fn instance_params(table: ProfileTable, config: &InstanceCreateConfig) -> ProfileResult<InstanceParams> {
    let mut extensions = config.extensions.clone();
    for variant in enabled_variants(table, &config.full_profiles, &config.blocks)? {
        gather_names(&mut extensions, variant.instance_extensions);
    }

    let application = match &config.application {
        Some(application) => application.clone(),
        None => {
            let profiles = config
                .full_profiles
                .iter()
                .chain(config.blocks.iter().map(|block| &block.profile));
            let mut api_version = 0;
            for profile in profiles {
                api_version = max_components(api_version, table.api_version(profile)?);
            }
            ApplicationInfo {
                api_version,
                ..ApplicationInfo::default()
            }
        }
    };

    if application.api_version < API_VERSION_1_1 {
        push_unique(&mut extensions, InstanceExtension::KhrGetPhysicalDeviceProperties2.name());
    }

    let mut flags = config.flags;
    if config.enumerate_portability {
        push_unique(&mut extensions, InstanceExtension::KhrPortabilityEnumeration.name());
        flags |= vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR;
    }

    debug!(
        "Instance targets Vulkan {} with {} extension(s)",
        ApiVersion(application.api_version),
        extensions.len()
    );
    Ok(InstanceParams {
        application,
        layers: config.layers.clone(),
        extensions,
        flags,
    })
}

/// Creates an instance that enables everything the configured profiles need.
pub fn create_instance<F: VulkanFunctions>(
    functions: &mut F,
    table: ProfileTable,
    config: &InstanceCreateConfig,
) -> ProfileResult<F::Instance> {
    let params = instance_params(table, config)?;
    let instance = functions.create_instance(&params)?;
    info_success!("Profile instance created");
    Ok(instance)
}

/// Folds the enabled profiles into the device creation parameters.
///
/// The resulting feature chain holds the structures the profiles list, then the caller's
/// structures, all headed by one `VkPhysicalDeviceFeatures2`. Profile fillers run after the
/// caller's flags are merged and the robustness opt-outs run last, so an opt-out always wins.
pub fn device_params(table: ProfileTable, config: &DeviceCreateConfig) -> ProfileResult<DeviceParams> {
    let variants = enabled_variants(table, &config.full_profiles, &config.blocks)?;

    let mut extensions = config.extensions.clone();
    let mut structure_types = Vec::new();
    for variant in &variants {
        for &tag in variant.feature_struct_types {
            if !structure_types.contains(&tag) {
                structure_types.push(tag);
            }
        }
        gather_names(&mut extensions, variant.device_extensions);
    }
    if let Some(requested) = &config.requested {
        gather_tags(&mut structure_types, requested);
    }

    let mut chain = FeaturesChain::new()?;
    chain.extract_subset(&structure_types);
    if let Some(features) = config.enabled_features {
        if let Some(features2) = chain.required_mut().get_mut::<vk::PhysicalDeviceFeatures2>() {
            features2.features = features;
        }
    }
    if let Some(requested) = &config.requested {
        chain.merge_requested(requested)?;
    }
    for variant in &variants {
        chain.required_mut().for_each_mut(|record| variant.feature.fill(record));
    }
    chain.apply_robustness(config.flags);

    let features = chain.into_required();
    debug!(
        "Device enables {} extension(s) and {} feature structure(s)",
        extensions.len(),
        features.len()
    );
    Ok(DeviceParams {
        queues: config.queues.clone(),
        extensions,
        features,
    })
}

/// Creates a logical device that enables everything the configured profiles need.
pub fn create_device<F: VulkanFunctions>(
    functions: &F,
    table: ProfileTable,
    physical_device: vk::PhysicalDevice,
    config: &DeviceCreateConfig,
) -> ProfileResult<F::Device> {
    let params = device_params(table, config)?;
    let device = functions.create_device(physical_device, &params)?;
    info_success!("Profile device created on {:?}", physical_device);
    Ok(device)
}
