//! Profiles compiled into this build.
use super::checks::{check_flags, is_power_of_two};
use super::{CapabilitiesDesc, ProfileDesc, ProfileProperties, StructDesc, VariantDesc};
use crate::chain::capability::PUSH_DESCRIPTOR_PROPERTIES;
use crate::chain::{Capability, VK_TRUE};
use crate::version::{API_VERSION_1_0, make_api_version};
use crate::vulkan::extensions::extension;
use vulkanalia::vk;

pub const COMPUTE_NAME: &str = "VP_EXAMPLE_compute";
pub const COMPUTE_SPEC_VERSION: u32 = 1;
pub const COMPUTE_MIN_API_VERSION: u32 = make_api_version(0, 1, 2, 0);
pub const COMPUTE: ProfileProperties = ProfileProperties::new(COMPUTE_NAME, COMPUTE_SPEC_VERSION);

pub const COMPUTE_DEBUG_NAME: &str = "VP_EXAMPLE_compute_debug";
pub const COMPUTE_DEBUG_SPEC_VERSION: u32 = 1;
pub const COMPUTE_DEBUG_MIN_API_VERSION: u32 = API_VERSION_1_0;
pub const COMPUTE_DEBUG: ProfileProperties =
    ProfileProperties::new(COMPUTE_DEBUG_NAME, COMPUTE_DEBUG_SPEC_VERSION);

const MIN_STORAGE_BUFFER_RANGE: u32 = 268_435_456;
const MIN_MEMORY_ALLOCATION_SIZE: vk::DeviceSize = 268_435_456;
const MIN_TIMELINE_VALUE_DIFFERENCE: u64 = 16;
const MIN_SUBGROUP_SIZE: u32 = 4;
const MIN_PUSH_DESCRIPTORS: u32 = 2;

fn subgroup_operations() -> vk::SubgroupFeatureFlags {
    vk::SubgroupFeatureFlags::BALLOT | vk::SubgroupFeatureFlags::ARITHMETIC
}

/// Timeline semaphores are the only feature the compute baseline needs.
struct ComputeFeatures;

impl StructDesc for ComputeFeatures {
    fn fill(&self, target: &mut Capability) {
        if let Capability::TimelineSemaphore(s) = target {
            s.timeline_semaphore = VK_TRUE;
        }
    }

    fn compare(&self, actual: &Capability) -> bool {
        match actual {
            Capability::TimelineSemaphore(s) => s.timeline_semaphore == VK_TRUE,
            _ => true,
        }
    }
}

struct ComputeProperties;

impl StructDesc for ComputeProperties {
    fn fill(&self, target: &mut Capability) {
        match target {
            Capability::Properties2(s) => {
                s.properties.limits.max_storage_buffer_range = MIN_STORAGE_BUFFER_RANGE;
            }
            Capability::Maintenance3(s) => s.max_memory_allocation_size = MIN_MEMORY_ALLOCATION_SIZE,
            Capability::TimelineSemaphoreProperties(s) => {
                s.max_timeline_semaphore_value_difference = MIN_TIMELINE_VALUE_DIFFERENCE;
            }
            Capability::Subgroup(s) => {
                s.subgroup_size = MIN_SUBGROUP_SIZE;
                s.supported_operations |= subgroup_operations();
                s.supported_stages |= vk::ShaderStageFlags::COMPUTE;
            }
            Capability::PushDescriptor(s) => s.max_push_descriptors = MIN_PUSH_DESCRIPTORS,
            _ => {}
        }
    }

    fn compare(&self, actual: &Capability) -> bool {
        match actual {
            Capability::Properties2(s) => {
                s.properties.limits.max_storage_buffer_range >= MIN_STORAGE_BUFFER_RANGE
            }
            Capability::Maintenance3(s) => s.max_memory_allocation_size >= MIN_MEMORY_ALLOCATION_SIZE,
            Capability::TimelineSemaphoreProperties(s) => {
                s.max_timeline_semaphore_value_difference >= MIN_TIMELINE_VALUE_DIFFERENCE
            }
            Capability::Subgroup(s) => {
                s.subgroup_size >= MIN_SUBGROUP_SIZE
                    && is_power_of_two(f64::from(s.subgroup_size))
                    && check_flags(s.supported_operations.bits(), subgroup_operations().bits())
                    && check_flags(
                        s.supported_stages.bits(),
                        vk::ShaderStageFlags::COMPUTE.bits(),
                    )
            }
            Capability::PushDescriptor(s) => s.max_push_descriptors >= MIN_PUSH_DESCRIPTORS,
            _ => true,
        }
    }
}

static COMPUTE_DEVICE_EXTENSIONS: [vk::ExtensionProperties; 2] = [
    extension(vk::KHR_PUSH_DESCRIPTOR_EXTENSION.name, 1),
    extension(vk::KHR_SHADER_NON_SEMANTIC_INFO_EXTENSION.name, 1),
];

static COMPUTE_FEATURE_TYPES: [vk::StructureType; 1] =
    [vk::StructureType::PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_FEATURES];

static COMPUTE_PROPERTY_TYPES: [vk::StructureType; 5] = [
    vk::StructureType::PHYSICAL_DEVICE_PROPERTIES_2,
    vk::StructureType::PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES,
    vk::StructureType::PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_PROPERTIES,
    vk::StructureType::PHYSICAL_DEVICE_SUBGROUP_PROPERTIES,
    PUSH_DESCRIPTOR_PROPERTIES,
];

static COMPUTE_BASELINE: [VariantDesc; 1] = [VariantDesc {
    block_name: "baseline",
    device_extensions: &COMPUTE_DEVICE_EXTENSIONS,
    feature_struct_types: &COMPUTE_FEATURE_TYPES,
    feature: &ComputeFeatures,
    property_struct_types: &COMPUTE_PROPERTY_TYPES,
    property: &ComputeProperties,
    ..VariantDesc::EMPTY
}];

static COMPUTE_DEBUG_INSTANCE_EXTENSIONS: [vk::ExtensionProperties; 1] =
    [extension(vk::EXT_DEBUG_UTILS_EXTENSION.name, 1)];

static COMPUTE_DEBUG_VARIANTS: [VariantDesc; 1] = [VariantDesc {
    block_name: "debug",
    instance_extensions: &COMPUTE_DEBUG_INSTANCE_EXTENSIONS,
    ..VariantDesc::EMPTY
}];

pub static PROFILES: &[ProfileDesc] = &[
    ProfileDesc {
        props: COMPUTE,
        min_api_version: COMPUTE_MIN_API_VERSION,
        required_profiles: &[],
        required_capabilities: &[CapabilitiesDesc {
            variants: &COMPUTE_BASELINE,
        }],
        fallbacks: &[],
    },
    ProfileDesc {
        props: COMPUTE_DEBUG,
        min_api_version: COMPUTE_DEBUG_MIN_API_VERSION,
        required_profiles: &[],
        required_capabilities: &[CapabilitiesDesc {
            variants: &COMPUTE_DEBUG_VARIANTS,
        }],
        fallbacks: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::StructChain;

    fn filled_properties() -> StructChain {
        let mut chain = StructChain::from_tags(
            vk::StructureType::PHYSICAL_DEVICE_PROPERTIES_2,
            &COMPUTE_PROPERTY_TYPES,
        )
        .unwrap();
        chain.for_each_mut(|record| ComputeProperties.fill(record));
        chain
    }

    #[test]
    fn filled_properties_satisfy_their_own_comparator() {
        let chain = filled_properties();
        assert_eq!(chain.len(), COMPUTE_PROPERTY_TYPES.len());
        assert!(chain.iter().all(|record| ComputeProperties.compare(record)));
    }

    #[test]
    fn subgroup_size_must_be_a_power_of_two() {
        let mut chain = filled_properties();
        chain.get_mut::<vk::PhysicalDeviceSubgroupProperties>().unwrap().subgroup_size = 12;
        assert!(!chain.iter().all(|record| ComputeProperties.compare(record)));
        chain.get_mut::<vk::PhysicalDeviceSubgroupProperties>().unwrap().subgroup_size = 64;
        assert!(chain.iter().all(|record| ComputeProperties.compare(record)));
    }

    #[test]
    fn undeclared_limits_are_left_alone() {
        let mut chain = StructChain::of(vk::PhysicalDeviceProperties2::default());
        {
            let limits = &mut chain.get_mut::<vk::PhysicalDeviceProperties2>().unwrap().properties.limits;
            limits.min_storage_buffer_offset_alignment = 64;
            limits.max_storage_buffer_range = 1024;
        }
        chain.for_each_mut(|record| ComputeProperties.fill(record));

        let limits = &chain.get::<vk::PhysicalDeviceProperties2>().unwrap().properties.limits;
        assert_eq!(limits.min_storage_buffer_offset_alignment, 64);
        assert_eq!(limits.max_storage_buffer_range, MIN_STORAGE_BUFFER_RANGE);

        let mut odd = *chain.get::<vk::PhysicalDeviceProperties2>().unwrap();
        odd.properties.limits.min_storage_buffer_offset_alignment = 96;
        assert!(ComputeProperties.compare(&Capability::Properties2(odd)));
    }

    #[test]
    fn missing_subgroup_operations_fail() {
        let mut chain = filled_properties();
        chain
            .get_mut::<vk::PhysicalDeviceSubgroupProperties>()
            .unwrap()
            .supported_operations = vk::SubgroupFeatureFlags::BALLOT;
        assert!(!chain.iter().all(|record| ComputeProperties.compare(record)));
    }

    #[test]
    fn timeline_semaphore_is_required() {
        let mut record =
            Capability::with_tag(vk::StructureType::PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_FEATURES).unwrap();
        assert!(!ComputeFeatures.compare(&record));
        ComputeFeatures.fill(&mut record);
        assert!(ComputeFeatures.compare(&record));
        assert!(ComputeFeatures.compare(&Capability::with_tag(
            vk::StructureType::PHYSICAL_DEVICE_FEATURES_2
        ).unwrap()));
    }
}
