mod common;

use common::{FakeFunctions, device, ext};
use pretty_assertions::assert_eq;
use vk_profiles::chain::{Capability, StructChain, VK_FALSE, VK_TRUE};
use vk_profiles::profiles::table::COMPUTE;
use vk_profiles::profiles::{CapabilitiesDesc, ProfileDesc, ProfileTable, StructDesc, VariantDesc};
use vk_profiles::version::{API_VERSION_1_0, API_VERSION_1_1, API_VERSION_1_2};
use vk_profiles::vulkan::extensions::extension;
use vk_profiles::{BlockProperties, Capabilities, ProfileError, ProfileProperties};
use vulkanalia::vk;

const VARIANTS: ProfileProperties = ProfileProperties::new("VP_TEST_variants", 1);
const GATED: ProfileProperties = ProfileProperties::new("VP_TEST_gated", 1);
const PARENT: ProfileProperties = ProfileProperties::new("VP_TEST_parent", 1);

const EXAMPLE_EXTENSION: &str = "VK_EXAMPLE_x";

struct RequireTimeline;

impl StructDesc for RequireTimeline {
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

static PUSH_DESCRIPTOR: [vk::ExtensionProperties; 1] = [extension(vk::KHR_PUSH_DESCRIPTOR_EXTENSION.name, 1)];
static EXAMPLE: [vk::ExtensionProperties; 1] =
    [extension(vk::ExtensionName::from_bytes(b"VK_EXAMPLE_x"), 1)];
static DEBUG_UTILS: [vk::ExtensionProperties; 1] = [extension(vk::EXT_DEBUG_UTILS_EXTENSION.name, 1)];
static TIMELINE: [vk::StructureType; 1] = [vk::StructureType::PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_FEATURES];

static TWO_WAYS: [VariantDesc; 2] = [
    VariantDesc {
        block_name: "fast",
        device_extensions: &PUSH_DESCRIPTOR,
        ..VariantDesc::EMPTY
    },
    VariantDesc {
        block_name: "slow",
        feature_struct_types: &TIMELINE,
        feature: &RequireTimeline,
        ..VariantDesc::EMPTY
    },
];

static EXAMPLE_ONLY: [VariantDesc; 1] = [VariantDesc {
    block_name: "x",
    instance_extensions: &EXAMPLE,
    ..VariantDesc::EMPTY
}];

static PARENT_ONLY: [VariantDesc; 1] = [VariantDesc {
    block_name: "parent",
    instance_extensions: &DEBUG_UTILS,
    ..VariantDesc::EMPTY
}];

static PROFILES: [ProfileDesc; 3] = [
    ProfileDesc {
        props: VARIANTS,
        min_api_version: API_VERSION_1_0,
        required_profiles: &[],
        required_capabilities: &[CapabilitiesDesc { variants: &TWO_WAYS }],
        fallbacks: &[],
    },
    ProfileDesc {
        props: GATED,
        min_api_version: API_VERSION_1_1,
        required_profiles: &[],
        required_capabilities: &[CapabilitiesDesc {
            variants: &EXAMPLE_ONLY,
        }],
        fallbacks: &[],
    },
    ProfileDesc {
        props: PARENT,
        min_api_version: API_VERSION_1_0,
        required_profiles: &[VARIANTS],
        required_capabilities: &[CapabilitiesDesc {
            variants: &PARENT_ONLY,
        }],
        fallbacks: &[],
    },
];

fn session(functions: FakeFunctions) -> Capabilities<FakeFunctions> {
    Capabilities::with_table(functions, ProfileTable::new(&PROFILES))
}

fn block(profile: ProfileProperties, name: &'static str, api_version: u32) -> BlockProperties {
    BlockProperties {
        api_version,
        ..BlockProperties::block(profile, name)
    }
}

fn whole(profile: ProfileProperties, api_version: u32) -> BlockProperties {
    BlockProperties {
        api_version,
        ..BlockProperties::whole(profile)
    }
}

fn timeline(enabled: bool) -> Capability {
    let mut features = vk::PhysicalDeviceTimelineSemaphoreFeatures::default();
    features.timeline_semaphore = if enabled { VK_TRUE } else { VK_FALSE };
    Capability::TimelineSemaphore(features)
}

#[test]
fn second_variant_carries_the_profile() {
    let capabilities = session(FakeFunctions {
        device_version: API_VERSION_1_1,
        features: vec![timeline(true)],
        ..FakeFunctions::default()
    });

    let report = capabilities
        .device_profile_variants_support(device(), &VARIANTS)
        .unwrap();
    assert!(report.supported);
    assert_eq!(report.supported_blocks, vec![block(VARIANTS, "slow", API_VERSION_1_1)]);
    assert_eq!(report.unsupported_blocks, vec![block(VARIANTS, "fast", API_VERSION_1_1)]);
}

#[test]
fn first_matching_variant_wins() {
    let capabilities = session(FakeFunctions {
        device_version: API_VERSION_1_1,
        device_extensions: vec![ext("VK_KHR_push_descriptor")],
        features: vec![timeline(true)],
        ..FakeFunctions::default()
    });

    let report = capabilities
        .device_profile_variants_support(device(), &VARIANTS)
        .unwrap();
    assert!(report.supported);
    assert_eq!(report.supported_blocks, vec![block(VARIANTS, "fast", API_VERSION_1_1)]);
    assert!(report.unsupported_blocks.is_empty());
}

#[test]
fn no_matching_variant_fails_every_block() {
    let capabilities = session(FakeFunctions {
        device_version: API_VERSION_1_1,
        features: vec![timeline(false)],
        ..FakeFunctions::default()
    });

    let report = capabilities
        .device_profile_variants_support(device(), &VARIANTS)
        .unwrap();
    assert!(!report.supported);
    assert!(report.supported_blocks.is_empty());
    assert_eq!(
        report.unsupported_blocks,
        vec![
            block(VARIANTS, "fast", API_VERSION_1_1),
            block(VARIANTS, "slow", API_VERSION_1_1),
        ]
    );
    assert!(!capabilities.device_profile_support(device(), &VARIANTS).unwrap());
}

#[test]
fn old_loader_fails_on_version_and_extension() {
    let capabilities = session(FakeFunctions {
        loader_version: API_VERSION_1_0,
        instance_extensions: vec![ext("VK_KHR_get_physical_device_properties2")],
        ..FakeFunctions::default()
    });

    let report = capabilities
        .instance_profile_variants_support(None, &GATED)
        .unwrap();
    assert!(!report.supported);
    assert_eq!(
        report.unsupported_blocks,
        vec![whole(GATED, API_VERSION_1_0), block(GATED, "x", API_VERSION_1_0)]
    );
}

#[test]
fn layer_extensions_are_checked_on_request() {
    let layer = vk::ExtensionName::from_bytes(b"VK_LAYER_EXAMPLE_x");
    let capabilities = session(FakeFunctions {
        loader_version: API_VERSION_1_2,
        layers: vec![(layer, vec![ext(EXAMPLE_EXTENSION)])],
        ..FakeFunctions::default()
    });

    assert!(!capabilities.instance_profile_support(None, &GATED).unwrap());
    assert!(capabilities.instance_profile_support(Some(&layer), &GATED).unwrap());

    let missing = vk::ExtensionName::from_bytes(b"VK_LAYER_EXAMPLE_missing");
    assert!(matches!(
        capabilities.instance_profile_support(Some(&missing), &GATED),
        Err(ProfileError::Vulkan {
            source: vk::ErrorCode::LAYER_NOT_PRESENT,
            ..
        })
    ));
}

#[test]
fn required_profiles_are_checked_with_the_root() {
    let capabilities = session(FakeFunctions {
        loader_version: API_VERSION_1_1,
        instance_extensions: vec![ext("VK_EXT_debug_utils")],
        ..FakeFunctions::default()
    });

    let report = capabilities
        .instance_profile_variants_support(None, &PARENT)
        .unwrap();
    assert!(report.supported);
    assert_eq!(
        report.supported_blocks,
        vec![block(PARENT, "parent", API_VERSION_1_1), block(VARIANTS, "fast", 0)]
    );
}

#[test]
fn vulkan_1_0_loader_needs_properties2() {
    let without = session(FakeFunctions {
        loader_version: API_VERSION_1_0,
        ..FakeFunctions::default()
    });
    assert!(!without.instance_profile_support(None, &VARIANTS).unwrap());

    let with = session(FakeFunctions {
        loader_version: API_VERSION_1_0,
        instance_extensions: vec![ext("VK_KHR_get_physical_device_properties2")],
        ..FakeFunctions::default()
    });
    assert!(with.instance_profile_support(None, &VARIANTS).unwrap());
}

#[test]
fn newer_revision_than_compiled_is_unsupported() {
    let capabilities = session(FakeFunctions {
        device_version: API_VERSION_1_1,
        features: vec![timeline(true)],
        ..FakeFunctions::default()
    });

    let newer = ProfileProperties::new("VP_TEST_variants", 2);
    let report = capabilities
        .device_profile_variants_support(device(), &newer)
        .unwrap();
    assert!(!report.supported);
    assert_eq!(report.unsupported_blocks, vec![whole(newer, API_VERSION_1_1)]);
}

#[test]
fn unknown_profiles_are_not_found() {
    let capabilities = session(FakeFunctions::default());
    let unknown = ProfileProperties::new("VP_TEST_unknown", 1);
    assert!(matches!(
        capabilities.device_profile_support(device(), &unknown),
        Err(ProfileError::NotFound(name)) if name == "VP_TEST_unknown"
    ));
}

/// A device that reports exactly what the compute profile asks for.
fn compute_device() -> FakeFunctions {
    let capabilities = Capabilities::new(FakeFunctions::default());

    let features = capabilities.feature_structure_types(&COMPUTE, None).unwrap();
    let mut features = StructChain::from_tags(vk::StructureType::PHYSICAL_DEVICE_FEATURES_2, &features).unwrap();
    capabilities.fill_features(&COMPUTE, None, &mut features).unwrap();

    let properties = capabilities.property_structure_types(&COMPUTE, None).unwrap();
    let mut properties =
        StructChain::from_tags(vk::StructureType::PHYSICAL_DEVICE_PROPERTIES_2, &properties).unwrap();
    capabilities.fill_properties(&COMPUTE, None, &mut properties).unwrap();

    FakeFunctions {
        device_version: API_VERSION_1_2,
        device_extensions: capabilities.device_extensions(&COMPUTE, None).unwrap(),
        features: features.iter().copied().collect(),
        properties: properties.iter().copied().collect(),
        ..FakeFunctions::default()
    }
}

#[test]
fn compute_profile_on_a_matching_device() {
    let capabilities = Capabilities::new(compute_device());
    let report = capabilities
        .device_profile_variants_support(device(), &COMPUTE)
        .unwrap();
    assert!(report.supported);
    assert_eq!(report.supported_blocks, vec![block(COMPUTE, "baseline", API_VERSION_1_2)]);
}

#[test]
fn compute_profile_rejects_short_devices() {
    let mut functions = compute_device();
    for record in &mut functions.properties {
        if let Capability::Subgroup(subgroup) = record {
            subgroup.subgroup_size = 12;
        }
    }
    assert!(!Capabilities::new(functions).device_profile_support(device(), &COMPUTE).unwrap());

    let mut functions = compute_device();
    functions.device_extensions.pop();
    assert!(!Capabilities::new(functions).device_profile_support(device(), &COMPUTE).unwrap());

    let functions = FakeFunctions {
        device_version: API_VERSION_1_1,
        ..compute_device()
    };
    let report = Capabilities::new(functions)
        .device_profile_variants_support(device(), &COMPUTE)
        .unwrap();
    assert!(!report.supported);
    assert_eq!(report.unsupported_blocks[0], whole(COMPUTE, API_VERSION_1_1));
}
