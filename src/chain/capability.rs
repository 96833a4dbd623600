use std::mem::size_of;
use vulkanalia::vk;

pub const VK_TRUE: vk::Bool32 = 1;
pub const VK_FALSE: vk::Bool32 = 0;

/// `VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_ROBUSTNESS_2_FEATURES_EXT`.
///
/// Spelled by value because the registry moved the enumerant to a KHR name.
pub const ROBUSTNESS_2_FEATURES: vk::StructureType = vk::StructureType::from_raw(1_000_286_000);

/// `VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PUSH_DESCRIPTOR_PROPERTIES_KHR`, promoted in Vulkan 1.4.
pub const PUSH_DESCRIPTOR_PROPERTIES: vk::StructureType = vk::StructureType::from_raw(1_000_080_000);

/// What a registered structure describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructKind {
    /// Extends `VkPhysicalDeviceFeatures2`; made of `VkBool32` flags only.
    Feature,
    /// Extends `VkPhysicalDeviceProperties2`.
    Property,
    /// Extends `VkFormatProperties2`.
    Format,
}

/// A Vulkan structure that can live in a [`StructChain`](super::StructChain).
pub trait ChainStruct: Default + Copy {
    const TAG: vk::StructureType;
    const KIND: StructKind;

    fn into_capability(self) -> Capability;
    fn from_capability(capability: &Capability) -> Option<&Self>;
    fn from_capability_mut(capability: &mut Capability) -> Option<&mut Self>;
}

macro_rules! capability_registry {
    (
        $(
            $variant:ident($ty:ty) = $tag:path, $kind:ident, flags: $flags:literal;
        )+
    ) => {
        /// # Capability
        /// One registered capability-description structure, held by value and tagged by its
        /// `sType`.
        ///
        /// # Details
        /// The set is closed: anything a profile can fill, compare or merge has a variant
        /// here, together with the number of leading `VkBool32` flags it carries. The flag
        /// count is checked against the structure size at compile time.
        #[derive(Debug, Clone, Copy)]
        pub enum Capability {
            $( $variant($ty), )+
        }

        impl Capability {
            /// Default-initialised record for `tag`, `None` when the tag is not registered.
            pub fn with_tag(tag: vk::StructureType) -> Option<Self> {
                match tag {
                    $( $tag => Some(Self::$variant(<$ty>::default())), )+
                    _ => None,
                }
            }

            pub fn tag(&self) -> vk::StructureType {
                match self {
                    $( Self::$variant(_) => $tag, )+
                }
            }

            pub fn kind(&self) -> StructKind {
                match self {
                    $( Self::$variant(_) => StructKind::$kind, )+
                }
            }

            /// Number of `VkBool32` flags following the structure header.
            ///
            /// Only feature structures have a flag layout that can be merged; `None` for
            /// properties, formats and unregistered tags.
            pub fn flag_count(tag: vk::StructureType) -> Option<usize> {
                match tag {
                    $( $tag => (StructKind::$kind == StructKind::Feature).then_some($flags), )+
                    _ => None,
                }
            }

            /// Every registered tag of the given kind, in registry order.
            pub fn registered(kind: StructKind) -> Vec<vk::StructureType> {
                let mut tags = Vec::new();
                $(
                    if StructKind::$kind == kind {
                        tags.push($tag);
                    }
                )+
                tags
            }

            pub(crate) fn base_mut(&mut self) -> *mut vk::BaseOutStructure {
                match self {
                    $( Self::$variant(s) => (s as *mut $ty).cast(), )+
                }
            }

            /// The feature flags of this record, empty for properties and formats.
            pub fn flags(&self) -> &[vk::Bool32] {
                match self {
                    $(
                        Self::$variant(s) => unsafe {
                            std::slice::from_raw_parts(
                                (s as *const $ty)
                                    .cast::<u8>()
                                    .add(size_of::<vk::BaseOutStructure>())
                                    .cast::<vk::Bool32>(),
                                $flags,
                            )
                        },
                    )+
                }
            }

            pub fn flags_mut(&mut self) -> &mut [vk::Bool32] {
                match self {
                    $(
                        Self::$variant(s) => unsafe {
                            std::slice::from_raw_parts_mut(
                                (s as *mut $ty)
                                    .cast::<u8>()
                                    .add(size_of::<vk::BaseOutStructure>())
                                    .cast::<vk::Bool32>(),
                                $flags,
                            )
                        },
                    )+
                }
            }
        }

        $(
            const _: () = assert!(
                size_of::<vk::BaseOutStructure>() + $flags * size_of::<vk::Bool32>()
                    <= size_of::<$ty>()
            );

            impl ChainStruct for $ty {
                const TAG: vk::StructureType = $tag;
                const KIND: StructKind = StructKind::$kind;

                fn into_capability(self) -> Capability {
                    Capability::$variant(self)
                }

                fn from_capability(capability: &Capability) -> Option<&Self> {
                    match capability {
                        Capability::$variant(s) => Some(s),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_capability_mut(capability: &mut Capability) -> Option<&mut Self> {
                    match capability {
                        Capability::$variant(s) => Some(s),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

capability_registry! {
    Features2(vk::PhysicalDeviceFeatures2) = vk::StructureType::PHYSICAL_DEVICE_FEATURES_2, Feature, flags: 55;
    Vulkan11Features(vk::PhysicalDeviceVulkan11Features) = vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_1_FEATURES, Feature, flags: 12;
    Vulkan12Features(vk::PhysicalDeviceVulkan12Features) = vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_2_FEATURES, Feature, flags: 47;
    Vulkan13Features(vk::PhysicalDeviceVulkan13Features) = vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_3_FEATURES, Feature, flags: 15;
    DescriptorIndexing(vk::PhysicalDeviceDescriptorIndexingFeatures) = vk::StructureType::PHYSICAL_DEVICE_DESCRIPTOR_INDEXING_FEATURES, Feature, flags: 20;
    Storage16Bit(vk::PhysicalDevice16BitStorageFeatures) = vk::StructureType::PHYSICAL_DEVICE_16BIT_STORAGE_FEATURES, Feature, flags: 4;
    Storage8Bit(vk::PhysicalDevice8BitStorageFeatures) = vk::StructureType::PHYSICAL_DEVICE_8BIT_STORAGE_FEATURES, Feature, flags: 3;
    Robustness2(vk::PhysicalDeviceRobustness2FeaturesEXT) = ROBUSTNESS_2_FEATURES, Feature, flags: 3;
    BufferDeviceAddress(vk::PhysicalDeviceBufferDeviceAddressFeatures) = vk::StructureType::PHYSICAL_DEVICE_BUFFER_DEVICE_ADDRESS_FEATURES, Feature, flags: 3;
    Multiview(vk::PhysicalDeviceMultiviewFeatures) = vk::StructureType::PHYSICAL_DEVICE_MULTIVIEW_FEATURES, Feature, flags: 3;
    ShaderFloat16Int8(vk::PhysicalDeviceShaderFloat16Int8Features) = vk::StructureType::PHYSICAL_DEVICE_SHADER_FLOAT16_INT8_FEATURES, Feature, flags: 2;
    VariablePointers(vk::PhysicalDeviceVariablePointersFeatures) = vk::StructureType::PHYSICAL_DEVICE_VARIABLE_POINTERS_FEATURES, Feature, flags: 2;
    TimelineSemaphore(vk::PhysicalDeviceTimelineSemaphoreFeatures) = vk::StructureType::PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_FEATURES, Feature, flags: 1;
    ImageRobustness(vk::PhysicalDeviceImageRobustnessFeatures) = vk::StructureType::PHYSICAL_DEVICE_IMAGE_ROBUSTNESS_FEATURES, Feature, flags: 1;
    Synchronization2(vk::PhysicalDeviceSynchronization2Features) = vk::StructureType::PHYSICAL_DEVICE_SYNCHRONIZATION_2_FEATURES, Feature, flags: 1;
    DynamicRendering(vk::PhysicalDeviceDynamicRenderingFeatures) = vk::StructureType::PHYSICAL_DEVICE_DYNAMIC_RENDERING_FEATURES, Feature, flags: 1;
    Maintenance4(vk::PhysicalDeviceMaintenance4Features) = vk::StructureType::PHYSICAL_DEVICE_MAINTENANCE_4_FEATURES, Feature, flags: 1;
    ScalarBlockLayout(vk::PhysicalDeviceScalarBlockLayoutFeatures) = vk::StructureType::PHYSICAL_DEVICE_SCALAR_BLOCK_LAYOUT_FEATURES, Feature, flags: 1;
    HostQueryReset(vk::PhysicalDeviceHostQueryResetFeatures) = vk::StructureType::PHYSICAL_DEVICE_HOST_QUERY_RESET_FEATURES, Feature, flags: 1;
    PrivateData(vk::PhysicalDevicePrivateDataFeatures) = vk::StructureType::PHYSICAL_DEVICE_PRIVATE_DATA_FEATURES, Feature, flags: 1;

    Properties2(vk::PhysicalDeviceProperties2) = vk::StructureType::PHYSICAL_DEVICE_PROPERTIES_2, Property, flags: 0;
    Maintenance3(vk::PhysicalDeviceMaintenance3Properties) = vk::StructureType::PHYSICAL_DEVICE_MAINTENANCE_3_PROPERTIES, Property, flags: 0;
    TimelineSemaphoreProperties(vk::PhysicalDeviceTimelineSemaphoreProperties) = vk::StructureType::PHYSICAL_DEVICE_TIMELINE_SEMAPHORE_PROPERTIES, Property, flags: 0;
    Subgroup(vk::PhysicalDeviceSubgroupProperties) = vk::StructureType::PHYSICAL_DEVICE_SUBGROUP_PROPERTIES, Property, flags: 0;
    PushDescriptor(vk::PhysicalDevicePushDescriptorPropertiesKHR) = PUSH_DESCRIPTOR_PROPERTIES, Property, flags: 0;

    FormatProperties2(vk::FormatProperties2) = vk::StructureType::FORMAT_PROPERTIES_2, Format, flags: 0;
    FormatProperties3(vk::FormatProperties3) = vk::StructureType::FORMAT_PROPERTIES_3, Format, flags: 0;
}
