use crate::chain::{ChainStruct, StructChain, StructKind};
use crate::enumerate;
use crate::errors::{ProfileError, ProfileResult};
use crate::factory::{self, DeviceCreateConfig, InstanceCreateConfig};
use crate::functions::VulkanFunctions;
use crate::matcher::{self, SupportReport};
use crate::profiles::{ProfileDesc, ProfileProperties, ProfileTable, StructDesc, VariantDesc};
use crate::vulkan::extensions::ExtensionStr;
use log::{debug, trace};
use vulkanalia::vk;

/// # Capabilities
/// A profile session: the compiled profiles plus the Vulkan functions queries go through.
///
/// # Details
/// Every query takes the profile by [`ProfileProperties`] and an optional block name.
/// Without a block, queries cover the profile and the profiles it requires; with one, only
/// the variants of the profile that carry that block name.
///
/// # Errors
/// Unknown profiles report [`ProfileError::NotFound`] and unknown block names
/// [`ProfileError::BlockNotFound`].
pub struct Capabilities<F: VulkanFunctions> {
    functions: F,
    table: ProfileTable,
}

impl<F: VulkanFunctions> Capabilities<F> {
    /// Session over the profiles compiled into this build.
    pub fn new(functions: F) -> Self {
        Self::with_table(functions, ProfileTable::default())
    }

    pub fn with_table(functions: F, table: ProfileTable) -> Self {
        Self { functions, table }
    }

    pub fn functions(&self) -> &F {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut F {
        &mut self.functions
    }

    pub fn into_functions(self) -> F {
        self.functions
    }

    pub fn table(&self) -> ProfileTable {
        self.table
    }

    pub fn profiles(&self) -> Vec<ProfileProperties> {
        self.table.profiles().iter().map(|desc| desc.props.clone()).collect()
    }

    /// [`Capabilities::profiles`] in the `vkEnumerate*` form: count first, then fill.
    pub fn enumerate_profiles(&self, out: Option<&mut [ProfileProperties]>) -> (usize, vk::SuccessCode) {
        enumerate::fill(&self.profiles(), out)
    }

    pub fn profile_desc(&self, name: &str) -> ProfileResult<&'static ProfileDesc> {
        self.table.get(name)
    }

    pub fn required_profiles(&self, profile: &ProfileProperties) -> ProfileResult<Vec<ProfileProperties>> {
        Ok(self.table.get(&profile.name)?.required_profiles.to_vec())
    }

    pub fn fallbacks(&self, profile: &ProfileProperties) -> ProfileResult<Vec<ProfileProperties>> {
        Ok(self.table.get(&profile.name)?.fallbacks.to_vec())
    }

    /// See [`ProfileTable::api_version`].
    pub fn api_version(&self, profile: &ProfileProperties) -> ProfileResult<u32> {
        self.table.api_version(profile)
    }

    /// True when some capability set of the profile, or of a profile it requires, offers
    /// more than one variant.
    pub fn has_multiple_variants(&self, profile: &ProfileProperties) -> ProfileResult<bool> {
        Ok(self
            .table
            .gather_descs(profile, None)?
            .iter()
            .flat_map(|desc| desc.required_capabilities)
            .any(|capabilities| capabilities.variants.len() > 1))
    }

    pub fn instance_profile_support(
        &self,
        layer: Option<&ExtensionStr>,
        profile: &ProfileProperties,
    ) -> ProfileResult<bool> {
        Ok(self.instance_profile_variants_support(layer, profile)?.supported)
    }

    pub fn instance_profile_variants_support(
        &self,
        layer: Option<&ExtensionStr>,
        profile: &ProfileProperties,
    ) -> ProfileResult<SupportReport> {
        matcher::instance_support(&self.functions, self.table, layer, profile)
    }

    pub fn device_profile_support(
        &self,
        physical_device: vk::PhysicalDevice,
        profile: &ProfileProperties,
    ) -> ProfileResult<bool> {
        Ok(self.device_profile_variants_support(physical_device, profile)?.supported)
    }

    pub fn device_profile_variants_support(
        &self,
        physical_device: vk::PhysicalDevice,
        profile: &ProfileProperties,
    ) -> ProfileResult<SupportReport> {
        matcher::device_support(&self.functions, self.table, physical_device, profile)
    }

    pub fn instance_extensions(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>> {
        self.extensions(profile, block, |variant| variant.instance_extensions)
    }

    pub fn device_extensions(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
    ) -> ProfileResult<Vec<vk::ExtensionProperties>> {
        self.extensions(profile, block, |variant| variant.device_extensions)
    }

    fn extensions(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
        select: impl Fn(&VariantDesc) -> &'static [vk::ExtensionProperties],
    ) -> ProfileResult<Vec<vk::ExtensionProperties>> {
        let mut extensions: Vec<vk::ExtensionProperties> = Vec::new();
        for variant in self.table.select_variants(profile, block)? {
            for extension in select(variant) {
                if !extensions
                    .iter()
                    .any(|known| known.extension_name == extension.extension_name)
                {
                    extensions.push(*extension);
                }
            }
        }
        Ok(extensions)
    }

    pub fn feature_structure_types(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
    ) -> ProfileResult<Vec<vk::StructureType>> {
        self.structure_types(profile, block, StructKind::Feature)
    }

    pub fn property_structure_types(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
    ) -> ProfileResult<Vec<vk::StructureType>> {
        self.structure_types(profile, block, StructKind::Property)
    }

    pub fn format_structure_types(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
    ) -> ProfileResult<Vec<vk::StructureType>> {
        self.structure_types(profile, block, StructKind::Format)
    }

    /// Structure types the selected variants list for `kind`, deduplicated and sorted by value.
    fn structure_types(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
        kind: StructKind,
    ) -> ProfileResult<Vec<vk::StructureType>> {
        let mut types: Vec<vk::StructureType> = self
            .table
            .select_variants(profile, block)?
            .into_iter()
            .flat_map(|variant| match kind {
                StructKind::Feature => variant.feature_struct_types,
                StructKind::Property => variant.property_struct_types,
                StructKind::Format => variant.format_struct_types,
            })
            .copied()
            .collect();
        types.sort_by_key(|tag| tag.as_raw());
        types.dedup();
        Ok(types)
    }

    /// Formats the selected variants put requirements on, deduplicated and sorted by value.
    pub fn formats(&self, profile: &ProfileProperties, block: Option<&str>) -> ProfileResult<Vec<vk::Format>> {
        let mut formats: Vec<vk::Format> = self
            .table
            .select_variants(profile, block)?
            .into_iter()
            .flat_map(|variant| variant.formats.iter().map(|format| format.format))
            .collect();
        formats.sort_by_key(|format| format.as_raw());
        formats.dedup();
        Ok(formats)
    }

    /// Writes the feature values the profile requires into every record of `chain`.
    pub fn fill_features(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        for variant in self.table.select_variants(profile, block)? {
            chain.for_each_mut(|record| variant.feature.fill(record));
        }
        Ok(())
    }

    /// Writes the property values the profile requires into every record of `chain`.
    ///
    /// # Errors
    /// [`ProfileError::AmbiguousVariant`] when no block is named and the profile offers
    /// alternative variants, since their property values may contradict each other.
    pub fn fill_properties(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        if block.is_none() && self.has_multiple_variants(profile)? {
            return Err(ProfileError::AmbiguousVariant(profile.name.to_string()));
        }
        for variant in self.table.select_variants(profile, block)? {
            chain.for_each_mut(|record| variant.property.fill(record));
        }
        Ok(())
    }

    /// Writes the capabilities the profile requires for `format` into `chain`.
    ///
    /// `VkFormatProperties2` and `VkFormatProperties3` describe the same support with
    /// different widths, so the bits a profile fills into one are also set in the other.
    pub fn fill_format_properties(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
        format: vk::Format,
        chain: &mut StructChain,
    ) -> ProfileResult<()> {
        for variant in self.table.select_variants(profile, block)? {
            for desc in variant.formats.iter().filter(|desc| desc.format == format) {
                trace!("Filling {:?} from block `{}`", format, variant.block_name);
                chain.for_each_mut(|record| desc.desc.fill(record));
                mirror_format_bits(desc.desc, chain);
            }
        }
        Ok(())
    }

    pub fn create_instance(&mut self, config: &InstanceCreateConfig) -> ProfileResult<F::Instance> {
        factory::create_instance(&mut self.functions, self.table, config)
    }

    pub fn create_device(
        &self,
        physical_device: vk::PhysicalDevice,
        config: &DeviceCreateConfig,
    ) -> ProfileResult<F::Device> {
        debug!("Creating a profile device on {:?}", physical_device);
        factory::create_device(&self.functions, self.table, physical_device, config)
    }
}

/// What `desc` fills into a default-initialised `T`.
fn filled<T: ChainStruct>(desc: &dyn StructDesc) -> T {
    let mut record = T::default().into_capability();
    desc.fill(&mut record);
    T::from_capability(&record).copied().unwrap_or_default()
}

/// ORs the bits `desc` fills into `VkFormatProperties2` into the chain's `VkFormatProperties3`,
/// and back. Bits already in the chain stay where they are.
fn mirror_format_bits(desc: &dyn StructDesc, chain: &mut StructChain) {
    let narrow = filled::<vk::FormatProperties2>(desc).format_properties;
    let wide = filled::<vk::FormatProperties3>(desc);

    if let Some(properties3) = chain.get_mut::<vk::FormatProperties3>() {
        let widen = |bits: vk::FormatFeatureFlags| vk::FormatFeatureFlags2::from_bits_truncate(bits.bits() as u64);
        properties3.linear_tiling_features |= widen(narrow.linear_tiling_features);
        properties3.optimal_tiling_features |= widen(narrow.optimal_tiling_features);
        properties3.buffer_features |= widen(narrow.buffer_features);
    }
    if let Some(properties2) = chain.get_mut::<vk::FormatProperties2>() {
        let narrow_down =
            |bits: vk::FormatFeatureFlags2| vk::FormatFeatureFlags::from_bits_truncate(bits.bits() as u32);
        let properties = &mut properties2.format_properties;
        properties.linear_tiling_features |= narrow_down(wide.linear_tiling_features);
        properties.optimal_tiling_features |= narrow_down(wide.optimal_tiling_features);
        properties.buffer_features |= narrow_down(wide.buffer_features);
    }
}
