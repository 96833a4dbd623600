//! Static profile descriptions and the lookups over them.
pub mod checks;
pub mod table;

use crate::chain::Capability;
use crate::errors::{ProfileError, ProfileResult};
use crate::version::max_components;
use std::borrow::Cow;
use std::fmt;
use vulkanalia::vk;

/// Name and revision of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileProperties {
    pub name: Cow<'static, str>,
    pub spec_version: u32,
}

impl ProfileProperties {
    pub const fn new(name: &'static str, spec_version: u32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            spec_version,
        }
    }

    pub fn named(name: impl Into<String>, spec_version: u32) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            spec_version,
        }
    }
}

impl fmt::Display for ProfileProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (rev {})", self.name, self.spec_version)
    }
}

/// A profile, or one named block of it when `block_name` is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockProperties {
    pub profile: ProfileProperties,
    pub api_version: u32,
    pub block_name: Cow<'static, str>,
}

impl BlockProperties {
    /// The whole profile, every block included.
    pub fn whole(profile: ProfileProperties) -> Self {
        Self {
            profile,
            api_version: 0,
            block_name: Cow::Borrowed(""),
        }
    }

    pub fn block(profile: ProfileProperties, block_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            profile,
            api_version: 0,
            block_name: block_name.into(),
        }
    }

    pub(crate) fn selects(&self, variant: &VariantDesc) -> bool {
        self.block_name.is_empty() || self.block_name == variant.block_name
    }
}

impl fmt::Display for BlockProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.block_name.is_empty() {
            write!(f, "{}", self.profile.name)
        } else {
            write!(f, "{}::{}", self.profile.name, self.block_name)
        }
    }
}

/// # Struct Description
/// The filler/comparator pair a variant attaches to its feature, property or format structures.
///
/// # Details
/// Both operations dispatch on the record's tag and leave records they do not know about
/// untouched (`compare` returns `true` for them).
pub trait StructDesc: Sync {
    /// Writes the values the profile requires into `target`.
    fn fill(&self, target: &mut Capability);
    /// Checks the values a device reported against the profile's requirements.
    fn compare(&self, actual: &Capability) -> bool;
}

/// Description for variants that put no requirement on a kind of structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRequirements;

impl StructDesc for NoRequirements {
    fn fill(&self, _target: &mut Capability) {}

    fn compare(&self, _actual: &Capability) -> bool {
        true
    }
}

/// Format requirement of a variant, bound to one `VkFormat`.
pub struct FormatDesc {
    pub format: vk::Format,
    pub desc: &'static dyn StructDesc,
}

/// One alternative way of satisfying a capability set.
pub struct VariantDesc {
    pub block_name: &'static str,
    pub instance_extensions: &'static [vk::ExtensionProperties],
    pub device_extensions: &'static [vk::ExtensionProperties],
    pub feature_struct_types: &'static [vk::StructureType],
    pub feature: &'static dyn StructDesc,
    pub property_struct_types: &'static [vk::StructureType],
    pub property: &'static dyn StructDesc,
    pub format_struct_types: &'static [vk::StructureType],
    pub formats: &'static [FormatDesc],
}

impl VariantDesc {
    /// A variant with no requirements at all, to be completed with struct update syntax.
    pub const EMPTY: VariantDesc = VariantDesc {
        block_name: "",
        instance_extensions: &[],
        device_extensions: &[],
        feature_struct_types: &[],
        feature: &NoRequirements,
        property_struct_types: &[],
        property: &NoRequirements,
        format_struct_types: &[],
        formats: &[],
    };
}

/// Satisfied when any of its variants is.
pub struct CapabilitiesDesc {
    pub variants: &'static [VariantDesc],
}

pub struct ProfileDesc {
    pub props: ProfileProperties,
    pub min_api_version: u32,
    pub required_profiles: &'static [ProfileProperties],
    pub required_capabilities: &'static [CapabilitiesDesc],
    pub fallbacks: &'static [ProfileProperties],
}

impl ProfileDesc {
    pub fn variants(&self) -> impl Iterator<Item = &'static VariantDesc> + '_ {
        self.required_capabilities.iter().flat_map(|caps| caps.variants.iter())
    }
}

/// A set of compiled profiles.
#[derive(Clone, Copy)]
pub struct ProfileTable {
    profiles: &'static [ProfileDesc],
}

impl ProfileTable {
    pub const fn new(profiles: &'static [ProfileDesc]) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &'static [ProfileDesc] {
        self.profiles
    }

    pub fn find(&self, name: &str) -> Option<&'static ProfileDesc> {
        self.profiles.iter().find(|desc| desc.props.name == name)
    }

    pub fn get(&self, name: &str) -> ProfileResult<&'static ProfileDesc> {
        self.find(name).ok_or_else(|| ProfileError::NotFound(name.to_owned()))
    }

    /// The profile's required profiles followed by the profile itself.
    ///
    /// Required profiles are left out when a block is named, since a block belongs to a
    /// single profile.
    pub fn gather(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
    ) -> ProfileResult<Vec<ProfileProperties>> {
        let mut gathered = Vec::new();
        if block.is_none() {
            gathered.extend(self.get(&profile.name)?.required_profiles.iter().cloned());
        }
        gathered.push(profile.clone());
        Ok(gathered)
    }

    /// Resolves gathered profiles to their descriptions.
    pub fn gather_descs(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
    ) -> ProfileResult<Vec<&'static ProfileDesc>> {
        self.gather(profile, block)?
            .iter()
            .map(|gathered| self.get(&gathered.name))
            .collect()
    }

    /// Full profiles expand to their gathered profiles, explicit blocks are appended as given.
    pub fn gather_blocks(
        &self,
        full_profiles: &[ProfileProperties],
        blocks: &[BlockProperties],
    ) -> ProfileResult<Vec<BlockProperties>> {
        let mut gathered = Vec::new();
        for profile in full_profiles {
            for profile in self.gather(profile, None)? {
                gathered.push(BlockProperties::whole(profile));
            }
        }
        gathered.extend(blocks.iter().cloned());
        Ok(gathered)
    }

    /// Variants of `block`'s profile that the block selects.
    ///
    /// # Errors
    /// [`ProfileError::BlockNotFound`] when a block name is given and no variant carries it.
    pub fn block_variants(&self, block: &BlockProperties) -> ProfileResult<Vec<&'static VariantDesc>> {
        let desc = self.get(&block.profile.name)?;
        let variants: Vec<_> = desc.variants().filter(|variant| block.selects(variant)).collect();
        if variants.is_empty() && !block.block_name.is_empty() {
            return Err(ProfileError::BlockNotFound {
                profile: block.profile.name.to_string(),
                block: block.block_name.to_string(),
            });
        }
        Ok(variants)
    }

    /// Variants selected by `block` across the profile and, without a block, its required
    /// profiles.
    pub fn select_variants(
        &self,
        profile: &ProfileProperties,
        block: Option<&str>,
    ) -> ProfileResult<Vec<&'static VariantDesc>> {
        let mut selected = Vec::new();
        for gathered in self.gather(profile, block)? {
            let block = match block {
                Some(name) => BlockProperties::block(gathered, name.to_owned()),
                None => BlockProperties::whole(gathered),
            };
            selected.extend(self.block_variants(&block)?);
        }
        Ok(selected)
    }

    /// Lowest API version that satisfies the profile and its required profiles.
    ///
    /// Major, minor and patch are maximised separately.
    pub fn api_version(&self, profile: &ProfileProperties) -> ProfileResult<u32> {
        Ok(self
            .gather_descs(profile, None)?
            .iter()
            .fold(0, |version, desc| max_components(version, desc.min_api_version)))
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::new(table::PROFILES)
    }
}

impl fmt::Debug for ProfileTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.profiles.iter().map(|desc| &desc.props))
            .finish()
    }
}
