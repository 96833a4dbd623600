use thiserror::Error;
use vulkanalia::vk;

/// Result alias used across the profile queries.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// # Profile Errors
/// Closed set of failures a profile query or a profile-aware creation can report.
///
/// # Details
/// Failures coming from Vulkan itself are kept as [`vk::ErrorCode`] inside
/// [`ProfileError::Vulkan`], tagged with the entry point that produced them, so the
/// caller can walk the source chain the same way the binary does.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile name is not compiled into this build.
    #[error("Unknown profile `{0}`")]
    NotFound(String),
    /// A block name was given but no variant of the profile carries it.
    #[error("Profile `{profile}` has no block named `{block}`")]
    BlockNotFound { profile: String, block: String },
    /// A required extension is missing (`VK_ERROR_EXTENSION_NOT_PRESENT`).
    #[error("Extension `{0}` is not present")]
    ExtensionNotPresent(String),
    /// A required entry point is missing (`VK_ERROR_INITIALIZATION_FAILED`).
    #[error("Initialization failed: {0}")]
    InitializationFailed(&'static str),
    /// Properties of a multi-variant profile were requested without naming a block.
    #[error("Profile `{0}` has several variants, a block name is required")]
    AmbiguousVariant(String),
    /// A structure type that has no entry in the capability registry.
    #[error("Structure type {0:?} is not registered")]
    UnregisteredStructure(vk::StructureType),
    /// A Vulkan call returned an error code.
    #[error("`{call}` failed")]
    Vulkan {
        call: &'static str,
        #[source]
        source: vk::ErrorCode,
    },
}

impl ProfileError {
    /// The closest Vulkan result code, for callers that forward errors through a C ABI.
    pub fn result_code(&self) -> vk::Result {
        match self {
            ProfileError::ExtensionNotPresent(_) => vk::Result::ERROR_EXTENSION_NOT_PRESENT,
            ProfileError::InitializationFailed(_) => vk::Result::ERROR_INITIALIZATION_FAILED,
            ProfileError::BlockNotFound { .. } => vk::Result::INCOMPLETE,
            ProfileError::Vulkan { source, .. } => vk::Result::from_raw(source.as_raw()),
            _ => vk::Result::ERROR_UNKNOWN,
        }
    }
}

/// Wraps a failing Vulkan call into [`ProfileError::Vulkan`].
///
/// Meant for `map_err`: `unsafe { f() }.map_err(vk_call("vkCreateDevice"))?`.
pub(crate) fn vk_call(call: &'static str) -> impl FnOnce(vk::ErrorCode) -> ProfileError {
    move |source| ProfileError::Vulkan { call, source }
}
