use std::fmt;
use vulkanalia::Version;

/// Packs a Vulkan API version the way `VK_MAKE_API_VERSION` does.
pub const fn make_api_version(variant: u32, major: u32, minor: u32, patch: u32) -> u32 {
    (variant << 29) | (major << 22) | (minor << 12) | patch
}

pub const fn api_version_major(version: u32) -> u32 {
    (version >> 22) & 0x7F
}

pub const fn api_version_minor(version: u32) -> u32 {
    (version >> 12) & 0x3FF
}

pub const fn api_version_patch(version: u32) -> u32 {
    version & 0xFFF
}

pub const API_VERSION_1_0: u32 = make_api_version(0, 1, 0, 0);
pub const API_VERSION_1_1: u32 = make_api_version(0, 1, 1, 0);
pub const API_VERSION_1_2: u32 = make_api_version(0, 1, 2, 0);
pub const API_VERSION_1_3: u32 = make_api_version(0, 1, 3, 0);

/// Checks `actual` against a profile minimum.
///
/// Only major and minor take part: drivers report whatever patch level they were
/// built against, and a profile never needs a specific one.
pub fn meets_minimum(actual: u32, minimum: u32) -> bool {
    let (actual_major, actual_minor) = (api_version_major(actual), api_version_minor(actual));
    let (min_major, min_minor) = (api_version_major(minimum), api_version_minor(minimum));
    actual_major > min_major || (actual_major == min_major && actual_minor >= min_minor)
}

/// Takes the higher of major, minor and patch separately, so `1.2.0` and `1.1.5` give `1.2.5`.
pub fn max_components(a: u32, b: u32) -> u32 {
    make_api_version(
        0,
        api_version_major(a).max(api_version_major(b)),
        api_version_minor(a).max(api_version_minor(b)),
        api_version_patch(a).max(api_version_patch(b)),
    )
}

/// Converts the loader version reported by [`vulkanalia::Entry::version`].
pub fn from_loader(version: Version) -> u32 {
    make_api_version(0, version.major, version.minor, version.patch)
}

/// Display adapter, `1.3.216`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion(pub u32);

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            api_version_major(self.0),
            api_version_minor(self.0),
            api_version_patch(self.0)
        )
    }
}
