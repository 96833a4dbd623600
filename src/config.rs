use bitflags::bitflags;

pub(crate) const VALIDATION_ENABLED: bool = cfg!(feature = "validation");
pub(crate) const API_DUMP_ENABLED: bool = cfg!(feature = "api_dump");

bitflags! {
    /// Opt-outs applied to the merged feature chain right before `vkCreateDevice`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceCreateFlags: u32 {
        /// Forces `robustBufferAccess` and `robustBufferAccess2` off.
        const DISABLE_ROBUST_BUFFER_ACCESS = 1 << 0;
        /// Forces `robustImageAccess` and `robustImageAccess2` off.
        const DISABLE_ROBUST_IMAGE_ACCESS = 1 << 1;
        const DISABLE_ROBUST_ACCESS =
            Self::DISABLE_ROBUST_BUFFER_ACCESS.bits() | Self::DISABLE_ROBUST_IMAGE_ACCESS.bits();
    }
}
