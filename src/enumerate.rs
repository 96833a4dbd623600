//! Vulkan's two-call enumeration convention over owned lists.
use vulkanalia::vk;

/// Copies `items` into `out` the way `vkEnumerate*` functions fill their arrays.
///
/// Without an output buffer the full count is returned. With one, as many items as fit are
/// copied and the written count is returned, together with [`vk::SuccessCode::INCOMPLETE`]
/// when the buffer was too short.
pub fn fill<T: Clone>(items: &[T], out: Option<&mut [T]>) -> (usize, vk::SuccessCode) {
    let Some(out) = out else {
        return (items.len(), vk::SuccessCode::SUCCESS);
    };
    let written = out.len().min(items.len());
    out[..written].clone_from_slice(&items[..written]);
    let code = if written < items.len() {
        vk::SuccessCode::INCOMPLETE
    } else {
        vk::SuccessCode::SUCCESS
    };
    (written, code)
}
