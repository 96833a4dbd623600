//! Comparison helpers the profile comparators are written with.

/// Every bit of `expected` is set in `actual`. Takes raw masks, call with `.bits()`.
pub fn check_flags(actual: u32, expected: u32) -> bool {
    actual & expected == expected
}

/// `value` is a multiple of `multiple`, within a small tolerance for float limits.
pub fn is_multiple(value: f64, multiple: f64) -> bool {
    (value % multiple).abs() < 0.0001
}

/// `value` is integral and a power of two. Zero counts, as it does for Vulkan limits.
pub fn is_power_of_two(value: f64) -> bool {
    if value.fract() != 0.0 || value < 0.0 {
        return false;
    }
    let value = value as u64;
    value & value.wrapping_sub(1) == 0
}
