//! Mathematical utility functions with zero-division guards

/// Calculate percentage safely for usize values, returning 0.0 if total is zero.
///
/// # Examples
/// ```
/// use coinjoin_scanner::utils::math::safe_percentage;
///
/// assert_eq!(safe_percentage(50, 100), 50.0);
/// assert_eq!(safe_percentage(1, 4), 25.0);
/// assert_eq!(safe_percentage(50, 0), 0.0);  // Zero-division guard
/// ```
#[inline]
pub fn safe_percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Calculate percentage safely for u64 values, returning 0.0 if total is zero.
///
/// # Examples
/// ```
/// use coinjoin_scanner::utils::math::safe_percentage_u64;
///
/// assert_eq!(safe_percentage_u64(50, 100), 50.0);
/// assert_eq!(safe_percentage_u64(50, 0), 0.0);  // Zero-division guard
/// ```
#[inline]
pub fn safe_percentage_u64(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
