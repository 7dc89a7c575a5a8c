use crate::errors::{CircuitError, CircuitResult};

/// Flips the bits in `num` from `i`th position to `(n-i)`th position.
///
/// # Example
///
/// ```
/// use qarith::utils::flip_bits;
///
/// assert_eq!(flip_bits(3, 0b100), 0b001);
/// assert_eq!(flip_bits(3, 0b010), 0b010);
/// assert_eq!(flip_bits(4, 0b1010), 0b0101);
/// ```
#[inline]
pub fn flip_bits(n: usize, num: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let leading_zeros = usize::BITS as usize - n;
    num.reverse_bits() >> leading_zeros
}

/// Set the `bit_index` bit in `num` to `value`.
///
/// # Example
/// ```
/// use qarith::utils::set_bit;
/// assert_eq!(set_bit(0, 1, true), 2);
/// assert_eq!(set_bit(1, 1, true), 3);
/// assert_eq!(set_bit(1, 0, false), 0);
/// ```
#[inline]
pub fn set_bit(num: usize, bit_index: usize, value: bool) -> usize {
    let v = 1 << bit_index;
    if value {
        num | v
    } else {
        num & !v
    }
}

/// Get the `bit_index` bit value from `num`.
///
/// # Example
/// ```
/// use qarith::utils::get_bit;
/// assert!(get_bit(2, 1));
/// assert!(!get_bit(2, 0));
/// ```
#[inline]
pub fn get_bit(num: usize, bit_index: usize) -> bool {
    ((num >> bit_index) & 1) != 0
}

/// Extracts bits from a number in a particular order.
///
/// # Example
///
/// ```
/// use qarith::utils::extract_bits;
///
/// assert_eq!(extract_bits(0b1010, &[3, 0]), 0b01);
/// ```
#[inline]
pub fn extract_bits(num: usize, indices: &[usize]) -> usize {
    indices.iter().enumerate().fold(0, |acc, (i, index)| {
        let bit = (num >> index) & 1;
        acc | (bit << i)
    })
}

/// Check that `value` can be written with `width` bits. Widths beyond `usize::BITS` are rejected.
pub fn check_width(value: usize, width: usize) -> CircuitResult<()> {
    let bits = usize::BITS as usize;
    if width > bits || (width < bits && value >> width != 0) {
        Err(CircuitError::ValueTooWide { value, width })
    } else {
        Ok(())
    }
}

/// The bits of `value` over `width` positions, most significant bit first.
///
/// # Example
/// ```
/// use qarith::utils::bits_msb_first;
///
/// assert_eq!(bits_msb_first(6, 4).unwrap(), vec![false, true, true, false]);
/// assert!(bits_msb_first(16, 4).is_err());
/// ```
pub fn bits_msb_first(value: usize, width: usize) -> CircuitResult<Vec<bool>> {
    check_width(value, width)?;
    Ok((0..width).map(|i| get_bit(value, width - 1 - i)).collect())
}

/// Number of bits needed to write `value`, at least one.
///
/// # Example
/// ```
/// use qarith::utils::bit_width;
///
/// assert_eq!(bit_width(0), 1);
/// assert_eq!(bit_width(16), 5);
/// assert_eq!(bit_width(15), 4);
/// ```
pub fn bit_width(value: usize) -> usize {
    (usize::BITS - value.leading_zeros()).max(1) as usize
}
