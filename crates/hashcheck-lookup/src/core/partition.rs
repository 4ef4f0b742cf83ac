/// Split `items` into consecutive chunks of at most `size`, preserving order.
///
/// Only the last chunk may be shorter. A `size` of zero is treated as one.
///
/// # Examples
///
/// ```
/// use hashcheck_lookup::core::partition;
///
/// let sizes: Vec<usize> = partition(&[0u8; 250], 100).iter().map(|b| b.len()).collect();
/// assert_eq!(sizes, [100, 100, 50]);
/// ```
pub fn partition<T>(items: &[T], size: usize) -> Vec<&[T]> { items.chunks(size.max(1)).collect() }
