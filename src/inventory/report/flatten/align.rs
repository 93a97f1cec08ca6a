/// Pairs two lists by position, padding the shorter one with its placeholder.
///
/// The result always has `max(left.len(), right.len())` entries. Items that
/// end up on the same row are not otherwise related.
pub fn align<T: Clone, U: Clone>(
    left: Vec<T>,
    right: Vec<U>,
    placeholder_left: T,
    placeholder_right: U,
) -> Vec<(T, U)> {
    let len = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();

    (0..len)
        .map(|_| {
            (
                left.next().unwrap_or_else(|| placeholder_left.clone()),
                right.next().unwrap_or_else(|| placeholder_right.clone()),
            )
        })
        .collect()
}
