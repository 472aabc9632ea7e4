/// Alignment used by callers that pad to 2 KiB sector boundaries.
pub const DEFAULT_ALIGNMENT: u64 = 2048;

/// Returns the number of padding bytes needed to advance `position` to the next multiple of
/// `alignment`. Returns 0 if `position` is already aligned.
///
/// This does no I/O, so it can be used to predict output offsets before anything is written.
/// An `alignment` of 0 or 1 never requires padding.
///
/// ```
/// use binary_tools::calc_align;
/// assert_eq!(calc_align(0, 2048), 0);
/// assert_eq!(calc_align(1, 2048), 2047);
/// assert_eq!(calc_align(13, 4), 3);
/// ```
pub const fn calc_align(position: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return 0;
    }
    let remainder = position % alignment;
    if remainder > 0 {
        alignment - remainder
    } else {
        0
    }
}
