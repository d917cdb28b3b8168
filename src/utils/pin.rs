use core::pin::Pin;

/// Iterate over the pinned elements of a pinned `Vec`.
pub(crate) fn iter_pin_mut_vec<T>(vec: Pin<&mut Vec<T>>) -> impl Iterator<Item = Pin<&mut T>> {
    // SAFETY: `std` _could_ make this unsound if it were to decide Pin's
    // invariants aren't required to transmit through slices. Otherwise this has
    // the same safety as a normal field pin projection.
    unsafe { vec.get_unchecked_mut() }
        .iter_mut()
        .map(|t| unsafe { Pin::new_unchecked(t) })
}

/// Returns a pinned mutable reference to the element at `index`, or `None` if
/// the index is out of bounds.
#[inline]
pub(crate) fn get_pin_mut_from_vec<T>(vec: Pin<&mut Vec<T>>, index: usize) -> Option<Pin<&mut T>> {
    // SAFETY: `get_unchecked_mut` is never used to move the elements inside the
    // vec, and the vec is never resized while it is pinned. `x` is guaranteed
    // to be pinned because it comes from `vec` which is pinned.
    unsafe {
        vec.get_unchecked_mut()
            .get_mut(index)
            .map(|x| Pin::new_unchecked(x))
    }
}
