use std::{iter::Cloned, slice::Iter};

/// Iterate slices by value.
pub trait SliceExtensions<T: Clone> {
    fn clones(&self) -> Cloned<Iter<'_, T>>;
}

impl<T: Clone> SliceExtensions<T> for [T] {
    #[inline]
    fn clones(&self) -> Cloned<Iter<'_, T>> {
        self.iter().cloned()
    }
}
