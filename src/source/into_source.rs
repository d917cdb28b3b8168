use super::Source;

/// Conversion into a [`Source`].
///
/// By implementing `IntoSource` for a type, you define how it will be
/// converted into a source when it is handed to a merge. The conversion
/// happens once, when the merge is constructed.
pub trait IntoSource {
    /// The type of the values being produced.
    type Item;

    /// The failure the source can settle with.
    type Error;

    /// Which kind of source are we turning this into?
    type IntoSource: Source<Item = Self::Item, Error = Self::Error>;

    /// Creates a source from a value.
    fn into_source(self) -> Self::IntoSource;
}

impl<S: Source> IntoSource for S {
    type Item = S::Item;
    type Error = S::Error;
    type IntoSource = S;

    #[inline]
    fn into_source(self) -> S {
        self
    }
}
