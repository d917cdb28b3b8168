use super::{from_iter, vec, Merge as MergeTrait, Mode};
use crate::source::IntoSource;

impl<S, const N: usize> MergeTrait for [S; N]
where
    S: IntoSource,
{
    type Item = S::Item;
    type Error = S::Error;
    type Source = vec::Merge<S::IntoSource>;

    fn merge_with(self, mode: Mode) -> Self::Source {
        from_iter(mode, self)
    }
}

#[cfg(test)]
mod tests {
    use crate::merge::{Merge, Mode};
    use crate::source::{self, SourceExt};
    use futures_lite::future::block_on;

    #[test]
    fn merge_array_4() {
        block_on(async {
            let a = source::iter::<_, ()>([1]);
            let b = source::iter::<_, ()>([2]);
            let c = source::iter::<_, ()>([3]);
            let d = source::iter::<_, ()>([4]);
            let mut s = [a, b, c, d].merge_with(Mode::StopAndWait);
            assert_eq!(s.mode(), Mode::StopAndWait);

            let mut counter = 0;
            while let Some(n) = s.next().await {
                counter += n.unwrap();
            }
            assert_eq!(counter, 10);
        })
    }

    #[test]
    fn merge_empty_array() {
        block_on(async {
            let sources: [source::Iter<std::vec::IntoIter<u8>, ()>; 0] = [];
            let mut s = sources.merge();
            assert_eq!(s.next().await, None);
        })
    }
}
