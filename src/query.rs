//! Filtering collections with a [`Specification`].
//!
//! Nothing here mutates the collection or its elements, and evaluation only
//! reads, so a single specification can serve many threads at once.

// query selections are kept as positions in a roaring bitmap
use roaring::RoaringBitmap;
use tracing::trace;

use crate::specification::Specification;

#[derive(Clone, Copy, Default, Debug)]
pub struct QueryEngine;

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Every item satisfying `spec`, in input order. The result is a `Vec`,
    /// so it can be iterated as often as needed.
    pub fn filter<'a, T, S, I>(&self, collection: I, spec: &S) -> Vec<&'a T>
    where
        T: ?Sized + 'a,
        S: Specification<T> + ?Sized,
        I: IntoIterator<Item = &'a T>,
    {
        filter(collection, spec)
    }

    /// Like [`QueryEngine::filter`], but lazy. The iterator is single-pass.
    pub fn filter_lazy<'a, 's, T, S, I>(
        &self,
        collection: I,
        spec: &'s S,
    ) -> impl Iterator<Item = &'a T> + use<'a, 's, T, S, I>
    where
        T: ?Sized + 'a,
        S: Specification<T> + ?Sized,
        I: IntoIterator<Item = &'a T>,
    {
        filter_lazy(collection, spec)
    }

    /// Positions of the matching items. Selections over the same collection
    /// combine with `&` and `|`.
    pub fn select<'a, T, S, I>(&self, collection: I, spec: &S) -> RoaringBitmap
    where
        T: ?Sized + 'a,
        S: Specification<T> + ?Sized,
        I: IntoIterator<Item = &'a T>,
    {
        select(collection, spec)
    }

    pub fn count<'a, T, S, I>(&self, collection: I, spec: &S) -> usize
    where
        T: ?Sized + 'a,
        S: Specification<T> + ?Sized,
        I: IntoIterator<Item = &'a T>,
    {
        filter_lazy(collection, spec).count()
    }
}

pub fn filter<'a, T, S, I>(collection: I, spec: &S) -> Vec<&'a T>
where
    T: ?Sized + 'a,
    S: Specification<T> + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    let matched: Vec<&'a T> = filter_lazy(collection, spec).collect();
    trace!(matched = matched.len(), "collection filtered");
    matched
}

pub fn filter_lazy<'a, 's, T, S, I>(
    collection: I,
    spec: &'s S,
) -> impl Iterator<Item = &'a T> + use<'a, 's, T, S, I>
where
    T: ?Sized + 'a,
    S: Specification<T> + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    collection
        .into_iter()
        .filter(move |item| spec.is_satisfied(item))
}

// positions past u32::MAX cannot be held by the bitmap and are left out
pub fn select<'a, T, S, I>(collection: I, spec: &S) -> RoaringBitmap
where
    T: ?Sized + 'a,
    S: Specification<T> + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    collection
        .into_iter()
        .enumerate()
        .filter(|(_, item)| spec.is_satisfied(item))
        .filter_map(|(position, _)| u32::try_from(position).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::Predicate;

    #[test]
    fn filter_preserves_order_and_is_reiterable() {
        let numbers = vec![5, 2, 8, 1, 9];
        let big = Predicate(|n: &i32| *n > 4);
        let matched = QueryEngine::new().filter(&numbers, &big);
        assert_eq!(matched, vec![&5, &8, &9]);
        assert_eq!(matched.iter().count(), matched.iter().count());
        assert_eq!(numbers, vec![5, 2, 8, 1, 9]);
    }

    #[test]
    fn selections_combine() {
        let numbers = [1, 2, 3, 4, 5, 6];
        let even = select(&numbers, &Predicate(|n: &i32| n % 2 == 0));
        let big = select(&numbers, &Predicate(|n: &i32| *n > 3));
        let both: Vec<u32> = (&even & &big).iter().collect();
        assert_eq!(both, vec![3, 5]);
        assert_eq!(QueryEngine::new().count(&numbers, &Predicate(|n: &i32| *n > 3)), 3);
    }

    #[test]
    fn lazy_filter_is_single_pass() {
        let words = ["a", "bb", "ccc"];
        let long = Predicate(|w: &str| w.len() > 1);
        let mut lazy = filter_lazy(words.iter().copied(), &long);
        assert_eq!(lazy.next(), Some("bb"));
        assert_eq!(lazy.next(), Some("ccc"));
        assert_eq!(lazy.next(), None);
    }
}
