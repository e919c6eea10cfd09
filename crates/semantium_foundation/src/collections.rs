//! Persistent list for call parameters.
//!
//! Every chain element keeps its parameter list, and every fork replays
//! those elements into a new chain, so parameter lists are cloned often.
//! The wrapper clones in O(1) by sharing structure through `im`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

/// Ordered parameter list.
#[derive(Clone, Default)]
pub struct LtVec<T: Clone>(im::Vector<T>);

impl<T: Clone> LtVec<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self(im::Vector::new())
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    /// The first item, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.0.front()
    }

    /// The last item, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.0.back()
    }

    /// A copy of this list with `value` added at the end. `self` is left
    /// as it was.
    #[must_use]
    pub fn push_back(&self, value: T) -> Self {
        let mut extended = self.clone();
        extended.0.push_back(value);
        extended
    }

    /// Iterates the items in order.
    pub fn iter(&self) -> im::vector::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for LtVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

impl<T: Clone + PartialEq> PartialEq for LtVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Clone + Eq> Eq for LtVec<T> {}

impl<T: Clone + Hash> Hash for LtVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        self.iter().for_each(|item| item.hash(state));
    }
}

impl<T: Clone> FromIterator<T> for LtVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Clone> From<Vec<T>> for LtVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self(im::Vector::from(items))
    }
}

impl<'a, T: Clone> IntoIterator for &'a LtVec<T> {
    type Item = &'a T;
    type IntoIter = im::vector::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
