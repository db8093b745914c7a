use std::hash::BuildHasher;

use crate::dict::FixedDict;

/// Iterator over the live `(key, value)` records of a [`FixedDict`].
///
/// Tombstoned and never-used slots are skipped; slices borrow the
/// dictionary's record arena.
pub struct Iter<'a, S> {
    dict: &'a FixedDict<S>,
    index: usize,
    remaining: usize,
}

impl<'a, S: BuildHasher> Iter<'a, S> {
    pub(crate) fn new(dict: &'a FixedDict<S>) -> Self {
        Self {
            dict,
            index: 0,
            remaining: dict.len(),
        }
    }
}

impl<'a, S: BuildHasher> Iterator for Iter<'a, S> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        while self.index < self.dict.capacity() {
            let idx = self.index;
            self.index += 1;
            if self.dict.is_live(idx) {
                self.remaining -= 1;
                return Some((self.dict.key_at(idx), self.dict.value_at(idx)));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: BuildHasher> ExactSizeIterator for Iter<'_, S> {
    fn len(&self) -> usize {
        self.remaining
    }
}
