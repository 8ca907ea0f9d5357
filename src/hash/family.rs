// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::hash::Hash;
use std::hash::Hasher;
use std::iter::FusedIterator;
use std::slice;

use crate::hash::MurmurHash3X64128;
use crate::hash::ProcessSeeds;
use crate::hash::SeedSource;
use crate::hash::SplitMix64;

/// A family of independently seeded hash functions, one per sketch row.
///
/// Row `i` hashes an item with MurmurHash3 keyed by `seeds[i]`, so the output is a pure
/// function of the seed and of the bytes the item's [`Hash`] impl writes. Two families
/// with equal seeds agree on every item, which is what makes sketches built from them
/// mergeable.
///
/// # Examples
///
/// ```
/// use countmin::hash::HashFamily;
///
/// let family = HashFamily::from_seed(4, 9001);
/// assert_eq!(family.depth(), 4);
///
/// let buckets: Vec<usize> = family.buckets("apple", 128).collect();
/// assert_eq!(buckets.len(), 4);
/// assert!(buckets.iter().all(|&bucket| bucket < 128));
/// assert_eq!(buckets[2], (family.hash(2, "apple") % 128) as usize);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashFamily {
    seeds: Vec<u64>,
}

impl HashFamily {
    /// Creates `depth` hash functions seeded from the process-wide source.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    pub fn new(depth: usize) -> Self {
        Self::with_source(depth, &mut ProcessSeeds)
    }

    /// Creates `depth` hash functions whose seeds are derived from `seed`.
    ///
    /// The same `(depth, seed)` pair always yields the same family, across processes.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    pub fn from_seed(depth: usize, seed: u64) -> Self {
        Self::with_source(depth, &mut SplitMix64::seeded(seed))
    }

    /// Creates `depth` hash functions drawing their seeds from `source`.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    pub fn with_source<R: SeedSource + ?Sized>(depth: usize, source: &mut R) -> Self {
        Self::with_seeds((0..depth).map(|_| source.next_seed()).collect())
    }

    /// Creates one hash function per seed, using the seeds verbatim.
    ///
    /// Seeds are not required to be distinct, but repeated seeds produce rows that
    /// collide on exactly the same items and add nothing to the estimate.
    ///
    /// # Panics
    ///
    /// Panics if `seeds` is empty.
    pub fn with_seeds(seeds: Vec<u64>) -> Self {
        assert!(!seeds.is_empty(), "depth must be at least 1");
        Self { seeds }
    }

    /// Returns the number of hash functions.
    pub fn depth(&self) -> usize {
        self.seeds.len()
    }

    /// Returns the per-row seeds.
    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }

    /// Hashes `item` with the function of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not less than [`depth`](Self::depth).
    pub fn hash<T: Hash + ?Sized>(&self, row: usize, item: &T) -> u64 {
        let mut hasher = MurmurHash3X64128::with_seed(self.seeds[row]);
        item.hash(&mut hasher);
        hasher.finish()
    }

    /// Returns the bucket of `item` in every row, for rows of `width` buckets.
    ///
    /// Equivalent to `hash(row, item) % width` for each row in order, but the item is
    /// only fed through its [`Hash`] impl once.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    pub fn buckets<T: Hash + ?Sized>(&self, item: &T, width: usize) -> Buckets<'_> {
        assert!(width > 0, "width must be at least 1");
        let mut hasher = MurmurHash3X64128::with_seed(self.seeds[0]);
        item.hash(&mut hasher);
        Buckets {
            hasher,
            seeds: self.seeds.iter(),
            width: width as u64,
        }
    }
}

/// Iterator over the per-row buckets of one item, see [`HashFamily::buckets`].
#[derive(Debug, Clone)]
pub struct Buckets<'a> {
    hasher: MurmurHash3X64128,
    seeds: slice::Iter<'a, u64>,
    width: u64,
}

impl Iterator for Buckets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let seed = *self.seeds.next()?;
        self.hasher.reseed(seed);
        Some((self.hasher.finish() % self.width) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.seeds.size_hint()
    }
}

impl ExactSizeIterator for Buckets<'_> {}

impl FusedIterator for Buckets<'_> {}
