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

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::countmin::CountMinValue;
use crate::error::Error;
use crate::hash::HashFamily;

// Added to the norm product so an all-zero row scores 0 instead of NaN.
const SIMILARITY_EPSILON: f64 = 1e-6;

/// Count-Min sketch for estimating item frequencies over a stream.
///
/// The sketch is a `depth x width` grid of counters. Every row has its own seeded hash
/// function; an update adds to one bucket per row and an estimate takes the minimum of
/// the item's buckets. Collisions only ever inflate buckets, so without subtraction the
/// estimate is never below the true count.
///
/// `T` is the item type and `C` the counter type. Counters saturate at `C::MAX` rather
/// than wrap, so pick a counter wide enough for the heaviest expected item.
///
/// The sketch has no internal synchronization. Share it behind a lock, or give each
/// thread its own sketch built from the same seeds and [`merge`](Self::merge) them.
///
/// # Examples
///
/// ```
/// use countmin::countmin::CountMinSketch;
///
/// let mut sketch = CountMinSketch::<str>::with_seed(256, 4, 9001);
/// sketch.update("apple");
/// sketch.update_with_weight("banana", 3);
///
/// assert!(sketch.estimate("banana") >= 3);
/// assert_eq!(sketch.estimate("cherry"), 0);
/// ```
pub struct CountMinSketch<T: ?Sized, C: CountMinValue = u64> {
    width: usize,
    depth: usize,
    total_weight: C,
    counters: Vec<C>,
    hash_family: HashFamily,
    _item: PhantomData<fn(&T)>,
}

impl<T: ?Sized, C: CountMinValue> CountMinSketch<T, C> {
    /// Creates a sketch with `width` buckets per row and `depth` rows, seeded from the
    /// process-wide random source.
    ///
    /// Two sketches created this way have unrelated hash functions and cannot be
    /// meaningfully merged; use [`with_seed`](Self::with_seed) for that.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `depth` is zero.
    pub fn new(width: usize, depth: usize) -> Self {
        assert!(width > 0, "width must be at least 1");
        assert!(depth > 0, "depth must be at least 1");
        Self::with_hash_family(width, HashFamily::new(depth))
    }

    /// Creates a sketch whose row seeds are derived from `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `depth` is zero.
    pub fn with_seed(width: usize, depth: usize, seed: u64) -> Self {
        assert!(width > 0, "width must be at least 1");
        assert!(depth > 0, "depth must be at least 1");
        Self::with_hash_family(width, HashFamily::from_seed(depth, seed))
    }

    /// Creates a sketch with one row per seed.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or `seeds` is empty.
    pub fn with_seeds(width: usize, seeds: Vec<u64>) -> Self {
        assert!(width > 0, "width must be at least 1");
        Self::with_hash_family(width, HashFamily::with_seeds(seeds))
    }

    /// Creates a sketch indexed by an existing hash family, one row per function.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or the counter grid does not fit in memory.
    pub fn with_hash_family(width: usize, hash_family: HashFamily) -> Self {
        assert!(width > 0, "width must be at least 1");
        let depth = hash_family.depth();
        let Some(len) = counter_len::<C>(width, depth) else {
            panic!("sketch of {depth}x{width} counters is too large");
        };
        Self {
            width,
            depth,
            total_weight: C::ZERO,
            counters: vec![C::ZERO; len],
            hash_family,
            _item: PhantomData,
        }
    }

    /// Suggests the number of buckets per row for a target relative error.
    ///
    /// With `width = ceil(e / relative_error)`, an estimate exceeds the true count by
    /// more than `relative_error * total_weight` only with small probability.
    ///
    /// # Panics
    ///
    /// Panics if `relative_error` is not in `(0, 1)`.
    pub fn suggest_width(relative_error: f64) -> usize {
        assert!(
            relative_error > 0.0 && relative_error < 1.0,
            "relative_error must be in (0, 1)"
        );
        (std::f64::consts::E / relative_error).ceil() as usize
    }

    /// Suggests the number of rows for a target confidence.
    ///
    /// With `depth = ceil(ln(1 / (1 - confidence)))`, the error bound of
    /// [`suggest_width`](Self::suggest_width) holds with probability `confidence`.
    ///
    /// # Panics
    ///
    /// Panics if `confidence` is not in `(0, 1)`.
    pub fn suggest_depth(confidence: f64) -> usize {
        assert!(
            confidence > 0.0 && confidence < 1.0,
            "confidence must be in (0, 1)"
        );
        // ln(1 / (1 - c)) == -ln_1p(-c), which stays positive for tiny confidences.
        ((-(-confidence).ln_1p()).ceil() as usize).max(1)
    }

    /// Returns the number of buckets per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows, which is also the number of hash functions.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the total weight inserted, net of subtractions.
    pub fn total_weight(&self) -> C {
        self.total_weight
    }

    /// Returns true if no weight is held by the sketch.
    pub fn is_empty(&self) -> bool {
        self.total_weight == C::ZERO
    }

    /// Returns the hash family indexing the rows.
    pub fn hash_family(&self) -> &HashFamily {
        &self.hash_family
    }

    /// Returns the per-row hash seeds.
    pub fn seeds(&self) -> &[u64] {
        self.hash_family.seeds()
    }

    /// Returns the counters of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not less than [`depth`](Self::depth).
    pub fn row(&self, row: usize) -> &[C] {
        assert!(row < self.depth, "row {row} out of range for depth {}", self.depth);
        let start = row * self.width;
        &self.counters[start..start + self.width]
    }

    /// Returns an iterator over all rows, in row order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[C]> + '_ {
        self.counters.chunks_exact(self.width)
    }

    /// Returns the relative error `e / width` of the estimates.
    pub fn relative_error(&self) -> f64 {
        std::f64::consts::E / self.width as f64
    }

    /// Returns true if both sketches have the same dimensions.
    ///
    /// This is all [`merge`](Self::merge), [`subtract`](Self::subtract) and
    /// [`cosine_similarity`](Self::cosine_similarity) check. Results are only meaningful
    /// if the sketches also share their seeds, see
    /// [`has_same_hash_family`](Self::has_same_hash_family).
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.width == other.width && self.depth == other.depth
    }

    /// Returns true if both sketches hash items to the same buckets.
    pub fn has_same_hash_family(&self, other: &Self) -> bool {
        self.is_compatible(other) && self.hash_family == other.hash_family
    }

    /// Zeroes every counter. The hash functions are kept.
    pub fn reset(&mut self) {
        self.counters.fill(C::ZERO);
        self.total_weight = C::ZERO;
    }

    /// Adds the counters of `other` into this sketch, bucket by bucket.
    ///
    /// Afterwards the sketch answers as if it had seen both streams, provided `other`
    /// was built with the same seeds. Seed equality is the caller's responsibility:
    /// merging sketches with different seeds yields well-formed but meaningless counts.
    /// Counters saturate at `C::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if the sketches have different dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use countmin::countmin::CountMinSketch;
    ///
    /// let mut left = CountMinSketch::<str>::with_seed(64, 3, 7);
    /// let mut right = CountMinSketch::<str>::with_seed(64, 3, 7);
    /// left.update("a");
    /// right.update_with_weight("a", 4);
    ///
    /// left.merge(&right);
    /// assert!(left.estimate("a") >= 5);
    /// assert_eq!(left.total_weight(), 5);
    /// ```
    pub fn merge(&mut self, other: &Self) {
        self.assert_compatible(other, "merge");
        for (counter, &theirs) in self.counters.iter_mut().zip(&other.counters) {
            *counter = counter.saturating_add(theirs);
        }
        self.total_weight = self.total_weight.saturating_add(other.total_weight);
    }

    /// Subtracts the counters of `other` from this sketch, bucket by bucket.
    ///
    /// This undoes a [`merge`](Self::merge) of `other`, or removes a sub-stream that was
    /// also fed into this sketch. Estimates are no longer guaranteed upper bounds if
    /// `other` saw items this sketch did not.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CounterUnderflow`](crate::error::ErrorKind::CounterUnderflow)
    /// if any counter of `other` is larger than the matching counter here. The sketch is
    /// left unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if the sketches have different dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use countmin::countmin::CountMinSketch;
    ///
    /// let mut all = CountMinSketch::<u32>::with_seed(128, 4, 1);
    /// let mut part = CountMinSketch::<u32>::with_seed(128, 4, 1);
    /// all.update_with_weight(&10, 5);
    /// part.update_with_weight(&10, 2);
    ///
    /// all.subtract(&part).unwrap();
    /// assert_eq!(all.estimate(&10), 3);
    ///
    /// let mut empty = CountMinSketch::<u32>::with_seed(128, 4, 1);
    /// assert!(empty.subtract(&all).is_err());
    /// ```
    pub fn subtract(&mut self, other: &Self) -> Result<(), Error> {
        self.assert_compatible(other, "subtract");

        let mut difference = Vec::with_capacity(self.counters.len());
        for (index, (&mine, &theirs)) in self.counters.iter().zip(&other.counters).enumerate() {
            match mine.checked_sub(theirs) {
                Some(value) => difference.push(value),
                None => {
                    return Err(Error::counter_underflow(
                        index / self.width,
                        index % self.width,
                    ));
                }
            }
        }

        self.counters = difference;
        // Every update touches exactly one bucket per row, so any row sums to the weight.
        self.total_weight = self
            .row(0)
            .iter()
            .fold(C::ZERO, |sum, &counter| sum.saturating_add(counter));
        Ok(())
    }

    /// Returns the cosine similarity of the two sketches' rows, averaged over rows.
    ///
    /// Each row is treated as a `width`-dimensional vector and scored with
    /// `dot(a, b) / (|a| * |b| + 1e-6)`. Since counters are non-negative the result lies
    /// in `[0, 1]`: close to 1 for sketches of proportional streams, close to 0 when
    /// the populated buckets do not overlap, and 0 if either sketch is empty. Like
    /// [`merge`](Self::merge), this is only meaningful for sketches with equal seeds.
    ///
    /// # Panics
    ///
    /// Panics if the sketches have different dimensions.
    pub fn cosine_similarity(&self, other: &Self) -> f64 {
        self.assert_compatible(other, "compare");

        let total: f64 = self
            .rows()
            .zip(other.rows())
            .map(|(left, right)| {
                let mut dot = 0.0;
                let mut left_norm = 0.0;
                let mut right_norm = 0.0;
                for (&a, &b) in left.iter().zip(right) {
                    let a = a.to_f64();
                    let b = b.to_f64();
                    dot += a * b;
                    left_norm += a * a;
                    right_norm += b * b;
                }
                dot / (left_norm.sqrt() * right_norm.sqrt() + SIMILARITY_EPSILON)
            })
            .sum();

        total / self.depth as f64
    }

    fn assert_compatible(&self, other: &Self, operation: &str) {
        assert!(
            self.is_compatible(other),
            "cannot {operation} incompatible Count-Min sketches: {}x{} vs {}x{}",
            self.depth,
            self.width,
            other.depth,
            other.width,
        );
    }
}

/// Returns the number of counters in a `depth x width` grid, or `None` if the grid
/// cannot be allocated.
pub(crate) fn counter_len<C>(width: usize, depth: usize) -> Option<usize> {
    let len = width.checked_mul(depth)?;
    let bytes = len.checked_mul(std::mem::size_of::<C>())?;
    (bytes <= isize::MAX as usize).then_some(len)
}

impl<T: Hash + ?Sized, C: CountMinValue> CountMinSketch<T, C> {
    /// Records one occurrence of `item`.
    pub fn update(&mut self, item: &T) {
        self.update_with_weight(item, C::ONE);
    }

    /// Records `weight` occurrences of `item`.
    ///
    /// Buckets saturate at `C::MAX`; a saturated bucket keeps reporting `C::MAX`.
    pub fn update_with_weight(&mut self, item: &T, weight: C) {
        let width = self.width;
        for (row, bucket) in self.hash_family.buckets(item, width).enumerate() {
            let counter = &mut self.counters[row * width + bucket];
            *counter = counter.saturating_add(weight);
        }
        self.total_weight = self.total_weight.saturating_add(weight);
    }

    /// Returns the estimated number of occurrences of `item`.
    ///
    /// This is the smallest of the item's buckets across all rows. It is never below the
    /// true count unless [`subtract`](Self::subtract) was used, and it is 0 for every
    /// item of a new or [`reset`](Self::reset) sketch.
    pub fn estimate(&self, item: &T) -> C {
        self.hash_family
            .buckets(item, self.width)
            .enumerate()
            .map(|(row, bucket)| self.counters[row * self.width + bucket])
            .fold(C::MAX, Ord::min)
    }

    /// Returns an upper bound on the true count of `item` that holds with the
    /// confidence implied by the sketch depth.
    pub fn upper_bound(&self, item: &T) -> C {
        let slack = C::from_f64(self.relative_error() * self.total_weight.to_f64());
        self.estimate(item).saturating_add(slack)
    }
}

impl<'a, T: Hash + ?Sized, C: CountMinValue> Extend<&'a T> for CountMinSketch<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, items: I) {
        for item in items {
            self.update(item);
        }
    }
}

impl<T: ?Sized, C: CountMinValue> Clone for CountMinSketch<T, C> {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            depth: self.depth,
            total_weight: self.total_weight,
            counters: self.counters.clone(),
            hash_family: self.hash_family.clone(),
            _item: PhantomData,
        }
    }
}

impl<T: ?Sized, C: CountMinValue> PartialEq for CountMinSketch<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.depth == other.depth
            && self.total_weight == other.total_weight
            && self.hash_family == other.hash_family
            && self.counters == other.counters
    }
}

impl<T: ?Sized, C: CountMinValue> Eq for CountMinSketch<T, C> {}

impl<T: ?Sized, C: CountMinValue> fmt::Debug for CountMinSketch<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountMinSketch")
            .field("width", &self.width)
            .field("depth", &self.depth)
            .field("total_weight", &self.total_weight)
            .field("seeds", &self.hash_family.seeds())
            .finish_non_exhaustive()
    }
}
