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

use crate::countmin::CountMinSketch;
use crate::countmin::CountMinValue;
use crate::countmin::sketch::counter_len;
use crate::error::Error;
use crate::hash::HashFamily;

const DEFAULT_WIDTH: usize = 1024;
const DEFAULT_DEPTH: usize = 4;

/// Builder for creating [`CountMinSketch`] instances.
///
/// Dimensions come from, in order of precedence: explicit [`width`](Self::width) and
/// [`depth`](Self::depth), the length of explicit [`seeds`](Self::seeds) (depth only),
/// the accuracy targets of [`with_accuracy`](Self::with_accuracy), and finally the
/// defaults of 1024 buckets and 4 rows.
///
/// # Examples
///
/// ```
/// use countmin::countmin::CountMinSketch;
/// use countmin::countmin::CountMinSketchBuilder;
///
/// let sketch: CountMinSketch<str> = CountMinSketchBuilder::with_accuracy(0.01, 0.99)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(sketch.width(), 272);
/// assert_eq!(sketch.depth(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountMinSketchBuilder {
    width: Option<usize>,
    depth: Option<usize>,
    accuracy: Option<Accuracy>,
    seeds: Seeds,
}

#[derive(Debug, Clone, Copy)]
struct Accuracy {
    relative_error: f64,
    confidence: f64,
}

#[derive(Debug, Clone, Default)]
enum Seeds {
    #[default]
    Process,
    Derived(u64),
    Explicit(Vec<u64>),
}

impl CountMinSketchBuilder {
    /// Creates a builder with default dimensions and process-random seeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder sized for a target relative error and confidence.
    ///
    /// See [`CountMinSketch::suggest_width`] and [`CountMinSketch::suggest_depth`].
    /// Out-of-range values are reported by [`build`](Self::build).
    pub fn with_accuracy(relative_error: f64, confidence: f64) -> Self {
        Self {
            accuracy: Some(Accuracy {
                relative_error,
                confidence,
            }),
            ..Self::default()
        }
    }

    /// Sets the number of buckets per row.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the number of rows.
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Derives every row seed from `seed`.
    ///
    /// Sketches built with the same seed and dimensions can be merged.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seeds = Seeds::Derived(seed);
        self
    }

    /// Uses one explicit seed per row.
    pub fn seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = Seeds::Explicit(seeds);
        self
    }

    /// Builds the sketch.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// the width or depth is zero, the counter grid is too large to allocate, an accuracy target is outside `(0, 1)`, or the number
    /// of explicit seeds differs from the depth.
    pub fn build<T: ?Sized, C: CountMinValue>(self) -> Result<CountMinSketch<T, C>, Error> {
        let accuracy = self.accuracy.map(Accuracy::validate).transpose()?;

        let suggested_width =
            accuracy.map(|a| CountMinSketch::<T, C>::suggest_width(a.relative_error));
        let width = self.width.or(suggested_width).unwrap_or(DEFAULT_WIDTH);
        if width == 0 {
            return Err(Error::config_invalid("width must be at least 1"));
        }

        let explicit_depth = match &self.seeds {
            Seeds::Explicit(seeds) => Some(seeds.len()),
            _ => None,
        };
        let suggested_depth = accuracy.map(|a| CountMinSketch::<T, C>::suggest_depth(a.confidence));
        let depth = self
            .depth
            .or(explicit_depth)
            .or(suggested_depth)
            .unwrap_or(DEFAULT_DEPTH);
        if depth == 0 {
            return Err(Error::config_invalid("depth must be at least 1"));
        }
        if counter_len::<C>(width, depth).is_none() {
            return Err(Error::config_invalid("sketch dimensions are too large")
                .with_context("width", width)
                .with_context("depth", depth));
        }

        let hash_family = match self.seeds {
            Seeds::Process => HashFamily::new(depth),
            Seeds::Derived(seed) => HashFamily::from_seed(depth, seed),
            Seeds::Explicit(seeds) => {
                if seeds.len() != depth {
                    return Err(Error::config_invalid("seed count does not match depth")
                        .with_context("depth", depth)
                        .with_context("seeds", seeds.len()));
                }
                HashFamily::with_seeds(seeds)
            }
        };

        Ok(CountMinSketch::with_hash_family(width, hash_family))
    }
}

impl Accuracy {
    fn validate(self) -> Result<Self, Error> {
        if !(self.relative_error > 0.0 && self.relative_error < 1.0) {
            return Err(Error::config_invalid("relative_error must be in (0, 1)")
                .with_context("relative_error", self.relative_error));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(Error::config_invalid("confidence must be in (0, 1)")
                .with_context("confidence", self.confidence));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let sketch: CountMinSketch<str> = CountMinSketchBuilder::new().build().unwrap();
        assert_eq!(sketch.width(), DEFAULT_WIDTH);
        assert_eq!(sketch.depth(), DEFAULT_DEPTH);
        assert!(sketch.is_empty());
    }

    #[test]
    fn test_explicit_dimensions_override_accuracy() {
        let sketch: CountMinSketch<u64, u32> = CountMinSketchBuilder::with_accuracy(0.01, 0.99)
            .width(100)
            .depth(3)
            .build()
            .unwrap();
        assert_eq!(sketch.width(), 100);
        assert_eq!(sketch.depth(), 3);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let build = || -> CountMinSketch<str> {
            CountMinSketchBuilder::new()
                .width(64)
                .depth(6)
                .seed(9001)
                .build()
                .unwrap()
        };
        let left = build();
        let right = build();
        assert!(left.has_same_hash_family(&right));
        assert_eq!(left.seeds(), HashFamily::from_seed(6, 9001).seeds());
    }

    #[test]
    fn test_explicit_seeds_set_depth() {
        let sketch: CountMinSketch<str> = CountMinSketchBuilder::new()
            .seeds(vec![5, 6, 7])
            .build()
            .unwrap();
        assert_eq!(sketch.depth(), 3);
        assert_eq!(sketch.seeds(), &[5, 6, 7]);
    }

    #[test]
    fn test_seed_count_mismatch() {
        let err = CountMinSketchBuilder::new()
            .depth(4)
            .seeds(vec![1, 2])
            .build::<str, u64>()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.message(), "seed count does not match depth");
    }

    #[test]
    fn test_zero_dimensions() {
        let err = CountMinSketchBuilder::new()
            .width(0)
            .build::<str, u64>()
            .unwrap_err();
        assert_eq!(err.message(), "width must be at least 1");

        let err = CountMinSketchBuilder::new()
            .depth(0)
            .build::<str, u64>()
            .unwrap_err();
        assert_eq!(err.message(), "depth must be at least 1");

        let err = CountMinSketchBuilder::new()
            .seeds(vec![])
            .build::<str, u64>()
            .unwrap_err();
        assert_eq!(err.message(), "depth must be at least 1");
    }

    #[test]
    fn test_oversized_dimensions() {
        let err = CountMinSketchBuilder::with_accuracy(1e-19, 0.99)
            .build::<str, u8>()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.message(), "sketch dimensions are too large");
        assert_eq!(err.context()[0], ("width", usize::MAX.to_string()));
        assert_eq!(err.context()[1], ("depth", "5".to_string()));

        let err = CountMinSketchBuilder::new()
            .width(usize::MAX)
            .depth(1)
            .build::<str, u64>()
            .unwrap_err();
        assert_eq!(err.message(), "sketch dimensions are too large");
    }

    #[test]
    fn test_tiny_confidence_still_has_one_row() {
        let sketch: CountMinSketch<str> = CountMinSketchBuilder::with_accuracy(0.1, 1e-17)
            .build()
            .unwrap();
        assert_eq!(sketch.width(), 28);
        assert_eq!(sketch.depth(), 1);
    }

    #[test]
    fn test_invalid_accuracy() {
        let err = CountMinSketchBuilder::with_accuracy(0.0, 0.9)
            .build::<str, u64>()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.message(), "relative_error must be in (0, 1)");

        let err = CountMinSketchBuilder::with_accuracy(0.1, 1.0)
            .build::<str, u64>()
            .unwrap_err();
        assert_eq!(err.message(), "confidence must be in (0, 1)");

        let err = CountMinSketchBuilder::with_accuracy(f64::NAN, 0.5)
            .build::<str, u64>()
            .unwrap_err();
        assert_eq!(err.message(), "relative_error must be in (0, 1)");
    }
}
