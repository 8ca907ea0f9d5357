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

//! Count-Min sketch implementation for frequency estimation.
//!
//! The Count-Min sketch answers "how many times has this item been seen?" in fixed
//! memory. Estimates never undercount; the overcount is at most
//! `relative_error * total_weight` with a probability set by the number of rows.
//!
//! # Usage
//!
//! ```rust
//! use countmin::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::<str>::new(1024, 4);
//!
//! sketch.update("apple");
//! sketch.update_with_weight("banana", 3);
//!
//! let banana = sketch.estimate("banana");
//! assert!(banana >= 3);
//!
//! let upper = sketch.upper_bound("banana");
//! assert!(upper >= banana);
//! ```
//!
//! # Combining Sketches
//!
//! Sketches built with the same dimensions and seeds can be added, subtracted and
//! compared:
//!
//! ```rust
//! use countmin::countmin::CountMinSketch;
//!
//! let mut monday = CountMinSketch::<str>::with_seed(512, 5, 9001);
//! let mut tuesday = CountMinSketch::<str>::with_seed(512, 5, 9001);
//! monday.update("login");
//! tuesday.update("login");
//! tuesday.update("logout");
//!
//! let similarity = monday.cosine_similarity(&tuesday);
//! assert!(similarity > 0.0 && similarity < 1.0);
//!
//! monday.merge(&tuesday);
//! assert!(monday.estimate("login") >= 2);
//! ```
//!
//! # Configuration Helpers
//!
//! ```rust
//! use countmin::countmin::CountMinSketch;
//! use countmin::countmin::CountMinSketchBuilder;
//!
//! let width = CountMinSketch::<str>::suggest_width(0.01);
//! let depth = CountMinSketch::<str>::suggest_depth(0.99);
//! let _sketch = CountMinSketch::<str>::new(width, depth);
//!
//! let _sketch: CountMinSketch<str> = CountMinSketchBuilder::with_accuracy(0.01, 0.99)
//!     .build()
//!     .unwrap();
//! ```

mod builder;
pub use self::builder::CountMinSketchBuilder;

mod sketch;
pub use self::sketch::CountMinSketch;

mod value;
pub use self::value::CountMinValue;
