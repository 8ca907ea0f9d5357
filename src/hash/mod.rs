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

//! Hashing primitives: the keyed MurmurHash3 hasher, seed sources, and the per-row
//! hash family a Count-Min sketch indexes its counters with.

mod family;
mod murmur;
mod seed;

pub use self::family::Buckets;
pub use self::family::HashFamily;
pub use self::murmur::MurmurHash3X64128;
pub use self::seed::ProcessSeeds;
pub use self::seed::SeedSource;
pub use self::seed::SplitMix64;
