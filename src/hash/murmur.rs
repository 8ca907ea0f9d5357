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

use std::hash::Hasher;

const SEED_BYTES: usize = 8;

/// MurmurHash3 x64/128 keyed with a 64-bit seed.
///
/// The reference algorithm only accepts a 32-bit seed, so the full 64-bit seed is
/// written in front of the hashed bytes instead. Bytes fed through [`Hasher::write`]
/// are buffered and hashed in one pass by [`finish128`](Self::finish128).
#[derive(Debug, Clone)]
pub struct MurmurHash3X64128 {
    buffer: Vec<u8>,
}

impl MurmurHash3X64128 {
    /// Creates a hasher keyed with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut buffer = Vec::with_capacity(SEED_BYTES * 3);
        buffer.extend_from_slice(&seed.to_le_bytes());
        Self { buffer }
    }

    /// Replaces the key while keeping the bytes written so far.
    pub(crate) fn reseed(&mut self, seed: u64) {
        self.buffer[..SEED_BYTES].copy_from_slice(&seed.to_le_bytes());
    }

    /// Returns both 64-bit halves of the 128-bit hash.
    pub fn finish128(&self) -> (u64, u64) {
        mur3::murmurhash3_x64_128(&self.buffer, 0)
    }
}

impl Default for MurmurHash3X64128 {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Hasher for MurmurHash3X64128 {
    fn finish(&self) -> u64 {
        self.finish128().0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }
}
