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

mod private {
    // Sealed trait to prevent external implementations of CountMinValue.
    pub trait Sealed {}
}

/// Counter type supported in a Count-Min sketch.
///
/// Implemented for the unsigned integer types. Narrow counters save memory, wide ones
/// push back the point where heavy buckets saturate.
pub trait CountMinValue: private::Sealed + Copy + Ord + Default + std::fmt::Debug {
    /// Zero value for counters and weights.
    const ZERO: Self;

    /// One value for unit updates.
    const ONE: Self;

    /// Maximum representable value for initializing minima.
    const MAX: Self;

    /// Adds, sticking at [`MAX`](Self::MAX) instead of overflowing.
    fn saturating_add(self, other: Self) -> Self;

    /// Subtracts, returning `None` if the result would be negative.
    fn checked_sub(self, other: Self) -> Option<Self>;

    /// Converts into `f64`.
    fn to_f64(self) -> f64;

    /// Converts from `f64`, truncating toward zero and saturating at the type bounds.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_unsigned {
    ($($name:ty),+) => {
        $(
            impl private::Sealed for $name {}

            impl CountMinValue for $name {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$name>::MAX;

                #[inline(always)]
                fn saturating_add(self, other: Self) -> Self {
                    <$name>::saturating_add(self, other)
                }

                #[inline(always)]
                fn checked_sub(self, other: Self) -> Option<Self> {
                    <$name>::checked_sub(self, other)
                }

                #[inline(always)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline(always)]
                fn from_f64(value: f64) -> Self {
                    value.trunc() as $name
                }
            }
        )+
    };
}

impl_unsigned!(u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_add() {
        assert_eq!(CountMinValue::saturating_add(250u8, 10), u8::MAX);
        assert_eq!(CountMinValue::saturating_add(7u32, 3), 10);
    }

    #[test]
    fn test_checked_sub() {
        assert_eq!(CountMinValue::checked_sub(3u16, 5), None);
        assert_eq!(CountMinValue::checked_sub(5u16, 3), Some(2));
    }

    #[test]
    fn test_f64_conversions() {
        assert_eq!(<u64 as CountMinValue>::from_f64(12.9), 12);
        assert_eq!(<u8 as CountMinValue>::from_f64(1e9), u8::MAX);
        assert_eq!(<u8 as CountMinValue>::from_f64(-3.0), 0);
        assert_eq!(CountMinValue::to_f64(42u32), 42.0);
    }
}
