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

//! Stores uniformly random integers in a Count-Min sketch and reports every value
//! whose estimate differs from its true count.
//!
//! ```shell
//! cargo run --example accuracy
//! cargo run --example accuracy -- --width 80 --depth 66 --seed 7
//! ```

use std::collections::HashMap;

use clap::Parser;
use countmin::countmin::CountMinSketch;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Parser)]
#[command(about = "Compare Count-Min estimates against exact counts")]
struct Args {
    /// Number of values to store.
    #[arg(long, default_value_t = 5000)]
    count: usize,

    /// Values are drawn uniformly from [0, max-value).
    #[arg(long, default_value_t = 100)]
    max_value: u32,

    /// Buckets per row. Runs the reference scenarios when omitted.
    #[arg(long, requires = "depth")]
    width: Option<usize>,

    /// Number of rows. Runs the reference scenarios when omitted.
    #[arg(long, requires = "width")]
    depth: Option<usize>,

    /// Seed for both the value stream and the sketch hash functions.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug)]
struct Scenario {
    count: usize,
    max_value: u32,
    width: usize,
    depth: usize,
}

fn main() {
    let args = Args::parse();
    if args.max_value == 0 {
        eprintln!("--max-value must be at least 1");
        std::process::exit(2);
    }

    let scenarios = match (args.width, args.depth) {
        (Some(width), Some(depth)) => vec![(width, depth)],
        _ => vec![(1000, 1000), (80, 66)],
    };

    for (width, depth) in scenarios {
        let scenario = Scenario {
            count: args.count,
            max_value: args.max_value,
            width,
            depth,
        };
        run(&scenario, args.seed);
    }
}

fn run(scenario: &Scenario, seed: Option<u64>) {
    println!(
        "count: {}, max value: {}, width: {}, depth: {}",
        scenario.count, scenario.max_value, scenario.width, scenario.depth
    );
    if scenario.width == 0 || scenario.depth == 0 {
        eprintln!("width and depth must be at least 1");
        return;
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let values: Vec<u32> = (0..scenario.count)
        .map(|_| rng.random_range(0..scenario.max_value))
        .collect();

    let mut sketch = match seed {
        Some(seed) => CountMinSketch::<u32>::with_seed(scenario.width, scenario.depth, seed),
        None => CountMinSketch::<u32>::new(scenario.width, scenario.depth),
    };
    sketch.extend(&values);

    let mut exact: HashMap<u32, u64> = HashMap::new();
    for &value in &values {
        *exact.entry(value).or_insert(0) += 1;
    }

    let mut distinct: Vec<u32> = exact.keys().copied().collect();
    distinct.sort_unstable();

    let mut mismatches = 0;
    for value in &distinct {
        let estimated = sketch.estimate(value);
        let real = exact[value];
        assert!(estimated >= real, "estimate {estimated} below true count {real}");
        if estimated != real {
            mismatches += 1;
            println!("value: {value}, estimated: {estimated}, real: {real}");
        }
    }

    println!(
        "{mismatches} of {} distinct values overestimated (relative error bound {:.4})",
        distinct.len(),
        sketch.relative_error()
    );
    println!();
}
