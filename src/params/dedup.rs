// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Drop objects morphed with coefficients already seen in their class

use super::record::{ParameterRecord, COEFFICIENT_COUNT};
use std::collections::HashMap;

/// Class of an object: its name up to the first `separator`
pub fn class_prefix(name: &str, separator: char) -> &str {
    name.split(separator).next().unwrap_or(name)
}

/// Outcome of deduplication, as indices into the input slice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduplication {
    /// Ascending indices of the first occurrence of each (class, coefficients) pair
    pub keep: Vec<usize>,
    /// (dropped index, index of the retained record it duplicates)
    pub dropped: Vec<(usize, usize)>,
}

/// Keep the first record of every distinct coefficient tuple within each class
pub fn unique_objects(records: &[ParameterRecord], separator: char) -> Deduplication {
    let mut first_seen: HashMap<(&str, [u64; COEFFICIENT_COUNT]), usize> = HashMap::new();
    let mut result = Deduplication::default();

    for (index, record) in records.iter().enumerate() {
        let key = (
            class_prefix(&record.name, separator),
            coefficient_key(&record.coefficients),
        );
        match first_seen.get(&key) {
            Some(&original) => result.dropped.push((index, original)),
            None => {
                first_seen.insert(key, index);
                result.keep.push(index);
            }
        }
    }

    result
}

/// Exact bitwise key; -0.0 folds into 0.0 and every NaN into one value
fn coefficient_key(coefficients: &[f64; COEFFICIENT_COUNT]) -> [u64; COEFFICIENT_COUNT] {
    coefficients.map(|value| {
        if value.is_nan() {
            f64::NAN.to_bits()
        } else {
            (value + 0.0).to_bits()
        }
    })
}
