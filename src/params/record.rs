// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Morph parameter records

use crate::error::ParamError;
use serde::{Deserialize, Serialize};

/// Number of values in a parameter file
pub const PARAM_FIELD_COUNT: usize = 24;

/// Number of leading transform coefficients
pub const COEFFICIENT_COUNT: usize = 5;

/// Parameters one object was morphed with.
///
/// The file layout is flat: 5 transform coefficients, origin (3), axis (3),
/// mass, center of mass (3) and a row-major inertia tensor (9). Only the
/// coefficients take part in preprocessing; mass properties are recomputed
/// from the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    pub coefficients: [f64; COEFFICIENT_COUNT],
    pub origin: [f64; 3],
    pub axis: [f64; 3],
    pub mass: f64,
    pub center_of_mass: [f64; 3],
    pub inertia: [f64; 9],
}

impl ParameterRecord {
    /// Parse the text of one parameter file.
    ///
    /// Values may be separated by commas, whitespace or newlines; empty
    /// tokens are ignored.
    pub fn parse(name: impl Into<String>, content: &str) -> Result<Self, ParamError> {
        let values = parse_values(content)?;
        if values.is_empty() {
            return Err(ParamError::Empty);
        }
        if values.len() != PARAM_FIELD_COUNT {
            return Err(ParamError::FieldCount {
                expected: PARAM_FIELD_COUNT,
                found: values.len(),
            });
        }

        Ok(Self::from_values(name.into(), &values))
    }

    fn from_values(name: String, values: &[f64]) -> Self {
        let mut record = Self {
            name,
            coefficients: [0.0; COEFFICIENT_COUNT],
            origin: [0.0; 3],
            axis: [0.0; 3],
            mass: values[11],
            center_of_mass: [0.0; 3],
            inertia: [0.0; 9],
        };
        record.coefficients.copy_from_slice(&values[0..5]);
        record.origin.copy_from_slice(&values[5..8]);
        record.axis.copy_from_slice(&values[8..11]);
        record.center_of_mass.copy_from_slice(&values[12..15]);
        record.inertia.copy_from_slice(&values[15..24]);
        record
    }
}

fn parse_values(content: &str) -> Result<Vec<f64>, ParamError> {
    content
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|_| ParamError::InvalidNumber {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}
