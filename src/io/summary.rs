// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Summary table: one comma-separated row per processed object

use crate::pipeline::ProcessedRecord;
use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Fields per row: name, mass, center of mass (3), inertia (9)
pub const SUMMARY_FIELD_COUNT: usize = 14;

/// Format one row without the trailing newline.
///
/// Floats use the shortest representation that parses back to the same
/// value, so identical inputs give identical bytes. The name is quoted
/// CSV-style when it holds a comma, a quote or a line break.
pub fn format_row(record: &ProcessedRecord) -> String {
    let mut row = quote_field(&record.name);
    let values = std::iter::once(record.mass)
        .chain(record.center_of_mass)
        .chain(record.inertia);
    for value in values {
        row.push_str(&format!(",{:?}", value));
    }
    row
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write every record to `path`, replacing any previous table
pub fn write_summary<'a>(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = &'a ProcessedRecord>,
) -> Result<()> {
    let mut content = String::new();
    for record in records {
        content.push_str(&format_row(record));
        content.push('\n');
    }
    fs::write(path.as_ref(), content)
        .with_context(|| format!("Failed to write summary: {:?}", path.as_ref()))?;
    Ok(())
}

/// Parse a summary table back into records
pub fn read_summary(path: impl AsRef<Path>) -> Result<Vec<ProcessedRecord>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read summary: {:?}", path.as_ref()))?;

    let mut records = Vec::new();
    let mut rest = content.as_str();
    let mut row = 0;
    while !rest.trim().is_empty() {
        row += 1;
        let (record, remaining) = parse_row(rest).with_context(|| format!("row {}", row))?;
        records.push(record);
        rest = remaining;
    }
    Ok(records)
}

/// Parse the row at the start of `input`, returning it and the text after it
fn parse_row(input: &str) -> Result<(ProcessedRecord, &str)> {
    let input = input.trim_start_matches(['\r', '\n']);
    let (name, after_name) = split_name(input)?;

    let (line, remaining) = match after_name.find('\n') {
        Some(end) => (&after_name[..end], &after_name[end + 1..]),
        None => (after_name, ""),
    };
    let fields: Vec<&str> = line.trim_end_matches('\r').split(',').map(str::trim).collect();
    if fields.len() != SUMMARY_FIELD_COUNT - 1 {
        bail!(
            "expected {} fields, found {}",
            SUMMARY_FIELD_COUNT,
            fields.len() + 1
        );
    }

    let mut values = [0.0; SUMMARY_FIELD_COUNT - 1];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field
            .parse()
            .with_context(|| format!("invalid number {:?}", field))?;
    }

    let mut record = ProcessedRecord {
        name,
        mass: values[0],
        center_of_mass: [0.0; 3],
        inertia: [0.0; 9],
    };
    record.center_of_mass.copy_from_slice(&values[1..4]);
    record.inertia.copy_from_slice(&values[4..13]);
    Ok((record, remaining))
}

/// Split off the name field and its trailing comma; a quoted name may hold
/// commas, doubled quotes and line breaks
fn split_name(input: &str) -> Result<(String, &str)> {
    let Some(quoted) = input.strip_prefix('"') else {
        let end = input.find([',', '\n']).unwrap_or(input.len());
        if !input[end..].starts_with(',') {
            bail!("expected {} fields, found 1", SUMMARY_FIELD_COUNT);
        }
        return Ok((input[..end].trim().to_string(), &input[end + 1..]));
    };

    let mut name = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            name.push(c);
            continue;
        }
        let after = &quoted[i + 1..];
        if after.starts_with('"') {
            name.push('"');
            chars.next();
        } else if let Some(rest) = after.strip_prefix(',') {
            return Ok((name, rest));
        } else {
            bail!("quoted name must be followed by a comma");
        }
    }
    bail!("unterminated quoted name")
}

/// Hex SHA-256 of a file's bytes
pub fn file_sha256(path: impl AsRef<Path>) -> Result<String> {
    let bytes = fs::read(path.as_ref())
        .with_context(|| format!("Failed to read {:?}", path.as_ref()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
