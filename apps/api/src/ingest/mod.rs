//! Ingestion: turns CSV text or JSON row objects into typed `SalaryRecord`s.
//!
//! Source datasets name their columns inconsistently (`salary`, `Salary`,
//! `annual_salary_inr`, ...). Aliases are resolved here, once, through
//! `FIELD_ALIASES`; nothing downstream ever looks at raw column names.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analytics::numeric::parse_numeric;
use crate::models::record::SalaryRecord;

/// A row as it came from the source: column name → cell text.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("expected a JSON array of row objects, got {0}")]
    NotAnArray(&'static str),

    #[error("row {index} is not a JSON object")]
    NotAnObject { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Role,
    Country,
    City,
    ExperienceYears,
    AnnualSalary,
    TopSkills,
    DemandScore,
    Postings,
}

/// Canonical field → accepted source column names, in priority order.
pub const FIELD_ALIASES: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Role, &["role", "Role", "job", "Job"]),
    (CanonicalField::Country, &["country", "Country"]),
    (CanonicalField::City, &["city", "City"]),
    (
        CanonicalField::ExperienceYears,
        &["experience_years", "experience", "Experience"],
    ),
    (
        CanonicalField::AnnualSalary,
        &["annual_salary_inr", "annual_salary", "salary", "Salary"],
    ),
    (CanonicalField::TopSkills, &["top_skills", "skills", "Skills"]),
    (CanonicalField::DemandScore, &["demand_score"]),
    (CanonicalField::Postings, &["postings"]),
];

fn aliases(field: CanonicalField) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// Value of the first alias present in the row, trimmed. Missing → `""`.
fn resolve<'a>(row: &'a RawRow, field: CanonicalField) -> &'a str {
    aliases(field)
        .iter()
        .find_map(|name| row.get(*name))
        .map(|v| v.trim())
        .unwrap_or("")
}

/// Maps one raw row onto the canonical record.
pub fn map_row(row: &RawRow) -> SalaryRecord {
    SalaryRecord {
        role: resolve(row, CanonicalField::Role).to_string(),
        country: resolve(row, CanonicalField::Country).to_string(),
        city: resolve(row, CanonicalField::City).to_string(),
        experience_years: parse_numeric(resolve(row, CanonicalField::ExperienceYears)),
        annual_salary: parse_numeric(resolve(row, CanonicalField::AnnualSalary)),
        top_skills: resolve(row, CanonicalField::TopSkills).to_string(),
        demand_score: parse_numeric(resolve(row, CanonicalField::DemandScore)).unwrap_or(0.0),
        postings: parse_numeric(resolve(row, CanonicalField::Postings)).unwrap_or(0.0),
    }
}

/// Reads CSV with a header row. Blank and whitespace-only lines are skipped;
/// short or long rows are accepted. A row of empty cells (`,,,`) is still a
/// row and counts toward the total. A row the parser cannot decode is logged
/// and dropped.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<SalaryRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::MissingHeader);
    }

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                match error_line(&e) {
                    Some(line) => warn!("Skipping unreadable CSV row at line {line}: {e}"),
                    None => warn!("Skipping unreadable CSV row: {e}"),
                }
                continue;
            }
        };
        // A whitespace-only line trims down to a single empty field.
        if row.len() == 1 && row.get(0) == Some("") {
            continue;
        }
        let raw: RawRow = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        records.push(map_row(&raw));
    }

    log_unparsable_salaries(&records);
    Ok(records)
}

/// Source line of a row-level CSV error, as counted by the reader itself.
fn error_line(e: &csv::Error) -> Option<u64> {
    e.position().map(|pos| pos.line())
}

pub fn read_csv_bytes(bytes: &[u8]) -> Result<Vec<SalaryRecord>, IngestError> {
    read_csv(bytes)
}

pub fn load_csv_file(path: &Path) -> Result<Vec<SalaryRecord>, IngestError> {
    let file = File::open(path)?;
    read_csv(file)
}

/// Reads a JSON array of row objects. Scalars are stringified; `null` and
/// nested values count as absent.
pub fn read_json_rows(value: &Value) -> Result<Vec<SalaryRecord>, IngestError> {
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(_) => return Err(IngestError::NotAnArray("an object")),
        Value::String(_) => return Err(IngestError::NotAnArray("a string")),
        Value::Number(_) => return Err(IngestError::NotAnArray("a number")),
        Value::Bool(_) => return Err(IngestError::NotAnArray("a boolean")),
        Value::Null => return Err(IngestError::NotAnArray("null")),
    };

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let object = row
            .as_object()
            .ok_or(IngestError::NotAnObject { index })?;
        let raw: RawRow = object
            .iter()
            .filter_map(|(k, v)| scalar_text(v).map(|text| (k.clone(), text)))
            .collect();
        records.push(map_row(&raw));
    }

    log_unparsable_salaries(&records);
    Ok(records)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn log_unparsable_salaries(records: &[SalaryRecord]) {
    let unparsable = records.iter().filter(|r| r.annual_salary.is_none()).count();
    if unparsable > 0 {
        debug!(
            "{unparsable} of {} records have no parsable salary; excluded from salary statistics",
            records.len()
        );
    }
}
