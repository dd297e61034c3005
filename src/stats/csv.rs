//! Statistics table CSV parsing
//!
//! Columns are located by header name so extra export columns and column
//! order do not matter. Both the training export names and the descriptive
//! names are accepted.

use super::StatsError;
use crate::types::PublisherRecord;

const PUBLISHER_COLUMNS: &[&str] = &["primary_publisher", "publisher", "publisher_name"];
const DAYS_COLUMNS: &[&str] = &["avg_days_to_epic", "avg_days_to_store"];
const COUNT_COLUMNS: &[&str] = &["games_count", "sample_count"];
const CRITIC_COLUMNS: &[&str] = &["avg_metacritic", "avg_critic_score"];

/// Split a CSV line respecting quoted fields (handles commas inside quotes).
/// Returns owned strings because quoted fields need unquoting.
pub(crate) fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Column indices resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    publisher: usize,
    days: usize,
    count: usize,
    critic: usize,
}

impl ColumnMap {
    fn from_header(header: &str) -> Result<Self, StatsError> {
        let columns: Vec<String> = csv_split(header)
            .into_iter()
            .map(|c| c.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let find = |names: &[&str], label: &'static str| {
            columns
                .iter()
                .position(|c| names.contains(&c.as_str()))
                .ok_or(StatsError::MissingColumn(label))
        };

        Ok(Self {
            publisher: find(PUBLISHER_COLUMNS, PUBLISHER_COLUMNS[0])?,
            days: find(DAYS_COLUMNS, DAYS_COLUMNS[0])?,
            count: find(COUNT_COLUMNS, COUNT_COLUMNS[0])?,
            critic: find(CRITIC_COLUMNS, CRITIC_COLUMNS[0])?,
        })
    }
}

/// Parse an optional float cell. Empty and `nan` cells are undefined.
fn parse_optional_f64(
    raw: &str,
    line: usize,
    column: &'static str,
) -> Result<Option<f64>, StatsError> {
    let cell = raw.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| StatsError::InvalidValue {
            line,
            column,
            value: cell.to_string(),
        })
}

/// Parse a sample count. Pandas exports integral counts as "5" or "5.0".
fn parse_count(raw: &str, line: usize) -> Result<u32, StatsError> {
    let cell = raw.trim();
    let invalid = || StatsError::InvalidValue {
        line,
        column: "games_count",
        value: cell.to_string(),
    };

    if let Ok(n) = cell.parse::<u32>() {
        return Ok(n);
    }
    let f = cell.parse::<f64>().map_err(|_| invalid())?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Ok(f as u32)
    } else {
        Err(invalid())
    }
}

/// Parse every data row of the table. Blank lines are skipped.
pub(super) fn parse_records(contents: &str) -> Result<Vec<PublisherRecord>, StatsError> {
    let mut lines = contents.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, l)) if l.trim().is_empty() => continue,
            Some((_, l)) => break l,
            None => return Err(StatsError::Empty),
        }
    };
    let map = ColumnMap::from_header(header)?;

    let mut records = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = csv_split(line);
        let cell = |i: usize| fields.get(i).map_or("", String::as_str);

        let publisher_name = cell(map.publisher).to_string();
        if publisher_name.is_empty() {
            return Err(StatsError::InvalidValue {
                line: line_no,
                column: "primary_publisher",
                value: String::new(),
            });
        }

        let avg_days_to_store = parse_optional_f64(cell(map.days), line_no, "avg_days_to_epic")?;
        if let Some(d) = avg_days_to_store {
            if d < 0.0 {
                return Err(StatsError::InvalidValue {
                    line: line_no,
                    column: "avg_days_to_epic",
                    value: cell(map.days).trim().to_string(),
                });
            }
        }

        records.push(PublisherRecord {
            publisher_name,
            avg_days_to_store,
            sample_count: parse_count(cell(map.count), line_no)?,
            avg_critic_score: parse_optional_f64(cell(map.critic), line_no, "avg_metacritic")?,
        });
    }

    Ok(records)
}
