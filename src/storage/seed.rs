//! Boot-time import of messages from a CSV export.
//!
//! The file starts with a header row followed by
//! `id,name,email,text,creation_time` records.

use crate::domain::message::Message;
use crate::storage::MessageStore;
use std::path::Path;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("failed to store seeded message: {0}")]
    Store(#[from] crate::error::AppError),
}

/// Outcome of a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Loads every record from `path` into the store.
///
/// # Errors
/// Returns `SeedError` if the file cannot be read, a record is malformed, or the store rejects a write.
#[tracing::instrument(err(level = "warn"), skip(store, path), fields(path = %path.display()))]
pub async fn load_csv(store: &dyn MessageStore, path: &Path) -> Result<SeedReport, SeedError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let messages = parse_messages(&contents)?;

    let mut report = SeedReport::default();
    for message in messages {
        if store.restore(message).await? {
            report.inserted += 1;
        } else {
            report.skipped += 1;
        }
    }

    tracing::info!(inserted = report.inserted, skipped = report.skipped, "Seeded messages");
    Ok(report)
}

/// Parses a CSV document into messages, skipping the header row.
///
/// # Errors
/// Returns `SeedError::Malformed` naming the first bad line.
pub fn parse_messages(contents: &str) -> Result<Vec<Message>, SeedError> {
    let records = parse_records(contents)?;

    records
        .into_iter()
        .skip(1)
        .filter(|(_, fields)| !(fields.len() == 1 && fields[0].is_empty()))
        .map(|(line, fields)| parse_message(line, fields))
        .collect()
}

fn parse_message(line: usize, fields: Vec<String>) -> Result<Message, SeedError> {
    let malformed = |reason: String| SeedError::Malformed { line, reason };

    let [id, name, email, text, creation_time]: [String; 5] = fields
        .try_into()
        .map_err(|fields: Vec<String>| malformed(format!("expected 5 fields, found {}", fields.len())))?;

    let id = Uuid::parse_str(id.trim()).map_err(|e| malformed(format!("invalid id: {e}")))?;
    let creation_time =
        parse_timestamp(creation_time.trim()).ok_or_else(|| malformed(format!("invalid timestamp: {creation_time}")))?;

    Ok(Message { id, name, email, text, creation_time })
}

/// Accepts RFC 3339 as well as the unpadded `2019-1-2T15:04:05-07:00` form used by older exports.
fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    let unpadded = format_description!(
        "[year]-[month padding:none]-[day padding:none]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
    );

    OffsetDateTime::parse(value, &Rfc3339).or_else(|_| OffsetDateTime::parse(value, &unpadded)).ok()
}

/// Splits CSV text into records of fields, tagged with the line each record starts on.
/// Quoted fields may contain commas, newlines and doubled quotes. A quote inside
/// an unquoted field, or text after a closing quote, is rejected.
fn parse_records(contents: &str) -> Result<Vec<(usize, Vec<String>)>, SeedError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut closed_quote = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = contents.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    closed_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !closed_quote => in_quotes = true,
            '"' => return Err(SeedError::Malformed { line, reason: "bare quote in unquoted field".to_string() }),
            ',' => {
                fields.push(std::mem::take(&mut field));
                closed_quote = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                closed_quote = false;
                line += 1;
                record_line = line;
            }
            _ if closed_quote => {
                return Err(SeedError::Malformed { line, reason: "unexpected text after closing quote".to_string() });
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(SeedError::Malformed { line: record_line, reason: "unterminated quoted field".to_string() });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}
