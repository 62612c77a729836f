//! Roster parsing: CSV rows into candidate user records.
//!
//! The roster format is positional, six comma-separated fields per line:
//! `username,password,organizationNodes,securityNode,firstName,lastName`.
//! Blank lines and `#` comments are skipped. `organizationNodes` may hold
//! several names joined by `|`.

use crate::io::reader_from_path;
use crate::model::CandidateUser;
use crate::ImportResult;
use csv_async::{AsyncReader, AsyncReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tokio::io::AsyncRead;
use tracing::warn;

/// Exact field count of a roster data line.
pub const ROSTER_FIELDS: usize = 6;

// Canonical column names, folded, for tolerating a stray header line.
const HEADER_NAMES: [&str; ROSTER_FIELDS] = [
    "username",
    "password",
    "organizationnodes",
    "securitynode",
    "firstname",
    "lastname",
];

/// Lazy, finite, non-restartable sequence of [`CandidateUser`] records
/// pulled from a CSV source.
pub struct RosterReader<R: AsyncRead + Unpin + Send> {
    rdr: AsyncReader<R>,
    rows_seen: u64,
}

/// Open a roster file for parsing. Decompression and charset transcoding
/// are applied transparently based on the file extension.
pub async fn open_roster(path: &Path) -> ImportResult<RosterReader<impl AsyncRead + Unpin + Send>> {
    let (reader, _meta) = reader_from_path(path).await?;
    Ok(RosterReader::from_reader(reader))
}

impl<R: AsyncRead + Unpin + Send> RosterReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let rdr = AsyncReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .buffer_capacity(1 << 20)
            .create_reader(reader);
        Self { rdr, rows_seen: 0 }
    }

    /// Pull the next candidate. Skips blank lines, comments, a stray header
    /// line, and rows with the wrong field count (logged, never fatal).
    /// Returns `Ok(None)` once the roster is exhausted.
    pub async fn next_candidate(&mut self) -> ImportResult<Option<CandidateUser>> {
        let mut record = StringRecord::new();
        while self.rdr.read_record(&mut record).await? {
            self.rows_seen += 1;

            if is_blank(&record) || is_header(&record) {
                continue;
            }
            if record.len() != ROSTER_FIELDS {
                warn!(
                    row = self.rows_seen,
                    fields = record.len(),
                    "skipping malformed roster row, expected {ROSTER_FIELDS} fields"
                );
                continue;
            }

            let field = |idx: usize| record.get(idx).unwrap_or_default();
            return Ok(Some(CandidateUser::new(
                field(0),
                field(1),
                field(2),
                field(3),
                field(4),
                field(5),
            )));
        }
        Ok(None)
    }

    /// Drain the roster into a vector, preserving file order.
    pub async fn collect_candidates(mut self) -> ImportResult<Vec<CandidateUser>> {
        let mut candidates = Vec::new();
        while let Some(candidate) = self.next_candidate().await? {
            candidates.push(candidate);
        }
        Ok(candidates)
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record.get(0).is_none_or(str::is_empty))
}

fn is_header(record: &StringRecord) -> bool {
    record.len() == ROSTER_FIELDS
        && record
            .iter()
            .zip(HEADER_NAMES)
            .all(|(field, name)| field.replace(' ', "").eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(input: &str) -> Vec<CandidateUser> {
        RosterReader::from_reader(input.as_bytes())
            .collect_candidates()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn parses_a_data_line_with_trimmed_fields_and_defaults() {
        let rows = parse("jane@x.com , pw1 , Org A|Org B , Admin , Jane , Doe\n").await;
        assert_eq!(rows.len(), 1);

        let candidate = &rows[0];
        assert_eq!(candidate.user.name, "jane@x.com");
        assert_eq!(candidate.user.password, "pw1");
        assert_eq!(candidate.organization_nodes, "Org A|Org B");
        assert_eq!(candidate.security_node, "Admin");
        assert_eq!(candidate.user.first_name, "Jane");
        assert_eq!(candidate.user.last_name, "Doe");
        assert_eq!(candidate.user.time_zone_id, "America/Los_Angeles");
        assert!(!candidate.user.is_driver);
        assert!(candidate.user.is_email_report_enabled);
    }

    #[tokio::test]
    async fn skips_comments_and_blank_lines() {
        let input = "\
# username,password,organizationNodes,securityNode,firstName,lastName

jane,pw,Org A,Admin,Jane,Doe

john,pw,Org A,ViewOnly,John,Roe
";
        let rows = parse(input).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user.name, "jane");
        assert_eq!(rows[1].user.name, "john");
    }

    #[tokio::test]
    async fn tolerates_an_uncommented_header_line() {
        let input = "Username,Password,Organization Nodes,Security Node,First Name,Last Name\n\
                     jane,pw,Org A,Admin,Jane,Doe\n";
        let rows = parse(input).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user.name, "jane");
    }

    #[tokio::test]
    async fn skips_rows_with_the_wrong_field_count() {
        let input = "jane,pw,Org A,Admin,Jane\n\
                     john,pw,Org A,ViewOnly,John,Roe\n\
                     extra,pw,Org A,Admin,Ex,Tra,surplus\n";
        let rows = parse(input).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user.name, "john");
    }

    #[tokio::test]
    async fn keeps_an_empty_security_field() {
        let rows = parse("jane,pw,Org A,,Jane,Doe\n").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].security_node, "");
    }

    #[tokio::test]
    async fn next_candidate_is_a_lazy_pull() {
        let input = "jane,pw,Org A,Admin,Jane,Doe\njohn,pw,Org B,ViewOnly,John,Roe\n";
        let mut roster = RosterReader::from_reader(input.as_bytes());

        let first = roster.next_candidate().await.unwrap().unwrap();
        assert_eq!(first.user.name, "jane");
        let second = roster.next_candidate().await.unwrap().unwrap();
        assert_eq!(second.user.name, "john");
        assert!(roster.next_candidate().await.unwrap().is_none());
    }
}
