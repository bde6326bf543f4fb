//! Display names for member ids.

use crate::error::Result;
use crate::expense::MemberId;
use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Shown for ids missing from the directory.
pub const UNKNOWN_MEMBER: &str = "Unknown";

/// Row of a member CSV file: `id,name,email`.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl MemberRecord {
    /// Name if present, else email.
    fn label(&self) -> Option<&str> {
        [self.name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// Maps member ids to human-readable names.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    names: HashMap<MemberId, String>,
}

impl MemberDirectory {
    pub fn new() -> Self {
        MemberDirectory::default()
    }

    /// Loads `id,name,email` rows. Rows without an id are skipped.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut directory = MemberDirectory::new();
        for (row_idx, result) in csv_reader.deserialize::<MemberRecord>().enumerate() {
            let row_num = row_idx + 2;
            match result {
                Ok(record) if !record.id.trim().is_empty() => directory.insert(&record),
                Ok(_) => warn!("Row {}: Member record without id", row_num),
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }
        Ok(directory)
    }

    pub fn insert(&mut self, record: &MemberRecord) {
        let label = record.label().unwrap_or(UNKNOWN_MEMBER).to_string();
        self.names.insert(MemberId::new(record.id.trim()), label);
    }

    /// Name, else email, else [`UNKNOWN_MEMBER`].
    pub fn display_name(&self, member: &MemberId) -> &str {
        self.names
            .get(member)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_MEMBER)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_name_then_email_then_unknown() {
        let csv = r#"id,name,email
u1,Alice,alice@example.com
u2,,bob@example.com
u3,,"#;

        let directory = MemberDirectory::from_csv(Cursor::new(csv)).unwrap();
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.display_name(&MemberId::from("u1")), "Alice");
        assert_eq!(directory.display_name(&MemberId::from("u2")), "bob@example.com");
        assert_eq!(directory.display_name(&MemberId::from("u3")), "Unknown");
        assert_eq!(directory.display_name(&MemberId::from("u4")), "Unknown");
    }

    #[test]
    fn test_rows_without_id_are_skipped() {
        let csv = "id,name,email\n,Ghost,\nu1,Alice,";

        let directory = MemberDirectory::from_csv(Cursor::new(csv)).unwrap();
        assert_eq!(directory.len(), 1);
    }
}
