use anyhow::{Context, Result};

use crate::feed::{Feed, FeedSource, parse_sheet_rows};
use crate::state::Record;

/// Parse the roster feed into records, in response order.
///
/// The first row missing its name or id ends the data; rows after it are
/// never read, even if they are complete.
pub fn parse_roster_json(raw: &str) -> Result<Vec<Record>> {
    let rows = parse_sheet_rows(raw).context("invalid roster json")?;
    let mut out = Vec::new();
    for row in rows {
        let (Some(name), Some(raw_id)) = (cell(&row, 0), cell(&row, 1)) else {
            break;
        };
        let record = Record::new(name, strip_prefix_char(raw_id))
            .with_roster_rank(cell(&row, 2).map(str::to_string));
        out.push(record);
    }
    Ok(out)
}

/// Fetch the roster feed and append its records. Returns how many were added.
pub fn fetch_roster(source: &dyn FeedSource, records: &mut Vec<Record>) -> Result<usize> {
    let body = source.fetch(Feed::Roster)?;
    let parsed = parse_roster_json(&body)?;
    let added = parsed.len();
    records.extend(parsed);
    Ok(added)
}

fn cell(row: &[Option<String>], idx: usize) -> Option<&str> {
    row.get(idx).and_then(|c| c.as_deref())
}

// Ids arrive as e.g. "#12"; the marker is dropped.
fn strip_prefix_char(raw: &str) -> &str {
    let mut chars = raw.chars();
    chars.next();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_leading_char() {
        assert_eq!(strip_prefix_char("#42"), "42");
        assert_eq!(strip_prefix_char("x"), "");
        assert_eq!(strip_prefix_char(""), "");
        assert_eq!(strip_prefix_char("№7"), "7");
    }

    #[test]
    fn rank_is_optional() {
        let records = parse_roster_json(r##"{"values":[["Alice","#1"]]}"##).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].roster_rank, None);
        assert_eq!(records[0].info_rank, None);
    }

    #[test]
    fn empty_strings_are_not_end_of_data() {
        let records =
            parse_roster_json(r##"{"values":[["","#1","EMT"],["Bob","#2","EMT"]]}"##).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "");
    }
}
