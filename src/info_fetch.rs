use std::str::FromStr;

use anyhow::{Context, Result};

use crate::feed::{Feed, FeedSource, parse_sheet_rows};
use crate::state::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub rank: Option<String>,
    pub name: Option<String>,
}

/// How info rows find their record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMode {
    /// Nth info row goes to the Nth record. Nothing checks that the two
    /// sheets are in the same order.
    #[default]
    Position,
    /// Info row element 1 must equal the record name.
    Name,
}

impl FromStr for JoinMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "position" | "pos" => Ok(JoinMode::Position),
            "name" => Ok(JoinMode::Name),
            other => Err(anyhow::anyhow!(
                "unknown join mode '{other}' (expected position or name)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    pub applied: usize,
    pub unmatched: usize,
}

pub fn parse_info_rows(raw: &str) -> Result<Vec<InfoRow>> {
    let rows = parse_sheet_rows(raw).context("invalid info json")?;
    Ok(rows
        .into_iter()
        .map(|mut row| {
            row.resize(2, None);
            let name = row.pop().flatten();
            let rank = row.pop().flatten();
            InfoRow { rank, name }
        })
        .collect())
}

pub fn merge_info(records: &mut [Record], rows: &[InfoRow], mode: JoinMode) -> MergeReport {
    let mut report = MergeReport::default();
    for (idx, row) in rows.iter().enumerate() {
        let target = match mode {
            JoinMode::Position => records.get_mut(idx),
            JoinMode::Name => row
                .name
                .as_deref()
                .and_then(|name| records.iter_mut().find(|r| r.name == name)),
        };
        match target {
            Some(record) => {
                record.set_info_rank(row.rank.clone());
                report.applied += 1;
            }
            None => report.unmatched += 1,
        }
    }
    report
}

pub fn fetch_info(
    source: &dyn FeedSource,
    records: &mut [Record],
    mode: JoinMode,
) -> Result<MergeReport> {
    let body = source.fetch(Feed::Info)?;
    let rows = parse_info_rows(&body)?;
    Ok(merge_info(records, &rows, mode))
}
