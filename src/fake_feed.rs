use anyhow::Result;
use serde_json::json;

use crate::feed::{Feed, FeedSource};

/// Feed bodies held in memory. Used for `--offline` runs and in tests.
#[derive(Debug, Clone)]
pub struct StaticFeedSource {
    pub roster: String,
    pub info: String,
}

impl StaticFeedSource {
    pub fn new(roster: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            roster: roster.into(),
            info: info.into(),
        }
    }

    /// A small roster covering every deck and every counted rank.
    pub fn sample() -> Self {
        let roster = seed_roster();
        let info = seed_info(&roster);
        Self::new(
            json!({ "range": "Roster!B2:N151", "majorDimension": "ROWS", "values": roster })
                .to_string(),
            json!({ "range": "Info!B3:C152", "majorDimension": "ROWS", "values": info })
                .to_string(),
        )
    }
}

impl FeedSource for StaticFeedSource {
    fn fetch(&self, feed: Feed) -> Result<String> {
        Ok(match feed {
            Feed::Roster => self.roster.clone(),
            Feed::Info => self.info.clone(),
        })
    }

    fn describe(&self, feed: Feed) -> String {
        format!("{feed} feed (offline)")
    }
}

fn seed_roster() -> Vec<[&'static str; 3]> {
    vec![
        ["Dana Whitlock", "#1001", "CEO"],
        ["Marcus Hale", "#1002", "Command"],
        ["Priya Nandakumar", "#1003", "Command"],
        ["Owen Carrick", "#1004", "Administrator"],
        ["Lena Brandt", "#1005", "Advisor"],
        ["Tomas Ruiz", "#1006", "Chief Paramedic"],
        ["Grace Okafor", "#1007", "Paramedic Specialist"],
        ["Jonah Pike", "#1008", "Paramedic Specialist"],
        ["Ivy Laurent", "#1009", "Paramedic"],
        ["Sam Becker", "#1010", "Paramedic"],
        ["Noor Haddad", "#1011", "EMT-II"],
        ["Felix Moreau", "#1012", "EMT"],
        ["Ruby Tran", "#1013", "EMT"],
        ["Cole Jensen", "#1014", "Trainee"],
    ]
}

// Same order as the roster; the info sheet carries the name in column 2.
fn seed_info(roster: &[[&'static str; 3]]) -> Vec<[&'static str; 2]> {
    roster
        .iter()
        .map(|[name, _, rank]| {
            let info_rank = match *rank {
                "Command" => "FTO M",
                "Chief Paramedic" | "Paramedic Specialist" => "FTO",
                _ => "Member",
            };
            [info_rank, *name]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info_fetch::parse_info_rows;
    use crate::roster_fetch::parse_roster_json;

    #[test]
    fn sample_feeds_are_aligned() {
        let source = StaticFeedSource::sample();
        let records = parse_roster_json(&source.roster).unwrap();
        let info = parse_info_rows(&source.info).unwrap();
        assert_eq!(records.len(), info.len());
        for (record, row) in records.iter().zip(&info) {
            assert_eq!(row.name.as_deref(), Some(record.name.as_str()));
        }
    }
}
