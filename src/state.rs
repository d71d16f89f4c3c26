use std::collections::VecDeque;

use serde::Serialize;

use crate::tally::RankTally;

const MAX_LOGS: usize = 200;

/// One person, merged from the roster feed and the info feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub identifier: String,
    pub name: String,
    pub roster_rank: Option<String>,
    pub info_rank: Option<String>,
}

impl Record {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            roster_rank: None,
            info_rank: None,
        }
    }

    pub fn with_roster_rank(mut self, rank: Option<String>) -> Self {
        self.roster_rank = rank;
        self
    }

    pub fn roster_rank(&self) -> Option<&str> {
        self.roster_rank.as_deref()
    }

    pub fn info_rank(&self) -> Option<&str> {
        self.info_rank.as_deref()
    }

    pub fn set_info_rank(&mut self, rank: Option<String>) {
        self.info_rank = rank;
    }
}

/// Pipeline position. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    FetchRoster,
    FetchInfo,
    RenderPlayerCards,
    ComputeTally,
    RenderRankCards,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::FetchRoster => Stage::FetchInfo,
            Stage::FetchInfo => Stage::RenderPlayerCards,
            Stage::RenderPlayerCards => Stage::ComputeTally,
            Stage::ComputeTally => Stage::RenderRankCards,
            Stage::RenderRankCards | Stage::Done => Stage::Done,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::FetchRoster => "fetch-roster",
            Stage::FetchInfo => "fetch-info",
            Stage::RenderPlayerCards => "render-player-cards",
            Stage::ComputeTally => "compute-tally",
            Stage::RenderRankCards => "render-rank-cards",
            Stage::Done => "done",
        }
    }
}

/// Everything one render cycle produced. Built fresh per run and dropped
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutcome {
    pub records: Vec<Record>,
    pub tally: RankTally,
    pub stage: Stage,
    pub logs: VecDeque<String>,
}

impl RenderOutcome {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            tally: RankTally::default(),
            stage: Stage::FetchRoster,
            logs: VecDeque::new(),
        }
    }

    pub fn advance(&mut self) {
        self.stage = self.stage.next();
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name == name)
    }
}

impl Default for RenderOutcome {
    fn default() -> Self {
        Self::new()
    }
}
