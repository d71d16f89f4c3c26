use anyhow::{Context, Result};

use crate::feed::{Feed, FeedSource};
use crate::info_fetch::{self, JoinMode};
use crate::page::Page;
use crate::render;
use crate::roster_fetch;
use crate::state::{RenderOutcome, Stage};
use crate::tally::RankTally;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub join: JoinMode,
    /// Empty every container before appending. Off by default, in which case
    /// a second run on the same page duplicates cards.
    pub clear_containers: bool,
}

/// Run one full render cycle into `page`.
///
/// Stages run strictly in order and each finishes before the next starts;
/// the info merge depends on the roster order. The first failing stage
/// aborts the run.
pub fn run(
    source: &dyn FeedSource,
    page: &mut Page,
    options: RenderOptions,
) -> Result<RenderOutcome> {
    let mut outcome = RenderOutcome::new();
    if options.clear_containers {
        page.clear_all();
    }

    while outcome.stage != Stage::Done {
        let stage = outcome.stage;
        run_stage(stage, source, page, options, &mut outcome)
            .with_context(|| format!("stage {} failed", stage.label()))?;
        outcome.advance();
    }
    Ok(outcome)
}

fn run_stage(
    stage: Stage,
    source: &dyn FeedSource,
    page: &mut Page,
    options: RenderOptions,
    outcome: &mut RenderOutcome,
) -> Result<()> {
    match stage {
        Stage::FetchRoster => {
            outcome.push_log(format!("[INFO] Fetching {}", source.describe(Feed::Roster)));
            let added = roster_fetch::fetch_roster(source, &mut outcome.records)?;
            outcome.push_log(format!("[INFO] Roster: {added} records"));
        }
        Stage::FetchInfo => {
            outcome.push_log(format!("[INFO] Fetching {}", source.describe(Feed::Info)));
            let report = info_fetch::fetch_info(source, &mut outcome.records, options.join)?;
            outcome.push_log(format!(
                "[INFO] Info: {} rows applied ({:?} join)",
                report.applied, options.join
            ));
            if report.unmatched > 0 {
                outcome.push_log(format!(
                    "[WARN] Info: {} rows had no matching record",
                    report.unmatched
                ));
            }
        }
        Stage::RenderPlayerCards => {
            let added = render::render_player_cards(&mut outcome.records, page);
            outcome.push_log(format!("[INFO] Player cards: {added}"));
        }
        Stage::ComputeTally => {
            outcome.tally = RankTally::from_records(&outcome.records);
            outcome.push_log(format!(
                "[INFO] Tally: {} of {} records hold a counted rank",
                outcome.tally.total(),
                outcome.records.len()
            ));
        }
        Stage::RenderRankCards => {
            let added = render::render_rank_cards(&outcome.tally, page);
            outcome.push_log(format!("[INFO] Rank cards: {added}"));
        }
        Stage::Done => {}
    }
    Ok(())
}
