use crate::cards::{player_card, rank_card};
use crate::page::{DeckId, Page};
use crate::state::Record;
use crate::tally::{RankTally, RosterRank};

const FTO_MANAGER_SHORT: &str = "FTO M";
const FTO_MANAGER: &str = "FTO Manager";

/// Rank-count cards, in display order per deck.
const RANK_DECKS: [(DeckId, &str, RosterRank); 6] = [
    (DeckId::Rank1, "Chief Paramedics", RosterRank::ChiefParamedic),
    (DeckId::Rank1, "Paramedic Specialists", RosterRank::ParamedicSpecialist),
    (DeckId::Rank1, "Paramedics", RosterRank::Paramedic),
    (DeckId::Rank2, "EMT Level 2s", RosterRank::Emt2),
    (DeckId::Rank2, "EMT Level 1s", RosterRank::Emt),
    (DeckId::Rank2, "Trainees", RosterRank::Trainee),
];

/// Route each record to its roster-rank deck and its info-rank deck.
///
/// The info sheet abbreviates "FTO Manager" as "FTO M"; the record is
/// renamed before its card is built. Returns the number of cards added.
pub fn render_player_cards(records: &mut [Record], page: &mut Page) -> usize {
    let mut added = 0;
    for record in records.iter_mut() {
        if let Some(deck) = record.roster_rank().and_then(roster_deck) {
            page.append(deck, player_card(record, true));
            added += 1;
        }

        if record.info_rank() == Some(FTO_MANAGER_SHORT) {
            record.set_info_rank(Some(FTO_MANAGER.to_string()));
            page.append(DeckId::FtoManager, player_card(record, false));
            added += 1;
        } else if record.info_rank() == Some("FTO") {
            page.append(DeckId::Fto, player_card(record, false));
            added += 1;
        }
    }
    added
}

/// Always six cards, zero counts included.
pub fn render_rank_cards(tally: &RankTally, page: &mut Page) -> usize {
    for (deck, label, rank) in RANK_DECKS {
        page.append(deck, rank_card(label, tally.get(rank)));
    }
    RANK_DECKS.len()
}

fn roster_deck(rank: &str) -> Option<DeckId> {
    match rank {
        "CEO" => Some(DeckId::Ceo),
        "Command" => Some(DeckId::Command),
        "Administrator" => Some(DeckId::Administrator),
        "Advisor" => Some(DeckId::Advisor),
        _ => None,
    }
}
