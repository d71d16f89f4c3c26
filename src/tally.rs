use serde::Serialize;

use crate::state::Record;

/// Roster ranks that are counted. Labels match the sheet text exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterRank {
    Ceo,
    Command,
    Administrator,
    Advisor,
    ChiefParamedic,
    ParamedicSpecialist,
    Paramedic,
    Emt2,
    Emt,
    Trainee,
}

impl RosterRank {
    pub const ALL: [RosterRank; 10] = [
        RosterRank::Ceo,
        RosterRank::Command,
        RosterRank::Administrator,
        RosterRank::Advisor,
        RosterRank::ChiefParamedic,
        RosterRank::ParamedicSpecialist,
        RosterRank::Paramedic,
        RosterRank::Emt2,
        RosterRank::Emt,
        RosterRank::Trainee,
    ];

    pub fn from_label(label: &str) -> Option<RosterRank> {
        Self::ALL.into_iter().find(|rank| rank.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            RosterRank::Ceo => "CEO",
            RosterRank::Command => "Command",
            RosterRank::Administrator => "Administrator",
            RosterRank::Advisor => "Advisor",
            RosterRank::ChiefParamedic => "Chief Paramedic",
            RosterRank::ParamedicSpecialist => "Paramedic Specialist",
            RosterRank::Paramedic => "Paramedic",
            RosterRank::Emt2 => "EMT-II",
            RosterRank::Emt => "EMT",
            RosterRank::Trainee => "Trainee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RankTally {
    pub ceo: u32,
    pub command: u32,
    pub administrator: u32,
    pub advisor: u32,
    pub chief_paramedic: u32,
    pub paramedic_specialist: u32,
    pub paramedic: u32,
    pub emt_2: u32,
    pub emt: u32,
    pub trainee: u32,
}

impl RankTally {
    pub fn from_records(records: &[Record]) -> Self {
        let mut tally = RankTally::default();
        for rank in records
            .iter()
            .filter_map(|r| r.roster_rank())
            .filter_map(RosterRank::from_label)
        {
            *tally.slot_mut(rank) += 1;
        }
        tally
    }

    pub fn get(&self, rank: RosterRank) -> u32 {
        match rank {
            RosterRank::Ceo => self.ceo,
            RosterRank::Command => self.command,
            RosterRank::Administrator => self.administrator,
            RosterRank::Advisor => self.advisor,
            RosterRank::ChiefParamedic => self.chief_paramedic,
            RosterRank::ParamedicSpecialist => self.paramedic_specialist,
            RosterRank::Paramedic => self.paramedic,
            RosterRank::Emt2 => self.emt_2,
            RosterRank::Emt => self.emt,
            RosterRank::Trainee => self.trainee,
        }
    }

    pub fn total(&self) -> u32 {
        RosterRank::ALL.into_iter().map(|rank| self.get(rank)).sum()
    }

    fn slot_mut(&mut self, rank: RosterRank) -> &mut u32 {
        match rank {
            RosterRank::Ceo => &mut self.ceo,
            RosterRank::Command => &mut self.command,
            RosterRank::Administrator => &mut self.administrator,
            RosterRank::Advisor => &mut self.advisor,
            RosterRank::ChiefParamedic => &mut self.chief_paramedic,
            RosterRank::ParamedicSpecialist => &mut self.paramedic_specialist,
            RosterRank::Paramedic => &mut self.paramedic,
            RosterRank::Emt2 => &mut self.emt_2,
            RosterRank::Emt => &mut self.emt,
            RosterRank::Trainee => &mut self.trainee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for rank in RosterRank::ALL {
            assert_eq!(RosterRank::from_label(rank.label()), Some(rank));
        }
        assert_eq!(RosterRank::from_label("emt"), None);
        assert_eq!(RosterRank::from_label("EMT "), None);
    }
}
