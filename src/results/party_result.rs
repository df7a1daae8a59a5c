use crate::model::Party;

/// Vote and seat totals of one party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyResult {
    pub(crate) party: Party,
    pub(crate) number_of_votes: u64,
    pub(crate) number_of_ballots: usize,
    pub(crate) number_of_seats: usize,
    pub(crate) number_of_block_votings: usize,
    pub(crate) number_of_certain_direct_seats: usize,
    pub(crate) number_of_certain_list_seats: usize,
}

impl PartyResult {
    pub fn party(&self) -> &Party {
        &self.party
    }

    /// Sum of the votes of the party's nominations.
    pub fn number_of_votes(&self) -> u64 {
        self.number_of_votes
    }

    /// Valid ballots with at least one vote for the party.
    pub fn number_of_ballots(&self) -> usize {
        self.number_of_ballots
    }

    /// Nominations of the party whose result is anything but not elected.
    pub fn number_of_seats(&self) -> usize {
        self.number_of_seats
    }

    pub fn number_of_block_votings(&self) -> usize {
        self.number_of_block_votings
    }

    /// Direct seats of the party that the remaining ballots cannot take away.
    pub fn number_of_certain_direct_seats(&self) -> usize {
        self.number_of_certain_direct_seats
    }

    /// Lower bound of the party's seats from its share of all possible votes.
    /// Zero while the declared number of ballots is unknown.
    pub fn number_of_certain_list_seats(&self) -> usize {
        self.number_of_certain_list_seats
    }

    pub fn number_of_certain_seats(&self) -> usize {
        self.number_of_certain_direct_seats
            .max(self.number_of_certain_list_seats)
    }
}
