use super::district::DistrictId;
use super::election::ElectionId;
use super::nomination::NominationId;
use std::collections::BTreeSet;

/// A cast ballot. Valid ballots carry at least one vote, invalid ones none.
///
/// Ballots are created through [`Election::create_valid_ballot`] and
/// [`Election::create_invalid_ballot`], which validate their content.
///
/// [`Election::create_valid_ballot`]: super::Election::create_valid_ballot
/// [`Election::create_invalid_ballot`]: super::Election::create_invalid_ballot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ballot {
    pub(crate) election: ElectionId,
    pub(crate) polling_station: DistrictId,
    pub(crate) postal_vote: bool,
    pub(crate) valid: bool,
    pub(crate) nominations: BTreeSet<NominationId>,
}

impl Ballot {
    pub fn election(&self) -> ElectionId {
        self.election
    }

    pub fn polling_station(&self) -> DistrictId {
        self.polling_station
    }

    pub fn is_postal_vote(&self) -> bool {
        self.postal_vote
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn nominations(&self) -> &BTreeSet<NominationId> {
        &self.nominations
    }

    pub fn contains(&self, nomination: NominationId) -> bool {
        self.nominations.contains(&nomination)
    }
}
