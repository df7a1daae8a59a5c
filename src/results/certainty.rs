use super::apportionment::Apportionment;
use super::nomination_result::NominationResultType;
use crate::model::{Ballot, DistrictId, DistrictValues, Election, Party};
use itertools::Itertools;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Outcomes that the ballots not counted yet can no longer change.
///
/// Everything here needs declared ballot counts. The assessment is
/// conservative: a missing certainty does not mean the outcome may change.
#[derive(Debug)]
pub(crate) struct Certainty<'e> {
    /// Certain result type per registry index.
    pub result_types: Vec<Option<NominationResultType>>,
    pub direct_seats: BTreeMap<&'e Party, usize>,
    pub list_seats: BTreeMap<&'e Party, usize>,
}

impl Certainty<'_> {
    /// The larger of certain direct and certain list seats.
    pub fn seats(&self, party: &Party) -> usize {
        let direct = self.direct_seats.get(party).copied().unwrap_or(0);
        let list = self.list_seats.get(party).copied().unwrap_or(0);
        direct.max(list)
    }
}

pub(crate) fn assess<'e>(
    election: &'e Election,
    ballots: &[Ballot],
    declared_ballots: &DistrictValues,
    apportionment: &Apportionment,
) -> Certainty<'e> {
    let tree = election.districts();
    let nominations = election.nominations();
    let votes = &apportionment.votes;
    let seats = apportionment.seats;
    let per_district = seats.direct_seats_per_district as usize;

    // Ballots still to be counted, none once more were counted than declared
    let remaining_all = declared_ballots
        .get(tree, tree.root().id())
        .map(|declared| (i64::from(declared) - ballots.len() as i64).max(0));
    let mut counted: HashMap<DistrictId, i64> = HashMap::new();
    for ballot in ballots {
        if let Some(district) = tree
            .get(ballot.polling_station())
            .and_then(|station| station.sub_district())
        {
            *counted.entry(district.id()).or_insert(0) += 1;
        }
    }

    // Votes of the nomination on the last direct seat of its sub-district,
    // optionally leaving out the nomination itself
    let last_direct_votes = |index: usize, without_self: bool| -> i64 {
        let district = nominations[index].district();
        (0..nominations.len())
            .filter(|&other| nominations[other].district() == district)
            .filter(|&other| !without_self || other != index)
            .map(|other| votes[other])
            .sorted_by_key(|&count| Reverse(count))
            .nth(per_district.saturating_sub(1))
            .map_or(0, i64::from)
    };

    let certain_direct: Vec<bool> = (0..nominations.len())
        .map(|index| {
            let district = nominations[index].district();
            let remaining = match declared_ballots.get(tree, district) {
                Some(declared) => (i64::from(declared) - counted.get(&district).copied().unwrap_or(0)).max(0),
                None => return false,
            };
            per_district > 0
                && votes[index] > 0
                && i64::from(votes[index]) > last_direct_votes(index, true) + remaining
        })
        .collect();

    let direct_candidate: Vec<bool> = (0..nominations.len())
        .map(|index| match remaining_all {
            None => false,
            Some(remaining) if votes[index] == 0 => remaining > 0,
            Some(remaining) => i64::from(votes[index]) + remaining >= last_direct_votes(index, false),
        })
        .collect();

    let parties = election.parties();
    let all_votes: u64 = ballots
        .iter()
        .filter(|ballot| ballot.is_valid())
        .map(|ballot| ballot.nominations().len() as u64)
        .sum();
    let of_party = |party: &Party| -> Vec<usize> {
        (0..nominations.len())
            .filter(|&index| nominations[index].party() == Some(party))
            .collect()
    };

    let mut direct_seats = BTreeMap::new();
    let mut list_seats = BTreeMap::new();
    for &party in &parties {
        let members = of_party(party);
        direct_seats.insert(party, members.iter().filter(|&&index| certain_direct[index]).count());

        let party_votes: u64 = members.iter().map(|&index| u64::from(votes[index])).sum();
        let list = remaining_all.map_or(0, |remaining| {
            let outstanding = remaining as u64 * u64::from(seats.votes_per_ballot());
            certain_list_seats(party_votes, all_votes + outstanding, seats.total_seats, parties.len())
        });
        list_seats.insert(party, list.min(members.len()));
    }

    let mut certainty = Certainty {
        result_types: vec![None; nominations.len()],
        direct_seats,
        list_seats,
    };
    for index in 0..nominations.len() {
        let certain_list = nominations[index].party().map_or(false, |party| {
            let members = of_party(party);
            let possible = certainty.seats(party) as i64
                - certainty.direct_seats.get(party).copied().unwrap_or(0) as i64;
            if possible <= 0 {
                return false;
            }
            let open: Vec<usize> = members
                .into_iter()
                .filter(|&member| !certain_direct[member])
                .collect();
            let position = match open.iter().position(|&member| member == index) {
                Some(position) => position as i64,
                None => return false,
            };
            // Direct candidates of the party may still take one of the seats
            let candidates = open
                .iter()
                .filter(|&&member| member != index && direct_candidate[member])
                .count() as i64;
            position < possible - candidates
        });
        let certain_not_elected = remaining_all == Some(0)
            && apportionment.result_types[index] == NominationResultType::NotElected;

        certainty.result_types[index] = if certain_direct[index] {
            Some(NominationResultType::Direct)
        } else if certain_list {
            Some(NominationResultType::List)
        } else if certain_not_elected {
            Some(NominationResultType::NotElected)
        } else {
            None
        };
    }

    tracing::debug!(
        certain = certainty.result_types.iter().filter(|t| t.is_some()).count(),
        remaining = remaining_all,
        "assessed certain results"
    );
    certainty
}

/// Seats of a party's share of all possible votes, with a margin of half a
/// seat per party, rounded half up.
fn certain_list_seats(party_votes: u64, possible_votes: u64, total_seats: u32, parties: usize) -> usize {
    if possible_votes == 0 {
        return 0;
    }
    let seats = Decimal::from(total_seats) + Decimal::ONE - Decimal::from(parties as u64) * Decimal::new(5, 1);
    let share = Decimal::from(party_votes) / Decimal::from(possible_votes) * seats;
    (share + Decimal::new(5, 1))
        .floor()
        .to_i64()
        .map_or(0, |seats| seats.max(0) as usize)
}
