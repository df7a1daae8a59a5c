use super::decimals;
use super::draw::{self, DrawCheck};
use super::nomination_result::NominationResultType;
use crate::model::{
    Ballot, DrawKind, Election, ElectionError, Nomination, NominationId, Party, Result, SeatCounts,
};
use itertools::Itertools;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Per-nomination outcome of the seat apportionment, indexed by registry position.
#[derive(Debug)]
pub(crate) struct Apportionment {
    pub seats: SeatCounts,
    pub votes: Vec<u32>,
    pub sainte_lague: Vec<Option<Decimal>>,
    pub result_types: Vec<NominationResultType>,
}

/// Distributes direct, list, balance and overhang seats over the nominations.
///
/// Ballots must belong to `election`. Draw results are checked against the
/// ties they are meant to resolve as `check` says.
pub(crate) fn apportion(
    election: &Election,
    scale: u32,
    ballots: &[Ballot],
    direct_draw_results: &BTreeSet<NominationId>,
    list_draw_results: &BTreeSet<NominationId>,
    check: DrawCheck,
) -> Result<Apportionment> {
    let seats = election.seat_counts()?;
    let nominations = election.nominations();
    let describe = |index: usize| {
        nominations
            .get(index)
            .map(Nomination::key)
            .unwrap_or_else(|| format!("#{}", index))
    };
    let direct_draws = registry_indices(election, direct_draw_results)?;
    let list_draws = registry_indices(election, list_draw_results)?;

    // Step 1: Count the votes of every nomination
    let mut votes = vec![0u32; nominations.len()];
    for ballot in ballots.iter().filter(|ballot| ballot.is_valid()) {
        for nomination in ballot.nominations() {
            if let Some(count) = votes.get_mut(nomination.index()) {
                *count += 1;
            }
        }
    }
    let ranking: Vec<usize> = (0..nominations.len())
        .filter(|&index| votes[index] > 0)
        .sorted_by_key(|&index| (Reverse(votes[index]), index))
        .collect();

    // Step 2: Direct seats, separately for every sub-district
    let mut direct = BTreeSet::new();
    let mut direct_open = BTreeSet::new();
    for district in election.districts().sub_districts() {
        let in_district = |index: &usize| nominations[*index].district() == district.id();
        let order: Vec<(usize, u32)> = ranking
            .iter()
            .filter(|&&index| in_district(&index))
            .map(|&index| (index, votes[index]))
            .collect();
        let draws: BTreeSet<usize> = direct_draws.iter().copied().filter(in_district).collect();
        let outcome = draw::resolve(
            DrawKind::Direct,
            &order,
            seats.direct_seats_per_district as usize,
            &BTreeSet::new(),
            &draws,
            check,
            describe,
        )?;
        tracing::debug!(
            district = district.name(),
            direct = outcome.accepted.len(),
            open_draw = outcome.open.len(),
            "resolved direct seats"
        );
        direct.extend(outcome.accepted);
        direct_open.extend(outcome.open);
    }

    // Step 3: Sainte-Laguë values per party, direct results first
    let mut party_votes: BTreeMap<&Party, u64> = BTreeMap::new();
    for (index, nomination) in nominations.iter().enumerate() {
        if let Some(party) = nomination.party() {
            *party_votes.entry(party).or_insert(0) += u64::from(votes[index]);
        }
    }
    let mut sainte_lague: Vec<Option<Decimal>> = vec![None; nominations.len()];
    for (party, &total) in party_votes.iter().filter(|(_, total)| **total > 0) {
        let of_party: Vec<usize> = (0..nominations.len())
            .filter(|&index| nominations[index].party() == Some(*party))
            .collect();
        let (directs, others): (Vec<usize>, Vec<usize>) =
            of_party.into_iter().partition(|index| direct.contains(index));
        let party_order = directs
            .into_iter()
            .sorted_by_key(|&index| (Reverse(votes[index]), index))
            .chain(others);
        for (seat, index) in party_order.enumerate() {
            sainte_lague[index] = Some(decimals::sainte_lague(total, seat, scale));
        }
    }
    let order: Vec<(usize, Decimal)> = sainte_lague
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.map(|value| (index, value)))
        .sorted_by_key(|&(index, value)| (Reverse(value), Reverse(votes[index]), index))
        .collect();
    let rank: HashMap<usize, usize> = order
        .iter()
        .enumerate()
        .map(|(position, (index, _))| (*index, position))
        .collect();

    // Step 4: Walk the Sainte-Laguë order until every party direct result
    // and enough direct draw candidates are covered
    let has_party = |index: &&usize| nominations[**index].party().is_some();
    let party_direct: BTreeSet<usize> = direct.iter().filter(has_party).copied().collect();
    let party_draw: BTreeSet<usize> = direct_open.iter().filter(has_party).copied().collect();
    let open_direct_seats = (seats.direct_seats as usize).saturating_sub(direct.len());
    let required_draws = open_direct_seats.min(party_draw.len());
    let total_seats = seats.total_seats as usize;

    let mut size = 0;
    let mut directs_covered = 0;
    let mut draws_covered = 0;
    for (index, _) in &order {
        if size >= total_seats
            && directs_covered == party_direct.len()
            && draws_covered >= required_draws
        {
            break;
        }
        size += 1;
        if party_direct.contains(index) {
            directs_covered += 1;
        }
        if party_draw.contains(index) {
            draws_covered += 1;
        }
    }

    let fixed: BTreeSet<usize> = direct.union(&direct_open).copied().collect();
    let list = draw::resolve(DrawKind::List, &order, size, &fixed, &list_draws, check, describe)?;
    tracing::debug!(
        list_set = list.accepted.len(),
        open_draw = list.open.len(),
        "resolved list seats"
    );

    // Step 5: Classify
    let mut result_types = vec![NominationResultType::NotElected; nominations.len()];
    for &index in &direct {
        result_types[index] = NominationResultType::Direct;
    }
    for &index in &direct_open {
        result_types[index] = NominationResultType::DirectDraw;
    }
    for &index in &list.accepted {
        result_types[index] = match result_types[index] {
            NominationResultType::Direct => NominationResultType::Direct,
            NominationResultType::DirectDraw => NominationResultType::DirectDrawList,
            _ => NominationResultType::List,
        };
    }
    for &index in &list.open {
        if result_types[index] == NominationResultType::NotElected {
            result_types[index] = NominationResultType::ListDraw;
        }
    }
    for &index in &direct {
        if rank.get(&index).map_or(false, |&position| position >= total_seats) {
            result_types[index] = NominationResultType::DirectBalanceSeat;
        }
    }

    // Open direct seats are still taken from the list set once drawn
    let list_allowance = seats.list_seats as usize + open_direct_seats;
    let non_direct = list.accepted.iter().filter(|index| !direct.contains(*index));
    for (position, &index) in non_direct.enumerate() {
        if position >= list_allowance && result_types[index] == NominationResultType::List {
            result_types[index] = NominationResultType::ListOverhangSeat;
        }
    }

    tracing::debug!(
        direct = direct.len(),
        balance = result_types
            .iter()
            .filter(|t| **t == NominationResultType::DirectBalanceSeat)
            .count(),
        overhang = result_types
            .iter()
            .filter(|t| **t == NominationResultType::ListOverhangSeat)
            .count(),
        "apportionment complete"
    );

    Ok(Apportionment {
        seats,
        votes,
        sainte_lague,
        result_types,
    })
}

/// Registry positions of draw results, which must be nominations of `election`.
fn registry_indices(election: &Election, ids: &BTreeSet<NominationId>) -> Result<BTreeSet<usize>> {
    ids.iter()
        .map(|id| {
            if id.election() != election.id() {
                return Err(ElectionError::ElectionMismatch {
                    subject: format!("Draw result {}", id),
                    actual: id.election().to_string(),
                    expected: election.id().to_string(),
                });
            }
            election
                .nomination(*id)
                .map(|nomination| nomination.id().index())
                .ok_or_else(|| ElectionError::UnknownNomination(id.to_string()))
        })
        .collect()
}
