mod apportionment;
mod certainty;
pub mod decimals;
mod draw;
pub mod nomination_result;
pub mod party_result;

pub use nomination_result::{NominationResult, NominationResultType};
pub use party_result::PartyResult;

use crate::model::election::MAX_SCALE;
use crate::model::{
    Ballot, DistrictId, DistrictValues, Election, ElectionError, NominationId, Party, Result,
};
use itertools::Itertools;
use rust_decimal::Decimal;
use draw::DrawCheck;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Evaluation settings that are not part of the election registry.
#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    /// Overrides the election's Sainte-Laguë scale.
    pub sainte_lague_scale: Option<u32>,
    /// Decimal places of counting and evaluation progress.
    pub progress_scale: u32,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            sainte_lague_scale: None,
            progress_scale: 1,
        }
    }
}

/// Immutable evaluation of a snapshot of ballots.
///
/// Nomination and party results are derived once at construction. Merging
/// and filtering produce new results by evaluating again.
///
/// Draw results given to [`ElectionResult::new`] must each resolve a tie.
/// Results derived by [`ElectionResult::filter`] and
/// [`ElectionResult::filter_by_district`] inherit all draw results and ignore
/// those that match no tie among their ballots.
#[derive(Debug, Clone)]
pub struct ElectionResult<'a> {
    election: &'a Election,
    scale: u32,
    draw_check: DrawCheck,
    declared_ballots: DistrictValues,
    direct_draw_results: BTreeSet<NominationId>,
    list_draw_results: BTreeSet<NominationId>,
    ballots: Vec<Ballot>,
    nomination_results: Vec<NominationResult>,
    /// Position in `nomination_results` per registry index.
    positions: Vec<usize>,
    party_results: Vec<PartyResult>,
}

impl<'a> ElectionResult<'a> {
    pub fn builder(election: &'a Election) -> ElectionResultBuilder<'a> {
        ElectionResultBuilder {
            election,
            scale: election.sainte_lague_scale(),
            declared_ballots: Vec::new(),
            direct_draw_results: BTreeSet::new(),
            list_draw_results: BTreeSet::new(),
            ballots: Vec::new(),
        }
    }

    pub fn new(
        election: &'a Election,
        scale: u32,
        declared_ballots: DistrictValues,
        direct_draw_results: BTreeSet<NominationId>,
        list_draw_results: BTreeSet<NominationId>,
        ballots: Vec<Ballot>,
    ) -> Result<Self> {
        Self::evaluate(
            election,
            scale,
            declared_ballots,
            direct_draw_results,
            list_draw_results,
            ballots,
            DrawCheck::Strict,
        )
    }

    fn evaluate(
        election: &'a Election,
        scale: u32,
        declared_ballots: DistrictValues,
        direct_draw_results: BTreeSet<NominationId>,
        list_draw_results: BTreeSet<NominationId>,
        ballots: Vec<Ballot>,
        draw_check: DrawCheck,
    ) -> Result<Self> {
        if scale > MAX_SCALE {
            return Err(ElectionError::ScaleOutOfRange(scale));
        }
        let root = election.districts().root();
        if declared_ballots.root() != root.id() {
            return Err(ElectionError::OutOfHierarchy(format!(
                "{:?}",
                declared_ballots.root()
            )));
        }
        if let Some(ballot) = ballots.iter().find(|b| b.election() != election.id()) {
            return Err(ElectionError::ElectionMismatch {
                subject: "Ballot".to_string(),
                actual: ballot.election().to_string(),
                expected: election.id().to_string(),
            });
        }

        let apportionment = apportionment::apportion(
            election,
            scale,
            &ballots,
            &direct_draw_results,
            &list_draw_results,
            draw_check,
        )?;
        let certainty = certainty::assess(election, &ballots, &declared_ballots, &apportionment);

        let nomination_results: Vec<NominationResult> = election
            .nominations()
            .iter()
            .enumerate()
            .map(|(index, nomination)| NominationResult {
                nomination: nomination.id(),
                result_type: apportionment.result_types[index],
                sainte_lague_value: apportionment.sainte_lague[index]
                    .unwrap_or_else(|| decimals::round(Decimal::ZERO, scale)),
                number_of_votes: apportionment.votes[index],
                certain_result_type: certainty.result_types[index],
            })
            .sorted_by_key(|result| {
                (
                    result.result_type,
                    Reverse(result.sainte_lague_value),
                    result.nomination.index(),
                )
            })
            .collect();
        let mut positions = vec![0; nomination_results.len()];
        for (position, result) in nomination_results.iter().enumerate() {
            positions[result.nomination.index()] = position;
        }

        let party_results = party_results(election, &ballots, &apportionment, &certainty)?;

        tracing::debug!(
            election = election.name(),
            ballots = ballots.len(),
            nominations = nomination_results.len(),
            parties = party_results.len(),
            "evaluated election result"
        );

        Ok(Self {
            election,
            scale,
            draw_check,
            declared_ballots,
            direct_draw_results,
            list_draw_results,
            ballots,
            nomination_results,
            positions,
            party_results,
        })
    }

    pub fn election(&self) -> &'a Election {
        self.election
    }

    /// Decimal places of the Sainte-Laguë values.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn declared_ballot_values(&self) -> &DistrictValues {
        &self.declared_ballots
    }

    pub fn direct_draw_results(&self) -> &BTreeSet<NominationId> {
        &self.direct_draw_results
    }

    pub fn list_draw_results(&self) -> &BTreeSet<NominationId> {
        &self.list_draw_results
    }

    /// Ordered by result type precedence, then Sainte-Laguë value, then registry order.
    pub fn nomination_results(&self) -> &[NominationResult] {
        &self.nomination_results
    }

    pub fn nomination_result(&self, nomination: NominationId) -> Option<&NominationResult> {
        if nomination.election() != self.election.id() {
            return None;
        }
        let position = *self.positions.get(nomination.index())?;
        self.nomination_results.get(position)
    }

    /// Ordered by votes, then party.
    pub fn party_results(&self) -> &[PartyResult] {
        &self.party_results
    }

    pub fn party_result(&self, party: &Party) -> Option<&PartyResult> {
        self.party_results.iter().find(|result| &result.party == party)
    }

    pub fn ballots_for_nomination(&self, nomination: NominationId) -> impl Iterator<Item = &Ballot> + '_ {
        self.ballots
            .iter()
            .filter(move |ballot| ballot.is_valid() && ballot.contains(nomination))
    }

    pub fn ballots_for_party<'p>(&'p self, party: &'p Party) -> impl Iterator<Item = &'p Ballot> + 'p {
        let election = self.election;
        self.ballots.iter().filter(move |ballot| {
            ballot.is_valid()
                && ballot.nominations().iter().any(|id| {
                    election
                        .nomination(*id)
                        .and_then(|nomination| nomination.party())
                        == Some(party)
                })
        })
    }

    /// Ballots cast in `district` or any of its polling stations.
    pub fn ballots_by_district(&self, district: DistrictId) -> impl Iterator<Item = &Ballot> + '_ {
        let area = self.election.districts().get(district);
        self.ballots.iter().filter(move |ballot| {
            area.map_or(false, |area| area.contains(ballot.polling_station()))
        })
    }

    pub fn number_of_invalid_ballots(&self) -> usize {
        self.ballots.iter().filter(|ballot| !ballot.is_valid()).count()
    }

    pub fn number_of_invalid_ballots_in(&self, district: DistrictId) -> usize {
        self.ballots_by_district(district)
            .filter(|ballot| !ballot.is_valid())
            .count()
    }

    /// Number of ballots reported for `district`, summed over its children if needed.
    pub fn declared_ballots(&self, district: DistrictId) -> Option<u32> {
        self.declared_ballots
            .get(self.election.districts(), district)
    }

    /// Counted ballots in percent of the declared ballots. May exceed 100.
    pub fn counting_progress(&self, district: DistrictId, scale: u32) -> Option<Decimal> {
        let counted = self.ballots_by_district(district).count() as u64;
        decimals::percentage(counted, self.declared_ballots(district), scale)
    }

    /// Counting progress capped at 100 percent.
    pub fn evaluation_progress(&self, district: DistrictId, scale: u32) -> Option<Decimal> {
        self.counting_progress(district, scale)
            .map(|progress| decimals::round(progress.min(Decimal::ONE_HUNDRED), scale))
    }

    /// Supplied direct draw results of nominations standing in `district`.
    pub fn direct_draw_results_in(&self, district: DistrictId) -> Vec<NominationId> {
        let area = match self.election.districts().get(district) {
            Some(area) => area,
            None => return Vec::new(),
        };
        self.direct_draw_results
            .iter()
            .copied()
            .filter(|id| {
                self.election
                    .nomination(*id)
                    .map_or(false, |nomination| area.contains(nomination.district()))
            })
            .collect()
    }

    /// Merges results of the same election.
    ///
    /// Declared ballot counts are kept where all results agree and become
    /// unknown where they differ. Draw results are combined and ballots are
    /// concatenated in order. Merging a filtered result keeps ignoring draw
    /// results that match no tie.
    pub fn add(&self, others: &[&ElectionResult<'a>]) -> Result<ElectionResult<'a>> {
        if let Some(other) = others
            .iter()
            .find(|other| other.election.id() != self.election.id())
        {
            return Err(ElectionError::ElectionMismatch {
                subject: "Result".to_string(),
                actual: other.election.id().to_string(),
                expected: self.election.id().to_string(),
            });
        }

        let all: Vec<&ElectionResult<'a>> = std::iter::once(self).chain(others.iter().copied()).collect();
        let tree = self.election.districts();
        let mut declared_ballots = DistrictValues::new(tree.root().id());
        for district in tree.iter() {
            let values: BTreeSet<u32> = all
                .iter()
                .filter_map(|result| result.declared_ballots.recorded(district.id()).flatten())
                .collect();
            match values.len() {
                0 => {}
                1 => declared_ballots.put(tree, district.id(), values.into_iter().next())?,
                _ => declared_ballots.put(tree, district.id(), None)?,
            }
        }

        let direct_draw_results = all
            .iter()
            .flat_map(|result| result.direct_draw_results.iter().copied())
            .collect();
        let list_draw_results = all
            .iter()
            .flat_map(|result| result.list_draw_results.iter().copied())
            .collect();
        let ballots = all
            .iter()
            .flat_map(|result| result.ballots.iter().cloned())
            .collect();
        let draw_check = if all.iter().all(|result| result.draw_check == DrawCheck::Strict) {
            DrawCheck::Strict
        } else {
            DrawCheck::Lenient
        };

        ElectionResult::evaluate(
            self.election,
            self.scale,
            declared_ballots,
            direct_draw_results,
            list_draw_results,
            ballots,
            draw_check,
        )
    }

    /// Evaluates the ballots matching `predicate`. Declared ballot counts are dropped.
    pub fn filter<P>(&self, predicate: P) -> Result<ElectionResult<'a>>
    where
        P: Fn(&Ballot) -> bool,
    {
        let ballots = self
            .ballots
            .iter()
            .filter(|ballot| predicate(*ballot))
            .cloned()
            .collect();
        ElectionResult::evaluate(
            self.election,
            self.scale,
            DistrictValues::new(self.election.districts().root().id()),
            self.direct_draw_results.clone(),
            self.list_draw_results.clone(),
            ballots,
            DrawCheck::Lenient,
        )
    }

    /// Evaluates the ballots cast within `district`, keeping the declared
    /// ballot counts recorded for it and its descendants.
    pub fn filter_by_district(&self, district: DistrictId) -> Result<ElectionResult<'a>> {
        let tree = self.election.districts();
        let area = tree.resolve(district)?;
        let mut declared_ballots = DistrictValues::new(tree.root().id());
        for inner in std::iter::once(area).chain(area.all_children()) {
            if let Some(value) = self.declared_ballots.recorded(inner.id()) {
                declared_ballots.put(tree, inner.id(), value)?;
            }
        }
        let ballots = self
            .ballots
            .iter()
            .filter(|ballot| area.contains(ballot.polling_station()))
            .cloned()
            .collect();
        ElectionResult::evaluate(
            self.election,
            self.scale,
            declared_ballots,
            self.direct_draw_results.clone(),
            self.list_draw_results.clone(),
            ballots,
            DrawCheck::Lenient,
        )
    }
}

fn party_results(
    election: &Election,
    ballots: &[Ballot],
    apportionment: &apportionment::Apportionment,
    certainty: &certainty::Certainty,
) -> Result<Vec<PartyResult>> {
    let types = election.nomination_types()?;
    let nominations = election.nominations();
    Ok(election
        .parties()
        .into_iter()
        .map(|party| {
            let members: Vec<usize> = (0..nominations.len())
                .filter(|&index| nominations[index].party() == Some(party))
                .collect();
            let number_of_ballots = ballots
                .iter()
                .filter(|ballot| {
                    ballot.is_valid()
                        && ballot
                            .nominations()
                            .iter()
                            .any(|id| members.contains(&id.index()))
                })
                .count();
            let number_of_block_votings = ballots
                .iter()
                .filter(|ballot| election.block_voting_party_with(ballot, &types) == Some(party))
                .count();
            PartyResult {
                party: party.clone(),
                number_of_votes: members
                    .iter()
                    .map(|&index| u64::from(apportionment.votes[index]))
                    .sum(),
                number_of_ballots,
                number_of_seats: members
                    .iter()
                    .filter(|&&index| apportionment.result_types[index].holds_seat())
                    .count(),
                number_of_block_votings,
                number_of_certain_direct_seats: certainty.direct_seats.get(party).copied().unwrap_or(0),
                number_of_certain_list_seats: certainty.list_seats.get(party).copied().unwrap_or(0),
            }
        })
        .sorted_by(|a, b| {
            b.number_of_votes
                .cmp(&a.number_of_votes)
                .then_with(|| a.party.cmp(&b.party))
        })
        .collect())
}

/// Collects the inputs of an [`ElectionResult`].
#[derive(Debug, Clone)]
pub struct ElectionResultBuilder<'a> {
    election: &'a Election,
    scale: u32,
    declared_ballots: Vec<(DistrictId, Option<u32>)>,
    direct_draw_results: BTreeSet<NominationId>,
    list_draw_results: BTreeSet<NominationId>,
    ballots: Vec<Ballot>,
}

impl<'a> ElectionResultBuilder<'a> {
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn options(mut self, options: &EvaluationOptions) -> Self {
        if let Some(scale) = options.sainte_lague_scale {
            self.scale = scale;
        }
        self
    }

    pub fn declared_ballots(mut self, district: DistrictId, count: Option<u32>) -> Self {
        self.declared_ballots.push((district, count));
        self
    }

    pub fn direct_draw_result(mut self, nomination: NominationId) -> Self {
        self.direct_draw_results.insert(nomination);
        self
    }

    pub fn list_draw_result(mut self, nomination: NominationId) -> Self {
        self.list_draw_results.insert(nomination);
        self
    }

    pub fn ballots(mut self, ballots: impl IntoIterator<Item = Ballot>) -> Self {
        self.ballots.extend(ballots);
        self
    }

    pub fn build(self) -> Result<ElectionResult<'a>> {
        let tree = self.election.districts();
        let mut declared_ballots = DistrictValues::new(tree.root().id());
        for (district, count) in self.declared_ballots {
            declared_ballots.put(tree, district, count)?;
        }
        ElectionResult::new(
            self.election,
            self.scale,
            declared_ballots,
            self.direct_draw_results,
            self.list_draw_results,
            self.ballots,
        )
    }
}
