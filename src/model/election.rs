use super::ballot::Ballot;
use super::district::{District, DistrictId, DistrictKind, DistrictTree};
use super::district_values::DistrictValues;
use super::nomination::{Nomination, NominationId, NominationType};
use super::party::Party;
use super::person::Person;
use super::seats::{self, SeatCounts};
use super::{ElectionError, Result};
use chrono::NaiveDate;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uuid::Uuid;

/// Default number of decimal places Sainte-Laguë values are rounded to.
pub const SAINTE_LAGUE_SCALE_DEFAULT: u32 = 2;

/// Largest scale representable by `rust_decimal`.
pub const MAX_SCALE: u32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElectionId(Uuid);

impl std::fmt::Display for ElectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry of one election: its districts, nominations and cast ballots.
///
/// Everything registered is append-only. Results borrow the election and
/// take a snapshot of the ballots they evaluate.
///
/// A clone is a separate election with a fresh id. Its nominations and
/// ballots are copied and rebound to the new id, so ballots of one cannot
/// be evaluated against the other.
#[derive(Debug)]
pub struct Election {
    id: ElectionId,
    name: String,
    date: NaiveDate,
    districts: DistrictTree,
    sainte_lague_scale: u32,
    population: DistrictValues,
    number_of_eligible_voters: DistrictValues,
    nominations: Vec<Nomination>,
    ballots: Vec<Ballot>,
}

impl Clone for Election {
    fn clone(&self) -> Self {
        let id = ElectionId(Uuid::new_v4());
        let rebind = |nomination: NominationId| NominationId {
            election: id,
            index: nomination.index,
        };
        Self {
            id,
            name: self.name.clone(),
            date: self.date,
            districts: self.districts.clone(),
            sainte_lague_scale: self.sainte_lague_scale,
            population: self.population.clone(),
            number_of_eligible_voters: self.number_of_eligible_voters.clone(),
            nominations: self
                .nominations
                .iter()
                .map(|nomination| Nomination {
                    id: rebind(nomination.id),
                    ..nomination.clone()
                })
                .collect(),
            ballots: self
                .ballots
                .iter()
                .map(|ballot| Ballot {
                    election: id,
                    nominations: ballot.nominations.iter().copied().map(rebind).collect(),
                    ..ballot.clone()
                })
                .collect(),
        }
    }
}

impl Election {
    pub fn new(name: impl Into<String>, date: NaiveDate, districts: DistrictTree) -> Self {
        let root = districts.root().id();
        Self {
            id: ElectionId(Uuid::new_v4()),
            name: name.into(),
            date,
            districts,
            sainte_lague_scale: SAINTE_LAGUE_SCALE_DEFAULT,
            population: DistrictValues::new(root),
            number_of_eligible_voters: DistrictValues::new(root),
            nominations: Vec::new(),
            ballots: Vec::new(),
        }
    }

    pub fn id(&self) -> ElectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn districts(&self) -> &DistrictTree {
        &self.districts
    }

    pub fn district(&self, id: DistrictId) -> Result<District<'_>> {
        self.districts.resolve(id)
    }

    pub fn create_district(&mut self, parent: DistrictId, name: impl Into<String>) -> Result<DistrictId> {
        self.districts.create_child(parent, name)
    }

    pub fn sainte_lague_scale(&self) -> u32 {
        self.sainte_lague_scale
    }

    pub fn set_sainte_lague_scale(&mut self, scale: u32) -> Result<()> {
        if scale > MAX_SCALE {
            return Err(ElectionError::ScaleOutOfRange(scale));
        }
        self.sainte_lague_scale = scale;
        Ok(())
    }

    pub fn population(&self, district: DistrictId) -> Option<u32> {
        self.population.get(&self.districts, district)
    }

    pub fn set_population(&mut self, district: DistrictId, population: Option<u32>) -> Result<()> {
        self.population.put(&self.districts, district, population)
    }

    pub fn put_population_by_key(&mut self, values: &BTreeMap<String, Option<u32>>) -> Result<()> {
        self.population.put_all_by_key(&self.districts, values)
    }

    pub fn number_of_eligible_voters(&self, district: DistrictId) -> Option<u32> {
        self.number_of_eligible_voters.get(&self.districts, district)
    }

    pub fn set_number_of_eligible_voters(
        &mut self,
        district: DistrictId,
        eligible_voters: Option<u32>,
    ) -> Result<()> {
        self.number_of_eligible_voters
            .put(&self.districts, district, eligible_voters)
    }

    pub fn put_eligible_voters_by_key(&mut self, values: &BTreeMap<String, Option<u32>>) -> Result<()> {
        self.number_of_eligible_voters
            .put_all_by_key(&self.districts, values)
    }

    /// Seat numbers derived from the population of the whole election area.
    pub fn seat_counts(&self) -> Result<SeatCounts> {
        let root = self.districts.root();
        let population = self
            .population(root.id())
            .ok_or_else(|| ElectionError::MissingPopulation(root.name().to_string()))?;
        let districts = self.districts.sub_districts().count() as u32;
        if districts == 0 {
            return Err(ElectionError::NoSubDistricts(root.name().to_string()));
        }

        let area_type = self.districts.area_type();
        let counts = SeatCounts::new(area_type, population, districts)?;
        let by_law = seats::number_of_districts_by_law(area_type, population)?;
        if by_law != districts {
            tracing::warn!(
                election = %self.name,
                configured = districts,
                by_law,
                "number of sub-districts differs from the statutory number"
            );
        }
        Ok(counts)
    }

    pub fn number_of_list_seats(&self) -> Result<u32> {
        Ok(self.seat_counts()?.list_seats)
    }

    pub fn number_of_direct_seats(&self) -> Result<u32> {
        Ok(self.seat_counts()?.direct_seats)
    }

    pub fn number_of_seats(&self) -> Result<u32> {
        Ok(self.seat_counts()?.total_seats)
    }

    pub fn number_of_direct_seats_per_district(&self) -> Result<u32> {
        Ok(self.seat_counts()?.direct_seats_per_district)
    }

    pub fn number_of_votes_per_ballot(&self) -> Result<u32> {
        Ok(self.seat_counts()?.votes_per_ballot())
    }

    /// Registers a nomination for a sub-district.
    ///
    /// The same person may only be nominated once per sub-district.
    pub fn create_nomination(
        &mut self,
        district: DistrictId,
        person: Person,
        party: Option<Party>,
    ) -> Result<NominationId> {
        let target = self.districts.resolve(district)?;
        if target.kind() != DistrictKind::District {
            return Err(ElectionError::WrongDistrictKind {
                name: target.name().to_string(),
                actual: target.kind().to_string(),
                expected: DistrictKind::District.to_string(),
            });
        }
        let key = person.key();
        if self
            .nominations
            .iter()
            .any(|n| n.district == district && n.key() == key)
        {
            return Err(ElectionError::DuplicateNomination {
                nomination: key,
                district: target.key(),
            });
        }

        let id = NominationId {
            election: self.id,
            index: self.nominations.len(),
        };
        self.nominations.push(Nomination {
            id,
            district,
            party,
            person,
        });
        Ok(id)
    }

    pub fn nominations(&self) -> &[Nomination] {
        &self.nominations
    }

    pub fn nomination(&self, id: NominationId) -> Option<&Nomination> {
        if id.election != self.id {
            return None;
        }
        self.nominations.get(id.index)
    }

    pub fn find_nomination_by_key(&self, key: &str) -> Option<&Nomination> {
        self.nominations.iter().find(|n| n.key() == key)
    }

    pub fn nominations_of_party<'a>(&'a self, party: &'a Party) -> impl Iterator<Item = &'a Nomination> + 'a {
        self.nominations
            .iter()
            .filter(move |n| n.party.as_ref() == Some(party))
    }

    /// Distinct parties of all nominations, sorted.
    pub fn parties(&self) -> Vec<&Party> {
        self.nominations
            .iter()
            .filter_map(Nomination::party)
            .unique()
            .sorted()
            .collect()
    }

    /// Direct/list classification of every nomination, in registry order.
    ///
    /// A party's nominations within a sub-district are direct nominations up
    /// to the number of direct seats per sub-district, list nominations after
    /// that. Independent nominations are always direct.
    pub fn nomination_types(&self) -> Result<Vec<NominationType>> {
        let per_district = self.number_of_direct_seats_per_district()?;
        let mut positions: HashMap<(DistrictId, &Party), u32> = HashMap::new();
        Ok(self
            .nominations
            .iter()
            .map(|nomination| match &nomination.party {
                None => NominationType::Direct,
                Some(party) => {
                    let position = positions.entry((nomination.district, party)).or_insert(0);
                    let nomination_type = if *position < per_district {
                        NominationType::Direct
                    } else {
                        NominationType::List
                    };
                    *position += 1;
                    nomination_type
                }
            })
            .collect())
    }

    pub fn nomination_type(&self, id: NominationId) -> Result<NominationType> {
        let nomination = self
            .nomination(id)
            .ok_or_else(|| ElectionError::UnknownNomination(id.to_string()))?;
        Ok(self.nomination_types()?[nomination.id.index])
    }

    /// The party a ballot was cast en bloc for, if any.
    ///
    /// A block vote is a valid ballot marking exactly the direct nominations
    /// of one party in the ballot's sub-district.
    pub fn block_voting_party(&self, ballot: &Ballot) -> Result<Option<&Party>> {
        let types = self.nomination_types()?;
        Ok(self.block_voting_party_with(ballot, &types))
    }

    pub(crate) fn block_voting_party_with(
        &self,
        ballot: &Ballot,
        types: &[NominationType],
    ) -> Option<&Party> {
        if !ballot.valid || ballot.election != self.id {
            return None;
        }
        let mut parties = ballot
            .nominations
            .iter()
            .map(|id| self.nominations.get(id.index).and_then(Nomination::party));
        let party = parties.next()??;
        if !parties.all(|other| other == Some(party)) {
            return None;
        }
        let sub_district = self
            .districts
            .get(ballot.polling_station)?
            .sub_district()?
            .id();
        let expected: BTreeSet<NominationId> = self
            .nominations
            .iter()
            .filter(|n| {
                n.district == sub_district
                    && n.party.as_ref() == Some(party)
                    && types.get(n.id.index) == Some(&NominationType::Direct)
            })
            .map(Nomination::id)
            .collect();
        if expected == ballot.nominations {
            Some(party)
        } else {
            None
        }
    }

    /// Registers a valid ballot after checking its content.
    pub fn create_valid_ballot(
        &mut self,
        polling_station: DistrictId,
        postal_vote: bool,
        nominations: BTreeSet<NominationId>,
    ) -> Result<&Ballot> {
        self.check_polling_station(polling_station)?;
        if nominations.is_empty() {
            return Err(ElectionError::EmptyBallot);
        }
        let max = self.number_of_votes_per_ballot()?;
        if nominations.len() > max as usize {
            return Err(ElectionError::TooManyVotes {
                count: nominations.len(),
                max,
            });
        }
        let types = self.nomination_types()?;
        for id in &nominations {
            let nomination = self.nomination(*id).ok_or_else(|| {
                if id.election != self.id {
                    ElectionError::ElectionMismatch {
                        subject: format!("Nomination {}", id),
                        actual: id.election.to_string(),
                        expected: self.id.to_string(),
                    }
                } else {
                    ElectionError::UnknownNomination(id.to_string())
                }
            })?;
            if types[nomination.id.index] != NominationType::Direct {
                return Err(ElectionError::NotDirect(nomination.key()));
            }
        }

        Ok(self.push_ballot(Ballot {
            election: self.id,
            polling_station,
            postal_vote,
            valid: true,
            nominations,
        }))
    }

    pub fn create_invalid_ballot(&mut self, polling_station: DistrictId, postal_vote: bool) -> Result<&Ballot> {
        self.check_polling_station(polling_station)?;
        Ok(self.push_ballot(Ballot {
            election: self.id,
            polling_station,
            postal_vote,
            valid: false,
            nominations: BTreeSet::new(),
        }))
    }

    fn push_ballot(&mut self, ballot: Ballot) -> &Ballot {
        self.ballots.push(ballot);
        &self.ballots[self.ballots.len() - 1]
    }

    fn check_polling_station(&self, polling_station: DistrictId) -> Result<()> {
        let district = self.districts.resolve(polling_station)?;
        if district.kind() != DistrictKind::PollingStation {
            return Err(ElectionError::WrongDistrictKind {
                name: district.name().to_string(),
                actual: district.kind().to_string(),
                expected: DistrictKind::PollingStation.to_string(),
            });
        }
        Ok(())
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }
}
