//! JSON files describing an election and the ballots counted for it.
//!
//! Districts are referenced by district key, nominations by person key and
//! parties by short name.

use crate::model::{
    DistrictKind, DistrictTree, Election, ElectionAreaType, ElectionError, NominationId, Party,
    Person,
};
use crate::model::{Ballot, DistrictId};
use crate::results::{ElectionResult, EvaluationOptions};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Election(#[from] ElectionError),
    #[error("Unknown district \"{0}\"")]
    UnknownDistrict(String),
    #[error("Unknown party \"{0}\"")]
    UnknownParty(String),
    #[error("Unknown nomination \"{0}\"")]
    UnknownNomination(String),
}

pub type Result<T> = std::result::Result<T, FormatError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionFile {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sainte_lague_scale: Option<u32>,
    pub district: RootRecord,
    #[serde(default)]
    pub population: BTreeMap<String, Option<u32>>,
    #[serde(default)]
    pub number_of_eligible_voters: BTreeMap<String, Option<u32>>,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub nominations: Vec<NominationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub area_type: ElectionAreaType,
    #[serde(default)]
    pub districts: Vec<DistrictRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRecord {
    pub name: String,
    #[serde(default)]
    pub polling_stations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationRecord {
    /// Key of the sub-district.
    pub district: String,
    /// Short name of the party, absent for independent candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    pub person: Person,
}

impl ElectionFile {
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn into_election(self) -> Result<Election> {
        let mut tree = DistrictTree::new(self.district.name, self.district.area_type);
        let root = tree.root().id();
        for district in self.district.districts {
            let id = tree.create_child(root, district.name)?;
            for station in district.polling_stations {
                tree.create_child(id, station)?;
            }
        }

        let mut election = Election::new(self.name, self.date, tree);
        if let Some(scale) = self.sainte_lague_scale {
            election.set_sainte_lague_scale(scale)?;
        }
        election.put_population_by_key(&self.population)?;
        election.put_eligible_voters_by_key(&self.number_of_eligible_voters)?;

        let parties: BTreeMap<String, Party> = self
            .parties
            .into_iter()
            .map(|party| (party.short_name.clone(), party))
            .collect();
        for record in self.nominations {
            let district = district_by_key(&election, &record.district, DistrictKind::District)?;
            let party = match record.party {
                Some(short_name) => Some(
                    parties
                        .get(&short_name)
                        .cloned()
                        .ok_or(FormatError::UnknownParty(short_name))?,
                ),
                None => None,
            };
            election.create_nomination(district, record.person, party)?;
        }

        tracing::debug!(
            election = election.name(),
            districts = election.districts().len(),
            nominations = election.nominations().len(),
            "loaded election"
        );
        Ok(election)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFile {
    /// Declared number of ballots per district key.
    #[serde(default)]
    pub number_of_all_ballots: BTreeMap<String, u32>,
    #[serde(default)]
    pub direct_draw_results: Vec<String>,
    #[serde(default)]
    pub list_draw_results: Vec<String>,
    #[serde(default)]
    pub ballots: Vec<BallotRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotRecord {
    pub polling_station: String,
    #[serde(default)]
    pub postal_vote: bool,
    pub valid: bool,
    #[serde(default)]
    pub nominations: Vec<String>,
}

/// A ballot record that could not be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Position of the record in the file.
    pub index: usize,
    pub message: String,
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ballot {}: {}", self.index + 1, self.message)
    }
}

/// Everything read from a result file, with the records that failed.
#[derive(Debug, Clone, Default)]
pub struct LoadedResult {
    pub declared_ballots: Vec<(DistrictId, u32)>,
    pub direct_draw_results: BTreeSet<NominationId>,
    pub list_draw_results: BTreeSet<NominationId>,
    pub ballots: Vec<Ballot>,
    pub errors: Vec<RecordError>,
}

impl ResultFile {
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Registers the ballots of this file with `election`.
    ///
    /// Broken ballot records are skipped and reported in
    /// [`LoadedResult::errors`]. Unknown districts or draw results fail the
    /// whole file.
    pub fn load(self, election: &mut Election) -> Result<LoadedResult> {
        let mut loaded = LoadedResult::default();
        for (key, count) in &self.number_of_all_ballots {
            let district = election
                .districts()
                .find_by_key(key)
                .ok_or_else(|| FormatError::UnknownDistrict(key.clone()))?;
            loaded.declared_ballots.push((district.id(), *count));
        }
        loaded.direct_draw_results = nominations_by_key(election, &self.direct_draw_results)?;
        loaded.list_draw_results = nominations_by_key(election, &self.list_draw_results)?;

        for (index, record) in self.ballots.into_iter().enumerate() {
            match load_ballot(election, record) {
                Ok(ballot) => loaded.ballots.push(ballot),
                Err(e) => {
                    tracing::warn!(record = index + 1, error = %e, "skipping ballot");
                    loaded.errors.push(RecordError {
                        index,
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(loaded)
    }
}

impl LoadedResult {
    pub fn into_result<'a>(
        self,
        election: &'a Election,
        options: &EvaluationOptions,
    ) -> std::result::Result<ElectionResult<'a>, ElectionError> {
        let mut builder = ElectionResult::builder(election)
            .options(options)
            .ballots(self.ballots);
        for (district, count) in self.declared_ballots {
            builder = builder.declared_ballots(district, Some(count));
        }
        for nomination in self.direct_draw_results {
            builder = builder.direct_draw_result(nomination);
        }
        for nomination in self.list_draw_results {
            builder = builder.list_draw_result(nomination);
        }
        builder.build()
    }
}

fn load_ballot(election: &mut Election, record: BallotRecord) -> Result<Ballot> {
    let station = district_by_key(election, &record.polling_station, DistrictKind::PollingStation)?;
    let ballot = if record.valid {
        let nominations = record
            .nominations
            .iter()
            .map(|key| {
                election
                    .find_nomination_by_key(key)
                    .map(|nomination| nomination.id())
                    .ok_or_else(|| FormatError::UnknownNomination(key.clone()))
            })
            .collect::<Result<BTreeSet<_>>>()?;
        election.create_valid_ballot(station, record.postal_vote, nominations)?
    } else {
        election.create_invalid_ballot(station, record.postal_vote)?
    };
    Ok(ballot.clone())
}

fn district_by_key(election: &Election, key: &str, kind: DistrictKind) -> Result<DistrictId> {
    let district = election
        .districts()
        .find_by_key(key)
        .ok_or_else(|| FormatError::UnknownDistrict(key.to_string()))?;
    if district.kind() != kind {
        return Err(ElectionError::WrongDistrictKind {
            name: district.name().to_string(),
            actual: district.kind().to_string(),
            expected: kind.to_string(),
        }
        .into());
    }
    Ok(district.id())
}

fn nominations_by_key(election: &Election, keys: &[String]) -> Result<BTreeSet<NominationId>> {
    keys.iter()
        .map(|key| {
            election
                .find_nomination_by_key(key)
                .map(|nomination| nomination.id())
                .ok_or_else(|| FormatError::UnknownNomination(key.clone()))
        })
        .collect()
}
