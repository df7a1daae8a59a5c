#![allow(dead_code)]

use chrono::NaiveDate;
use local_election::model::{
    Ballot, DistrictId, DistrictTree, Election, ElectionAreaType, NominationId, Party, PartyType,
    Person,
};
use std::collections::BTreeSet;

pub const PARTIES: [&str; 4] = ["CDU", "SPD", "AWG", "FWR"];

/// Municipality of 1200 inhabitants: 5 list seats, 6 direct seats, 11 in total.
pub struct Rethwisch {
    pub election: Election,
    pub district: DistrictId,
    pub klein_boden: DistrictId,
    pub rethwischdorf: DistrictId,
}

impl Rethwisch {
    pub fn new() -> Self {
        let mut tree = DistrictTree::new("Rethwisch", ElectionAreaType::Municipality);
        let district = tree.create_child(tree.root().id(), "Rethwisch").unwrap();
        let klein_boden = tree.create_child(district, "Klein Boden").unwrap();
        let rethwischdorf = tree.create_child(district, "Rethwischdorf").unwrap();

        let mut election = Election::new(
            "Gemeindewahl Rethwisch",
            NaiveDate::from_ymd_opt(2023, 5, 14).unwrap(),
            tree,
        );
        election.set_population(klein_boden, Some(330)).unwrap();
        election.set_population(rethwischdorf, Some(870)).unwrap();
        election
            .set_number_of_eligible_voters(klein_boden, Some(273))
            .unwrap();
        election
            .set_number_of_eligible_voters(rethwischdorf, Some(717))
            .unwrap();

        for short_name in PARTIES {
            let party = party(short_name);
            for number in 1..=6 {
                election
                    .create_nomination(
                        district,
                        Person::new(short_name, number.to_string()),
                        Some(party.clone()),
                    )
                    .unwrap();
            }
        }

        Self {
            election,
            district,
            klein_boden,
            rethwischdorf,
        }
    }

    pub fn root(&self) -> DistrictId {
        self.election.districts().root().id()
    }

    /// Nomination `number` (1 based) of the party with `short_name`.
    pub fn nomination(&self, short_name: &str, number: u32) -> NominationId {
        self.election
            .find_nomination_by_key(&format!("{}, {}", short_name, number))
            .unwrap()
            .id()
    }

    /// Casts `count` identical valid ballots.
    pub fn cast(&mut self, station: DistrictId, count: usize, votes: &[(&str, u32)]) -> Vec<Ballot> {
        let nominations: BTreeSet<NominationId> = votes
            .iter()
            .map(|(party, number)| self.nomination(party, *number))
            .collect();
        (0..count)
            .map(|_| {
                self.election
                    .create_valid_ballot(station, false, nominations.clone())
                    .unwrap()
                    .clone()
            })
            .collect()
    }

    pub fn cast_invalid(&mut self, station: DistrictId, count: usize) -> Vec<Ballot> {
        (0..count)
            .map(|_| {
                self.election
                    .create_invalid_ballot(station, false)
                    .unwrap()
                    .clone()
            })
            .collect()
    }

    /// Casts single-vote ballots, `votes[i]` for nomination `i + 1` of each party.
    pub fn cast_single_votes(&mut self, station: DistrictId, votes: &[(&str, [u32; 6])]) -> Vec<Ballot> {
        let mut ballots = Vec::new();
        for (party, counts) in votes {
            for (number, count) in counts.iter().enumerate() {
                ballots.extend(self.cast(station, *count as usize, &[(*party, number as u32 + 1)]));
            }
        }
        ballots
    }

    /// Ballots of Klein Boden: 191 cast, 2 invalid, 417 CDU votes, 27 CDU block votes.
    pub fn cast_klein_boden(&mut self) -> Vec<Ballot> {
        let station = self.klein_boden;
        let cdu = |n: u32| -> Vec<(&'static str, u32)> { (1..=n).map(|i| ("CDU", i)).collect() };
        let mut ballots = Vec::new();
        ballots.extend(self.cast(station, 27, &cdu(6)));
        ballots.extend(self.cast(station, 23, &cdu(5)));
        ballots.extend(self.cast(station, 20, &cdu(4)));
        ballots.extend(self.cast(station, 10, &cdu(3)));
        ballots.extend(self.cast(station, 10, &cdu(2)));
        ballots.extend(self.cast(station, 10, &cdu(1)));
        ballots.extend(self.cast(station, 60, &[("SPD", 1)]));
        ballots.extend(self.cast(station, 29, &[("SPD", 1), ("SPD", 2)]));
        ballots.extend(self.cast_invalid(station, 2));
        ballots
    }

    /// Ballots of Rethwischdorf: 436 cast, 1 invalid.
    pub fn cast_rethwischdorf(&mut self) -> Vec<Ballot> {
        let station = self.rethwischdorf;
        let mut ballots = Vec::new();
        ballots.extend(self.cast(station, 200, &[("FWR", 1)]));
        ballots.extend(self.cast(station, 150, &[("AWG", 1), ("AWG", 2)]));
        ballots.extend(self.cast(station, 85, &[("SPD", 1), ("FWR", 1)]));
        ballots.extend(self.cast_invalid(station, 1));
        ballots
    }
}

pub fn party(short_name: &str) -> Party {
    match short_name {
        "CDU" => Party::new(
            PartyType::PoliticalParty,
            "CDU",
            "Christlich Demokratische Union Deutschlands",
        ),
        "SPD" => Party::new(
            PartyType::PoliticalParty,
            "SPD",
            "Sozialdemokratische Partei Deutschlands",
        ),
        "AWG" => Party::new(
            PartyType::AssociationOfVoters,
            "AWG",
            "Aktive Wählergemeinschaft Rethwisch",
        ),
        _ => Party::new(
            PartyType::AssociationOfVoters,
            short_name,
            "Freie Wähler Rethwisch",
        ),
    }
}

/// Municipality of 1200 inhabitants split into the sub-districts Nord and Süd,
/// three direct seats each. CDU and SPD nominate four persons per sub-district.
pub struct Musterdorf {
    pub election: Election,
    pub nord: DistrictId,
    pub sued: DistrictId,
    pub schule_nord: DistrictId,
    pub schule_sued: DistrictId,
}

impl Musterdorf {
    pub fn new() -> Self {
        let mut tree = DistrictTree::new("Musterdorf", ElectionAreaType::Municipality);
        let root = tree.root().id();
        let nord = tree.create_child(root, "Nord").unwrap();
        let sued = tree.create_child(root, "Süd").unwrap();
        let schule_nord = tree.create_child(nord, "Schule Nord").unwrap();
        let schule_sued = tree.create_child(sued, "Schule Süd").unwrap();

        let mut election = Election::new(
            "Gemeindewahl Musterdorf",
            NaiveDate::from_ymd_opt(2023, 5, 14).unwrap(),
            tree,
        );
        election.set_population(root, Some(1_200)).unwrap();

        for (district, name) in [(nord, "Nord"), (sued, "Süd")] {
            for short_name in ["CDU", "SPD"] {
                for number in 1..=4 {
                    election
                        .create_nomination(
                            district,
                            Person::new(short_name, format!("{} {}", name, number)),
                            Some(party(short_name)),
                        )
                        .unwrap();
                }
            }
        }

        Self {
            election,
            nord,
            sued,
            schule_nord,
            schule_sued,
        }
    }

    pub fn root(&self) -> DistrictId {
        self.election.districts().root().id()
    }

    /// Nomination `number` (1 based) of the party in the sub-district `district`.
    pub fn nomination(&self, short_name: &str, district: &str, number: u32) -> NominationId {
        self.election
            .find_nomination_by_key(&format!("{}, {} {}", short_name, district, number))
            .unwrap()
            .id()
    }

    /// Casts `count` identical valid ballots of (party, sub-district, number) votes.
    pub fn cast(&mut self, station: DistrictId, count: usize, votes: &[(&str, &str, u32)]) -> Vec<Ballot> {
        let nominations: BTreeSet<NominationId> = votes
            .iter()
            .map(|(party, district, number)| self.nomination(party, district, *number))
            .collect();
        (0..count)
            .map(|_| {
                self.election
                    .create_valid_ballot(station, false, nominations.clone())
                    .unwrap()
                    .clone()
            })
            .collect()
    }

    /// Casts single-vote ballots in the polling station of `district`,
    /// `votes[i]` for nomination `i + 1` of the party.
    pub fn cast_single_votes(&mut self, district: &str, votes: &[(&str, [u32; 4])]) -> Vec<Ballot> {
        let station = if district == "Nord" {
            self.schule_nord
        } else {
            self.schule_sued
        };
        let mut ballots = Vec::new();
        for (party, counts) in votes {
            for (number, count) in counts.iter().enumerate() {
                ballots.extend(self.cast(station, *count as usize, &[(*party, district, number as u32 + 1)]));
            }
        }
        ballots
    }
}
