pub mod ballot;
pub mod district;
pub mod district_values;
pub mod election;
pub mod keys;
pub mod nomination;
pub mod party;
pub mod person;
pub mod seats;

pub use ballot::Ballot;
pub use district::{District, DistrictId, DistrictKind, DistrictTree, ElectionAreaType};
pub use district_values::DistrictValues;
pub use election::{Election, ElectionId};
pub use nomination::{Nomination, NominationId, NominationType};
pub use party::{Party, PartyType};
pub use person::Person;
pub use seats::SeatCounts;

/// Which draw stage a draw result was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Direct,
    List,
}

impl std::fmt::Display for DrawKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawKind::Direct => write!(f, "direct"),
            DrawKind::List => write!(f, "list"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElectionError {
    #[error("{subject} belongs to election \"{actual}\", expected election \"{expected}\"")]
    ElectionMismatch {
        subject: String,
        actual: String,
        expected: String,
    },
    #[error("District \"{0}\" is not part of the district hierarchy")]
    OutOfHierarchy(String),
    #[error("A value has already been recorded for district \"{0}\"")]
    DuplicateValue(String),
    #[error("Another district with name \"{name}\" already exists as child of \"{parent}\"")]
    DuplicateDistrict { name: String, parent: String },
    #[error("District \"{0}\" is a polling station and cannot have children")]
    LeafDistrict(String),
    #[error("District \"{name}\" is a {actual}, expected a {expected}")]
    WrongDistrictKind {
        name: String,
        actual: String,
        expected: String,
    },
    #[error("Missing population information for district \"{0}\"")]
    MissingPopulation(String),
    #[error("A population of {0} is too low to calculate the number of seats")]
    PopulationTooLow(u32),
    #[error("District \"{0}\" has no sub-districts to distribute direct seats to")]
    NoSubDistricts(String),
    #[error("Nomination \"{nomination}\" already exists in district \"{district}\"")]
    DuplicateNomination { nomination: String, district: String },
    #[error("Unknown nomination {0}")]
    UnknownNomination(String),
    #[error("Nomination \"{0}\" is a list nomination, ballots may contain direct nominations only")]
    NotDirect(String),
    #[error("Ballot contains {count} nominations, at most {max} are permitted")]
    TooManyVotes { count: usize, max: u32 },
    #[error("A valid ballot must contain at least one nomination")]
    EmptyBallot,
    #[error("{count} {kind} draw results given, expecting {max} {kind} draw results at most")]
    TooManyDrawResults {
        kind: DrawKind,
        count: usize,
        max: usize,
    },
    #[error("Nomination \"{nomination}\" is not part of a tie and must not be a {kind} draw result")]
    NotInTieGroup { kind: DrawKind, nomination: String },
    #[error("Scale {0} is out of range, at most 28 decimal places are supported")]
    ScaleOutOfRange(u32),
}

pub type Result<T> = std::result::Result<T, ElectionError>;
