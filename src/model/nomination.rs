use super::district::DistrictId;
use super::election::ElectionId;
use super::party::Party;
use super::person::Person;

/// Handle of a nomination, stable in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NominationId {
    pub(crate) election: ElectionId,
    pub(crate) index: usize,
}

impl NominationId {
    pub fn election(&self) -> ElectionId {
        self.election
    }

    /// Position in the election's registry.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Display for NominationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NominationType {
    Direct,
    List,
}

/// A person standing in one sub-district, optionally for a party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nomination {
    pub(crate) id: NominationId,
    pub(crate) district: DistrictId,
    pub(crate) party: Option<Party>,
    pub(crate) person: Person,
}

impl Nomination {
    pub fn id(&self) -> NominationId {
        self.id
    }

    pub fn district(&self) -> DistrictId {
        self.district
    }

    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn key(&self) -> String {
        self.person.key()
    }
}

impl std::fmt::Display for Nomination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.party {
            Some(party) => write!(f, "{} ({})", self.person, party),
            None => write!(f, "{}", self.person),
        }
    }
}
