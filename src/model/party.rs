use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyType {
    PoliticalParty,
    /// Wählergruppe
    AssociationOfVoters,
}

/// A party or association of voters nominations can be affiliated with.
///
/// Parties order by type, then short name, then name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(rename = "type")]
    pub party_type: PartyType,
    pub short_name: String,
    pub name: String,
}

impl Party {
    pub fn new(party_type: PartyType, short_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            party_type,
            short_name: short_name.into(),
            name: name.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.short_name
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn political_parties_sort_before_associations() {
        let mut parties = vec![
            Party::new(PartyType::AssociationOfVoters, "AWG", "Aktive Wählergemeinschaft"),
            Party::new(PartyType::PoliticalParty, "SPD", "Sozialdemokratische Partei Deutschlands"),
            Party::new(PartyType::PoliticalParty, "CDU", "Christlich Demokratische Union Deutschlands"),
        ];
        parties.sort();
        let keys: Vec<&str> = parties.iter().map(Party::key).collect();
        assert_eq!(keys, vec!["CDU", "SPD", "AWG"]);
    }
}
