use crate::model::NominationId;
use rust_decimal::Decimal;
use serde::Serialize;

/// How a nomination came out of the apportionment.
///
/// Variants are declared in display precedence, so sorting by this type
/// lists direct results first and unelected nominations last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NominationResultType {
    Direct,
    /// Direct result ranked beyond the number of seats by Sainte-Laguë.
    DirectBalanceSeat,
    /// Waiting for a direct draw, but holds a list seat either way.
    DirectDrawList,
    List,
    ListOverhangSeat,
    DirectDraw,
    ListDraw,
    NotElected,
}

impl NominationResultType {
    /// True for every type but [`NominationResultType::NotElected`], draws included.
    pub fn holds_seat(&self) -> bool {
        *self != NominationResultType::NotElected
    }

    pub fn is_direct(&self) -> bool {
        matches!(
            self,
            NominationResultType::Direct | NominationResultType::DirectBalanceSeat
        )
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            NominationResultType::DirectDraw
                | NominationResultType::DirectDrawList
                | NominationResultType::ListDraw
        )
    }
}

impl std::fmt::Display for NominationResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NominationResultType::Direct => write!(f, "direct"),
            NominationResultType::DirectBalanceSeat => write!(f, "direct (balance seat)"),
            NominationResultType::DirectDrawList => write!(f, "direct draw (list seat certain)"),
            NominationResultType::List => write!(f, "list"),
            NominationResultType::ListOverhangSeat => write!(f, "list (overhang seat)"),
            NominationResultType::DirectDraw => write!(f, "direct draw"),
            NominationResultType::ListDraw => write!(f, "list draw"),
            NominationResultType::NotElected => write!(f, "not elected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominationResult {
    pub(crate) nomination: NominationId,
    pub(crate) result_type: NominationResultType,
    pub(crate) sainte_lague_value: Decimal,
    pub(crate) number_of_votes: u32,
    pub(crate) certain_result_type: Option<NominationResultType>,
}

impl NominationResult {
    pub fn nomination(&self) -> NominationId {
        self.nomination
    }

    pub fn result_type(&self) -> NominationResultType {
        self.result_type
    }

    /// Zero for nominations without a party or without party votes.
    pub fn sainte_lague_value(&self) -> Decimal {
        self.sainte_lague_value
    }

    pub fn number_of_votes(&self) -> u32 {
        self.number_of_votes
    }

    /// The result type the remaining ballots can no longer change.
    ///
    /// Only [`NominationResultType::Direct`], [`NominationResultType::List`]
    /// and [`NominationResultType::NotElected`] are ever certain, and only
    /// when declared ballot counts are known. `None` while the outcome is
    /// open or cannot be judged yet.
    pub fn certain_result_type(&self) -> Option<NominationResultType> {
        self.certain_result_type
    }
}

#[cfg(test)]
mod tests {
    use super::NominationResultType::*;

    #[test]
    fn precedence_follows_declaration_order() {
        let mut types = vec![NotElected, ListDraw, List, DirectDraw, Direct, ListOverhangSeat, DirectDrawList, DirectBalanceSeat];
        types.sort();
        assert_eq!(
            types,
            vec![Direct, DirectBalanceSeat, DirectDrawList, List, ListOverhangSeat, DirectDraw, ListDraw, NotElected]
        );
        assert!(DirectDraw.holds_seat());
        assert!(!NotElected.holds_seat());
        assert!(DirectBalanceSeat.is_direct());
        assert!(!DirectDrawList.is_direct());
    }
}
