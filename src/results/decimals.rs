use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half-up to exactly `scale` decimal places.
pub fn round(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Sainte-Laguë value of the `index`-th seat (zero based): `votes / (index + 0.5)`.
pub fn sainte_lague(votes: u64, index: usize, scale: u32) -> Decimal {
    let divisor = Decimal::new(index as i64 * 10 + 5, 1);
    round(Decimal::from(votes) / divisor, scale)
}

/// `100 × part / whole`, unknown for an unknown or zero whole.
pub fn percentage(part: u64, whole: Option<u32>, scale: u32) -> Option<Decimal> {
    match whole {
        Some(whole) if whole > 0 => Some(round(
            Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole),
            scale,
        )),
        _ => None,
    }
}
