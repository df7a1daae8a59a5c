//! Result evaluation for municipal and county elections in Schleswig-Holstein.
//!
//! An [`Election`](model::Election) registers the district hierarchy,
//! nominations and ballots. An [`ElectionResult`](results::ElectionResult)
//! evaluates a snapshot of ballots into direct, list, balance and overhang
//! seats using Sainte-Laguë values, with ties resolved by externally drawn
//! lots.

pub mod formats;
pub mod model;
pub mod results;
