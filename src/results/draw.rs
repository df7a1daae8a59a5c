use crate::model::{DrawKind, ElectionError, Result};
use std::collections::BTreeSet;

/// How draw results that match no tie are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawCheck {
    /// Every draw result must resolve a tie at the seat boundary.
    Strict,
    /// Draw results inherited by a subset of the ballots. Results outside the
    /// tie group are ignored, and too many results leave the tie open.
    Lenient,
}

/// Outcome of resolving the tie at the seat boundary of a ranking.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct DrawOutcome {
    /// Members that hold a seat, in ranking order.
    pub accepted: Vec<usize>,
    /// Tied members still waiting for a draw.
    pub open: Vec<usize>,
}

/// Resolves ties at the boundary of the first `seats` members of `ranking`.
///
/// `ranking` holds `(member, value)` pairs in ranking order. Members in
/// `fixed` already hold a seat through another stage; they stay accepted and
/// never take part in a draw. `draw_results` are the members that won an
/// external draw and are checked against the tie group as `check` says. An
/// empty ranking has no tie, and draw results are ignored for it.
pub(crate) fn resolve<V: PartialEq>(
    kind: DrawKind,
    ranking: &[(usize, V)],
    seats: usize,
    fixed: &BTreeSet<usize>,
    draw_results: &BTreeSet<usize>,
    check: DrawCheck,
    describe: impl Fn(usize) -> String,
) -> Result<DrawOutcome> {
    if ranking.is_empty() {
        return Ok(DrawOutcome::default());
    }
    let boundary = seats.min(ranking.len());
    let prefix = &ranking[..boundary];

    let last_value = match prefix.iter().rev().find(|(member, _)| !fixed.contains(member)) {
        Some((_, value)) => value,
        None => {
            if let (DrawCheck::Strict, Some(member)) = (check, draw_results.iter().next()) {
                return Err(ElectionError::NotInTieGroup {
                    kind,
                    nomination: describe(*member),
                });
            }
            return Ok(DrawOutcome {
                accepted: prefix.iter().map(|(member, _)| *member).collect(),
                open: Vec::new(),
            });
        }
    };

    // Positions and members tied with the last member inside the boundary.
    let group: Vec<(usize, usize)> = ranking
        .iter()
        .enumerate()
        .filter(|(_, (member, value))| value == last_value && !fixed.contains(member))
        .map(|(position, (member, _))| (position, *member))
        .collect();
    let inside = group.iter().filter(|(position, _)| *position < boundary).count();

    let lenient;
    let draw_results = match check {
        DrawCheck::Strict => draw_results,
        DrawCheck::Lenient => {
            let matching: BTreeSet<usize> = draw_results
                .iter()
                .copied()
                .filter(|member| group.iter().any(|(_, m)| m == member))
                .collect();
            lenient = if matching.len() > inside {
                BTreeSet::new()
            } else {
                matching
            };
            &lenient
        }
    };
    if draw_results.len() > inside {
        return Err(ElectionError::TooManyDrawResults {
            kind,
            count: draw_results.len(),
            max: inside,
        });
    }
    if let Some(stray) = draw_results
        .iter()
        .find(|member| !group.iter().any(|(_, m)| m == *member))
    {
        return Err(ElectionError::NotInTieGroup {
            kind,
            nomination: describe(*stray),
        });
    }

    if group.len() == inside {
        return Ok(DrawOutcome {
            accepted: prefix.iter().map(|(member, _)| *member).collect(),
            open: Vec::new(),
        });
    }

    let in_group = |member: &usize| group.iter().any(|(_, m)| m == member);
    let accepted = ranking
        .iter()
        .enumerate()
        .filter(|(position, (member, _))| {
            (*position < boundary && !in_group(member)) || draw_results.contains(member)
        })
        .map(|(_, (member, _))| *member)
        .collect();
    let open = if inside > draw_results.len() {
        group
            .iter()
            .map(|(_, member)| *member)
            .filter(|member| !draw_results.contains(member))
            .collect()
    } else {
        Vec::new()
    };
    Ok(DrawOutcome { accepted, open })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(members: &[usize]) -> BTreeSet<usize> {
        members.iter().copied().collect()
    }

    fn describe(member: usize) -> String {
        format!("#{}", member)
    }

    const RANKING: &[(usize, u32)] = &[(0, 30), (1, 30), (2, 25), (3, 10), (4, 10), (5, 10), (6, 5)];

    #[test]
    fn no_tie_at_the_boundary() {
        let outcome = resolve(DrawKind::Direct, RANKING, 3, &set(&[]), &set(&[]), DrawCheck::Strict, describe).unwrap();
        assert_eq!(outcome.accepted, vec![0, 1, 2]);
        assert!(outcome.open.is_empty());
    }

    #[test]
    fn tie_across_the_boundary_opens_a_draw() {
        let outcome = resolve(DrawKind::Direct, RANKING, 5, &set(&[]), &set(&[]), DrawCheck::Strict, describe).unwrap();
        assert_eq!(outcome.accepted, vec![0, 1, 2]);
        assert_eq!(outcome.open, vec![3, 4, 5]);
    }

    #[test]
    fn draw_results_fill_the_open_seats() {
        let partial = resolve(DrawKind::Direct, RANKING, 5, &set(&[]), &set(&[5]), DrawCheck::Strict, describe).unwrap();
        assert_eq!(partial.accepted, vec![0, 1, 2, 5]);
        assert_eq!(partial.open, vec![3, 4]);

        let complete = resolve(DrawKind::Direct, RANKING, 5, &set(&[]), &set(&[3, 5]), DrawCheck::Strict, describe).unwrap();
        assert_eq!(complete.accepted, vec![0, 1, 2, 3, 5]);
        assert!(complete.open.is_empty());
    }

    #[test]
    fn tie_fully_inside_needs_no_draw() {
        let outcome = resolve(DrawKind::List, RANKING, 6, &set(&[]), &set(&[4]), DrawCheck::Strict, describe).unwrap();
        assert_eq!(outcome.accepted, vec![0, 1, 2, 3, 4, 5]);
        assert!(outcome.open.is_empty());
    }

    #[test]
    fn fixed_members_do_not_take_part() {
        let outcome = resolve(DrawKind::List, RANKING, 5, &set(&[3]), &set(&[]), DrawCheck::Strict, describe).unwrap();
        assert_eq!(outcome.accepted, vec![0, 1, 2, 3]);
        assert_eq!(outcome.open, vec![4, 5]);
    }

    #[test]
    fn rejects_inconsistent_draw_results() {
        assert_eq!(
            resolve(DrawKind::Direct, RANKING, 5, &set(&[]), &set(&[3, 4, 5]), DrawCheck::Strict, describe),
            Err(ElectionError::TooManyDrawResults {
                kind: DrawKind::Direct,
                count: 3,
                max: 2
            })
        );
        assert_eq!(
            resolve(DrawKind::Direct, RANKING, 5, &set(&[]), &set(&[6]), DrawCheck::Strict, describe),
            Err(ElectionError::NotInTieGroup {
                kind: DrawKind::Direct,
                nomination: "#6".to_string()
            })
        );
        assert_eq!(
            resolve(DrawKind::List, RANKING, 3, &set(&[]), &set(&[1]), DrawCheck::Strict, describe),
            Err(ElectionError::NotInTieGroup {
                kind: DrawKind::List,
                nomination: "#1".to_string()
            })
        );
        assert!(resolve(DrawKind::List, RANKING, 0, &set(&[]), &set(&[0]), DrawCheck::Strict, describe).is_err());
    }

    #[test]
    fn empty_ranking_ignores_draw_results() {
        let empty: &[(usize, u32)] = &[];
        for check in [DrawCheck::Strict, DrawCheck::Lenient] {
            let outcome = resolve(DrawKind::Direct, empty, 3, &set(&[]), &set(&[2, 4]), check, describe).unwrap();
            assert_eq!(outcome, DrawOutcome::default());
        }
    }

    #[test]
    fn lenient_check_ignores_results_outside_the_tie() {
        let outcome = resolve(DrawKind::List, RANKING, 3, &set(&[]), &set(&[1, 4]), DrawCheck::Lenient, describe).unwrap();
        assert_eq!(outcome.accepted, vec![0, 1, 2]);
        assert!(outcome.open.is_empty());

        let stray = resolve(DrawKind::Direct, RANKING, 5, &set(&[]), &set(&[5, 6]), DrawCheck::Lenient, describe).unwrap();
        assert_eq!(stray.accepted, vec![0, 1, 2, 5]);
        assert_eq!(stray.open, vec![3, 4]);

        let too_many = resolve(DrawKind::Direct, RANKING, 5, &set(&[]), &set(&[3, 4, 5]), DrawCheck::Lenient, describe).unwrap();
        assert_eq!(too_many.accepted, vec![0, 1, 2]);
        assert_eq!(too_many.open, vec![3, 4, 5]);

        let all_fixed = resolve(DrawKind::List, RANKING, 2, &set(&[0, 1]), &set(&[3]), DrawCheck::Lenient, describe).unwrap();
        assert_eq!(all_fixed.accepted, vec![0, 1]);
    }
}
