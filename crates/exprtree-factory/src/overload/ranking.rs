//! Ranking for overload resolution.
//!
//! Compatible candidates are ranked by `(is_public, exact_matches)`:
//!
//! 1. A public candidate beats a non-public one
//! 2. Among equally accessible candidates, more arguments matching their
//!    parameter type exactly wins
//!
//! Two candidates at the top rank are ambiguous. There is no "most specific
//! parameter type" rule: `Foo(object)` and `Foo(IComparable)` called with a
//! `string` tie.
//!
//! The exact-match tier goes beyond a plain "public first, any other tie is
//! ambiguous" rule: that rule would reject `Foo(string)` against `Foo(object)`
//! for a `string` argument, which this ranking resolves to `Foo(string)`.

use std::cmp::Ordering;

use exprtree_core::ExprError;

use super::OverloadMatch;

/// Find the best match from compatible candidates.
///
/// Returns `Ok(None)` when `viable` is empty.
///
/// # Errors
///
/// [`ExprError::AmbiguousMatch`] when more than one candidate shares the
/// best rank.
pub fn find_best_match(
    viable: Vec<OverloadMatch>,
    member: &str,
    type_name: &str,
) -> Result<Option<OverloadMatch>, ExprError> {
    let mut best: Option<OverloadMatch> = None;
    let mut tied = 0usize;

    for candidate in viable {
        let order = match &best {
            None => Ordering::Greater,
            Some(current) => compare(&candidate, current),
        };
        match order {
            Ordering::Greater => {
                best = Some(candidate);
                tied = 1;
            }
            Ordering::Equal => tied += 1,
            Ordering::Less => {}
        }
    }

    if tied > 1 {
        return Err(ExprError::AmbiguousMatch {
            member: member.to_string(),
            type_name: type_name.to_string(),
        });
    }
    Ok(best)
}

fn compare(a: &OverloadMatch, b: &OverloadMatch) -> Ordering {
    (a.is_public, a.exact_matches).cmp(&(b.is_public, b.exact_matches))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use exprtree_core::{ErrorKind, MemberEntry, Param, TypeHash, Visibility, primitives};

    use super::*;

    fn candidate(param: TypeHash, exact: usize, visibility: Visibility) -> OverloadMatch {
        let method = MemberEntry::method("Foo", vec![Param::new("x", param)], primitives::VOID)
            .with_visibility(visibility);
        OverloadMatch::new(Arc::new(method), exact)
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(find_best_match(vec![], "Foo", "Widget").unwrap(), None);
    }

    #[test]
    fn single_candidate_wins() {
        let only = candidate(primitives::OBJECT, 0, Visibility::Public);
        let best = find_best_match(vec![only.clone()], "Foo", "Widget").unwrap();
        assert_eq!(best, Some(only));
    }

    #[test]
    fn exact_match_beats_reference_match() {
        let loose = candidate(primitives::OBJECT, 0, Visibility::Public);
        let exact = candidate(primitives::STRING, 1, Visibility::Public);
        let best = find_best_match(vec![loose, exact.clone()], "Foo", "Widget").unwrap();
        assert_eq!(best, Some(exact));
    }

    #[test]
    fn public_beats_non_public_regardless_of_exactness() {
        let private_exact = candidate(primitives::STRING, 1, Visibility::Private);
        let public_loose = candidate(primitives::OBJECT, 0, Visibility::Public);
        let best = find_best_match(vec![private_exact, public_loose.clone()], "Foo", "Widget").unwrap();
        assert_eq!(best, Some(public_loose));
    }

    #[test]
    fn equal_rank_is_ambiguous() {
        let a = candidate(primitives::OBJECT, 0, Visibility::Public);
        let b = candidate(TypeHash::from_name("IComparable"), 0, Visibility::Public);
        let err = find_best_match(vec![a, b], "Foo", "Widget").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousMatch);
    }

    #[test]
    fn tie_below_the_best_is_not_ambiguous() {
        let a = candidate(primitives::OBJECT, 0, Visibility::Public);
        let b = candidate(TypeHash::from_name("IComparable"), 0, Visibility::Public);
        let exact = candidate(primitives::STRING, 1, Visibility::Public);
        let best = find_best_match(vec![a, b, exact.clone()], "Foo", "Widget").unwrap();
        assert_eq!(best, Some(exact));
    }
}
