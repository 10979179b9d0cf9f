//! Ordering rules for taxonomy nodes.
//!
//! Names are compared "naturally": the first run of decimal digits in each
//! name is compared as an integer, so `U8` sorts before `U10`. The rule is
//! expressed as a key comparison so that it is a strict total order and safe
//! to hand to `sort_by`:
//!
//! 1. names without any digit run come first,
//! 2. then the value of the first digit run,
//! 3. then the lowercased name,
//! 4. then the raw name.
//!
//! [`compare_nodes`] additionally orders categories before sub-groups,
//! groups sub-groups by parent and breaks remaining ties by id.
//!
//! Rule 1 is a deliberate departure from a plain pairwise rule that compares
//! numbers only when both names carry one and text otherwise. That pairwise
//! rule is not transitive (`c1 < a2` by number, `a2 < b` and `b < c1` by
//! text), which a sort may not be given. The price is that a name without
//! digits always sorts first: `Hobby` comes before `Herren 1` and `Herren 2`,
//! where plain text would put it last.

use std::cmp::Ordering;

use crate::domain::group::GroupNode;

/// Returns the first maximal run of ASCII digits with leading zeros removed.
fn first_number(name: &str) -> Option<&str> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let rest = &name[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = rest[..end].trim_start_matches('0');
    Some(if digits.is_empty() { "0" } else { digits })
}

/// Compares two digit strings without leading zeros by numeric value.
///
/// Works for runs of any length, so no integer parsing can overflow.
fn compare_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Natural-aware, case-insensitive name comparison.
pub fn natural_compare(a: &str, b: &str) -> Ordering {
    let numeric = match (first_number(a), first_number(b)) {
        (Some(x), Some(y)) => compare_digits(x, y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    numeric
        .then_with(|| compare_folded(a, b))
        .then_with(|| a.cmp(b))
}

/// Total order over taxonomy nodes.
pub fn compare_nodes(a: &GroupNode, b: &GroupNode) -> Ordering {
    // `None` orders before `Some`, so categories come first.
    a.parent_id
        .cmp(&b.parent_id)
        .then_with(|| natural_compare(a.name.as_str(), b.name.as_str()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts nodes in place using [`compare_nodes`].
pub fn sort_nodes(nodes: &mut [GroupNode]) {
    nodes.sort_by(compare_nodes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{GroupId, GroupName};
    use chrono::DateTime;

    fn node(id: i32, name: &str, parent_id: Option<i32>) -> GroupNode {
        GroupNode {
            id: GroupId::new(id).unwrap(),
            name: GroupName::new(name).unwrap(),
            parent_id: parent_id.map(|p| GroupId::new(p).unwrap()),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        names.sort_by(|a, b| natural_compare(a, b));
        names
    }

    #[test]
    fn numeric_runs_compare_as_integers() {
        assert_eq!(sorted(&["U8", "U10", "U2"]), vec!["U2", "U8", "U10"]);
        assert_eq!(sorted(&["U10", "U2", "U8"]), vec!["U2", "U8", "U10"]);
    }

    #[test]
    fn names_without_numbers_precede_numbered_names() {
        assert_eq!(
            sorted(&["Herren 2", "Hobby", "Herren 1"]),
            vec!["Hobby", "Herren 1", "Herren 2"]
        );
    }

    #[test]
    fn equal_numbers_fall_back_to_case_insensitive_text() {
        assert_eq!(
            sorted(&["U12w", "u12M", "U14m", "U12m"]),
            vec!["U12m", "u12M", "U12w", "U14m"]
        );
    }

    #[test]
    fn names_without_numbers_sort_alphabetically_ignoring_case() {
        assert_eq!(
            sorted(&["senioren", "Herren", "damen", "Mixed", "Jugend"]),
            vec!["damen", "Herren", "Jugend", "Mixed", "senioren"]
        );
    }

    #[test]
    fn long_and_zero_padded_runs_do_not_overflow() {
        let huge = "Team 123456789012345678901234567890";
        assert_eq!(natural_compare("Team 9", huge), Ordering::Less);
        assert_eq!(natural_compare("Team 007", "Team 7"), Ordering::Less);
        assert_eq!(natural_compare("Team 07", "Team 8"), Ordering::Less);
    }

    #[test]
    fn comparator_is_transitive_on_mixed_names() {
        let names = ["c1", "b", "a2", "A2", "U8", "U10", "Ü30w", "Herren", "x0", ""];
        for a in names {
            for b in names {
                for c in names {
                    if natural_compare(a, b) != Ordering::Greater
                        && natural_compare(b, c) != Ordering::Greater
                    {
                        assert_ne!(natural_compare(a, c), Ordering::Greater, "{a} {b} {c}");
                    }
                }
                assert_eq!(natural_compare(a, b), natural_compare(b, a).reverse());
            }
        }
    }

    #[test]
    fn categories_precede_subgroups_and_ids_break_ties() {
        let mut nodes = vec![
            node(5, "U10", Some(1)),
            node(4, "U8", Some(1)),
            node(3, "Herren 1", Some(2)),
            node(2, "Herren", None),
            node(1, "Jugend", None),
        ];
        sort_nodes(&mut nodes);
        let ids: Vec<i32> = nodes.iter().map(|n| n.id.get()).collect();
        assert_eq!(ids, vec![2, 1, 4, 5, 3]);

        let mut twins = vec![node(9, "Same", None), node(8, "Same", None)];
        sort_nodes(&mut twins);
        assert_eq!(twins[0].id.get(), 8);
    }

    #[test]
    fn youth_teams_follow_age_order() {
        assert_eq!(
            sorted(&[
                "U18w", "U8", "U14m", "U12w", "U10", "U16m", "U12m", "U18m", "U14w", "U16w"
            ]),
            vec![
                "U8", "U10", "U12m", "U12w", "U14m", "U14w", "U16m", "U16w", "U18m", "U18w"
            ]
        );
    }
}
