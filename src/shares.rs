use std::collections::HashMap;

use crate::schemas::{Expense, MemberId, SplitType};

pub type Shares = HashMap<MemberId, f64>;

/// Computes the monetary share of every id in `participant_ids`.
///
/// The result has exactly one entry per distinct id and its values are not
/// rounded. Missing share-map entries count as zero and malformed share maps
/// are used as given.
pub fn compute_shares(expense: &Expense, participant_ids: &[MemberId]) -> Shares {
    let amount = expense.amount;
    let lookup = |id: &MemberId| expense.shares.get(id).copied().unwrap_or(0.0);

    let mut participants: Vec<&MemberId> = Vec::with_capacity(participant_ids.len());
    for id in participant_ids {
        if !participants.contains(&id) {
            participants.push(id);
        }
    }

    match expense.split_type {
        SplitType::Equal => {
            if participants.is_empty() {
                log::warn!("Expense {} has no participants", expense.id);
                return Shares::new();
            }
            let share = amount / participants.len() as f64;
            participants
                .into_iter()
                .map(|id| (id.clone(), share))
                .collect()
        }
        SplitType::Exact | SplitType::Itemized => participants
            .into_iter()
            .map(|id| (id.clone(), lookup(id)))
            .collect(),
        SplitType::Percentage => participants
            .into_iter()
            .map(|id| (id.clone(), lookup(id) / 100.0 * amount))
            .collect(),
        SplitType::Shares => {
            let total_weight: f64 = participants.iter().map(|id| lookup(*id)).sum();
            participants
                .into_iter()
                .map(|id| {
                    let share = if total_weight > 0.0 {
                        lookup(id) / total_weight * amount
                    } else {
                        0.0
                    };
                    (id.clone(), share)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn expense(amount: f64, split_type: SplitType, shares: &[(&str, f64)]) -> Expense {
        Expense {
            id: "e1".to_string(),
            title: "Groceries".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
            payer: "a".to_string(),
            participants: vec![],
            split_type,
            shares: shares
                .iter()
                .map(|(id, value)| (id.to_string(), *value))
                .collect(),
        }
    }

    fn ids(ids: &[&str]) -> Vec<MemberId> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn equal_split_divides_evenly() {
        let shares = compute_shares(&expense(90.0, SplitType::Equal, &[]), &ids(&["a", "b", "c"]));
        assert_eq!(shares.len(), 3);
        assert!(shares.values().all(|share| *share == 30.0));
    }

    #[test]
    fn equal_split_ignores_share_map() {
        let shares = compute_shares(
            &expense(10.0, SplitType::Equal, &[("a", 9.0)]),
            &ids(&["a", "b"]),
        );
        assert_eq!(shares["a"], 5.0);
        assert_eq!(shares["b"], 5.0);
    }

    #[test]
    fn equal_split_without_participants_is_empty() {
        let shares = compute_shares(&expense(90.0, SplitType::Equal, &[]), &[]);
        assert!(shares.is_empty());
    }

    #[test]
    fn duplicate_participants_are_counted_once() {
        let shares = compute_shares(&expense(90.0, SplitType::Equal, &[]), &ids(&["a", "b", "a"]));
        assert_eq!(shares.len(), 2);
        assert_eq!(shares["a"], 45.0);
    }

    #[test]
    fn exact_and_itemized_take_amounts_verbatim() {
        for split_type in [SplitType::Exact, SplitType::Itemized] {
            let shares = compute_shares(
                &expense(50.0, split_type, &[("a", 12.5), ("b", 37.5), ("z", 100.0)]),
                &ids(&["a", "b", "c"]),
            );
            assert_eq!(shares.len(), 3);
            assert_eq!(shares["a"], 12.5);
            assert_eq!(shares["b"], 37.5);
            assert_eq!(shares["c"], 0.0);
        }
    }

    #[test]
    fn percentage_split() {
        let shares = compute_shares(
            &expense(200.0, SplitType::Percentage, &[("a", 25.0), ("b", 75.0)]),
            &ids(&["a", "b"]),
        );
        assert_eq!(shares["a"], 50.0);
        assert_eq!(shares["b"], 150.0);
    }

    #[test]
    fn shares_split_normalizes_weights() {
        let shares = compute_shares(
            &expense(100.0, SplitType::Shares, &[("a", 1.0), ("b", 3.0)]),
            &ids(&["a", "b"]),
        );
        assert_eq!(shares["a"], 25.0);
        assert_eq!(shares["b"], 75.0);
    }

    #[test]
    fn shares_split_without_weight_is_zero() {
        let shares = compute_shares(&expense(100.0, SplitType::Shares, &[]), &ids(&["a", "b"]));
        assert_eq!(shares.len(), 2);
        assert!(shares.values().all(|share| *share == 0.0));
    }

    #[test]
    fn shares_split_ignores_weights_of_non_participants() {
        let shares = compute_shares(
            &expense(60.0, SplitType::Shares, &[("a", 1.0), ("b", 2.0), ("c", 100.0)]),
            &ids(&["a", "b"]),
        );
        assert_eq!(shares["a"], 20.0);
        assert_eq!(shares["b"], 40.0);
    }
}
