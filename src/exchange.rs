use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::balance::{round_to_2_decimals, MemberBalance};
use crate::schemas::{Group, MemberId};
use crate::shares::compute_shares;

// Balances and residues at or below this are considered settled
pub const TOLERANCE: f64 = 0.01;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: f64,
}

#[derive(Clone, Debug)]
struct PersonalBalance {
    id: MemberId,
    balance: f64,
}

/// Greedy settlement plan: the largest remaining debtor pays the largest
/// remaining creditor until one side runs out.
///
/// This is a heuristic. It needs at most `creditors + debtors - 1` transfers
/// but is not guaranteed to find the fewest possible for every input. Ties
/// keep the order of `balances`.
pub fn simplify_debts(balances: &[MemberBalance]) -> Vec<Transfer> {
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();
    for balance in balances {
        let person = PersonalBalance {
            id: balance.member_id.clone(),
            balance: balance.net_balance.abs(),
        };
        if balance.net_balance > TOLERANCE {
            creditors.push(person);
        } else if balance.net_balance < -TOLERANCE {
            debtors.push(person);
        }
    }

    // Stable sorts, largest first
    creditors.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    debtors.sort_by(|a, b| b.balance.total_cmp(&a.balance));

    let mut transfers = Vec::new();
    let (mut c, mut d) = (0, 0);
    while c < creditors.len() && d < debtors.len() {
        let creditor = &mut creditors[c];
        let debtor = &mut debtors[d];
        let amount = creditor.balance.min(debtor.balance);
        if amount > TOLERANCE {
            transfers.push(Transfer {
                from: debtor.id.clone(),
                to: creditor.id.clone(),
                amount: round_to_2_decimals(amount),
            });
        }
        creditor.balance -= amount;
        debtor.balance -= amount;
        // inf - inf leaves NaN, which counts as settled
        if creditor.balance.is_nan() || creditor.balance < TOLERANCE {
            c += 1;
        }
        if debtor.balance.is_nan() || debtor.balance < TOLERANCE {
            d += 1;
        }
    }
    transfers
}

// Who owes whom if every expense were paid back to its payer directly
pub fn direct_transfers(group: &Group) -> Vec<Transfer> {
    let members: HashSet<&str> = group.members.iter().map(|m| m.id.as_str()).collect();
    // Keyed by (lower id, higher id); positive means the higher id owes the lower
    let mut pair_balances: BTreeMap<(MemberId, MemberId), f64> = BTreeMap::new();

    for expense in &group.expenses {
        // Same as compute_balances, ids that are no longer members are dropped
        if !members.contains(expense.payer.as_str()) {
            continue;
        }
        for (participant, share) in compute_shares(expense, &expense.participants) {
            if participant == expense.payer || !members.contains(participant.as_str()) {
                continue;
            }
            let (pair, amount) = if expense.payer < participant {
                ((expense.payer.clone(), participant), share)
            } else {
                ((participant, expense.payer.clone()), -share)
            };
            *pair_balances.entry(pair).or_insert(0.0) += amount;
        }
    }

    let mut transfers: Vec<Transfer> = pair_balances
        .into_iter()
        .filter(|(_, balance)| balance.abs() > TOLERANCE)
        .map(|((lower, higher), balance)| {
            let (from, to) = if balance > 0.0 {
                (higher, lower)
            } else {
                (lower, higher)
            };
            Transfer {
                from,
                to,
                amount: round_to_2_decimals(balance.abs()),
            }
        })
        .collect();
    transfers.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Expense, Member, SplitType};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn balances(nets: &[(&str, f64)]) -> Vec<MemberBalance> {
        nets.iter()
            .map(|(id, net)| MemberBalance {
                member_id: id.to_string(),
                name: id.to_string(),
                total_paid: net.max(0.0),
                total_owed: (-net).max(0.0),
                net_balance: *net,
            })
            .collect()
    }

    fn transfer(from: &str, to: &str, amount: f64) -> Transfer {
        Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    #[test]
    fn one_creditor_two_debtors() {
        let plan = simplify_debts(&balances(&[("a", 30.0), ("b", -10.0), ("c", -20.0)]));
        assert_eq!(plan, vec![transfer("c", "a", 20.0), transfer("b", "a", 10.0)]);
    }

    #[test]
    fn settled_group_needs_no_transfers() {
        let plan = simplify_debts(&balances(&[("a", 0.01), ("b", -0.01), ("c", 0.0)]));
        assert!(plan.is_empty());
        assert!(simplify_debts(&[]).is_empty());
    }

    #[test]
    fn largest_debtor_pays_largest_creditor_first() {
        let plan = simplify_debts(&balances(&[
            ("a", 10.0),
            ("b", 50.0),
            ("c", -35.0),
            ("d", -25.0),
        ]));
        assert_eq!(
            plan,
            vec![
                transfer("c", "b", 35.0),
                transfer("d", "b", 15.0),
                transfer("d", "a", 10.0),
            ]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let plan = simplify_debts(&balances(&[
            ("x", -10.0),
            ("a", 10.0),
            ("y", -10.0),
            ("b", 10.0),
        ]));
        assert_eq!(plan, vec![transfer("x", "a", 10.0), transfer("y", "b", 10.0)]);
    }

    #[test]
    fn stays_within_transfer_bound() {
        let plan = simplify_debts(&balances(&[
            ("a", 12.5),
            ("b", 7.25),
            ("c", -3.0),
            ("d", -6.75),
            ("e", -10.0),
        ]));
        assert!(plan.len() <= 4);
        let moved: f64 = plan.iter().map(|t| t.amount).sum();
        assert!((moved - 19.75).abs() < 0.01);
    }

    #[test]
    fn residue_at_tolerance_emits_nothing() {
        // a is still owed exactly 0.01 once b has paid; matching that
        // against c moves nothing
        let plan = simplify_debts(&balances(&[("a", 0.024), ("b", -0.014), ("c", -0.012)]));
        assert_eq!(plan, vec![transfer("b", "a", 0.01)]);
    }

    #[test]
    fn small_residues_are_dropped() {
        let plan = simplify_debts(&balances(&[("a", 0.015), ("b", -0.011), ("c", -0.0105)]));
        assert_eq!(plan, vec![transfer("b", "a", 0.01)]);
    }

    #[test]
    fn infinite_balances_terminate() {
        let plan = simplify_debts(&balances(&[
            ("a", f64::INFINITY),
            ("b", -f64::INFINITY),
            ("c", -5.0),
        ]));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].from, "b");
        assert_eq!(plan[0].to, "a");
    }

    #[test]
    fn huge_and_nan_balances_terminate() {
        let plan = simplify_debts(&balances(&[("a", f64::MAX), ("b", -f64::MAX)]));
        assert_eq!(plan, vec![transfer("b", "a", f64::MAX)]);

        let plan = simplify_debts(&balances(&[("a", f64::NAN), ("b", 5.0), ("c", -5.0)]));
        assert_eq!(plan, vec![transfer("c", "b", 5.0)]);
    }

    #[test]
    fn is_deterministic() {
        let input = balances(&[("a", 3.33), ("b", 3.34), ("c", -6.67)]);
        assert_eq!(simplify_debts(&input), simplify_debts(&input));
    }

    fn expense(payer: &str, amount: f64, participants: &[&str]) -> Expense {
        Expense {
            id: format!("{payer}-{amount}"),
            title: "Taxi".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            payer: payer.to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
            split_type: SplitType::Equal,
            shares: HashMap::new(),
        }
    }

    #[test]
    fn direct_transfers_net_each_pair() {
        let mut group = Group::new("g", "Flat");
        group.members = vec![Member::new("a", "A"), Member::new("b", "B"), Member::new("c", "C")];
        group.expenses = vec![
            expense("a", 30.0, &["a", "b", "c"]),
            expense("b", 12.0, &["a", "b"]),
            expense("c", 20.0, &["b", "c"]),
        ];
        assert_eq!(
            direct_transfers(&group),
            vec![transfer("b", "a", 4.0), transfer("b", "c", 10.0), transfer("c", "a", 10.0)]
        );
    }

    #[test]
    fn direct_transfers_skip_former_members() {
        let mut group = Group::new("g", "Flat");
        group.members = vec![Member::new("a", "A"), Member::new("b", "B")];
        group.expenses = vec![
            expense("a", 30.0, &["a", "b", "ghost"]),
            expense("ghost", 10.0, &["a", "b"]),
        ];
        assert_eq!(direct_transfers(&group), vec![transfer("b", "a", 10.0)]);
    }

    #[test]
    fn direct_transfers_drop_settled_pairs() {
        let mut group = Group::new("g", "Flat");
        group.expenses = vec![expense("a", 10.0, &["a", "b"]), expense("b", 10.0, &["a", "b"])];
        assert!(direct_transfers(&group).is_empty());
    }
}
