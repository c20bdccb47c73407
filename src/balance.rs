use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schemas::{Group, MemberId};
use crate::shares::compute_shares;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub name: String,
    pub total_paid: f64,
    pub total_owed: f64,
    pub net_balance: f64,
}

/// Folds every expense of the group into one balance per member, in member
/// order. References to ids that are not members of the group are dropped.
pub fn compute_balances(group: &Group) -> Vec<MemberBalance> {
    let mut balances: Vec<MemberBalance> = group
        .members
        .iter()
        .map(|member| MemberBalance {
            member_id: member.id.clone(),
            name: member.name.clone(),
            total_paid: 0.0,
            total_owed: 0.0,
            net_balance: 0.0,
        })
        .collect();
    let index: HashMap<&str, usize> = group
        .members
        .iter()
        .enumerate()
        .map(|(i, member)| (member.id.as_str(), i))
        .collect();

    for expense in &group.expenses {
        match index.get(expense.payer.as_str()) {
            Some(&i) => balances[i].total_paid += expense.amount,
            None => log::debug!(
                "Expense {} paid by unknown member {}",
                expense.id,
                expense.payer
            ),
        }
        for (participant, share) in compute_shares(expense, &expense.participants) {
            match index.get(participant.as_str()) {
                Some(&i) => balances[i].total_owed += share,
                None => log::debug!(
                    "Expense {} shared with unknown member {}",
                    expense.id,
                    participant
                ),
            }
        }
    }

    // Rounded once, after everything is accumulated
    for balance in &mut balances {
        balance.net_balance = round_to_2_decimals(balance.total_paid - balance.total_owed);
    }
    balances
}

pub fn round_to_2_decimals(n: f64) -> f64 {
    let scaled = n * 100.0;
    if !scaled.is_finite() {
        return n;
    }
    // Adding 0.0 turns -0.0 into 0.0
    scaled.round() / 100.0 + 0.0
}
