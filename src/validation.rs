use crate::error::ValidationError;
use crate::exchange::TOLERANCE;
use crate::schemas::{Expense, Group, Member, SplitType};

pub const MAX_AMOUNT: f64 = 1_000_000.0;

// Checks an expense before it is stored. The allocator itself accepts
// anything, so this is the only place split totals are enforced.
pub fn validate_expense(group: &Group, expense: &Expense) -> Result<(), ValidationError> {
    if !expense.amount.is_finite() || expense.amount < 0.0 {
        return Err(ValidationError::InvalidAmount(expense.amount));
    }
    if expense.amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(expense.amount));
    }
    for (member, value) in &expense.shares {
        if !value.is_finite() || value.abs() > MAX_AMOUNT {
            return Err(ValidationError::InvalidShare {
                member: member.clone(),
                value: *value,
            });
        }
    }
    if expense.title.trim().is_empty() {
        return Err(ValidationError::Empty("title"));
    }
    if expense.participants.is_empty() {
        return Err(ValidationError::NoParticipants);
    }
    if group.member(&expense.payer).is_none() {
        return Err(ValidationError::UnknownMember(expense.payer.clone()));
    }
    for (i, participant) in expense.participants.iter().enumerate() {
        if group.member(participant).is_none() {
            return Err(ValidationError::UnknownMember(participant.clone()));
        }
        if expense.participants[..i].contains(participant) {
            return Err(ValidationError::DuplicateMember(participant.clone()));
        }
    }

    let share = |id: &String| expense.shares.get(id).copied().unwrap_or(0.0);
    let expected = match expense.split_type {
        SplitType::Equal => return Ok(()),
        SplitType::Exact | SplitType::Itemized => expense.amount,
        SplitType::Percentage => 100.0,
        SplitType::Shares => {
            return match expense.participants.iter().find(|id| share(*id) <= 0.0) {
                Some(id) => Err(ValidationError::NonPositiveWeight(id.clone())),
                None => Ok(()),
            };
        }
    };
    let actual: f64 = expense.participants.iter().map(share).sum();
    if (actual - expected).abs() > TOLERANCE {
        return Err(ValidationError::SplitTotalMismatch { expected, actual });
    }
    Ok(())
}

pub fn validate_member(group: &Group, member: &Member) -> Result<(), ValidationError> {
    if member.id.trim().is_empty() {
        return Err(ValidationError::Empty("id"));
    }
    if member.name.trim().is_empty() {
        return Err(ValidationError::Empty("name"));
    }
    if group.member(&member.id).is_some() {
        return Err(ValidationError::DuplicateMember(member.id.clone()));
    }
    Ok(())
}
