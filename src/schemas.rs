use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type MemberId = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub settings: GroupSettings,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Group {
            id: id.into(),
            name: name.into(),
            settings: GroupSettings::default(),
            members: vec![],
            expenses: vec![],
        }
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GroupSettings {
    pub currency: String,
}

impl Default for GroupSettings {
    fn default() -> Self {
        GroupSettings {
            currency: "EUR".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub payer: MemberId,
    pub participants: Vec<MemberId>,
    #[serde(default)]
    pub split_type: SplitType,
    // Meaning of the values depends on `split_type`
    #[serde(default)]
    pub shares: HashMap<MemberId, f64>,
}

/// How an expense is divided among its participants.
///
/// Unrecognised tags coming from stored or submitted data decode as
/// [`SplitType::Equal`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SplitType {
    #[default]
    Equal,
    Exact,
    Percentage,
    Shares,
    Itemized,
}

impl From<&str> for SplitType {
    fn from(tag: &str) -> Self {
        match tag {
            "equal" => SplitType::Equal,
            "exact" => SplitType::Exact,
            "percentage" => SplitType::Percentage,
            "shares" => SplitType::Shares,
            "itemized" => SplitType::Itemized,
            other => {
                log::warn!("Unknown split type {other:?}, splitting equally");
                SplitType::Equal
            }
        }
    }
}

impl From<String> for SplitType {
    fn from(tag: String) -> Self {
        SplitType::from(tag.as_str())
    }
}
