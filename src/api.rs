use std::collections::HashMap;

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::balance::compute_balances;
use crate::error::ApiError;
use crate::exchange::{direct_transfers, simplify_debts};
use crate::schemas::{Expense, Group, GroupSettings, Member, MemberId, SplitType};
use crate::shares::compute_shares;
use crate::store::GroupStore;
use crate::validation::{validate_expense, validate_member};

#[derive(Deserialize)]
struct GroupNameJson {
    name: String,
    currency: Option<String>,
}

#[derive(Deserialize)]
struct SharesPreviewJson {
    amount: f64,
    #[serde(default)]
    split_type: SplitType,
    participants: Vec<MemberId>,
    #[serde(default)]
    shares: HashMap<MemberId, f64>,
}

async fn load_group(store: &GroupStore, id: &str) -> Result<Group, ApiError> {
    store
        .load(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("group {id}")))
}

#[put("/groups/{id}")]
async fn add_group(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
    json: web::Json<GroupNameJson>,
) -> Result<HttpResponse, ApiError> {
    let json = json.into_inner();
    let mut group = Group::new(id.into_inner(), json.name);
    if let Some(currency) = json.currency {
        group.settings = GroupSettings { currency };
    }
    store.insert(&group).await?;
    log::info!("Group {} created", group.id);
    Ok(HttpResponse::Created().json(group))
}

#[get("/groups/{id}")]
async fn get_group(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let group = load_group(&store, &id).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[delete("/groups/{id}")]
async fn delete_group(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    if store.delete(&id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::NotFound(format!("group {id}")))
    }
}

#[post("/groups/{id}/members")]
async fn add_member(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
    member: web::Json<Member>,
) -> Result<HttpResponse, ApiError> {
    let mut group = load_group(&store, &id).await?;
    let member = member.into_inner();
    validate_member(&group, &member)?;
    group.members.push(member);
    store.save(&group).await?;
    Ok(HttpResponse::Ok().json(group))
}

// Expenses that mention the member are kept as they are
#[delete("/groups/{id}/members/{member_id}")]
async fn remove_member(
    store: web::Data<GroupStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, member_id) = path.into_inner();
    let mut group = load_group(&store, &id).await?;
    let before = group.members.len();
    group.members.retain(|member| member.id != member_id);
    if group.members.len() == before {
        return Err(ApiError::NotFound(format!("member {member_id}")));
    }
    store.save(&group).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[post("/groups/{id}/expenses")]
async fn add_expense(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
    expense: web::Json<Expense>,
) -> Result<HttpResponse, ApiError> {
    let mut group = load_group(&store, &id).await?;
    let expense = expense.into_inner();
    if group.expense(&expense.id).is_some() {
        return Err(ApiError::Conflict(format!("Expense {} already exists", expense.id)));
    }
    validate_expense(&group, &expense)?;
    group.expenses.push(expense);
    store.save(&group).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[put("/groups/{id}/expenses/{expense_id}")]
async fn replace_expense(
    store: web::Data<GroupStore>,
    path: web::Path<(String, String)>,
    expense: web::Json<Expense>,
) -> Result<HttpResponse, ApiError> {
    let (id, expense_id) = path.into_inner();
    let mut group = load_group(&store, &id).await?;
    let mut expense = expense.into_inner();
    expense.id = expense_id;
    validate_expense(&group, &expense)?;
    let slot = group
        .expenses
        .iter_mut()
        .find(|existing| existing.id == expense.id)
        .ok_or_else(|| ApiError::NotFound(format!("expense {}", expense.id)))?;
    *slot = expense;
    store.save(&group).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[delete("/groups/{id}/expenses/{expense_id}")]
async fn remove_expense(
    store: web::Data<GroupStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, expense_id) = path.into_inner();
    let mut group = load_group(&store, &id).await?;
    let before = group.expenses.len();
    group.expenses.retain(|expense| expense.id != expense_id);
    if group.expenses.len() == before {
        return Err(ApiError::NotFound(format!("expense {expense_id}")));
    }
    store.save(&group).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[get("/groups/{id}/balance")]
async fn get_balance(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let group = load_group(&store, &id).await?;
    Ok(HttpResponse::Ok().json(compute_balances(&group)))
}

#[get("/groups/{id}/settlement")]
async fn get_settlement(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let group = load_group(&store, &id).await?;
    let transfers = simplify_debts(&compute_balances(&group));
    log::debug!("Group {} settles in {} transfers", group.id, transfers.len());
    Ok(HttpResponse::Ok().json(transfers))
}

#[get("/groups/{id}/transfers/direct")]
async fn get_direct_transfers(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let group = load_group(&store, &id).await?;
    Ok(HttpResponse::Ok().json(direct_transfers(&group)))
}

// Live preview while an expense is being edited, nothing is validated
#[post("/shares/preview")]
async fn preview_shares(json: web::Json<SharesPreviewJson>) -> HttpResponse {
    let json = json.into_inner();
    let expense = Expense {
        id: "preview".to_string(),
        title: String::new(),
        amount: json.amount,
        date: NaiveDate::default(),
        payer: String::new(),
        participants: json.participants,
        split_type: json.split_type,
        shares: json.shares,
    };
    HttpResponse::Ok().json(compute_shares(&expense, &expense.participants))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(add_group)
        .service(get_group)
        .service(delete_group)
        .service(add_member)
        .service(remove_member)
        .service(add_expense)
        .service(replace_expense)
        .service(remove_expense)
        .service(get_balance)
        .service(get_settlement)
        .service(get_direct_transfers)
        .service(preview_shares);
}
