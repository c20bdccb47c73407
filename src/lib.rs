//! Group expense splitting: per-member balances and a settlement plan.
//!
//! The core is [`shares::compute_shares`], [`balance::compute_balances`] and
//! [`exchange::simplify_debts`]. They are pure functions over a [`schemas::Group`]
//! snapshot. The remaining modules wrap them in an HTTP service with a
//! pluggable group store.

pub mod api;
pub mod balance;
pub mod config;
pub mod error;
pub mod exchange;
pub mod schemas;
pub mod shares;
pub mod store;
pub mod validation;
