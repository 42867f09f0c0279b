//! Data models for credential store records.

mod account;

pub use account::{Account, NewAccount, UpdateAccount};
