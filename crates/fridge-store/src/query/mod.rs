//! Repository traits over the credential store.

mod account;

pub use account::AccountRepository;
