//! Value types shared by the account model and its repository.

mod account_status;
mod constraints;
mod role;

pub use account_status::AccountStatus;
pub use constraints::{AccountConstraints, ConstraintCategory};
pub use role::{Role, RoleError};
