#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Identity and access control service for the FridgeManager platform.
//!
//! The crate authenticates username/password pairs, issues signed, time-bounded
//! bearer tokens carrying role claims, enforces per-route role requirements, and
//! lets administrators manage account status and role membership.

mod error;
mod utility;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
