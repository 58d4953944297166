//! # ModKit
//!
//! Shared building blocks for service modules:
//!
//! - **Contracts**: `DbModule` / `RestfulModule` phases a host drives in order
//!   (migrate, then mount routes).
//! - **Problem details**: RFC 9457 `Problem` responses and the static `ErrDef`
//!   catalog entries modules declare their error codes with.
//! - **Runtime**: OS signal handling for graceful shutdown.

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod api;
pub mod contracts;
pub mod runtime;

pub use api::problem::{Problem, ProblemResponse};
pub use api::ErrDef;
pub use contracts::{DbModule, RestfulModule};
