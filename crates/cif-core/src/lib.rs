//! Core types and workflows for the person registry.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store and credential hasher are traits; concrete implementations live in
//! `cif-store-sqlite` and `cif-api`.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cpf;
pub mod error;
pub mod password;
pub mod person;
pub mod service;
pub mod store;

pub use cpf::{Cpf, is_valid_cpf};
pub use error::{
  BoxError, LoginError, LookupError, PasswordError, RegistrationError,
  UpdateError,
};
pub use service::PersonService;
