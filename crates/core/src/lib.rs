//! Domain core for the patient records service.
//!
//! Entities, transport shapes, persistence contracts and the services that
//! enforce validation, ownership and record semantics. HTTP concerns live in
//! the `api-rest` crate; this crate is transport-agnostic.

pub mod config;
pub mod dto;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod time;
pub mod validation;

pub use config::{AppConfig, Profile};
pub use error::{RecordsError, RecordsResult};
