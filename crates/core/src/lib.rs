//! Core library for JBK Gestione
//!
//! This crate contains:
//! - Data models for matches, players, trainings and profiles
//! - The `Backend` trait the hosted service client implements
//! - The application view model and its command/event protocol
//! - Statistics aggregation and record-editor forms
//! - Shared UI renderers (with `ui` feature)

pub mod backend;
pub mod callups;
pub mod connectivity;
pub mod editor;
pub mod error;
pub mod messages;
pub mod model;
pub mod models;
pub mod runtime;
pub mod stats;
pub mod view;

#[cfg(feature = "ui")]
pub mod ui;

pub use backend::{Backend, Query};
pub use error::*;
pub use messages::*;
pub use model::{AppModel, Screen};
pub use models::*;
pub use runtime::execute;
pub use view::{LoadState, Section, Ticket, ViewRouter};
