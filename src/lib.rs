//! # Spectrace
//!
//! Client-side reconciliation and derived-view engine for a
//! requirements-to-test-case traceability service. The remote service
//! generates test cases, validates them, maps them to requirements, and
//! builds coverage matrices; this crate ingests those artifacts, reconciles
//! the four loosely-coupled collections by test case id, and exposes
//! filterable views over their joins.
//!
//! ## Architecture
//!
//! ```text
//! Presentation (CLI) → Workflow Controller → Remote Service (HTTP)
//!                            ↓
//!                      Entity Store (in-memory)
//!                            ↓
//!                      View Projector
//! ```
//!
//! Test cases only ever append (duplicates included); validation results,
//! mapping results, and the traceability matrix are each replaced wholesale
//! per run. "Pending" is the absence of a validation result, never a stored
//! field. State lives only in process memory and is lost on clear or exit.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use spectrace::{Config, WorkflowController};
//! use spectrace::views::TestCaseFilter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let controller = WorkflowController::from_config(&config)?;
//!     controller.generate_test_cases("user login").await?;
//!     let view = controller.test_cases(TestCaseFilter::Pending).await;
//!     println!("{} pending", view.items.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Score-to-bucket classification rules shared by every view.
pub mod classify;
/// Configuration management loaded from environment variables.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Entity types for the four reconciled collections.
pub mod model;
/// Remote service client and wire types.
pub mod service;
/// In-memory entity store with append/replace semantics.
pub mod store;
/// Derived, filterable view projections.
pub mod views;
/// Workflow controller and stage machine.
pub mod workflow;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::EntityStore;
pub use workflow::{Confirmation, Stage, WorkflowController};
