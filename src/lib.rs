//! Areatrack - role-based tracking of projects, general tasks and subtasks
//!
//! Work is organised as projects holding general tasks, each owned by one
//! area, which in turn hold subtasks assigned to support staff. Three roles
//! see and change different slices of that tree:
//!
//! * supervisors see and manage everything
//! * encargados are scoped to the general tasks of their area
//! * apoyos are scoped to the subtasks assigned to them
//!
//! # Modules
//!
//! * [`permissions`] - One authorization decision per entity and action
//! * [`overdue`] - The shared overdue predicate
//! * [`hierarchy`] - Role-scoped project trees, dashboards and counters
//! * [`service`] - The gated operations, one transaction per mutation
//! * [`storage`] / [`repositories`] - SQLite persistence through SeaORM

/// Configuration module for managing application settings
pub mod config;

/// Application constants and user-facing messages
pub mod constants;

/// Application context wiring configuration, storage and the service
pub mod context;

/// SeaORM entity models for database tables
pub mod entities;

/// Error taxonomy shared by every operation
pub mod error;

/// Input arguments and field validation
pub mod forms;

/// Nested views of projects, general tasks and subtasks
pub mod hierarchy;

/// Logging setup and in-memory log buffer
pub mod logger;

/// User-facing notices with a severity
pub mod notifications;

/// Overdue evaluation for every dated entity
pub mod overdue;

/// Authorization decisions per role
pub mod permissions;

/// Repository layer for database operations
pub mod repositories;

/// Role-gated operations over the domain model
pub mod service;

/// Local storage layer owning the database connection
pub mod storage;

/// Utility functions for date handling
pub mod utils;

// Re-export entity models for convenient access
pub use entities::{area, general_task, project, subtask, user};
