//! Local storage module for the tracking database
//!
//! This module owns the SeaORM connection and creates the schema for:
//! - Areas
//! - Users
//! - Projects
//! - General tasks
//! - Subtasks

pub mod db;

pub use db::LocalStorage;
