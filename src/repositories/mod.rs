//! Repository layer for database operations.
//!
//! This module provides repository structs that encapsulate database queries
//! and operations, following the Data Mapper pattern recommended by SeaORM.
//! Every method is generic over [`sea_orm::ConnectionTrait`], so the same
//! query runs on the shared connection or inside a transaction.

pub mod area;
pub mod general_task;
pub mod project;
pub mod subtask;
pub mod user;

pub use area::AreaRepository;
pub use general_task::GeneralTaskRepository;
pub use project::ProjectRepository;
pub use subtask::SubtaskRepository;
pub use user::UserRepository;
