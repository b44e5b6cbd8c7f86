pub mod area;
pub mod general_task;
pub mod project;
pub mod subtask;
pub mod types;
pub mod user;

pub use area::Entity as Area;
pub use general_task::Entity as GeneralTask;
pub use project::Entity as Project;
pub use subtask::Entity as Subtask;
pub use types::{Priority, ProjectStatus, Role, TaskStatus};
pub use user::Entity as User;
