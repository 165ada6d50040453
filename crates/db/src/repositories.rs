pub mod assignments;
pub mod courses;
pub mod notes;
pub mod semesters;
pub mod task_definitions;
pub mod task_instances;
pub mod users;
