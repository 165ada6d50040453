//! # CourseTrack Core
//!
//! Domain layer for the CourseTrack study planner. It owns the data shapes for
//! semesters, courses, recurring task definitions and their dated instances,
//! together with the logic that turns a weekly recurrence rule into concrete
//! instances and projects those instances back into calendar views.
//!
//! ## Architecture
//!
//! - **Models**: serializable domain and request/response types
//! - **Store**: the [`store::PlannerStore`] persistence port, always owner-scoped
//! - **Generator**: materializes a definition's schedule over its semester
//! - **Regeneration**: keeps instances in sync when definitions change or are removed
//! - **Projector**: daily, weekly, semester, gap and upcoming views
//! - **Completion**: the narrow mutation path for a single instance
//! - **Services**: owner-scoped CRUD for the remaining entities
//!
//! Persistence is reached only through the store trait, so every operation here
//! can be exercised against [`memory::InMemoryStore`] without a database.

pub mod completion;
pub mod errors;
pub mod generator;
pub mod memory;
pub mod models;
pub mod projector;
pub mod regeneration;
pub mod services;
pub mod store;
pub mod time;
