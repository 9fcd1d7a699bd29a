/// Database models for taskboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `board`: Boards, each owned by exactly one user
/// - `column`: Ordered columns within a board
/// - `task`: Ordered tasks within a column
///
/// The entity hierarchy is user → board → column → task. Column and task
/// rows carry a parent-scoped `*_order` integer; new children are appended
/// at `max(order) + 1` (0 for the first child) and clients may rewrite the
/// order freely on update.

pub mod board;
pub mod column;
pub mod task;
pub mod user;
