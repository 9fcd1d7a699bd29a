//! # Taskboard Shared Library
//!
//! This crate contains the types and business logic shared by the taskboard
//! API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (User, Board, Column, Task) and their CRUD operations
//! - `auth`: Password hashing, JWT tokens, the auth context, and the ownership resolver
//! - `db`: Database connection pool management

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
