//! Common library for the Daily Diet application
//!
//! This crate provides the PostgreSQL plumbing shared by the services:
//! connection pooling, embedded schema migrations, health checks and the
//! storage error type.

pub mod database;
pub mod error;
