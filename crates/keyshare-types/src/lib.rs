//! Shared types, adapter traits, and core utilities for Keyshare.
//!
//! This crate contains the foundational types that are shared between the
//! feature crates and all adapter implementations.

pub mod auth;
pub mod error;
pub mod meta_adapter;
pub mod prelude;
pub mod types;

// vim: ts=4
