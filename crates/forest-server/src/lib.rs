//! HTTP/JSON API for the forest hierarchy.
//!
//! Exposes the hierarchy engine and tree registry over REST. This crate
//! contains the server framework, API schema types, error-to-status mapping,
//! correlation ids, and route definitions. No hierarchy rule is implemented
//! here; every decision is delegated to `forest-engine`.

pub mod config;
pub mod correlation;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
