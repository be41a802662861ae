//! Full-router tests against the in-memory store

mod auth_flow;
mod errors;
mod members;
mod support;
