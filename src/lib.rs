//! Exercise catalogue for the workout tracker: list/detail HTTP endpoints over
//! a relational store, with JWT-protected writes.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod services;
pub mod store;
