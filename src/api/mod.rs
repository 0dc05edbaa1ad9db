// API routes and handlers

pub mod errors;
pub mod exercises;
pub mod health;
pub mod routes;
