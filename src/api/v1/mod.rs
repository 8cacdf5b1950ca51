/*
 * Responsibility
 * - v1 entry point (re-exports routes())
 */
pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;
