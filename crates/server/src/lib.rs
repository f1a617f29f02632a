//! HTTP exposure of the multisig coordinator operations.

mod error;
mod payload;
mod routes;

pub use routes::create_router;
