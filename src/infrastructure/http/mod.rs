//! HTTP surface for the query flow.

mod server;

pub use server::{build_router, ErrorResponse, SearchHttpServer, SearchRequest};
