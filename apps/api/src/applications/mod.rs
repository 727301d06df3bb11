// Job application records: in-memory store, HTTP handlers and request validation.

pub mod handlers;
pub mod store;
pub mod validation;
