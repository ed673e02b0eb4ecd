//! Integration tests against the public library API.

mod api;
mod margin;
