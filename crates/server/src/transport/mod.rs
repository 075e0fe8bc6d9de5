//! Transport layer for spawngrid server
//!
//! Available transports:
//! - `http` - HTTP/JSON API served with axum

pub mod http;
