//! Data transfer objects: the wire-facing shapes of domain data.

pub mod http;
pub mod websocket;
