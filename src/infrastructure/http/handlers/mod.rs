//! HTTP Handlers

mod ping;
mod proxy;

pub use ping::*;
pub use proxy::*;
