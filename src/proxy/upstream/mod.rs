pub mod client;

pub use client::{ProxyResult, UpstreamClient};
