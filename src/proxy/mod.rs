// proxy module - the resolve-and-forward pipeline plus its HTTP surface

pub mod destination;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod token;
pub mod upstream;

pub use destination::{Destination, DestinationResolver};
pub use server::{AppState, AxumServer};
pub use token::TokenProvider;
pub use upstream::{ProxyResult, UpstreamClient};
