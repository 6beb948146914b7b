pub mod error;
pub mod modules;
pub mod proxy;
pub mod utils;
