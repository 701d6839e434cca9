pub mod client;
pub mod wire;

pub use client::{DirectoryClient, DEFAULT_API_URL};
