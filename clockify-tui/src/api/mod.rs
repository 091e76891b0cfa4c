mod client;
mod dev_backend;

pub use client::ApiClient;
pub use dev_backend::DevBackend;
