mod client;
mod clockify_url;
pub mod domain;

pub(crate) use clockify_url::*;

pub use client::*;
pub use domain::*;
