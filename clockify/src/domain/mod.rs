mod project;
mod tag;
mod time_entry;
mod user;

pub use project::*;
pub use tag::*;
pub use time_entry::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Clockify sends `null` for some empty collections and strings.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
