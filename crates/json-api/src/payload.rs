//! Request body helpers.

use salvo::prelude::{Request, StatusError};
use serde::de::DeserializeOwned;

use crate::extensions::*;

/// Decode a JSON body, treating an empty body as `T::default()`.
pub(crate) async fn json_or_default<T>(req: &mut Request) -> Result<T, StatusError>
where
    T: DeserializeOwned + Default,
{
    let payload = req.payload().await.or_400("could not read request body")?;

    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(payload).or_400("invalid request body")
}
