//! Session API.

use serde_json::Value;

use crate::client::Client;
use crate::error::Result;
use crate::request::RequestOptions;

impl Client {
    /// Log in with `login` (or `email`) and `password`.
    ///
    /// The answer carries the user's `private_token`.
    pub async fn authenticate(&self, options: RequestOptions) -> Result<Value> {
        self.post("session", options).await
    }
}
