use serde::{Deserialize, Serialize};

/// Payload stored at `sess:<id>` in Redis. The token pair is embedded so a
/// cookie-held session can recover its tokens after rotation; refresh
/// validity itself is anchored on the user row, never on this blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: i64,
    pub remember_me: bool,
    pub access_token: String,
    pub refresh_token: String,
}
