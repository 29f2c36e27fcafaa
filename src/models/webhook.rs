use serde::{Deserialize, Serialize};

// https://getmondo.co.uk/docs/#registering-a-web-hook
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Webhook {
    pub id: String,
    pub account_id: String,
    pub url: String,
}
