use serde::{Deserialize, Serialize};

/// Localized welcome text and input placeholder
///
/// The wire field is spelled `wellcome_message`; the rename keeps the Rust
/// side readable without breaking the contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadlineResponse {
    #[serde(rename = "wellcome_message")]
    pub welcome_message: String,
    pub input_placeholder: String,
}
