/*
 * Responsibility
 * - request/response DTO for principal resolution
 * - the response never carries the credential hash
 */
use serde::{Deserialize, Serialize};

use crate::services::auth::Principal;

#[derive(Debug, Deserialize)]
pub struct ResolvePrincipalRequest {
    // Passed to the resolver as-is: no trimming, no case-folding.
    pub identifier: String,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: String,
    pub username: String,
    pub authorities: Vec<String>,
    pub enabled: bool,
    pub account_non_locked: bool,
}

impl From<&Principal> for PrincipalResponse {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id().to_string(),
            username: p.username().to_string(),
            // BTreeSet iteration keeps this sorted
            authorities: p
                .authorities()
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
            enabled: p.is_enabled(),
            account_non_locked: p.is_account_non_locked(),
        }
    }
}
