// src/service/response.rs

use serde::Deserialize;

use super::Verdict;

const SUCCESS: &str = "success";

/// Body of a `/verify` answer.
///
/// A match looks like `{"status":"success","user":"ALICE","confidence":0.73}`;
/// everything else (`"unknown"`, `"error"` + `message`, ...) is a miss.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerifyResponse {
    pub status: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl VerifyResponse {
    /// A success without a name cannot be displayed, so it counts as a miss.
    pub fn into_verdict(self) -> Verdict {
        if self.status == SUCCESS {
            if let Some(user) = self.user {
                return Verdict::Match { user, confidence: self.confidence };
            }
        }
        Verdict::NoMatch { status: self.status, message: self.message }
    }
}

/// Interpret a 2xx body. Bodies that are not the expected JSON are a miss.
pub fn parse_body(body: &[u8]) -> Verdict {
    match serde_json::from_slice::<VerifyResponse>(body) {
        Ok(resp) => resp.into_verdict(),
        Err(e) => Verdict::NoMatch {
            status: "malformed".into(),
            message: Some(e.to_string()),
        },
    }
}
