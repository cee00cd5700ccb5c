//! Response bodies returned by the voice service
//!
//! Known fields are typed; everything else the service sends is kept in
//! `extra` so callers still see the full body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// GET /voice/challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub phrase: String,
}

/// GET /health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// POST /voice/enroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// POST /voice/verify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// GET /voice/user/{user_id}/exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserExistsResponse {
    pub exists: bool,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verify_keeps_unknown_fields() {
        let body = json!({
            "authenticated": true,
            "similarity": 0.91,
            "threshold": 0.75,
            "message": "Usuário autenticado",
            "transcription": "open sesame",
            "phrase_match": true
        });

        let parsed: VerifyResponse = serde_json::from_value(body.clone()).unwrap();
        assert!(parsed.authenticated);
        assert_eq!(parsed.similarity, Some(0.91));
        assert_eq!(parsed.threshold, Some(0.75));
        assert_eq!(parsed.extra.get("phrase_match"), Some(&json!(true)));

        assert_eq!(serde_json::to_value(&parsed).unwrap(), body);
    }

    #[test]
    fn test_verify_null_similarity() {
        let parsed: VerifyResponse = serde_json::from_value(json!({
            "authenticated": false,
            "similarity": null,
            "message": "Usuário não encontrado"
        }))
        .unwrap();

        assert!(!parsed.authenticated);
        assert_eq!(parsed.similarity, None);
        assert_eq!(parsed.threshold, None);
        assert!(parsed.extra.is_empty());
    }

    #[test]
    fn test_enroll_minimal_body() {
        let parsed: EnrollResponse =
            serde_json::from_value(json!({"success": true, "message": "ok"})).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.user_id, None);
        assert_eq!(parsed.transcription, None);
    }

    #[test]
    fn test_health() {
        let parsed: HealthResponse =
            serde_json::from_value(json!({"status": "healthy", "database": "connected"})).unwrap();
        assert!(parsed.is_healthy());
        assert_eq!(parsed.extra.get("database"), Some(&json!("connected")));

        let parsed: HealthResponse = serde_json::from_value(json!({"status": "degraded"})).unwrap();
        assert!(!parsed.is_healthy());
    }
}
