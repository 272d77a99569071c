//! Request and response bodies of the session and profile endpoints.

use serde::{Deserialize, Serialize};

use crate::entity::PresenceStatus;
use crate::geo::GeoPoint;

/// User record sent on registration and echoed back by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    /// Absent when the server only sets a session cookie.
    #[serde(default)]
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Body of the seller status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerData {
    pub is_seller: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Profile returned by the profile endpoints. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    pub id: Option<u64>,
    pub username: Option<String>,
    pub description: Option<String>,
    pub is_seller: Option<bool>,
    pub rating_avg: Option<f64>,
    pub presence_status: Option<PresenceStatus>,
    pub user_id: Option<u64>,
    pub location: Option<GeoPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_data_skips_empty_fields() {
        let user = UserData {
            email: "a@b.c".to_string(),
            password: Some("pw".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@b.c", "password": "pw"}));
    }

    #[test]
    fn test_login_response_without_user_id() {
        let resp: LoginResponse = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert_eq!(resp.user_id, None);

        let resp: LoginResponse =
            serde_json::from_str(r#"{"message":"ok","user_id":12}"#).unwrap();
        assert_eq!(resp.user_id, Some(12));
    }

    #[test]
    fn test_profile_partial() {
        let profile: ProfileData =
            serde_json::from_str(r#"{"is_seller":true,"presence_status":"online","location":null}"#)
                .unwrap();
        assert_eq!(profile.is_seller, Some(true));
        assert_eq!(profile.presence_status, Some(PresenceStatus::Online));
        assert!(profile.location.is_none());
        assert!(profile.username.is_none());
    }

    #[test]
    fn test_seller_data_serialization() {
        let data = SellerData {
            is_seller: false,
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            serde_json::json!({"is_seller": false})
        );
    }
}
