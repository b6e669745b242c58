use crate::{Role, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Auth
// =========================================================

/// Login with employee credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub employee_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token, signed server-side.
    pub token: String,
    pub user: UserProfile,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Fetch the profile of the currently authenticated user.
#[derive(Debug, Serialize, Deserialize)]
pub struct WhoAmIRequest;

impl ApiRequest for WhoAmIRequest {
    type Response = UserProfile;
    const PATH: &'static str = "/api/auth/me";
    const METHOD: HttpMethod = HttpMethod::Get;
}

// =========================================================
// Dashboard live feed
// =========================================================

/// One entry of the recent-activity feed on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    pub stage: String,
    pub serial: String,
    pub operator: String,
    pub at: DateTime<Utc>,
}

/// Aggregated dashboard payload pushed over the WebSocket.
///
/// The KPI / breakdown sub-sections are backend-shaped and rendered as-is,
/// so they stay untyped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub kpis: Value,
    #[serde(default)]
    pub recent_activity: Vec<RecentActivity>,
    #[serde(default)]
    pub stage_breakdown: Value,
    #[serde(default)]
    pub todays_output: Value,
}

/// Envelope of every WebSocket message. Messages without `success: true`
/// are logged and ignored by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveMessage {
    pub success: bool,
    #[serde(default)]
    pub data: Option<DashboardSnapshot>,
}

// =========================================================
// Convenience
// =========================================================

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
