//! Session data model
//!
//! These types mirror what the upstream authentication API returns. Unknown
//! profile fields and unknown roles are preserved so a user object can be
//! written back to a cookie unchanged.

use crate::{validation_error, PorticoResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{convert::Infallible, fmt, str::FromStr};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// User role as reported by the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Manager,
    User,
    /// Any role string this gateway has no special handling for
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::User => "USER",
            Role::Other(role) => role,
        }
    }
}

impl FromStr for Role {
    type Err = Infallible;

    /// Matching is exact: `"admin"` is not `ADMIN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ADMIN" => Role::Admin,
            "MANAGER" => Role::Manager,
            "USER" => Role::User,
            other => Role::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_str(&raw).unwrap_or_else(|never| match never {}))
    }
}

/// User identifier, numeric or textual depending on the upstream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(id) => write!(f, "{id}"),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

/// Authenticated user as returned by the upstream API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct User {
    /// User ID
    pub id: UserId,
    /// User role
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "ADMIN"))]
    pub role: Role,
    /// Every other profile field (`email`, `name`, ...), kept verbatim
    /// including explicit nulls
    #[serde(flatten)]
    #[cfg_attr(feature = "openapi", schema(ignore))]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            profile: serde_json::Map::new(),
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        &self.role == role
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&Role::Admin)
    }

    fn profile_str(&self, key: &str) -> Option<&str> {
        self.profile.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.profile_str("email")
    }

    pub fn name(&self) -> Option<&str> {
        self.profile_str("name")
    }

    /// Name to greet the user with: name, then email, then id
    pub fn display_name(&self) -> String {
        self.name()
            .or_else(|| self.email())
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// Session handed back by the upstream on a successful login
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Session {
    /// Opaque upstream token
    pub token: String,
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[redacted]")
            .field("user", &self.user)
            .finish()
    }
}

/// Login credentials
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
    #[cfg_attr(feature = "openapi", schema(example = "admin@example.com"))]
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject requests that cannot possibly succeed upstream
    pub fn validate(&self) -> PorticoResult<()> {
        if self.email.trim().is_empty() {
            return Err(validation_error!("Email is required", "email", "login"));
        }
        if self.password.is_empty() {
            return Err(validation_error!(
                "Password is required",
                "password",
                "login"
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}
