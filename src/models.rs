//! Wire types for the platform backend.
//!
//! Field names follow the backend's JSON exactly, which mixes camelCase
//! (`isStreamer`, `phoneNumber`) with snake_case (`is_verified`). Records are
//! disposable copies; the backend stays authoritative.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;

pub const ROLE_STREAMER: &str = "streamer";
pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// A platform account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "isStreamer", default)]
    pub is_streamer: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(rename = "phoneNumber", default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub followers: Vec<String>,
    #[serde(default)]
    pub following: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<Box<Shop>>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    /// "First Last" when both names are set, else the username, else `N/A`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if !self.firstname.is_empty() && !self.lastname.is_empty() {
            return format!("{} {}", self.firstname, self.lastname);
        }
        self.username.clone().unwrap_or_else(|| "N/A".to_string())
    }

    /// Label shown in the role column.
    #[must_use]
    pub fn role_label(&self) -> &'static str {
        if self.is_streamer {
            "Streamer"
        } else if self.role.as_deref() == Some(ROLE_ADMIN) {
            "Admin"
        } else {
            "User"
        }
    }

    /// Date part of `createdAt`, if the backend sent one.
    #[must_use]
    pub fn joined_on(&self) -> Option<&str> {
        self.created_at.as_deref().map(|ts| ts.split('T').next().unwrap_or(ts))
    }
}

/// A marketplace shop. The owner arrives under the `user` key and may be
/// missing or only partly populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub ifu: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<User>>,
}

impl Shop {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unnamed Shop")
    }

    /// Owner label: full name, else username, else email, else `N/A`.
    #[must_use]
    pub fn owner_label(&self) -> String {
        let Some(owner) = self.owner.as_deref() else {
            return "N/A".to_string();
        };
        if !owner.firstname.is_empty() && !owner.lastname.is_empty() {
            return format!("{} {}", owner.firstname, owner.lastname);
        }
        owner
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| (!owner.email.is_empty()).then(|| owner.email.clone()))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// The user summary held in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Login form input. Sent once, never stored.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Body of `POST /auth/admin/login`. Both fields stay optional here so the
/// session store can reject a half-filled response itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<AdminProfile>,
}

/// Partial update for `PATCH /users/{id}`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "isStreamer", skip_serializing_if = "Option::is_none")]
    pub is_streamer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UserPatch {
    #[must_use]
    pub fn verification(is_verified: bool) -> Self {
        Self { is_verified: Some(is_verified), ..Self::default() }
    }

    #[must_use]
    pub fn role(role: &str, is_streamer: bool) -> Self {
        Self { role: Some(role.to_string()), is_streamer: Some(is_streamer), ..Self::default() }
    }

    #[must_use]
    pub fn streamer_flag(is_streamer: bool) -> Self {
        Self { is_streamer: Some(is_streamer), ..Self::default() }
    }
}

/// Partial update for `PATCH /shops/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShopPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "isActive", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ShopPatch {
    #[must_use]
    pub fn activation(is_active: bool) -> Self {
        Self { is_active: Some(is_active), ..Self::default() }
    }
}
