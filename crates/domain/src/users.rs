//! Records exchanged with the users resource.
//!
//! Records are flat, deserialized once per response and never mutated.
//! Optional fields use `Option` so "absent" stays distinguishable from
//! "present but empty".

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::contract::ISO_TIMESTAMP_PATTERN;

static ISO_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // constant pattern
    Regex::new(ISO_TIMESTAMP_PATTERN).expect("timestamp pattern compiles")
});

/// A single user as returned by list and get.
///
/// The id is unsigned, so a negative id fails mapping instead of being
/// carried as data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Service identifier
    #[serde(default)]
    pub id: Option<u64>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Given name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserRecord {
    /// True when the email is present and contains both `@` and `.`.
    #[must_use]
    pub fn has_well_formed_email(&self) -> bool {
        self.email
            .as_deref()
            .is_some_and(|email| email.contains('@') && email.contains('.'))
    }
}

/// Support block attached to read responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportInfo {
    /// Link target
    #[serde(default)]
    pub url: Option<String>,
    /// Link text
    #[serde(default)]
    pub text: Option<String>,
}

/// Envelope returned by get-user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleUserRecord {
    /// The user
    pub data: UserRecord,
    /// Support block
    #[serde(default)]
    pub support: Option<SupportInfo>,
}

/// One page of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListRecord {
    /// Page number, starting at 1
    pub page: u32,
    /// Maximum number of users on a page
    pub per_page: u32,
    /// Total number of users
    pub total: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Users on this page, in service order
    pub data: Vec<UserRecord>,
    /// Support block
    #[serde(default)]
    pub support: Option<SupportInfo>,
}

impl UserListRecord {
    /// True when the page holds no more than `per_page` users.
    #[must_use]
    pub fn fits_page(&self) -> bool {
        u32::try_from(self.data.len()).is_ok_and(|len| len <= self.per_page)
    }
}

/// Body sent to create, patch and put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    /// User name
    pub name: String,
    /// Job title
    pub job: String,
}

impl UserPayload {
    /// Creates a payload.
    #[must_use]
    pub fn new(name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
        }
    }
}

/// Result of create, patch and put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMutationRecord {
    /// Echoed user name
    pub name: String,
    /// Echoed job title
    pub job: String,
    /// Server-assigned identifier; the service sends it as a string or a number
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub id: Option<String>,
    /// Creation timestamp (create only)
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    /// Update timestamp (patch and put only)
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl UserMutationRecord {
    /// True when name and job equal the payload that was sent.
    #[must_use]
    pub fn echoes(&self, payload: &UserPayload) -> bool {
        self.name == payload.name && self.job == payload.job
    }

    /// True when `createdAt` is present and strictly `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    #[must_use]
    pub fn has_iso_created_at(&self) -> bool {
        self.created_at
            .as_deref()
            .is_some_and(|ts| ISO_TIMESTAMP.is_match(ts))
    }
}

mod string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
            Raw::Text(text) => text,
            Raw::Number(number) => number.to_string(),
        }))
    }
}
