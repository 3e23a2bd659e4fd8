//! Agents and contact records embedded in resources.

use serde::{Deserialize, Serialize};

use crate::entity::CatalogEntity;

/// A person or organisation (`foaf:Agent`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Agent {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl CatalogEntity for Agent {
    const ENTITY: &'static str = "Agent";
}

/// A vCard contact record (`vcard:Kind`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kind {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_email: Option<String>,
}

impl Kind {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            has_email: Some(email.into()),
        }
    }
}

impl CatalogEntity for Kind {
    const ENTITY: &'static str = "Kind";
}
