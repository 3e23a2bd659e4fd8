//! Distributions and license documents.

use serde::{Deserialize, Serialize};

use sdc_core::{CalendarDate, Identifier};

use crate::entity::CatalogEntity;

/// A specific representation of a dataset (`dcat:Distribution`), e.g. a
/// downloadable file or an API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Unique among the container's distributions.
    pub identifier: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "accessURL", default, skip_serializing_if = "Option::is_none")]
    pub access_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Distribution {
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            title: None,
            description: None,
            access_url: None,
            modified: None,
            version: None,
        }
    }

    pub fn with_access_url(mut self, url: impl Into<String>) -> Self {
        self.access_url = Some(url.into());
        self
    }

    pub fn with_modified(mut self, modified: CalendarDate) -> Self {
        self.modified = Some(modified);
        self
    }
}

impl CatalogEntity for Distribution {
    const ENTITY: &'static str = "Distribution";
}

/// A legal document giving official permission (`dcterms:LicenseDocument`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl CatalogEntity for LicenseDocument {
    const ENTITY: &'static str = "LicenseDocument";
}
