use serde::{Deserialize, Serialize};

/// Region name used upstream for users whose scope covers every region.
pub const NATIONAL_REGION_NAME: &str = "National";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbationRegion {
    pub id: String,
    pub name: String,
}

impl ProbationRegion {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn is_national(&self) -> bool {
        self.name.eq_ignore_ascii_case(NATIONAL_REGION_NAME)
    }
}

/// Probation Delivery Unit within a region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbationDeliveryUnit {
    pub id: String,
    pub name: String,
}

impl ProbationDeliveryUnit {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Caller identity passed to reference-data lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserContext {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub probation_region: ProbationRegion,
}

impl UserContext {
    pub fn new(username: impl Into<String>, probation_region: ProbationRegion) -> Self {
        Self {
            username: username.into(),
            token: None,
            probation_region,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
