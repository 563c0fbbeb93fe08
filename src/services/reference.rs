use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ProbationDeliveryUnit, ProbationRegion, UserContext};
use crate::errors::{Result, WizardError};

/// Upstream lookups used by page initializers.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    async fn probation_regions(&self, user: &UserContext) -> Result<Vec<ProbationRegion>>;

    async fn probation_delivery_units(
        &self,
        user: &UserContext,
        region_id: &str,
    ) -> Result<Vec<ProbationDeliveryUnit>>;
}

/// In-memory reference data, optionally loaded from a JSON catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaticReferenceData {
    pub regions: Vec<ProbationRegion>,
    /// Delivery units keyed by region id.
    #[serde(default)]
    pub delivery_units: BTreeMap<String, Vec<ProbationDeliveryUnit>>,
}

impl StaticReferenceData {
    pub fn new(regions: Vec<ProbationRegion>) -> Self {
        Self {
            regions,
            delivery_units: BTreeMap::new(),
        }
    }

    pub fn with_delivery_units(
        mut self,
        region_id: impl Into<String>,
        units: Vec<ProbationDeliveryUnit>,
    ) -> Self {
        self.delivery_units.insert(region_id.into(), units);
        self
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let catalogue: Self = serde_json::from_str(&data)?;
        tracing::debug!(
            path = %path.display(),
            regions = catalogue.regions.len(),
            "loaded reference data catalogue"
        );
        Ok(catalogue)
    }

    /// Built-in catalogue used when no file is configured.
    pub fn builtin() -> Self {
        let region = |id: &str, name: &str| ProbationRegion::new(id, name);
        let unit = |id: &str, name: &str| ProbationDeliveryUnit::new(id, name);
        Self::new(vec![
            region("national", "National"),
            region("north-east", "North East"),
            region("yorkshire", "Yorkshire and the Humber"),
            region("london", "London"),
            region("wales", "Wales"),
        ])
        .with_delivery_units(
            "north-east",
            vec![
                unit("county-durham", "County Durham and Darlington"),
                unit("newcastle", "Newcastle upon Tyne"),
                unit("sunderland", "Sunderland"),
            ],
        )
        .with_delivery_units(
            "yorkshire",
            vec![
                unit("leeds", "Leeds"),
                unit("sheffield", "Sheffield"),
                unit("hull", "Hull and East Riding"),
            ],
        )
        .with_delivery_units(
            "london",
            vec![
                unit("camden", "Camden and Islington"),
                unit("hackney", "Hackney and City"),
                unit("lambeth", "Lambeth"),
            ],
        )
        .with_delivery_units(
            "wales",
            vec![
                unit("cardiff", "Cardiff and Vale"),
                unit("swansea", "Swansea, Neath Port Talbot"),
            ],
        )
    }

    pub fn region(&self, id: &str) -> Option<&ProbationRegion> {
        self.regions.iter().find(|region| region.id == id)
    }
}

#[async_trait]
impl ReferenceData for StaticReferenceData {
    async fn probation_regions(&self, _user: &UserContext) -> Result<Vec<ProbationRegion>> {
        Ok(self.regions.clone())
    }

    async fn probation_delivery_units(
        &self,
        _user: &UserContext,
        region_id: &str,
    ) -> Result<Vec<ProbationDeliveryUnit>> {
        if self.region(region_id).is_none() {
            return Err(WizardError::ReferenceData(format!(
                "unknown probation region `{}`",
                region_id
            )));
        }
        Ok(self
            .delivery_units
            .get(region_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> UserContext {
        UserContext::new("officer", ProbationRegion::new("london", "London"))
    }

    #[tokio::test]
    async fn builtin_catalogue_lists_units_by_region() {
        let data = StaticReferenceData::builtin();
        let units = data.probation_delivery_units(&user(), "yorkshire").await.unwrap();
        assert!(units.iter().any(|unit| unit.name == "Leeds"));

        let regions = data.probation_regions(&user()).await.unwrap();
        assert!(regions.iter().any(ProbationRegion::is_national));
    }

    #[tokio::test]
    async fn unknown_region_is_a_reference_data_error() {
        let err = StaticReferenceData::builtin()
            .probation_delivery_units(&user(), "atlantis")
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::ReferenceData(_)));
    }

    #[test]
    fn catalogue_loads_from_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reference.json");
        fs::write(
            &path,
            r#"{
                "regions": [{ "id": "r1", "name": "Region One" }],
                "deliveryUnits": { "r1": [{ "id": "p1", "name": "Unit One" }] }
            }"#,
        )
        .unwrap();

        let data = StaticReferenceData::from_path(&path).unwrap();
        assert_eq!(data.region("r1").map(|region| region.name.as_str()), Some("Region One"));
        assert_eq!(data.delivery_units["r1"][0].id, "p1");
    }
}
