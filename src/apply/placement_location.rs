//! Placement region and probation delivery unit.
//!
//! Options come from reference data, so every page here has an async
//! initializer. Users whose own region is national are never asked whether
//! they need an alternative region: the first page initialises straight into
//! the region choice.

use async_trait::async_trait;

use crate::domain::{ProbationDeliveryUnit, ProbationRegion, UserContext};
use crate::errors::Result;
use crate::form::fields::{choice_items, require_yes_no, yes_no_label};
use crate::form::{
    ApplicationPatch, Body, ChoiceItem, ErrorMap, FieldSpec, Page, PageContext, PageDefinition,
    PageInitializer, Response, TaskDefinition, YES_NO,
};
use crate::services::ReferenceData;

pub const TASK: &str = "placement-location";
pub const ALTERNATIVE_REGION: &str = "alternative-region";
pub const DIFFERENT_REGION: &str = "different-region";
pub const PLACEMENT_PDU: &str = "placement-pdu";

const ALTERNATIVE_REGION_FIELDS: &[FieldSpec] = &[FieldSpec::yes_no("alternativeRegion")];
const DIFFERENT_REGION_FIELDS: &[FieldSpec] = &[FieldSpec::reference("regionId")];
const PLACEMENT_PDU_FIELDS: &[FieldSpec] = &[FieldSpec::reference("pduId")];

pub fn task() -> TaskDefinition {
    TaskDefinition::new(
        TASK,
        "Placement location",
        vec![
            PageDefinition::fetching(
                ALTERNATIVE_REGION,
                ALTERNATIVE_REGION_FIELDS,
                &AlternativeRegionInitializer,
            ),
            PageDefinition::fetching(
                DIFFERENT_REGION,
                DIFFERENT_REGION_FIELDS,
                &DifferentRegionInitializer,
            ),
            PageDefinition::fetching(PLACEMENT_PDU, PLACEMENT_PDU_FIELDS, &PlacementPduInitializer),
        ],
    )
    .with_action_text("Add placement location")
}

/// The first page of the task, in whichever variant applies to the user.
pub enum RegionQuestion {
    Alternative(AlternativeRegion),
    Different(DifferentRegion),
}

impl RegionQuestion {
    pub async fn resolve(
        body: Body,
        context: PageContext,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Self> {
        if user.probation_region.is_national() {
            let body = context
                .stored(TASK, DIFFERENT_REGION)
                .cloned()
                .unwrap_or_default();
            let page = DifferentRegion::fetch(body, context, user, reference_data).await?;
            return Ok(Self::Different(page));
        }
        Ok(Self::Alternative(AlternativeRegion {
            body,
            context,
            region: user.probation_region.clone(),
        }))
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Alternative(_) => ALTERNATIVE_REGION,
            Self::Different(_) => DIFFERENT_REGION,
        }
    }

    pub fn into_page(self) -> Box<dyn Page> {
        match self {
            Self::Alternative(page) => Box::new(page),
            Self::Different(page) => Box::new(page),
        }
    }
}

struct AlternativeRegionInitializer;

#[async_trait]
impl PageInitializer for AlternativeRegionInitializer {
    async fn initialize(
        &self,
        body: Body,
        context: PageContext,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Box<dyn Page>> {
        let question = RegionQuestion::resolve(body, context, user, reference_data).await?;
        Ok(question.into_page())
    }
}

struct DifferentRegionInitializer;

#[async_trait]
impl PageInitializer for DifferentRegionInitializer {
    async fn initialize(
        &self,
        body: Body,
        context: PageContext,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Box<dyn Page>> {
        let page = DifferentRegion::fetch(body, context, user, reference_data).await?;
        Ok(Box::new(page))
    }
}

struct PlacementPduInitializer;

#[async_trait]
impl PageInitializer for PlacementPduInitializer {
    async fn initialize(
        &self,
        body: Body,
        context: PageContext,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Box<dyn Page>> {
        let page = PlacementPdu::fetch(body, context, user, reference_data).await?;
        Ok(Box::new(page))
    }
}

pub struct AlternativeRegion {
    body: Body,
    context: PageContext,
    region: ProbationRegion,
}

impl AlternativeRegion {
    fn answer(&self) -> Option<&str> {
        self.body.filled("alternativeRegion")
    }
}

impl Page for AlternativeRegion {
    fn slug(&self) -> &'static str {
        ALTERNATIVE_REGION
    }

    fn title(&self) -> String {
        format!(
            "Does {} need to be placed outside {}?",
            self.context.person_name(),
            self.region.name
        )
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        require_yes_no(
            &self.body,
            &mut errors,
            "alternativeRegion",
            "You must specify if the placement needs to be in a different region",
        );
        errors
    }

    fn response(&self) -> Response {
        Response::new().with(self.title(), yes_no_label(self.answer()))
    }

    fn next(&self) -> Option<&'static str> {
        match self.answer() {
            Some("yes") => Some(DIFFERENT_REGION),
            _ => Some(PLACEMENT_PDU),
        }
    }

    fn previous(&self) -> Option<&'static str> {
        None
    }

    fn items(&self) -> Vec<ChoiceItem> {
        let selected = self.answer().into_iter().collect::<Vec<_>>();
        choice_items(YES_NO, &selected)
    }

    /// A changed answer invalidates the region and PDU chosen under it.
    fn application_patch(&self) -> ApplicationPatch {
        let stored = self
            .context
            .answer(TASK, ALTERNATIVE_REGION, "alternativeRegion");
        if stored == self.answer() {
            return ApplicationPatch::default();
        }
        ApplicationPatch::default()
            .clear_page(TASK, DIFFERENT_REGION)
            .clear_page(TASK, PLACEMENT_PDU)
    }
}

/// Region choice, excluding the national pseudo-region.
pub struct DifferentRegion {
    body: Body,
    context: PageContext,
    regions: Vec<ProbationRegion>,
    user_is_national: bool,
}

impl DifferentRegion {
    async fn fetch(
        body: Body,
        context: PageContext,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Self> {
        let regions = reference_data
            .probation_regions(user)
            .await?
            .into_iter()
            .filter(|region| !region.is_national())
            .collect();
        Ok(Self {
            body,
            context,
            regions,
            user_is_national: user.probation_region.is_national(),
        })
    }

    fn selected(&self) -> Option<&ProbationRegion> {
        let id = self.body.filled("regionId")?;
        self.regions.iter().find(|region| region.id == id)
    }
}

impl Page for DifferentRegion {
    fn slug(&self) -> &'static str {
        DIFFERENT_REGION
    }

    fn title(&self) -> String {
        format!(
            "Which region should {} be placed in?",
            self.context.person_name()
        )
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        if self.body.filled("regionId").is_none() {
            errors.insert("regionId".into(), "You must select a region".into());
        } else if self.selected().is_none() {
            errors.insert("regionId".into(), "You must select a region from the list".into());
        }
        errors
    }

    fn response(&self) -> Response {
        let name = self
            .selected()
            .map(|region| region.name.as_str())
            .unwrap_or_default();
        Response::new().with(self.title(), name)
    }

    fn next(&self) -> Option<&'static str> {
        Some(PLACEMENT_PDU)
    }

    fn previous(&self) -> Option<&'static str> {
        if self.user_is_national {
            None
        } else {
            Some(ALTERNATIVE_REGION)
        }
    }

    fn items(&self) -> Vec<ChoiceItem> {
        let selected = self.body.filled("regionId");
        self.regions
            .iter()
            .map(|region| {
                ChoiceItem::new(
                    region.id.as_str(),
                    region.name.as_str(),
                    selected == Some(region.id.as_str()),
                )
            })
            .collect()
    }

    /// PDUs belong to a region, so a new region invalidates the stored PDU.
    fn application_patch(&self) -> ApplicationPatch {
        let stored = self.context.answer(TASK, DIFFERENT_REGION, "regionId");
        if stored == self.body.filled("regionId") {
            ApplicationPatch::default()
        } else {
            ApplicationPatch::default().clear_page(TASK, PLACEMENT_PDU)
        }
    }
}

/// Delivery unit within either the chosen different region or the user's own.
pub struct PlacementPdu {
    body: Body,
    context: PageContext,
    region_id: String,
    units: Vec<ProbationDeliveryUnit>,
    via_different_region: bool,
}

impl PlacementPdu {
    async fn fetch(
        body: Body,
        context: PageContext,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Self> {
        let via_different_region = user.probation_region.is_national()
            || context.require_answer(TASK, ALTERNATIVE_REGION, "alternativeRegion")? == "yes";
        let region_id = if via_different_region {
            context
                .require_answer(TASK, DIFFERENT_REGION, "regionId")?
                .to_string()
        } else {
            user.probation_region.id.clone()
        };
        let units = reference_data
            .probation_delivery_units(user, &region_id)
            .await?;
        Ok(Self {
            body,
            context,
            region_id,
            units,
            via_different_region,
        })
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    fn selected(&self) -> Option<&ProbationDeliveryUnit> {
        let id = self.body.filled("pduId")?;
        self.units.iter().find(|unit| unit.id == id)
    }
}

impl Page for PlacementPdu {
    fn slug(&self) -> &'static str {
        PLACEMENT_PDU
    }

    fn title(&self) -> String {
        format!(
            "Which probation delivery unit (PDU) should {} be placed in?",
            self.context.person_name()
        )
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        if self.body.filled("pduId").is_none() {
            errors.insert("pduId".into(), "You must select a probation delivery unit".into());
        } else if self.selected().is_none() {
            errors.insert(
                "pduId".into(),
                "You must select a probation delivery unit from the list".into(),
            );
        }
        errors
    }

    fn response(&self) -> Response {
        let name = self
            .selected()
            .map(|unit| unit.name.as_str())
            .unwrap_or_default();
        Response::new().with(self.title(), name)
    }

    fn next(&self) -> Option<&'static str> {
        None
    }

    fn previous(&self) -> Option<&'static str> {
        if self.via_different_region {
            Some(DIFFERENT_REGION)
        } else {
            Some(ALTERNATIVE_REGION)
        }
    }

    fn items(&self) -> Vec<ChoiceItem> {
        let selected = self.body.filled("pduId");
        self.units
            .iter()
            .map(|unit| {
                ChoiceItem::new(
                    unit.id.as_str(),
                    unit.name.as_str(),
                    selected == Some(unit.id.as_str()),
                )
            })
            .collect()
    }
}
