use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Application, Person, UserContext};
use crate::errors::Result;
use crate::form::{PageRequest, RawBody, ResolvedPage, SectionStatus, Transition, Wizard};
use crate::services::ReferenceData;
use crate::storage::ApplicationStore;

/// Ties the wizard to its collaborators: the store that persists each
/// transition and the reference data used by page initializers.
pub struct ApplicationService {
    wizard: Wizard,
    store: Arc<dyn ApplicationStore>,
    reference_data: Arc<dyn ReferenceData>,
}

impl ApplicationService {
    pub fn new(
        wizard: Wizard,
        store: Arc<dyn ApplicationStore>,
        reference_data: Arc<dyn ReferenceData>,
    ) -> Self {
        Self {
            wizard,
            store,
            reference_data,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub async fn create(&self, person: Person) -> Result<Application> {
        let mut application = Application::new(person);
        application.created_at = self.wizard.clock().now();
        self.store.save(&application).await?;
        tracing::info!(application = %application.id, crn = application.person.crn(), "created application");
        Ok(application)
    }

    pub async fn find(&self, id: Uuid) -> Result<Application> {
        self.store.load(id).await
    }

    pub async fn list(&self) -> Result<Vec<Application>> {
        self.store.list().await
    }

    pub async fn show_page(
        &self,
        application: &Application,
        request: PageRequest<'_>,
        user: &UserContext,
    ) -> Result<ResolvedPage> {
        self.wizard
            .resolve_page(request, application, user, self.reference_data.as_ref())
            .await
    }

    /// Advances past a page and persists the application when the body is
    /// valid.
    pub async fn submit_page(
        &self,
        application: &mut Application,
        resolved: &mut ResolvedPage,
        submitted: RawBody,
    ) -> Result<Transition> {
        let transition = match self.wizard.advance(resolved, submitted, application) {
            Ok(transition) => transition,
            Err(err) => {
                if let Some(failure) = err.validation() {
                    tracing::debug!(
                        application = %application.id,
                        task = %failure.task,
                        page = %failure.page,
                        errors = failure.errors.len(),
                        "page submission failed validation"
                    );
                }
                return Err(err);
            }
        };
        self.store.save(application).await?;
        tracing::info!(
            application = %application.id,
            task = transition.task,
            page = transition.page,
            next = transition.next.unwrap_or("task-list"),
            "saved page answers"
        );
        Ok(transition)
    }

    pub async fn task_list(
        &self,
        application: &Application,
        user: &UserContext,
    ) -> Result<Vec<SectionStatus>> {
        self.wizard
            .task_list(application, user, self.reference_data.as_ref())
            .await
    }

    pub async fn submit(&self, application: &mut Application, user: &UserContext) -> Result<()> {
        self.wizard
            .submit(application, user, self.reference_data.as_ref())
            .await?;
        self.store.save(application).await?;
        tracing::info!(application = %application.id, "submitted application");
        Ok(())
    }
}
