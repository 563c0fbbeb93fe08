use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Application, ApplicationStatus, Document, UserContext};
use crate::errors::{Result, ValidationFailure, WizardError};
use crate::form::body::{Body, RawBody};
use crate::form::fields::{ErrorMap, FieldSpec};
use crate::form::page::{Page, PageContext};
use crate::form::registry::{PageRegistry, SectionDefinition, TaskDefinition, TaskGate};
use crate::form::response::ResponseEntry;
use crate::services::{Clock, ReferenceData};

/// Validation errors and raw input carried across a redirect after a failed
/// submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flash {
    pub errors: ErrorMap,
    pub user_input: RawBody,
}

impl From<ValidationFailure> for Flash {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            errors: failure.errors,
            user_input: failure.user_input,
        }
    }
}

/// Page requested by task slug and optional page slug.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub task: &'a str,
    pub page: Option<&'a str>,
    pub flash: Option<Flash>,
}

impl<'a> PageRequest<'a> {
    pub fn new(task: &'a str, page: &'a str) -> Self {
        Self {
            task,
            page: Some(page),
            flash: None,
        }
    }

    /// Requests the first page of a task.
    pub fn first(task: &'a str) -> Self {
        Self {
            task,
            page: None,
            flash: None,
        }
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }
}

/// A ready page instance plus anything carried over from a failed submission.
pub struct ResolvedPage {
    pub task: &'static str,
    pub page: Box<dyn Page>,
    pub errors: ErrorMap,
    pub user_input: Option<RawBody>,
}

impl ResolvedPage {
    /// Slug of the page actually resolved, which may be a variant of the one
    /// requested.
    pub fn slug(&self) -> &'static str {
        self.page.slug()
    }
}

impl fmt::Debug for ResolvedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPage")
            .field("task", &self.task)
            .field("page", &self.page.slug())
            .field("body", self.page.body())
            .field("errors", &self.errors)
            .finish()
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub task: &'static str,
    pub page: &'static str,
    /// `None` means return to the task list.
    pub next: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Complete,
    CannotStart,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not started",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Complete => "Completed",
            TaskStatus::CannotStart => "Cannot start yet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListEntry {
    pub slug: &'static str,
    pub name: &'static str,
    pub action_text: Option<&'static str>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStatus {
    pub title: &'static str,
    pub tasks: Vec<TaskListEntry>,
}

/// Transcript of one task in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptSection {
    pub task: &'static str,
    pub name: &'static str,
    pub entries: Vec<ResponseEntry>,
}

/// Pages on a task's path, in the order `next()` visits them.
struct TaskWalk {
    pages: Vec<Box<dyn Page>>,
    complete: bool,
}

/// Drives page resolution, validation, persistence into the answer store and
/// navigation over a [`PageRegistry`].
pub struct Wizard {
    registry: PageRegistry,
    clock: Arc<dyn Clock>,
}

impl Wizard {
    pub fn new(sections: Vec<SectionDefinition>, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self {
            registry: PageRegistry::register_all(sections)?,
            clock,
        })
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Builds the page for a request from the stored answers merged with any
    /// flashed input, running the page's initializer when it has one.
    pub async fn resolve_page(
        &self,
        request: PageRequest<'_>,
        application: &Application,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<ResolvedPage> {
        let task = self.registry.task(request.task)?;
        let definition = match request.page {
            Some(page) => self.registry.page(task.slug, page)?,
            None => self.registry.first_page(task.slug)?,
        };

        let (errors, user_input) = match request.flash {
            Some(flash) => (flash.errors, Some(flash.user_input)),
            None => (ErrorMap::new(), None),
        };
        let merged = |slug: &str, fields: &[FieldSpec]| {
            let mut raw = application
                .data
                .page(task.slug, slug)
                .cloned()
                .map(Body::into_raw)
                .unwrap_or_default();
            if let Some(input) = &user_input {
                raw.extend(input.clone());
            }
            Body::from_raw(raw, fields)
        };

        let body = merged(definition.slug, definition.fields);
        let context = PageContext::new(application, self.clock.today());
        let mut page = definition
            .build(body, context, user, reference_data)
            .await?;

        // A variant keeps its own stored answers; redisplayed input still wins.
        if page.slug() != definition.slug {
            let variant = self.registry.page(task.slug, page.slug())?;
            page.set_body(merged(variant.slug, variant.fields));
        }

        Ok(ResolvedPage {
            task: task.slug,
            page,
            errors,
            user_input,
        })
    }

    /// Validates a submitted body and, when valid, records it in the
    /// application and returns the next page.
    ///
    /// A validation failure leaves the application untouched.
    pub fn advance(
        &self,
        resolved: &mut ResolvedPage,
        submitted: RawBody,
        application: &mut Application,
    ) -> Result<Transition> {
        if application.is_submitted() {
            return Err(WizardError::AlreadySubmitted(application.id));
        }

        let task = resolved.task;
        let slug = resolved.page.slug();
        let definition = self.registry.page(task, slug)?;
        resolved
            .page
            .set_body(Body::from_raw(submitted.clone(), definition.fields));

        let errors = resolved.page.errors();
        if !errors.is_empty() {
            resolved.errors = errors.clone();
            resolved.user_input = Some(submitted.clone());
            return Err(WizardError::Validation(ValidationFailure {
                task: task.to_string(),
                page: slug.to_string(),
                errors,
                user_input: submitted,
            }));
        }

        let patch = resolved.page.application_patch();
        application
            .data
            .set_page(task, slug, resolved.page.body().clone());
        patch.apply(application);
        let response = resolved.page.response().anonymised(&application.person);
        application.document.set_page(task, slug, response);

        resolved.errors.clear();
        resolved.user_input = None;

        Ok(Transition {
            task,
            page: slug,
            next: resolved.page.next(),
        })
    }

    /// Status of every task, grouped by section, for the task list.
    pub async fn task_list(
        &self,
        application: &Application,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Vec<SectionStatus>> {
        let mut open_complete = true;
        let mut sections = Vec::new();
        for section in self.registry.sections() {
            let mut tasks = Vec::new();
            for task in &section.tasks {
                let status = match task.gate {
                    TaskGate::Open => {
                        let status = self
                            .open_task_status(task, application, user, reference_data)
                            .await?;
                        open_complete &= status == TaskStatus::Complete;
                        status
                    }
                    // Resolved below once every open task has been checked.
                    TaskGate::AfterAllOtherTasks => TaskStatus::CannotStart,
                };
                tasks.push(TaskListEntry {
                    slug: task.slug,
                    name: task.name,
                    action_text: task.action_text,
                    status,
                });
            }
            sections.push(SectionStatus {
                title: section.title,
                tasks,
            });
        }

        if open_complete {
            for entry in sections.iter_mut().flat_map(|section| section.tasks.iter_mut()) {
                let task = self.registry.task(entry.slug)?;
                if task.gate == TaskGate::AfterAllOtherTasks {
                    entry.status = self
                        .open_task_status(task, application, user, reference_data)
                        .await?;
                }
            }
        }

        Ok(sections)
    }

    pub async fn task_status(
        &self,
        task: &str,
        application: &Application,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<TaskStatus> {
        let slug = self.registry.task(task)?.slug;
        let sections = self.task_list(application, user, reference_data).await?;
        sections
            .iter()
            .flat_map(|section| section.tasks.iter())
            .find(|entry| entry.slug == slug)
            .map(|entry| entry.status)
            .ok_or_else(|| WizardError::unknown_task(task, None))
    }

    /// Marks the application submitted once every task is complete and no
    /// answer on a task's path blocks the referral.
    ///
    /// The transcript is rebuilt from the pages on each task's path and
    /// answers left behind on abandoned branches are dropped.
    pub async fn submit(
        &self,
        application: &mut Application,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<()> {
        if application.is_submitted() {
            return Err(WizardError::AlreadySubmitted(application.id));
        }

        let mut incomplete = Vec::new();
        let mut walks = Vec::new();
        for task in self.registry.tasks() {
            let walk = self
                .walk_task(task, application, user, reference_data)
                .await?;
            if walk.complete {
                walks.push((task.slug, walk));
            } else {
                incomplete.push(task.slug.to_string());
            }
        }
        if !incomplete.is_empty() {
            return Err(WizardError::NotReadyToSubmit {
                id: application.id,
                incomplete,
            });
        }

        let reasons = walks
            .iter()
            .flat_map(|(_, walk)| walk.pages.iter())
            .filter_map(|page| page.blocking_reason())
            .collect::<Vec<_>>();
        if !reasons.is_empty() {
            return Err(WizardError::ReferralBlocked {
                id: application.id,
                reasons,
            });
        }

        let mut document = Document::default();
        for (task, walk) in walks {
            let slugs = walk.pages.iter().map(|page| page.slug()).collect::<Vec<_>>();
            for page in &walk.pages {
                document.set_page(
                    task,
                    page.slug(),
                    page.response().anonymised(&application.person),
                );
            }
            application.data.retain_pages(task, &slugs);
        }

        application.document = document;
        application.status = ApplicationStatus::Submitted;
        application.submitted_at = Some(self.clock.now());
        Ok(())
    }

    /// The recorded transcript in registry order.
    pub fn transcript(&self, application: &Application) -> Vec<TranscriptSection> {
        self.registry
            .tasks()
            .filter_map(|task| {
                let entries = task
                    .pages
                    .iter()
                    .filter_map(|page| application.document.page(task.slug, page.slug))
                    .flat_map(|response| response.entries().iter().cloned())
                    .collect::<Vec<_>>();
                (!entries.is_empty()).then_some(TranscriptSection {
                    task: task.slug,
                    name: task.name,
                    entries,
                })
            })
            .collect()
    }

    async fn open_task_status(
        &self,
        task: &TaskDefinition,
        application: &Application,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<TaskStatus> {
        let started = application
            .data
            .task(task.slug)
            .is_some_and(|pages| !pages.is_empty());
        if !started {
            return Ok(TaskStatus::NotStarted);
        }
        let walk = self
            .walk_task(task, application, user, reference_data)
            .await?;
        Ok(if walk.complete {
            TaskStatus::Complete
        } else {
            TaskStatus::InProgress
        })
    }

    /// Follows `next()` from the first page over stored answers until the
    /// path ends, an answer is missing, or a stored body no longer validates.
    async fn walk_task(
        &self,
        task: &TaskDefinition,
        application: &Application,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<TaskWalk> {
        let context = PageContext::new(application, self.clock.today());
        let mut definition = self.registry.first_page(task.slug)?;
        let mut pages: Vec<Box<dyn Page>> = Vec::new();

        loop {
            let stored = application
                .data
                .page(task.slug, definition.slug)
                .cloned()
                .unwrap_or_default();
            let page = definition
                .build(stored, context.clone(), user, reference_data)
                .await?;
            if application.data.page(task.slug, page.slug()).is_none()
                || !page.errors().is_empty()
            {
                return Ok(TaskWalk {
                    pages,
                    complete: false,
                });
            }

            let next = page.next();
            pages.push(page);
            let Some(next) = next else {
                return Ok(TaskWalk {
                    pages,
                    complete: true,
                });
            };
            if pages.iter().any(|visited| visited.slug() == next) {
                return Err(WizardError::Configuration(format!(
                    "task `{}` revisits page `{}`",
                    task.slug, next
                )));
            }
            definition = self.registry.page(task.slug, next)?;
        }
    }
}
