use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use strsim::levenshtein;

use crate::domain::UserContext;
use crate::errors::{Result, WizardError};
use crate::form::body::Body;
use crate::form::fields::FieldSpec;
use crate::form::page::{Page, PageConstructor, PageContext};
use crate::services::ReferenceData;

const SUGGESTION_DISTANCE: usize = 3;

/// Async initializer for pages whose options depend on fetched reference data.
///
/// This is the only place page construction performs I/O. An initializer may
/// return a different page variant than the one requested.
#[async_trait]
pub trait PageInitializer: Send + Sync {
    async fn initialize(
        &self,
        body: Body,
        context: PageContext,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Box<dyn Page>>;
}

#[derive(Clone, Copy)]
pub enum PageInit {
    Plain(PageConstructor),
    Fetching(&'static dyn PageInitializer),
}

/// Registration entry for one page of a task.
#[derive(Clone, Copy)]
pub struct PageDefinition {
    pub slug: &'static str,
    pub fields: &'static [FieldSpec],
    pub init: PageInit,
}

impl PageDefinition {
    pub const fn new(
        slug: &'static str,
        fields: &'static [FieldSpec],
        constructor: PageConstructor,
    ) -> Self {
        Self {
            slug,
            fields,
            init: PageInit::Plain(constructor),
        }
    }

    pub const fn fetching(
        slug: &'static str,
        fields: &'static [FieldSpec],
        initializer: &'static dyn PageInitializer,
    ) -> Self {
        Self {
            slug,
            fields,
            init: PageInit::Fetching(initializer),
        }
    }

    pub async fn build(
        &self,
        body: Body,
        context: PageContext,
        user: &UserContext,
        reference_data: &dyn ReferenceData,
    ) -> Result<Box<dyn Page>> {
        match self.init {
            PageInit::Plain(constructor) => constructor(body, context),
            PageInit::Fetching(initializer) => {
                initializer
                    .initialize(body, context, user, reference_data)
                    .await
            }
        }
    }
}

impl fmt::Debug for PageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let init = match self.init {
            PageInit::Plain(_) => "plain",
            PageInit::Fetching(_) => "fetching",
        };
        f.debug_struct("PageDefinition")
            .field("slug", &self.slug)
            .field("fields", &self.fields)
            .field("init", &init)
            .finish()
    }
}

/// When a task may be started from the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskGate {
    #[default]
    Open,
    AfterAllOtherTasks,
}

#[derive(Debug, Clone)]
pub struct TaskDefinition {
    pub slug: &'static str,
    pub name: &'static str,
    /// Call-to-action label shown while the task is incomplete.
    pub action_text: Option<&'static str>,
    pub gate: TaskGate,
    pub pages: Vec<PageDefinition>,
}

impl TaskDefinition {
    pub fn new(slug: &'static str, name: &'static str, pages: Vec<PageDefinition>) -> Self {
        Self {
            slug,
            name,
            action_text: None,
            gate: TaskGate::Open,
            pages,
        }
    }

    pub fn with_action_text(mut self, action_text: &'static str) -> Self {
        self.action_text = Some(action_text);
        self
    }

    pub fn after_all_other_tasks(mut self) -> Self {
        self.gate = TaskGate::AfterAllOtherTasks;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SectionDefinition {
    pub title: &'static str,
    pub tasks: Vec<TaskDefinition>,
}

impl SectionDefinition {
    pub fn new(title: &'static str, tasks: Vec<TaskDefinition>) -> Self {
        Self { title, tasks }
    }
}

/// Lookup of page definitions by task slug and page slug.
#[derive(Debug)]
pub struct PageRegistry {
    sections: Vec<SectionDefinition>,
    tasks: HashMap<&'static str, (usize, usize)>,
    pages: HashMap<&'static str, HashMap<&'static str, PageDefinition>>,
}

impl PageRegistry {
    /// Indexes every task and page, rejecting duplicate slugs and empty tasks.
    pub fn register_all(sections: Vec<SectionDefinition>) -> Result<Self> {
        let mut tasks = HashMap::new();
        let mut pages: HashMap<&'static str, HashMap<&'static str, PageDefinition>> =
            HashMap::new();

        for (section_index, section) in sections.iter().enumerate() {
            for (task_index, task) in section.tasks.iter().enumerate() {
                if tasks
                    .insert(task.slug, (section_index, task_index))
                    .is_some()
                {
                    return Err(WizardError::Configuration(format!(
                        "task `{}` is registered more than once",
                        task.slug
                    )));
                }
                if task.pages.is_empty() {
                    return Err(WizardError::Configuration(format!(
                        "task `{}` has no pages",
                        task.slug
                    )));
                }
                let task_pages = pages.entry(task.slug).or_default();
                for page in &task.pages {
                    if task_pages.insert(page.slug, *page).is_some() {
                        return Err(WizardError::Configuration(format!(
                            "page `{}` is registered more than once in task `{}`",
                            page.slug, task.slug
                        )));
                    }
                }
            }
        }

        Ok(Self {
            sections,
            tasks,
            pages,
        })
    }

    pub fn sections(&self) -> &[SectionDefinition] {
        &self.sections
    }

    /// Every task in section order.
    pub fn tasks(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.sections.iter().flat_map(|section| section.tasks.iter())
    }

    pub fn task(&self, slug: &str) -> Result<&TaskDefinition> {
        self.tasks
            .get(slug)
            .map(|&(section, task)| &self.sections[section].tasks[task])
            .ok_or_else(|| {
                WizardError::unknown_task(slug, suggest(slug, self.tasks.keys().copied()))
            })
    }

    pub fn first_page(&self, task: &str) -> Result<&PageDefinition> {
        let definition = self.task(task)?;
        definition
            .pages
            .first()
            .ok_or_else(|| WizardError::unknown_task(task, None))
    }

    pub fn page(&self, task: &str, page: &str) -> Result<&PageDefinition> {
        let definition = self.task(task)?;
        let found = self.pages.get(task).and_then(|pages| pages.get(page));
        found.ok_or_else(|| {
            let slugs = definition.pages.iter().map(|candidate| candidate.slug);
            WizardError::unknown_page(task, page, suggest(page, slugs))
        })
    }

    pub fn contains(&self, task: &str, page: &str) -> bool {
        self.pages
            .get(task)
            .is_some_and(|pages| pages.contains_key(page))
    }
}

fn suggest<'a>(input: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    candidates
        .map(|candidate| (levenshtein(candidate, input), candidate))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{ErrorMap, Response};

    struct Stub(Body);

    impl Page for Stub {
        fn slug(&self) -> &'static str {
            "stub"
        }

        fn title(&self) -> String {
            "Stub".into()
        }

        fn body(&self) -> &Body {
            &self.0
        }

        fn set_body(&mut self, body: Body) {
            self.0 = body;
        }

        fn errors(&self) -> ErrorMap {
            ErrorMap::new()
        }

        fn response(&self) -> Response {
            Response::new()
        }

        fn next(&self) -> Option<&'static str> {
            None
        }

        fn previous(&self) -> Option<&'static str> {
            None
        }
    }

    fn stub(body: Body, _context: PageContext) -> Result<Box<dyn Page>> {
        Ok(Box::new(Stub(body)))
    }

    fn task(slug: &'static str, pages: &[&'static str]) -> TaskDefinition {
        TaskDefinition::new(
            slug,
            "Task",
            pages
                .iter()
                .map(|&page| PageDefinition::new(page, &[], stub))
                .collect(),
        )
    }

    #[test]
    fn register_all_indexes_tasks_and_pages() {
        let registry = PageRegistry::register_all(vec![SectionDefinition::new(
            "Section",
            vec![task("first-task", &["one", "two"]), task("second-task", &["three"])],
        )])
        .unwrap();

        assert_eq!(registry.first_page("first-task").unwrap().slug, "one");
        assert_eq!(registry.page("first-task", "two").unwrap().slug, "two");
        assert!(registry.contains("second-task", "three"));
        assert!(!registry.contains("first-task", "three"));
        assert_eq!(registry.tasks().count(), 2);
    }

    #[test]
    fn duplicate_page_slug_in_task_is_rejected() {
        let err = PageRegistry::register_all(vec![SectionDefinition::new(
            "Section",
            vec![task("task", &["one", "one"])],
        )])
        .unwrap_err();
        assert!(matches!(err, WizardError::Configuration(_)));
    }

    #[test]
    fn same_page_slug_in_different_tasks_is_allowed() {
        let registry = PageRegistry::register_all(vec![SectionDefinition::new(
            "Section",
            vec![task("a", &["details"]), task("b", &["details"])],
        )]);
        assert!(registry.is_ok());
    }

    #[test]
    fn duplicate_task_slug_is_rejected() {
        let err = PageRegistry::register_all(vec![
            SectionDefinition::new("One", vec![task("task", &["one"])]),
            SectionDefinition::new("Two", vec![task("task", &["two"])]),
        ])
        .unwrap_err();
        assert!(matches!(err, WizardError::Configuration(_)));
    }

    #[test]
    fn unknown_lookups_signal_unknown_page_with_suggestion() {
        let registry = PageRegistry::register_all(vec![SectionDefinition::new(
            "Section",
            vec![task("eligibility", &["release-date"])],
        )])
        .unwrap();

        match registry.page("eligibility", "release-dat").unwrap_err() {
            WizardError::UnknownPage {
                task,
                page,
                suggestion,
            } => {
                assert_eq!(task, "eligibility");
                assert_eq!(page.as_deref(), Some("release-dat"));
                assert_eq!(suggestion.as_deref(), Some("release-date"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = registry.first_page("no-such-task").unwrap_err();
        assert!(err.is_not_found());
    }
}
