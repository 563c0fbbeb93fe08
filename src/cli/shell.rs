use std::path::Path;
use std::sync::Arc;

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::apply;
use crate::cli::interaction::DialoguerInteraction;
use crate::cli::output;
use crate::cli::runner::{TaskOutcome, TaskRunner};
use crate::cli::{CliError, CliResult};
use crate::config::{Config, ConfigManager};
use crate::domain::{Application, Person, UserContext};
use crate::errors::WizardError;
use crate::form::TaskStatus;
use crate::services::{ApplicationService, StaticReferenceData, SystemClock};
use crate::storage::JsonApplicationStore;

#[derive(Debug, Clone, Copy)]
enum MenuAction {
    RunTask(&'static str),
    ViewAnswers,
    Submit,
    Back,
}

/// Loads configuration and runs the interactive referral menus.
pub async fn run_cli() -> CliResult<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    if !manager.path().exists() {
        manager.save(&config)?;
    }
    let session = Session::open(&config, manager.base_dir())?;
    session.main_menu().await
}

struct Session {
    service: ApplicationService,
    user: UserContext,
    theme: ColorfulTheme,
}

impl Session {
    fn open(config: &Config, base: &Path) -> CliResult<Self> {
        let reference_data = match &config.reference_data {
            Some(path) => StaticReferenceData::from_path(path)?,
            None => StaticReferenceData::builtin(),
        };
        let region = reference_data
            .region(&config.probation_region_id)
            .cloned()
            .ok_or_else(|| {
                CliError::Message(format!(
                    "Unknown probation region `{}` in configuration",
                    config.probation_region_id
                ))
            })?;
        let user = config.user_context(region);
        let store = JsonApplicationStore::new(&config.data_dir_or(base))?;
        let wizard = apply::wizard(Arc::new(SystemClock))?;
        let service = ApplicationService::new(wizard, Arc::new(store), Arc::new(reference_data));

        tracing::info!(
            user = %user.username,
            region = %user.probation_region.name,
            "referral shell ready"
        );
        Ok(Self {
            service,
            user,
            theme: ColorfulTheme::default(),
        })
    }

    async fn main_menu(&self) -> CliResult<()> {
        let items = ["Start a new application", "Open an application", "Exit"];
        loop {
            let choice = Select::with_theme(&self.theme)
                .with_prompt("Accommodation referrals")
                .items(&items)
                .default(0)
                .interact_opt()?;
            match choice {
                Some(0) => {
                    let Some(person) = self.prompt_person()? else {
                        continue;
                    };
                    let mut application = self.service.create(person).await?;
                    output::success(format!("Created application {}", application.id));
                    self.application_menu(&mut application).await?;
                }
                Some(1) => {
                    if let Some(mut application) = self.choose_application().await? {
                        self.application_menu(&mut application).await?;
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn prompt_person(&self) -> CliResult<Option<Person>> {
        let crn: String = Input::with_theme(&self.theme)
            .with_prompt("Case reference number (CRN)")
            .interact_text()?;
        let access = Select::with_theme(&self.theme)
            .with_prompt("Access to this person's record")
            .items(&["Full access", "Limited access", "Restricted"])
            .default(0)
            .interact_opt()?;
        let person = match access {
            Some(2) => Person::restricted(crn.trim()),
            Some(index) => {
                let name: String = Input::with_theme(&self.theme)
                    .with_prompt("Name")
                    .interact_text()?;
                if index == 0 {
                    Person::full(crn.trim(), name.trim())
                } else {
                    Person::limited_access(crn.trim(), name.trim())
                }
            }
            None => return Ok(None),
        };
        Ok(Some(person))
    }

    async fn choose_application(&self) -> CliResult<Option<Application>> {
        let applications = self.service.list().await?;
        if applications.is_empty() {
            output::warning("No applications yet.");
            return Ok(None);
        }
        let labels = applications
            .iter()
            .map(|application| {
                let status = if application.is_submitted() {
                    "submitted"
                } else {
                    "in progress"
                };
                format!(
                    "{} {} ({}, started {})",
                    application.person.crn(),
                    application.person.display_name(),
                    status,
                    application.created_at.format("%-d %B %Y")
                )
            })
            .collect::<Vec<_>>();
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Open application")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        Ok(choice.map(|index| applications[index].clone()))
    }

    async fn application_menu(&self, application: &mut Application) -> CliResult<()> {
        loop {
            let sections = self.service.task_list(application, &self.user).await?;
            output::section(format!(
                "Referral for {} ({})",
                application.person.display_name(),
                application.person.crn()
            ));

            let mut labels = Vec::new();
            let mut actions = Vec::new();
            for section in &sections {
                for task in &section.tasks {
                    labels.push(format!(
                        "{} · {} {}",
                        section.title,
                        task.name,
                        output::status_tag(task.status)
                    ));
                    let runnable = !application.is_submitted() && task.status != TaskStatus::CannotStart;
                    actions.push(if runnable {
                        MenuAction::RunTask(task.slug)
                    } else {
                        MenuAction::ViewAnswers
                    });
                }
            }
            labels.push("View answers".into());
            actions.push(MenuAction::ViewAnswers);
            if !application.is_submitted() {
                labels.push("Submit application".into());
                actions.push(MenuAction::Submit);
            }
            labels.push("Back".into());
            actions.push(MenuAction::Back);

            let choice = Select::with_theme(&self.theme)
                .items(&labels)
                .default(0)
                .interact_opt()?;
            let action = choice.map_or(MenuAction::Back, |index| actions[index]);

            match action {
                MenuAction::RunTask(task) => self.run_task(application, task).await?,
                MenuAction::ViewAnswers => self.print_answers(application),
                MenuAction::Submit => self.submit(application).await?,
                MenuAction::Back => return Ok(()),
            }
        }
    }

    async fn run_task(&self, application: &mut Application, task: &str) -> CliResult<()> {
        let runner = TaskRunner::new(&self.service, &self.user);
        let mut interaction = DialoguerInteraction::new();
        match runner.run(application, task, &mut interaction).await {
            Ok(TaskOutcome::Completed) => output::success("Task answers saved."),
            Ok(TaskOutcome::Cancelled) => output::warning("Returned to the task list."),
            Err(CliError::Wizard(err)) if !matches!(err, WizardError::Storage(_)) => {
                tracing::warn!(application = %application.id, task, error = %err, "task stopped");
                output::error(err);
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    fn print_answers(&self, application: &Application) {
        let transcript = self.service.wizard().transcript(application);
        if transcript.is_empty() {
            output::warning("No answers recorded yet.");
        }
        for section in transcript {
            output::section(section.name);
            for entry in section.entries {
                output::info(format!("{}\n    {}", entry.question, entry.answer));
            }
        }
    }

    async fn submit(&self, application: &mut Application) -> CliResult<()> {
        match self.service.submit(application, &self.user).await {
            Ok(()) => output::success("Application submitted."),
            Err(WizardError::NotReadyToSubmit { incomplete, .. }) => {
                output::warning(format!(
                    "Complete every task before submitting. Outstanding: {}",
                    incomplete.join(", ")
                ));
            }
            Err(WizardError::ReferralBlocked { reasons, .. }) => {
                output::warning("This referral cannot be submitted:");
                for reason in reasons {
                    output::warning(format!("  {}", reason));
                }
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }
}
