//! Command-line interface for the course store.
//!
//! Provides commands for browsing modules and content, uploading,
//! editing and deleting content, adjusting stats, and managing
//! notifications. Every mutation is persisted to the configured snapshot.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config;
use crate::domain::{
    parse_questions, ContentDraft, ContentFields, ContentItem, ContentPatch, ContentType,
    FieldsPatch, StatsPatch,
};
use crate::store::PersistedStore;

/// course-store - Renewable-energy course content store
#[derive(Parser, Debug)]
#[command(name = "course-store")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all modules with their content counts
    Modules,

    /// List the content of one module list
    List {
        /// Module ID (e.g., "solar-pv")
        module_id: String,

        /// Content type (videos, textbooks, projects, assignments, quizzes)
        content_type: ContentType,
    },

    /// Upload new content to a module
    Add {
        module_id: String,

        content_type: ContentType,

        #[arg(long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit an existing content item
    Update {
        module_id: String,

        content_type: ContentType,

        content_id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,

        /// Field to remove, by its camelCase key (repeatable, e.g. "dueDate")
        #[arg(long, value_name = "FIELD")]
        clear: Vec<String>,
    },

    /// Delete a content item
    Delete {
        module_id: String,

        content_type: ContentType,

        content_id: String,
    },

    /// Show or update course stats
    Stats {
        /// Counter to set, as name=value (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Show recent notifications
    Notifications,

    /// Dismiss a notification
    Dismiss {
        notification_id: String,
    },

    /// Search content titles and descriptions
    Search {
        query: String,
    },

    /// Restore the seed content and stats
    Reset,

    /// Show resolved configuration (debug)
    Config,
}

/// Type-specific content fields
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Video duration (e.g., "15 min")
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub file_url: Option<String>,

    #[arg(long)]
    pub file_name: Option<String>,

    #[arg(long)]
    pub instructions: Option<String>,

    /// Assignment due date (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    /// Quiz questions as JSON: [{"question": "...", "options": [...], "correct": 0}]
    #[arg(long)]
    pub questions: Option<String>,
}

impl FieldArgs {
    fn into_fields(self) -> Result<ContentFields> {
        let questions = self
            .questions
            .as_deref()
            .map(parse_questions)
            .transpose()?;

        Ok(ContentFields {
            duration: self.duration,
            url: self.url,
            file_url: self.file_url,
            file_name: self.file_name,
            instructions: self.instructions,
            due_date: self.due_date,
            status: self.status,
            questions,
            ..Default::default()
        })
    }
}

impl Cli {
    /// Execute the CLI command against the configured storage
    pub async fn execute(self) -> Result<()> {
        if let Commands::Config = self.command {
            return show_config();
        }

        let config = config::config()?;
        let storage = config.open_storage()?;
        let mut persisted = PersistedStore::open_with_key(storage, config.storage_key.clone())
            .await
            .context("Failed to load course snapshot")?;

        self.execute_with(&mut persisted).await
    }

    /// Execute the CLI command against an already-open store
    pub async fn execute_with(self, persisted: &mut PersistedStore) -> Result<()> {
        match self.command {
            Commands::Modules => {
                list_modules(persisted);
                Ok(())
            }
            Commands::List {
                module_id,
                content_type,
            } => list_content(persisted, &module_id, content_type),
            Commands::Add {
                module_id,
                content_type,
                title,
                description,
                fields,
            } => add_content(persisted, &module_id, content_type, title, description, fields).await,
            Commands::Update {
                module_id,
                content_type,
                content_id,
                title,
                description,
                fields,
                clear,
            } => {
                let mut fields = FieldsPatch::from(fields.into_fields()?);
                for key in &clear {
                    fields.clear(key);
                }
                let patch = ContentPatch {
                    title,
                    description,
                    fields,
                };
                update_content(persisted, &module_id, content_type, &content_id, patch).await
            }
            Commands::Delete {
                module_id,
                content_type,
                content_id,
            } => delete_content(persisted, &module_id, content_type, &content_id).await,
            Commands::Stats { set } => stats(persisted, &set).await,
            Commands::Notifications => {
                list_notifications(persisted);
                Ok(())
            }
            Commands::Dismiss { notification_id } => {
                dismiss_notification(persisted, &notification_id).await
            }
            Commands::Search { query } => {
                search(persisted, &query);
                Ok(())
            }
            Commands::Reset => {
                persisted.reset().await?;
                println!("Course content restored to seed");
                Ok(())
            }
            Commands::Config => show_config(),
        }
    }
}

/// List modules with per-type counts
fn list_modules(persisted: &PersistedStore) {
    println!(
        "{:<16} {:<16} {:>6} {:>9} {:>8} {:>11} {:>7}",
        "ID", "TITLE", "VIDEOS", "TEXTBOOKS", "PROJECTS", "ASSIGNMENTS", "QUIZZES"
    );
    println!("{}", "-".repeat(80));

    for module in persisted.store().all_modules() {
        let counts = module.content_counts();
        println!(
            "{:<16} {:<16} {:>6} {:>9} {:>8} {:>11} {:>7}",
            module.id, module.title, counts[0].1, counts[1].1, counts[2].1, counts[3].1, counts[4].1
        );
    }
}

/// List one module's content of a type
fn list_content(persisted: &PersistedStore, module_id: &str, content_type: ContentType) -> Result<()> {
    let store = persisted.store();
    let module = store
        .get_module(module_id)
        .with_context(|| format!("Module not found: {}", module_id))?;

    let items = store.module_content(module_id, content_type);
    if items.is_empty() {
        println!("No {} in {}", content_type, module.title);
        return Ok(());
    }

    println!("{} - {}", module.title, content_type);
    println!();
    for item in items {
        print_item(item);
    }

    Ok(())
}

fn print_item(item: &ContentItem) {
    println!("[{}] {}", item.id, item.title);
    if !item.description.is_empty() {
        println!("    {}", item.description);
    }

    let fields = &item.fields;
    let details = [
        ("Duration", fields.duration.as_deref()),
        ("URL", fields.url.as_deref()),
        ("File", fields.file_url.as_deref()),
        ("Due", fields.due_date.as_deref()),
        ("Status", fields.status.as_deref()),
        ("Instructions", fields.instructions.as_deref()),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            println!("    {}: {}", label, value);
        }
    }
    if let Some(questions) = &fields.questions {
        println!("    Questions: {}", questions.len());
    }

    println!(
        "    Uploaded {} by {}",
        item.uploaded_at.format("%Y-%m-%d %H:%M"),
        item.uploaded_by
    );
}

async fn add_content(
    persisted: &mut PersistedStore,
    module_id: &str,
    content_type: ContentType,
    title: String,
    description: String,
    fields: FieldArgs,
) -> Result<()> {
    let draft = ContentDraft::new(title, description)
        .with_fields(fields.into_fields()?)
        .prepare(content_type);

    let item = persisted
        .apply(|s| s.add_content(module_id, content_type, draft))
        .await??;

    println!("Added {} {} to {}", content_type.singular(), item.id, module_id);
    Ok(())
}

async fn update_content(
    persisted: &mut PersistedStore,
    module_id: &str,
    content_type: ContentType,
    content_id: &str,
    patch: ContentPatch,
) -> Result<()> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to update. Pass --title, --description or a field flag");
    }

    let matched = persisted
        .apply(|s| s.update_content(module_id, content_type, content_id, patch))
        .await??;

    if matched {
        println!("Updated {} {}", content_type.singular(), content_id);
    } else {
        println!("No {} with ID {} in {}", content_type.singular(), content_id, module_id);
    }
    Ok(())
}

async fn delete_content(
    persisted: &mut PersistedStore,
    module_id: &str,
    content_type: ContentType,
    content_id: &str,
) -> Result<()> {
    let removed = persisted
        .apply(|s| s.delete_content(module_id, content_type, content_id))
        .await??;

    if removed {
        println!("Deleted {} {}", content_type.singular(), content_id);
    } else {
        println!("No {} with ID {} in {}", content_type.singular(), content_id, module_id);
    }
    Ok(())
}

/// Apply `name=value` assignments, then print the stats
async fn stats(persisted: &mut PersistedStore, assignments: &[String]) -> Result<()> {
    let patch = parse_stat_assignments(assignments)?;

    if !patch.is_empty() {
        persisted.apply(|s| s.update_stats(&patch)).await?;
    }

    for (name, value) in persisted.store().stats().entries() {
        println!("{:<22} {}", name, value);
    }
    Ok(())
}

fn parse_stat_assignments(assignments: &[String]) -> Result<StatsPatch> {
    let mut patch = StatsPatch::default();

    for assignment in assignments {
        let (name, value) = assignment
            .split_once('=')
            .with_context(|| format!("Expected NAME=VALUE, got: {}", assignment))?;
        let value: u32 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {}", name, value))?;
        patch.set(name.trim(), value)?;
    }

    Ok(patch)
}

fn list_notifications(persisted: &PersistedStore) {
    let notifications = persisted.store().notifications();

    if notifications.is_empty() {
        println!("No notifications");
        return;
    }

    println!("{:<15} {:<8} {:<20} MESSAGE", "ID", "TYPE", "TIME");
    println!("{}", "-".repeat(80));

    for n in notifications.iter() {
        println!(
            "{:<15} {:<8} {:<20} {}",
            n.id,
            n.severity.to_string(),
            n.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            n.message
        );
    }
}

async fn dismiss_notification(persisted: &mut PersistedStore, notification_id: &str) -> Result<()> {
    let removed = persisted
        .apply(|s| s.remove_notification(notification_id))
        .await?;

    if removed {
        println!("Dismissed {}", notification_id);
    } else {
        println!("No notification with ID {}", notification_id);
    }
    Ok(())
}

fn search(persisted: &PersistedStore, query: &str) {
    let hits = persisted.store().search(query);

    if hits.is_empty() {
        println!("No content matches '{}'", query);
        return;
    }

    println!("{:<15} {:<16} {:<12} TITLE", "ID", "MODULE", "TYPE");
    println!("{}", "-".repeat(75));

    for hit in hits {
        println!(
            "{:<15} {:<16} {:<12} {}",
            hit.item.id,
            hit.module.id,
            hit.content_type.key(),
            hit.item.title
        );
    }
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = config::reload_config()?;

    println!("home:        {}", config.home.display());
    println!("backend:     {}", config.backend);
    println!("storage key: {}", config.storage_key);
    match &config.config_file {
        Some(path) => println!("config file: {}", path.display()),
        None => println!("config file: (none, using defaults)"),
    }
    Ok(())
}
