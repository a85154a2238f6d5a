//! Project cost tracker CLI.
//!
//! Opens a project archive, or starts a new one, optionally merges a JSON export into it and
//! saves it back.

use anyhow::Context;
use clap::{Parser, Subcommand};
use project_costs::modules::project::adapters::inbound::json_import::ImportKind;
use project_costs::modules::project::adapters::outbound::project_store::ProjectStoreError;
use project_costs::modules::project::adapters::outbound::project_store_zip::ZipProjectStore;
use project_costs::modules::project::core::config::ProjectConfig;
use project_costs::modules::project::use_cases::errors::ApplicationError;
use project_costs::shell::logging;
use project_costs::shell::session::ProjectSession;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "project_costs")]
#[command(about = "Cost tracking for construction projects")]
#[command(version)]
struct Cli {
    /// Project archive, created on first save
    archive: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Merge a JSON export of one entity type into the project
    Import {
        #[arg(value_enum)]
        kind: ImportKind,

        /// JSON array exported from another project
        file: PathBuf,
    },
}

fn identifier_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".into())
}

fn main() -> anyhow::Result<()> {
    logging::init()?;
    let cli = Cli::parse();

    let store = Arc::new(ZipProjectStore::new(cli.archive.clone()));
    let mut session = match ProjectSession::open(store.clone()) {
        Ok(session) => session,
        Err(ApplicationError::Store(ProjectStoreError::NotFound(_))) => {
            tracing::info!(path = %cli.archive.display(), "starting a new project");
            ProjectSession::create(identifier_of(&cli.archive), ProjectConfig::default(), store)
        }
        Err(e) => return Err(e).context("opening project"),
    };

    if let Some(Commands::Import { kind, file }) = cli.command {
        let report = session
            .import_file(kind, &file)
            .with_context(|| format!("importing {}", file.display()))?;
        for missing in &report.resolution.unresolved {
            tracing::warn!(?missing, "reference left empty");
        }
    }

    session.save().context("saving project")?;
    let project = session.project();
    tracing::info!(
        project = %project.identifier,
        companies = project.companies().len(),
        jobs = project.jobs().len(),
        invoices = project.invoices().len(),
        "project saved"
    );
    Ok(())
}
