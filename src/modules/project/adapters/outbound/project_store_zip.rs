// Zip file implementation of the ProjectStore port.
//
// Purpose
// - Persist a project as one zip archive holding one JSON document per collection.
//
// Responsibilities
// - Open, fully write and close the file within a single `save`.
// - Replace the previous file only once the new archive is complete.
//
// Notes
// - `project.json` is required on load. A missing collection entry reads as empty.

use crate::modules::project::adapters::outbound::project_store::{
    ProjectStore, ProjectStoreError,
};
use crate::modules::project::serialization::records::{ProjectDocument, entries};
use crate::shared::infrastructure::json_archive::{JsonArchiveReader, JsonArchiveWriter};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub struct ZipProjectStore {
    path: PathBuf,
}

impl ZipProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".partial");
        self.path.with_file_name(name)
    }

    fn write_archive(
        &self,
        target: &Path,
        document: &ProjectDocument,
    ) -> Result<(), ProjectStoreError> {
        let file = File::create(target)?;
        let mut archive = JsonArchiveWriter::new(BufWriter::new(file));
        archive.put(entries::PROJECT, &document.project)?;
        archive.put(entries::PEOPLE, &document.people)?;
        archive.put(entries::COMPANIES, &document.companies)?;
        archive.put(entries::TRADES, &document.trades)?;
        archive.put(entries::COST_GROUPS, &document.cost_groups)?;
        archive.put(entries::JOBS, &document.jobs)?;
        archive.put(entries::INVOICES, &document.invoices)?;
        archive.put(
            entries::PROJECT_COST_CALCULATIONS,
            &document.project_cost_calculations,
        )?;
        let mut writer = archive.finish()?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

impl ProjectStore for ZipProjectStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<ProjectDocument, ProjectStoreError> {
        let file = File::open(&self.path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => ProjectStoreError::NotFound(self.path.display().to_string()),
            _ => ProjectStoreError::Io(error),
        })?;
        let mut archive = JsonArchiveReader::new(BufReader::new(file))?;
        let document = ProjectDocument {
            project: archive.get(entries::PROJECT)?,
            people: archive.get_or_default(entries::PEOPLE)?,
            companies: archive.get_or_default(entries::COMPANIES)?,
            trades: archive.get_or_default(entries::TRADES)?,
            cost_groups: archive.get_or_default(entries::COST_GROUPS)?,
            jobs: archive.get_or_default(entries::JOBS)?,
            invoices: archive.get_or_default(entries::INVOICES)?,
            project_cost_calculations: archive.get_or_default(entries::PROJECT_COST_CALCULATIONS)?,
        };
        debug!(project = %document.project.identifier, "archive read");
        Ok(document)
    }

    #[instrument(
        skip(self, document),
        fields(path = %self.path.display(), project = %document.project.identifier)
    )]
    fn save(&self, document: &ProjectDocument) -> Result<(), ProjectStoreError> {
        let staging = self.staging_path();
        if let Err(error) = self.write_archive(&staging, document) {
            let _ = fs::remove_file(&staging);
            return Err(error);
        }
        fs::rename(&staging, &self.path)?;
        info!("project saved");
        Ok(())
    }
}
