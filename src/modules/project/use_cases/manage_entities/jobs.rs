// Job mutators.
//
// Notes
// - Job ids are unique per company among live jobs. Both `input_new_job` and `update_job`
//   refuse a duplicate with `DuplicateJob`; `job_exists` exposes the same check to callers.
// - Loading a file does not run this check.

use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::job::{Job, JobInput};
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use tracing::{info, instrument};

impl Project {
    /// True when a live job of `company` already carries `id`.
    pub fn job_exists(&self, company: Key<Company>, id: &str) -> bool {
        self.duplicates(None, company, id)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, job = %input.id))]
    pub fn input_new_job(&mut self, input: JobInput) -> Result<Key<Job>, DomainError> {
        self.check_job_input(None, &input)?;
        let key = self.jobs.insert(Job::new(input))?;
        info!("job added");
        Ok(key)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, job = %input.id))]
    pub fn update_job(&mut self, key: Key<Job>, input: JobInput) -> Result<(), DomainError> {
        self.jobs.require(key)?;
        self.check_job_input(Some(key), &input)?;
        self.jobs.require_mut(key)?.update(input);
        info!("job updated");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn delete_job(&mut self, key: Key<Job>) -> Result<(), DomainError> {
        self.jobs.require_mut(key)?.delete()?;
        info!(job = %key.value(), "job deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn undelete_job(&mut self, key: Key<Job>) -> Result<(), DomainError> {
        let job = self.jobs.require(key)?;
        let clash = job
            .company
            .key()
            .filter(|company| self.duplicates(Some(key), *company, &job.id));
        if let Some(company) = clash {
            return Err(self.duplicate_job(company, &job.id));
        }
        self.jobs.require_mut(key)?.undelete()?;
        info!(job = %key.value(), "job restored");
        Ok(())
    }

    fn check_job_input(&self, key: Option<Key<Job>>, input: &JobInput) -> Result<(), DomainError> {
        self.companies.require(input.company)?;
        if let Some(trade) = input.construction.as_ref().and_then(|c| c.trade) {
            self.trades.require(trade)?;
        }
        if self.duplicates(key, input.company, &input.id) {
            return Err(self.duplicate_job(input.company, &input.id));
        }
        Ok(())
    }

    fn duplicates(&self, key: Option<Key<Job>>, company: Key<Company>, id: &str) -> bool {
        self.jobs.live().any(|job| {
            Some(job.key()) != key && job.company.points_to(company) && job.id.trim() == id.trim()
        })
    }

    fn duplicate_job(&self, company: Key<Company>, id: &str) -> DomainError {
        DomainError::DuplicateJob {
            company: self
                .companies
                .get(company)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| company.value().to_string()),
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod jobs_tests {
    use crate::modules::project::core::entities::company::{Company, CompanyInput};
    use crate::modules::project::core::entities::job::JobInput;
    use crate::shared::core::errors::DomainError;
    use crate::shared::core::link::Key;
    use crate::tests::fixtures::{Site, site};
    use rstest::rstest;

    fn general(id: &str, company: Key<Company>) -> JobInput {
        JobInput {
            id: id.into(),
            company,
            job_sum: 5_000.0,
            comment: None,
            construction: None,
        }
    }

    #[rstest]
    fn it_should_allow_the_same_id_under_another_company(site: Site) {
        let mut project = site.project;
        let other = project
            .input_new_company(CompanyInput {
                name: "Elektro Schulz".into(),
                ..CompanyInput::default()
            })
            .unwrap();

        assert!(project.input_new_job(general("A-01", other)).is_ok());
        assert!(project.job_exists(other, "A-01"));
        assert!(project.job_exists(site.company, "A-01"));
    }

    #[rstest]
    fn it_should_refuse_a_duplicate_id_for_the_same_company(site: Site) {
        let mut project = site.project;
        assert!(project.job_exists(site.company, " A-01 "));

        let result = project.input_new_job(general("A-01", site.company));
        assert!(matches!(result, Err(DomainError::DuplicateJob { .. })));
    }

    #[rstest]
    fn it_should_accept_an_update_that_keeps_the_id(site: Site) {
        let mut project = site.project;
        project
            .update_job(site.job, general("A-01", site.company))
            .unwrap();
        assert_eq!(project.job(site.job).unwrap().job_sum, 5_000.0);
    }

    #[rstest]
    fn it_should_free_the_id_of_a_deleted_job(site: Site) {
        let mut project = site.project;
        project.delete_job(site.job).unwrap();
        let replacement = project.input_new_job(general("A-01", site.company)).unwrap();

        assert!(matches!(
            project.undelete_job(site.job),
            Err(DomainError::DuplicateJob { .. })
        ));
        project.delete_job(replacement).unwrap();
        project.undelete_job(site.job).unwrap();
    }
}
