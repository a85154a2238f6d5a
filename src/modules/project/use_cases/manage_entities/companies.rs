use crate::modules::project::core::entities::company::{Company, CompanyInput};
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use tracing::{info, instrument};

impl Project {
    #[instrument(skip(self, input), fields(project = %self.identifier, company = %input.name))]
    pub fn input_new_company(&mut self, input: CompanyInput) -> Result<Key<Company>, DomainError> {
        self.check_contact_person(&input)?;
        let key = self.companies.insert(Company::new(input))?;
        info!("company added");
        Ok(key)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, company = %input.name))]
    pub fn update_company(
        &mut self,
        key: Key<Company>,
        input: CompanyInput,
    ) -> Result<(), DomainError> {
        self.check_contact_person(&input)?;
        self.companies.require_mut(key)?.update(input);
        info!("company updated");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn delete_company(&mut self, key: Key<Company>) -> Result<(), DomainError> {
        self.companies.require_mut(key)?.delete()?;
        info!(company = %key.value(), "company deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn undelete_company(&mut self, key: Key<Company>) -> Result<(), DomainError> {
        self.companies.require_mut(key)?.undelete()?;
        info!(company = %key.value(), "company restored");
        Ok(())
    }

    fn check_contact_person(&self, input: &CompanyInput) -> Result<(), DomainError> {
        if let Some(person) = input.contact_person {
            self.people.require(person)?;
        }
        Ok(())
    }
}
