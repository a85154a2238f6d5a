use crate::modules::project::core::entities::person::{Person, PersonInput};
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use tracing::{info, instrument};

impl Project {
    #[instrument(skip(self, input), fields(project = %self.identifier))]
    pub fn input_new_person(&mut self, input: PersonInput) -> Result<Key<Person>, DomainError> {
        let key = self.people.insert(Person::new(input))?;
        info!(person = %key.value(), "person added");
        Ok(key)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier))]
    pub fn update_person(
        &mut self,
        key: Key<Person>,
        input: PersonInput,
    ) -> Result<(), DomainError> {
        self.people.require_mut(key)?.update(input);
        info!(person = %key.value(), "person updated");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn delete_person(&mut self, key: Key<Person>) -> Result<(), DomainError> {
        self.people.require_mut(key)?.delete()?;
        info!(person = %key.value(), "person deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn undelete_person(&mut self, key: Key<Person>) -> Result<(), DomainError> {
        self.people.require_mut(key)?.undelete()?;
        info!(person = %key.value(), "person restored");
        Ok(())
    }
}
