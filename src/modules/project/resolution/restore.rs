// Re-links a freshly decoded or merged project.
//
// Purpose
// - Resolve every pending descriptor of the project in dependency order.
//
// Responsibilities
// - people (project client) -> cost groups -> cost calculations -> trades -> companies -> jobs
//   -> invoices -> invoice ledger.
// - Take a fresh registry snapshot before each phase so later phases see earlier resolutions.
// - Check the cost group tree for cycles once parents are linked.
//
// Notes
// - Cost groups are visited in business id order, which is top-down for hierarchical ids.

use crate::modules::project::core::arena::Arena;
use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::project::Project;
use crate::modules::project::resolution::engine::{Mode, ResolutionOutcome, resolve_link};
use crate::modules::project::resolution::registry::Registry;
use crate::modules::project::resolution::restorable::Restorable;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use tracing::{debug, info, instrument, warn};

impl Project {
    /// Exact re-link after loading a file this application saved. Any miss is fatal.
    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn restore(&mut self) -> Result<(), DomainError> {
        self.resolve_graph(Mode::Exact)?;
        info!("project restored");
        Ok(())
    }

    /// Fuzzy re-link after an import. Misses are logged, reported and left unresolved.
    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn restore_after_import(&mut self) -> Result<ResolutionOutcome, DomainError> {
        let outcome = self.resolve_graph(Mode::Fuzzy)?;
        info!(
            resolved = outcome.resolved,
            unresolved = outcome.unresolved.len(),
            "project restored after import"
        );
        Ok(outcome)
    }

    fn resolve_graph(&mut self, mode: Mode) -> Result<ResolutionOutcome, DomainError> {
        let mut outcome = ResolutionOutcome::default();

        let registry = Registry::snapshot(self);
        let owner = self.identity().clone();
        resolve_link(&owner, &mut self.client, mode, &registry, &mut outcome)?;

        let registry = Registry::snapshot(self);
        let mut top_down: Vec<_> = self
            .cost_groups
            .iter()
            .map(|group| (group.id.clone(), group.key()))
            .collect();
        top_down.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, key) in top_down {
            self.cost_groups
                .require_mut(key)?
                .resolve_links(mode, &registry, &mut outcome)?;
        }
        self.check_cost_group_tree(mode)?;

        let registry = Registry::snapshot(self);
        restore_all(&mut self.cost_calculations, mode, &registry, &mut outcome)?;

        let registry = Registry::snapshot(self);
        restore_all(&mut self.trades, mode, &registry, &mut outcome)?;

        let registry = Registry::snapshot(self);
        restore_all(&mut self.companies, mode, &registry, &mut outcome)?;

        let registry = Registry::snapshot(self);
        restore_all(&mut self.jobs, mode, &registry, &mut outcome)?;

        let registry = Registry::snapshot(self);
        restore_all(&mut self.invoices, mode, &registry, &mut outcome)?;

        self.update_all_prev_invoices()?;
        Ok(outcome)
    }

    /// Exact mode fails on a parent cycle. Fuzzy mode cuts the cycle at its first member.
    fn check_cost_group_tree(&mut self, mode: Mode) -> Result<(), DomainError> {
        while let Some(key) = first_on_cycle(&self.cost_groups) {
            let group = self.cost_groups.require_mut(key)?;
            match mode {
                Mode::Exact => {
                    return Err(DomainError::Cycle(format!(
                        "cost group {} is its own ancestor",
                        group.id
                    )));
                }
                Mode::Fuzzy => {
                    warn!(cost_group = %group.id, "dropping parent that closes a cycle");
                    group.parent.abandon();
                }
            }
        }
        Ok(())
    }
}

fn first_on_cycle(groups: &Arena<CostGroup>) -> Option<Key<CostGroup>> {
    groups
        .iter()
        .find(|group| group.lies_on_cycle(groups))
        .map(Entity::key)
}

fn restore_all<T: Restorable>(
    arena: &mut Arena<T>,
    mode: Mode,
    registry: &Registry,
    outcome: &mut ResolutionOutcome,
) -> Result<(), DomainError> {
    for entity in arena.iter_mut() {
        entity.resolve_links(mode, registry, outcome)?;
    }
    debug!(entity_type = %T::ENTITY_TYPE, resolved = outcome.resolved, "phase done");
    Ok(())
}
