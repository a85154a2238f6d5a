// Read-side sums over the live graph. Nothing is cached.
//
// Notes
// - Only live entities count. A job or invoice whose trade or cost group link is unresolved
//   does not count towards any trade or cost group.
// - "with sub-groups" includes the group itself and every group below it.

use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::cost_calculation::ProjectCostCalculation;
use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::entities::job::Job;
use crate::modules::project::core::entities::trade::Trade;
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;

impl Project {
    fn in_cost_group(
        &self,
        group: Option<Key<CostGroup>>,
        target: Key<CostGroup>,
        deep: bool,
    ) -> bool {
        match group {
            Some(key) if key == target => true,
            Some(key) if deep => self
                .cost_groups
                .get(key)
                .is_some_and(|group| group.is_sub_group_of(target, &self.cost_groups)),
            _ => false,
        }
    }

    fn trades_in(&self, cost_group: Key<CostGroup>, deep: bool) -> Vec<&Trade> {
        self.trades
            .live()
            .filter(|trade| self.in_cost_group(trade.cost_group.key(), cost_group, deep))
            .collect()
    }

    fn jobs_of_trade(&self, trade: Key<Trade>) -> impl Iterator<Item = &Job> {
        self.jobs.live().filter(move |job| job.trade() == Some(trade))
    }

    fn invoices_of_job(&self, job: Key<Job>) -> impl Iterator<Item = &Invoice> {
        self.invoices.live().filter(move |invoice| invoice.job.points_to(job))
    }

    pub fn trade_budget_for_cost_group(&self, cost_group: Key<CostGroup>) -> f64 {
        self.trades_in(cost_group, false).iter().map(|t| t.budget).sum()
    }

    pub fn trade_budget_for_cost_group_with_sub_groups(&self, cost_group: Key<CostGroup>) -> f64 {
        self.trades_in(cost_group, true).iter().map(|t| t.budget).sum()
    }

    /// Job sums including additions of the live jobs for `trade`.
    pub fn job_sum_for_trade(&self, trade: Key<Trade>) -> f64 {
        self.jobs_of_trade(trade).map(Job::job_sum_w_additions).sum()
    }

    pub fn job_sum_for_cost_group(
        &self,
        cost_group: Key<CostGroup>,
        with_sub_groups: bool,
    ) -> f64 {
        self.trades_in(cost_group, with_sub_groups)
            .iter()
            .map(|trade| self.job_sum_for_trade(trade.key()))
            .sum()
    }

    pub fn job_sum_for_company(&self, company: Key<Company>) -> f64 {
        self.jobs
            .live()
            .filter(|job| job.company.points_to(company))
            .map(Job::job_sum_w_additions)
            .sum()
    }

    /// Approved amounts (after safety deposit, before discount) of the live invoices of `job`.
    pub fn approved_sum_for_job(&self, job: Key<Job>) -> f64 {
        self.invoices_of_job(job).map(Invoice::approved_amount).sum()
    }

    pub fn approved_sum_for_trade(&self, trade: Key<Trade>) -> f64 {
        self.jobs_of_trade(trade)
            .map(|job| self.approved_sum_for_job(job.key()))
            .sum()
    }

    pub fn approved_sum_for_cost_group(
        &self,
        cost_group: Key<CostGroup>,
        with_sub_groups: bool,
    ) -> f64 {
        self.trades_in(cost_group, with_sub_groups)
            .iter()
            .map(|trade| self.approved_sum_for_trade(trade.key()))
            .sum()
    }

    pub fn approved_sum_for_company(&self, company: Key<Company>) -> f64 {
        self.invoices
            .live()
            .filter(|invoice| invoice.company.points_to(company))
            .map(Invoice::approved_amount)
            .sum()
    }

    /// Total of the active items of `calculation` booked on `cost_group` or, when asked,
    /// on any of its sub-groups.
    pub fn cost_calculation_total_for_cost_group(
        &self,
        calculation: Key<ProjectCostCalculation>,
        cost_group: Key<CostGroup>,
        with_sub_groups: bool,
    ) -> Result<f64, DomainError> {
        let calculation = self.cost_calculations.require(calculation)?;
        Ok(calculation
            .items()
            .filter(|item| item.is_active)
            .filter(|item| self.in_cost_group(item.cost_group.key(), cost_group, with_sub_groups))
            .map(|item| item.total())
            .sum())
    }
}
