// Derived invoice amounts.
//
// verified amount
//   - carried-forward amount            = amount_a_prev
//   - rebate, insurance, usage          (each a fraction of amount_a_prev)
//                                       = amount_a_reductions
//   + VAT                               = amount_a_reductions_w_vat
//   - safety deposit                    = approved_amount
//   - discount                          = approved_amount_a_discount
//
// The order of these steps is fixed. Every step works on the result of the step before.

use crate::modules::project::core::entities::invoice::Invoice;

impl Invoice {
    pub fn amount_a_prev(&self) -> f64 {
        self.verified_amount - self.prev_invoices_amount
    }

    pub fn rebate_amount(&self) -> f64 {
        self.amount_a_prev() * self.rebate
    }

    pub fn reduction_insurance_amount(&self) -> f64 {
        self.amount_a_prev() * self.reduction_insurance
    }

    pub fn reduction_usage_amount(&self) -> f64 {
        self.amount_a_prev() * self.reduction_usage
    }

    pub fn amount_a_reductions(&self) -> f64 {
        self.amount_a_prev()
            - self.rebate_amount()
            - self.reduction_insurance_amount()
            - self.reduction_usage_amount()
    }

    pub fn vat_amount(&self) -> f64 {
        self.amount_a_reductions() * self.vat
    }

    pub fn amount_a_reductions_w_vat(&self) -> f64 {
        self.amount_a_reductions() + self.vat_amount()
    }

    /// The stored override when present, the configured fraction otherwise.
    pub fn safety_deposit_amount(&self) -> f64 {
        self.safety_deposit_override
            .unwrap_or_else(|| self.amount_a_reductions_w_vat() * self.safety_deposit)
    }

    pub fn approved_amount(&self) -> f64 {
        self.amount_a_reductions_w_vat() - self.safety_deposit_amount()
    }

    pub fn discount_amount(&self) -> f64 {
        self.approved_amount() * self.discount
    }

    pub fn approved_amount_a_discount(&self) -> f64 {
        self.approved_amount() - self.discount_amount()
    }
}

#[cfg(test)]
mod amounts_tests {
    use super::*;
    use crate::modules::project::core::config::ProjectConfig;
    use crate::modules::project::core::entities::invoice::InvoiceInput;
    use crate::shared::core::link::Key;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    const EPSILON: f64 = 1e-9;

    #[fixture]
    fn invoice() -> Invoice {
        let mut input = InvoiceInput::new(
            "R-1",
            Key::new(Uuid::now_v7()),
            Key::new(Uuid::now_v7()),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            &ProjectConfig::default(),
        )
        .amounts(1000.0, 1000.0);
        input.rebate = 0.1;
        input.reduction_insurance = 0.05;
        input.reduction_usage = 0.0;
        input.vat = 0.19;
        input.safety_deposit = 0.05;
        input.discount = 0.02;
        Invoice::new(input)
    }

    #[rstest]
    fn it_should_apply_the_steps_in_order(invoice: Invoice) {
        assert!((invoice.amount_a_reductions() - 850.0).abs() < EPSILON);
        assert!((invoice.amount_a_reductions_w_vat() - 1011.5).abs() < EPSILON);
        assert!((invoice.safety_deposit_amount() - 50.575).abs() < EPSILON);
        assert!((invoice.approved_amount() - 960.925).abs() < EPSILON);
        assert!((invoice.discount_amount() - 19.2185).abs() < EPSILON);
        assert!((invoice.approved_amount_a_discount() - 941.7065).abs() < EPSILON);
    }

    #[rstest]
    fn it_should_prefer_the_safety_deposit_override(mut invoice: Invoice) {
        invoice.safety_deposit_override = Some(100.0);
        assert_eq!(invoice.safety_deposit_amount(), 100.0);
        assert!((invoice.approved_amount() - 911.5).abs() < EPSILON);
    }

    #[rstest]
    fn it_should_subtract_the_carried_forward_amount_first(mut invoice: Invoice) {
        invoice.verified_amount = 1500.0;
        invoice.prev_invoices_amount = 500.0;
        assert_eq!(invoice.amount_a_prev(), 1000.0);
        assert!((invoice.amount_a_reductions() - 850.0).abs() < EPSILON);
        assert!((invoice.rebate_amount() - 100.0).abs() < EPSILON);
    }
}
