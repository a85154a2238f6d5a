use crate::modules::project::core::entities::company::CompanyInput;
use crate::modules::project::core::entities::invoice::{Invoice, InvoiceInput};
use crate::modules::project::core::entities::job::JobInput;
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use crate::tests::fixtures::{InvoiceInputBuilder, Site, on, site};
use rstest::rstest;

fn add(project: &mut Project, input: InvoiceInput) -> Key<Invoice> {
    project.input_new_invoice(input).expect("invoice rejected")
}

fn prev_amount(project: &Project, invoice: Key<Invoice>) -> f64 {
    project.invoice(invoice).unwrap().prev_invoices_amount
}

#[rstest]
fn it_should_carry_forward_the_newest_predecessor(site: Site) {
    let mut project = site.project;
    let invoice = |date, verified| {
        InvoiceInputBuilder::new(site.company, site.job)
            .date(date)
            .verified(verified)
            .build()
    };

    let a = add(&mut project, invoice(on(2024, 1, 10), 1000.0));
    let b = add(&mut project, invoice(on(2024, 2, 10), 1500.0));
    assert_eq!(prev_amount(&project, a), 0.0);
    assert_eq!(prev_amount(&project, b), 1000.0);

    let d = add(&mut project, invoice(on(2024, 2, 10), 1600.0));
    assert_eq!(prev_amount(&project, d), 1500.0);
    assert_eq!(prev_amount(&project, b), 1000.0);

    let chain: Vec<_> = project
        .get_prev_invoices(d)
        .unwrap()
        .iter()
        .map(|invoice| invoice.key())
        .collect();
    assert_eq!(chain, vec![b, a]);

    let newest_first: Vec<_> = project.invoices().iter().map(|i| i.key()).collect();
    assert_eq!(newest_first, vec![d, b, a]);
}

#[rstest]
fn it_should_keep_ledgers_of_other_jobs_apart(site: Site) {
    let mut project = site.project;
    let other_company = project
        .input_new_company(CompanyInput {
            name: "Elektro Schulz".into(),
            ..CompanyInput::default()
        })
        .unwrap();
    let other_job = project
        .input_new_job(JobInput {
            id: "E-01".into(),
            company: other_company,
            job_sum: 12_000.0,
            comment: None,
            construction: None,
        })
        .unwrap();

    add(
        &mut project,
        InvoiceInputBuilder::new(site.company, site.job)
            .date(on(2024, 1, 10))
            .verified(1000.0)
            .build(),
    );
    let foreign = add(
        &mut project,
        InvoiceInputBuilder::new(other_company, other_job)
            .date(on(2024, 2, 10))
            .verified(700.0)
            .build(),
    );

    assert_eq!(prev_amount(&project, foreign), 0.0);
    assert!(project.get_prev_invoices(foreign).unwrap().is_empty());
}

#[rstest]
fn it_should_ignore_non_cumulative_invoices(site: Site) {
    let mut project = site.project;
    add(
        &mut project,
        InvoiceInputBuilder::new(site.company, site.job)
            .date(on(2024, 1, 10))
            .verified(1000.0)
            .cumulative(false)
            .build(),
    );
    let later = add(
        &mut project,
        InvoiceInputBuilder::new(site.company, site.job)
            .date(on(2024, 2, 10))
            .verified(1500.0)
            .build(),
    );
    let single = add(
        &mut project,
        InvoiceInputBuilder::new(site.company, site.job)
            .date(on(2024, 3, 10))
            .verified(300.0)
            .cumulative(false)
            .build(),
    );

    assert_eq!(prev_amount(&project, later), 0.0);
    assert_eq!(prev_amount(&project, single), 0.0);
    assert!(project.get_prev_invoices(single).unwrap().is_empty());
}

#[rstest]
fn it_should_refuse_links_that_close_a_cycle(site: Site) {
    let mut project = site.project;
    let a = add(
        &mut project,
        InvoiceInputBuilder::new(site.company, site.job)
            .id("R-1")
            .cumulative(false)
            .build(),
    );
    let b = add(
        &mut project,
        InvoiceInputBuilder::new(site.company, site.job)
            .id("R-2")
            .cumulative(false)
            .build(),
    );

    assert!(matches!(
        project.link_prev_invoice(a, a),
        Err(DomainError::Cycle(_))
    ));
    project.set_prev_invoices(a, vec![b]).unwrap();
    assert!(matches!(
        project.set_prev_invoices(b, vec![a]),
        Err(DomainError::Cycle(_))
    ));
    assert!(project.invoice(b).unwrap().prev_invoices.is_empty());
}
