use crate::modules::project::adapters::inbound::json_import::{ImportKind, parse_import};
use crate::modules::project::core::project::Project;
use crate::modules::project::use_cases::import_entities::command::ImportBatch;
use crate::modules::project::use_cases::import_entities::handler::{
    ImportEntitiesHandler, ImportReport, SkipReason,
};
use crate::shared::core::identity::{Entity, EntityType};
use crate::tests::fixtures::{InvoiceInputBuilder, ProjectBuilder, Site, on, site};
use rstest::{fixture, rstest};

/// A second project whose whole content gets imported.
#[fixture]
fn source(site: Site) -> Site {
    let mut site = site;
    for (month, verified) in [(1, 1000.0), (2, 1500.0)] {
        site.project
            .input_new_invoice(
                InvoiceInputBuilder::new(site.company, site.job)
                    .id(format!("R-{month}"))
                    .date(on(2024, month, 10))
                    .verified(verified)
                    .build(),
            )
            .unwrap();
    }
    site
}

fn import(project: &mut Project, source: &Project) -> ImportReport {
    let document = source.to_document().unwrap();
    ImportEntitiesHandler::new()
        .handle(project, ImportBatch::Document(Box::new(document)))
        .expect("import failed")
}

#[rstest]
fn it_should_relink_a_whole_project_by_business_keys(source: Site) {
    let mut project = ProjectBuilder::new().identifier("P-2024-02").build();
    let report = import(&mut project, &source.project);

    assert!(report.resolution.is_complete());
    assert!(report.skipped.is_empty());
    assert_eq!(report.imported, 8);

    let company = project.find_company_by_name("Muster Bau GmbH").unwrap();
    assert_ne!(company.key(), source.company);
    let person = project.find_person_by_name("Erika", "Mustermann").unwrap();
    assert!(company.contact_person.points_to(person.key()));

    let trade = project.find_trade_by_name("Rohbau").unwrap();
    let sub_group = project.find_cost_group_by_id("330").unwrap();
    let main_group = project.find_cost_group_by_id("300").unwrap();
    assert!(trade.cost_group.points_to(sub_group.key()));
    assert!(sub_group.parent.points_to(main_group.key()));

    let job = project.jobs()[0];
    assert!(job.company.points_to(company.key()));
    assert_eq!(job.trade(), Some(trade.key()));

    for invoice in project.invoices() {
        assert!(invoice.company.points_to(company.key()));
        assert!(invoice.job.points_to(job.key()));
        assert_eq!(invoice.identity().entity_type, EntityType::Invoice);
    }
    let amounts: Vec<_> = project
        .invoices()
        .iter()
        .map(|invoice| invoice.prev_invoices_amount)
        .collect();
    assert_eq!(amounts, vec![1000.0, 0.0]);
}

#[rstest]
fn it_should_keep_same_day_invoices_in_creation_order(site: Site) {
    let mut source = site.project;
    for (id, date, verified) in [
        ("A", on(2024, 1, 10), 1000.0),
        ("B", on(2024, 2, 10), 1500.0),
        ("D", on(2024, 2, 10), 1600.0),
    ] {
        source
            .input_new_invoice(
                InvoiceInputBuilder::new(site.company, site.job)
                    .id(id)
                    .date(date)
                    .verified(verified)
                    .build(),
            )
            .unwrap();
    }

    let mut project = ProjectBuilder::new().identifier("P-2024-02").build();
    import(&mut project, &source);

    let ledger: Vec<_> = project
        .invoices()
        .iter()
        .map(|invoice| (invoice.id.clone(), invoice.prev_invoices_amount))
        .collect();
    assert_eq!(
        ledger,
        vec![
            ("D".to_string(), 1500.0),
            ("B".to_string(), 1000.0),
            ("A".to_string(), 0.0),
        ]
    );
}

#[rstest]
fn it_should_skip_what_the_project_already_has(source: Site) {
    let mut project = source.project.clone();
    let report = import(&mut project, &source.project);

    let duplicates = report
        .skipped
        .iter()
        .filter(|skipped| skipped.reason == SkipReason::Duplicate)
        .count();
    assert_eq!(duplicates, 6);
    assert_eq!(project.companies().len(), 1);
    assert_eq!(project.jobs().len(), 1);
    assert_eq!(project.cost_groups().len(), 2);
}

#[rstest]
fn it_should_leave_an_unknown_parent_unresolved(site: Site) {
    let mut project = site.project;
    let json = r#"[
        {
            "identity": {
                "entity_type": "cost_group",
                "unique_value": "01890a5d-ac96-774b-bcce-b302099a9001",
                "created_at": "2023-10-01T12:00:00Z"
            },
            "id": "420",
            "name": "Wärmeversorgungsanlagen",
            "parent": { "attributes": { "id": "400" } }
        }
    ]"#;
    let batch = parse_import(ImportKind::CostGroups, json).unwrap();

    let report = ImportEntitiesHandler::new()
        .handle(&mut project, batch)
        .expect("a fuzzy miss must not fail the import");

    assert_eq!(report.imported, 1);
    assert_eq!(report.resolution.unresolved.len(), 1);
    assert_eq!(report.resolution.unresolved[0].target, EntityType::CostGroup);
    let imported = project.find_cost_group_by_id("420").unwrap();
    assert!(imported.is_main_group());
    assert!(!imported.parent.is_pending());
}
