use crate::modules::project::adapters::outbound::project_store::ProjectStore;
use crate::modules::project::adapters::outbound::project_store_zip::ZipProjectStore;
use crate::modules::project::core::entities::address::AddressInput;
use crate::modules::project::core::entities::cost_calculation::{
    CalculationType, CostCalculationInput, InventoryItemInput,
};
use crate::modules::project::core::project::Project;
use crate::modules::project::use_cases::load_project::handler::LoadProjectHandler;
use crate::modules::project::use_cases::save_project::handler::SaveProjectHandler;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::{Entity, EntityType, Identity};
use crate::shared::core::link::RefDescriptor;
use crate::tests::fixtures::{InvoiceInputBuilder, Site, on, site};
use rstest::{fixture, rstest};
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

struct Saved {
    site: Site,
    store: Arc<ZipProjectStore>,
    _dir: TempDir,
}

#[fixture]
fn saved(site: Site) -> Saved {
    let mut site = site;
    let project = &mut site.project;
    project.set_address(Some(AddressInput {
        street: "Hauptstraße".into(),
        house_number: "12a".into(),
        zip_code: "10115".into(),
        city: "Berlin".into(),
    }));
    project.set_client(Some(site.person)).unwrap();
    for (month, verified) in [(1, 1000.0), (2, 1500.0)] {
        project
            .input_new_invoice(
                InvoiceInputBuilder::new(site.company, site.job)
                    .id(format!("R-{month}"))
                    .date(on(2024, month, 10))
                    .verified(verified)
                    .build(),
            )
            .unwrap();
    }
    let calculation = project
        .input_new_project_cost_calculation(CostCalculationInput {
            name: "Kostenschätzung".into(),
            calculation_type: CalculationType::CostEstimate,
            date: on(2023, 11, 1),
        })
        .unwrap();
    project
        .add_inventory_item(calculation, InventoryItemInput {
            name: "Mauerwerk".into(),
            unit_price: 95.0,
            units: 120.0,
            unit: Some("m²".into()),
            is_active: true,
            cost_group: Some(site.sub_group),
            trade: Some(site.trade),
            ..InventoryItemInput::default()
        })
        .unwrap();

    let dir = tempdir().unwrap();
    let store = Arc::new(ZipProjectStore::new(dir.path().join("P-2024-01.zip")));
    SaveProjectHandler::new(store.clone())
        .handle(&site.project)
        .expect("save failed");
    Saved {
        site,
        store,
        _dir: dir,
    }
}

fn reload(saved: &Saved) -> Project {
    LoadProjectHandler::new(saved.store.clone())
        .handle()
        .expect("load failed")
}

#[rstest]
fn it_should_restore_every_relation_to_the_same_identity(saved: Saved) {
    let site = &saved.site;
    let loaded = reload(&saved);

    for invoice in loaded.invoices() {
        let job = loaded.job(invoice.job.key().unwrap()).unwrap();
        assert_eq!(job.company.key(), invoice.company.key());
        assert!(invoice.company.points_to(site.company));
    }
    assert!(loaded.trade(site.trade).unwrap().cost_group.points_to(site.sub_group));
    assert!(loaded.cost_group(site.sub_group).unwrap().parent.points_to(site.main_group));
    assert!(loaded.company(site.company).unwrap().contact_person.points_to(site.person));
    assert_eq!(loaded.client().map(|p| p.key()), Some(site.person));
    assert_eq!(loaded.identity(), site.project.identity());
}

#[rstest]
fn it_should_rebuild_the_invoice_ledger(saved: Saved) {
    let loaded = reload(&saved);

    let amounts: Vec<_> = loaded
        .invoices()
        .iter()
        .map(|invoice| (invoice.id.clone(), invoice.prev_invoices_amount))
        .collect();
    assert_eq!(
        amounts,
        vec![("R-2".to_string(), 1000.0), ("R-1".to_string(), 0.0)]
    );
}

#[rstest]
fn it_should_keep_timestamps_and_plain_fields(saved: Saved) {
    let site = &saved.site;
    let loaded = reload(&saved);

    let before = site.project.job(site.job).unwrap();
    let after = loaded.job(site.job).unwrap();
    assert_eq!(after.identity().created_at, before.identity().created_at);
    assert_eq!(after.identity().edited_at, before.identity().edited_at);
    assert_eq!(after.job_sum, 40_000.0);

    let address = loaded.address.as_ref().unwrap();
    assert_eq!(address.city, "Berlin");
    assert_eq!(loaded.config, site.project.config);

    let calculation = loaded.project_cost_calculations()[0];
    assert_eq!(calculation.total(), 11_400.0);
    assert_eq!(
        loaded
            .cost_calculation_total_for_cost_group(calculation.key(), site.main_group, true)
            .unwrap(),
        11_400.0
    );
}

#[rstest]
fn it_should_keep_deleted_entities(saved: Saved) {
    let mut project = reload(&saved);
    project.delete_trade(saved.site.trade).unwrap();
    SaveProjectHandler::new(saved.store.clone())
        .handle(&project)
        .unwrap();

    let loaded = reload(&saved);
    assert!(loaded.trades().is_empty());
    assert_eq!(loaded.trades_including_deleted().len(), 1);
    assert_eq!(loaded.job(saved.site.job).unwrap().trade(), Some(saved.site.trade));
}

#[rstest]
fn it_should_refuse_a_file_that_no_longer_links_up(saved: Saved) {
    let mut document = saved.store.load().unwrap();
    document.trades[0].cost_group = Some(RefDescriptor::from_identity(Identity::new(
        EntityType::CostGroup,
    )));

    assert!(matches!(
        Project::load(document),
        Err(DomainError::ReferenceResolution {
            target: EntityType::CostGroup,
            ..
        })
    ));
}
