//! Integration tests for the PostgreSQL record store.
//!
//! These tests require a real PostgreSQL database (`DATABASE_URL`); SQLx
//! creates an isolated database per test and applies the migrations.
//!
//! Run with: `cargo test --test postgres_integration -- --ignored`

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use property_manager_repository::interfaces::{
    ContractRepository, OwnerRepository, PaymentRepository, PaymentTypeRepository,
    TenantRepository, UnitRepository,
};
use property_manager_repository::{PostgresRecordStore, RepositoryError};
use property_manager_shared::{
    ContractCriteria, ContractInput, ListParams, NewPayment, OwnerCriteria, OwnerInput,
    PageRequest, PayerRole, PaymentFilter, PaymentPage, PaymentTypeInput, RecordId, TenantInput,
    UnitCategory, UnitFilter, UnitInput,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn money(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

struct Seed {
    owner: RecordId,
    unit: RecordId,
    tenant: RecordId,
    contract: RecordId,
    rent: RecordId,
}

/// Ana owns U1 (80 m², 2 rooms), leased to one tenant for 2023.
async fn seed(store: &PostgresRecordStore) -> Seed {
    let owner = store
        .create_owner(&OwnerInput {
            name: "Ana".to_string(),
            national_id: "X".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let unit = store
        .create_unit(&UnitInput {
            category: UnitCategory::Apartment,
            address: "Calle Mayor 1".to_string(),
            floor: "2".to_string(),
            door: "B".to_string(),
            area: 80.0,
            rooms: Some(2),
            owner_id: owner.id,
        })
        .await
        .unwrap();
    let tenant = store
        .create_tenant(&TenantInput {
            name: "Luis".to_string(),
            national_id: "T1".to_string(),
            unit_id: Some(unit.id),
            ..Default::default()
        })
        .await
        .unwrap();
    let contract = store
        .create_contract(&ContractInput {
            unit_id: unit.id,
            owner_id: owner.id,
            tenant_ids: vec![tenant.id],
            start_date: date("2023-01-01"),
            end_date: Some(date("2023-12-31")),
            monthly_price: money("800.00"),
            terms: String::new(),
        })
        .await
        .unwrap();
    let rent = store
        .create_payment_type(
            &PaymentTypeInput {
                name: "Rent".to_string(),
                description: String::new(),
                default_payer: Some(PayerRole::Tenant),
                active: true,
            },
            "admin",
        )
        .await
        .unwrap();
    Seed {
        owner: owner.id,
        unit: unit.id,
        tenant: tenant.id,
        contract: contract.id,
        rent: rent.id,
    }
}

fn new_payment(seed: &Seed, on: &str, amount: &str, paid: bool, payer: PayerRole) -> NewPayment {
    NewPayment {
        unit_id: seed.unit,
        payment_type_id: seed.rent,
        date: date(on),
        description: String::new(),
        amount: money(amount),
        paid,
        payer,
    }
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_find_active_contract(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let seed = seed(&store).await;

    let inside = store
        .find_active_contract(seed.unit, date("2023-06-15"))
        .await
        .unwrap();
    assert_eq!(inside.map(|c| c.id), Some(seed.contract));

    let outside = store
        .find_active_contract(seed.unit, date("2024-01-15"))
        .await
        .unwrap();
    assert!(outside.is_none());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_unit_filter_and_rented_flag(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let seed = seed(&store).await;
    let request = PageRequest::new(1, 15);

    let filter = UnitFilter::from_params(&ListParams::parse("area_min=70&area_max=90&rooms_min=2"));
    let page = store
        .list_units(&filter, date("2023-06-15"), request)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].unit.id, seed.unit);
    assert_eq!(page.items[0].owner_name, "Ana");
    assert!(page.items[0].rented);

    let filter = UnitFilter::from_params(&ListParams::parse("area_min=100"));
    let page = store
        .list_units(&filter, date("2023-06-15"), request)
        .await
        .unwrap();
    assert!(page.items.is_empty());

    let filter = UnitFilter::from_params(&ListParams::parse("rented=no"));
    let page = store
        .list_units(&filter, date("2024-06-15"), request)
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert!(!page.items[0].rented);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_payment_filter_and_totals(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let seed = seed(&store).await;
    let payments = [
        new_payment(&seed, "2023-02-01", "800.00", false, PayerRole::Tenant),
        new_payment(&seed, "2023-03-01", "200.25", false, PayerRole::Tenant),
        new_payment(&seed, "2023-04-01", "120.25", false, PayerRole::Tenant),
        new_payment(&seed, "2023-05-01", "90.00", true, PayerRole::Owner),
        new_payment(&seed, "2023-06-01", "60.00", true, PayerRole::Owner),
    ];
    for payment in &payments {
        store.create_payment(payment).await.unwrap();
    }

    let filter = PaymentFilter::from_params(&ListParams::parse("paid=no&payer=tenant"));
    let PaymentPage { page, totals } = store
        .list_payments(&filter, PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.total_items, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].payment.date, date("2023-04-01"));
    assert_eq!(page.items[0].payment_type_name, "Rent");
    assert_eq!(page.items[0].payment.contract_id, Some(seed.contract));

    assert_eq!(totals.pending, money("1120.50"));
    assert_eq!(totals.paid, money("0"));
    assert_eq!(totals.all, money("1120.50"));

    let filter = PaymentFilter::from_params(&ListParams::parse("payment_type=rent"));
    let PaymentPage { page, totals } = store
        .list_payments(&filter, PageRequest::new(1, 20))
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(totals.all, money("0"));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_payment_totals_span_every_page(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let seed = seed(&store).await;
    for i in 0..23 {
        let on = format!("2023-01-{:02}", i + 1);
        let amount = (10 + i).to_string();
        store
            .create_payment(&new_payment(&seed, &on, &amount, i % 2 == 0, PayerRole::Tenant))
            .await
            .unwrap();
    }

    let filter = PaymentFilter::from_params(&ListParams::default());
    let PaymentPage { page, totals } = store
        .list_payments(&filter, PageRequest::new(2, 20))
        .await
        .unwrap();
    assert_eq!(page.number, 2);
    assert_eq!(page.num_pages, 2);
    assert!(!page.has_next);
    let dates: Vec<NaiveDate> = page.items.iter().map(|l| l.payment.date).collect();
    assert_eq!(
        dates,
        vec![date("2023-01-03"), date("2023-01-02"), date("2023-01-01")]
    );

    assert_eq!(totals.all, money("483"));
    assert_eq!(totals.paid, money("252"));
    assert_eq!(totals.pending, money("231"));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_toggle_paid(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let seed = seed(&store).await;
    let payment = store
        .create_payment(&new_payment(&seed, "2023-02-01", "800", false, PayerRole::Tenant))
        .await
        .unwrap();

    assert!(store.toggle_paid(payment.id).await.unwrap().paid);
    assert!(!store.toggle_paid(payment.id).await.unwrap().paid);
    assert!(matches!(
        store.toggle_paid(payment.id + 100).await,
        Err(RepositoryError::NotFound { .. })
    ));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_referential_rules(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let seed = seed(&store).await;
    let linked = new_payment(&seed, "2023-02-01", "800", true, PayerRole::Tenant);
    let payment = store.create_payment(&linked).await.unwrap();
    assert_eq!(payment.contract_id, Some(seed.contract));
    let unlinked = new_payment(&seed, "2024-02-01", "800", true, PayerRole::Tenant);
    assert_eq!(store.create_payment(&unlinked).await.unwrap().contract_id, None);

    assert!(matches!(
        store.delete_payment_type(seed.rent).await,
        Err(RepositoryError::Integrity(_))
    ));
    assert!(matches!(
        store.delete_unit(seed.unit).await,
        Err(RepositoryError::Integrity(_))
    ));

    store.delete_contract(seed.contract).await.unwrap();
    let payment = store.get_payment(payment.id).await.unwrap();
    assert_eq!(payment.contract_id, None);

    store.delete_tenant(seed.tenant).await.unwrap();
    store.delete_owner(seed.owner).await.unwrap();
    assert!(matches!(
        store.get_unit(seed.unit).await,
        Err(RepositoryError::NotFound { .. })
    ));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_listings_join_related_names(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let seed = seed(&store).await;

    let owners = store
        .list_owners(&OwnerCriteria::default(), PageRequest::new(1, 20))
        .await
        .unwrap();
    assert_eq!(owners.items[0].unit_count, 1);

    let criteria = ContractCriteria {
        unit_id: Some(seed.unit),
    };
    let contracts = store
        .list_contracts(&criteria, PageRequest::new(1, 20))
        .await
        .unwrap();
    assert_eq!(contracts.total_items, 1);
    let listing = &contracts.items[0];
    assert_eq!(listing.owner_name, "Ana");
    assert_eq!(listing.tenant_names, vec!["Luis".to_string()]);
    assert_eq!(listing.unit_label, "Apartment · Calle Mayor 12B");
    assert_eq!(listing.contract.tenant_ids, vec![seed.tenant]);

    let duplicate = store
        .create_owner(&OwnerInput {
            name: "Other".to_string(),
            national_id: "X".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(duplicate, Err(RepositoryError::Integrity(_))));
}
