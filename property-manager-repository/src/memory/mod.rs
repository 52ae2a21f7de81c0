//! In-memory record store.
//!
//! Keeps every table in ordered maps behind a single `RwLock`. Filtering and
//! ordering reuse the criteria types from `property-manager-shared`, and the
//! referential rules mirror the PostgreSQL schema: deleting an owner or a unit
//! cascades, payment types and units referenced by payments or tenants are
//! protected, and deleting a contract unlinks its payments.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use property_manager_shared::{
    compare_text, select_active_contract, Contract, ContractCriteria, ContractInput,
    ContractListing, Document, DocumentCriteria, Incident, IncidentCriteria, IncidentInput,
    NewDocument, NewPayment, Owner, OwnerCriteria, OwnerInput, OwnerSummary, Page, PageRequest,
    Payment, PaymentFilter, PaymentListing, PaymentPage, PaymentTotals, PaymentType,
    PaymentTypeCriteria, PaymentTypeInput, RecordId, Session, Tenant, TenantCriteria, TenantInput,
    TenantListing, Unit, UnitFilter, UnitInput, UnitListing,
};
use tokio::sync::RwLock;

use crate::errors::RepositoryError;
use crate::interfaces::{
    ContractRepository, DocumentRepository, IncidentRepository, OwnerRepository,
    PaymentRepository, PaymentTypeRepository, SessionRepository, TenantRepository,
    UnitRepository,
};

#[derive(Default)]
struct Tables {
    owners: BTreeMap<RecordId, Owner>,
    units: BTreeMap<RecordId, Unit>,
    tenants: BTreeMap<RecordId, Tenant>,
    contracts: BTreeMap<RecordId, Contract>,
    payment_types: BTreeMap<RecordId, PaymentType>,
    payments: BTreeMap<RecordId, Payment>,
    incidents: BTreeMap<RecordId, Incident>,
    documents: BTreeMap<RecordId, Document>,
    sessions: HashMap<String, Session>,
    sequences: HashMap<&'static str, RecordId>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> RecordId {
        let id = self.sequences.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn require_owner(&self, id: RecordId) -> Result<&Owner, RepositoryError> {
        self.owners
            .get(&id)
            .ok_or_else(|| RepositoryError::integrity(format!("owner {id} does not exist")))
    }

    fn require_unit(&self, id: RecordId) -> Result<&Unit, RepositoryError> {
        self.units
            .get(&id)
            .ok_or_else(|| RepositoryError::integrity(format!("unit {id} does not exist")))
    }

    fn check_national_id<'a, I>(
        records: I,
        national_id: &str,
        except: Option<RecordId>,
    ) -> Result<(), RepositoryError>
    where
        I: IntoIterator<Item = (RecordId, &'a str)>,
    {
        let taken = records
            .into_iter()
            .any(|(id, existing)| existing == national_id && Some(id) != except);
        if taken {
            return Err(RepositoryError::integrity(format!(
                "national id {national_id} already exists"
            )));
        }
        Ok(())
    }

    fn check_contract_refs(&self, input: &ContractInput) -> Result<(), RepositoryError> {
        self.require_unit(input.unit_id)?;
        self.require_owner(input.owner_id)?;
        if let Some(missing) = input
            .tenant_ids
            .iter()
            .find(|id| !self.tenants.contains_key(id))
        {
            return Err(RepositoryError::integrity(format!(
                "tenant {missing} does not exist"
            )));
        }
        Ok(())
    }

    fn check_payment_refs(&self, payment: &NewPayment) -> Result<(), RepositoryError> {
        self.require_unit(payment.unit_id)?;
        if !self.payment_types.contains_key(&payment.payment_type_id) {
            return Err(RepositoryError::integrity(format!(
                "payment type {} does not exist",
                payment.payment_type_id
            )));
        }
        Ok(())
    }

    fn remove_contract(&mut self, id: RecordId) {
        self.contracts.remove(&id);
        for payment in self.payments.values_mut() {
            if payment.contract_id == Some(id) {
                payment.contract_id = None;
            }
        }
    }

    /// Removes a unit and everything hanging off it. Tenants must already be gone.
    fn remove_unit(&mut self, id: RecordId) {
        let contract_ids: Vec<RecordId> = self
            .contracts
            .values()
            .filter(|c| c.unit_id == id)
            .map(|c| c.id)
            .collect();
        for contract_id in contract_ids {
            self.remove_contract(contract_id);
        }
        self.payments.retain(|_, p| p.unit_id != id);
        self.incidents.retain(|_, i| i.unit_id != id);
        self.documents.retain(|_, d| d.unit_id != id);
        self.units.remove(&id);
    }

    fn unit_has_tenants(&self, unit_id: RecordId) -> bool {
        self.tenants.values().any(|t| t.unit_id == Some(unit_id))
    }

    fn unit_listing(&self, unit: &Unit, today: NaiveDate) -> UnitListing {
        UnitListing {
            unit: unit.clone(),
            owner_name: self
                .owners
                .get(&unit.owner_id)
                .map(|o| o.name.clone())
                .unwrap_or_default(),
            rented: select_active_contract(self.contracts.values(), unit.id, today).is_some(),
        }
    }

    fn tenant_listing(&self, tenant: &Tenant) -> TenantListing {
        let unit = tenant.unit_id.and_then(|id| self.units.get(&id));
        TenantListing {
            tenant: tenant.clone(),
            unit_address: unit.map(|u| u.address.clone()),
            unit_category: unit.map(|u| u.category),
        }
    }

    fn contract_listing(&self, contract: &Contract) -> ContractListing {
        let mut tenant_names: Vec<String> = contract
            .tenant_ids
            .iter()
            .filter_map(|id| self.tenants.get(id))
            .map(|t| t.name.clone())
            .collect();
        tenant_names.sort();
        ContractListing {
            contract: contract.clone(),
            unit_label: self
                .units
                .get(&contract.unit_id)
                .map(Unit::display_name)
                .unwrap_or_default(),
            owner_name: self
                .owners
                .get(&contract.owner_id)
                .map(|o| o.name.clone())
                .unwrap_or_default(),
            tenant_names,
        }
    }

    fn payment_listing(&self, payment: &Payment) -> PaymentListing {
        PaymentListing {
            payment: payment.clone(),
            unit_address: self
                .units
                .get(&payment.unit_id)
                .map(|u| u.address.clone())
                .unwrap_or_default(),
            payment_type_name: self
                .payment_types
                .get(&payment.payment_type_id)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
        }
    }

    fn matching_payments(&self, filter: &PaymentFilter) -> Vec<PaymentListing> {
        if filter.is_unsatisfiable() {
            return Vec::new();
        }
        self.payments
            .values()
            .map(|p| self.payment_listing(p))
            .filter(|l| filter.matches(l))
            .collect()
    }
}

fn sorted_tenant_ids(ids: &[RecordId]) -> Vec<RecordId> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Record store kept entirely in process memory.
///
/// Used by the test suites and by `STORE_BACKEND=memory`. Nothing survives a
/// restart.
#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnerRepository for InMemoryRecordStore {
    async fn list_owners(
        &self,
        criteria: &OwnerCriteria,
        page: PageRequest,
    ) -> Result<Page<OwnerSummary>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut summaries: Vec<OwnerSummary> = tables
            .owners
            .values()
            .map(|owner| OwnerSummary {
                owner: owner.clone(),
                unit_count: tables
                    .units
                    .values()
                    .filter(|u| u.owner_id == owner.id)
                    .count() as i64,
            })
            .filter(|s| criteria.matches(s))
            .collect();
        summaries.sort_by(|a, b| {
            compare_text(&a.owner.name, &b.owner.name).then(a.owner.id.cmp(&b.owner.id))
        });
        Ok(page.slice(summaries))
    }

    async fn all_owners(&self) -> Result<Vec<Owner>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut owners: Vec<Owner> = tables.owners.values().cloned().collect();
        owners.sort_by(|a, b| compare_text(&a.name, &b.name).then(a.id.cmp(&b.id)));
        Ok(owners)
    }

    async fn get_owner(&self, id: RecordId) -> Result<Owner, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .owners
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("owner", id))
    }

    async fn create_owner(&self, input: &OwnerInput) -> Result<Owner, RepositoryError> {
        let mut tables = self.tables.write().await;
        Tables::check_national_id(
            tables.owners.values().map(|o| (o.id, o.national_id.as_str())),
            &input.national_id,
            None,
        )?;
        let owner = Owner {
            id: tables.next_id("owners"),
            name: input.name.clone(),
            national_id: input.national_id.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
        };
        tables.owners.insert(owner.id, owner.clone());
        Ok(owner)
    }

    async fn update_owner(&self, id: RecordId, input: &OwnerInput) -> Result<Owner, RepositoryError> {
        let mut tables = self.tables.write().await;
        Tables::check_national_id(
            tables.owners.values().map(|o| (o.id, o.national_id.as_str())),
            &input.national_id,
            Some(id),
        )?;
        let owner = tables
            .owners
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("owner", id))?;
        owner.name = input.name.clone();
        owner.national_id = input.national_id.clone();
        owner.phone = input.phone.clone();
        owner.email = input.email.clone();
        owner.address = input.address.clone();
        Ok(owner.clone())
    }

    async fn delete_owner(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.owners.contains_key(&id) {
            return Err(RepositoryError::not_found("owner", id));
        }
        let unit_ids: Vec<RecordId> = tables
            .units
            .values()
            .filter(|u| u.owner_id == id)
            .map(|u| u.id)
            .collect();
        if unit_ids.iter().any(|unit_id| tables.unit_has_tenants(*unit_id)) {
            return Err(RepositoryError::integrity(format!(
                "owner {id} has units referenced by tenants"
            )));
        }
        for unit_id in unit_ids {
            tables.remove_unit(unit_id);
        }
        let contract_ids: Vec<RecordId> = tables
            .contracts
            .values()
            .filter(|c| c.owner_id == id)
            .map(|c| c.id)
            .collect();
        for contract_id in contract_ids {
            tables.remove_contract(contract_id);
        }
        tables.owners.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl UnitRepository for InMemoryRecordStore {
    async fn list_units(
        &self,
        filter: &UnitFilter,
        today: NaiveDate,
        page: PageRequest,
    ) -> Result<Page<UnitListing>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut listings: Vec<UnitListing> = tables
            .units
            .values()
            .map(|u| tables.unit_listing(u, today))
            .filter(|l| filter.matches(l))
            .collect();
        listings.sort_by(|a, b| filter.compare(a, b));
        Ok(page.slice(listings))
    }

    async fn all_units(&self) -> Result<Vec<Unit>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut units: Vec<Unit> = tables.units.values().cloned().collect();
        units.sort_by(|a, b| compare_text(&a.address, &b.address).then(a.id.cmp(&b.id)));
        Ok(units)
    }

    async fn get_unit(&self, id: RecordId) -> Result<Unit, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .units
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("unit", id))
    }

    async fn create_unit(&self, input: &UnitInput) -> Result<Unit, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.require_owner(input.owner_id)?;
        let unit = Unit {
            id: tables.next_id("units"),
            category: input.category,
            address: input.address.clone(),
            floor: input.floor.clone(),
            door: input.door.clone(),
            area: input.area,
            rooms: input.rooms,
            owner_id: input.owner_id,
        };
        tables.units.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn update_unit(&self, id: RecordId, input: &UnitInput) -> Result<Unit, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.require_owner(input.owner_id)?;
        let unit = tables
            .units
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("unit", id))?;
        unit.category = input.category;
        unit.address = input.address.clone();
        unit.floor = input.floor.clone();
        unit.door = input.door.clone();
        unit.area = input.area;
        unit.rooms = input.rooms;
        unit.owner_id = input.owner_id;
        Ok(unit.clone())
    }

    async fn delete_unit(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.units.contains_key(&id) {
            return Err(RepositoryError::not_found("unit", id));
        }
        if tables.unit_has_tenants(id) {
            return Err(RepositoryError::integrity(format!(
                "unit {id} is referenced by tenants"
            )));
        }
        tables.remove_unit(id);
        Ok(())
    }
}

#[async_trait]
impl TenantRepository for InMemoryRecordStore {
    async fn list_tenants(
        &self,
        criteria: &TenantCriteria,
        page: PageRequest,
    ) -> Result<Page<TenantListing>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut listings: Vec<TenantListing> = tables
            .tenants
            .values()
            .map(|t| tables.tenant_listing(t))
            .filter(|l| criteria.matches(l))
            .collect();
        listings.sort_by(|a, b| {
            compare_text(&a.tenant.name, &b.tenant.name).then(a.tenant.id.cmp(&b.tenant.id))
        });
        Ok(page.slice(listings))
    }

    async fn all_tenants(&self) -> Result<Vec<Tenant>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut tenants: Vec<Tenant> = tables.tenants.values().cloned().collect();
        tenants.sort_by(|a, b| compare_text(&a.name, &b.name).then(a.id.cmp(&b.id)));
        Ok(tenants)
    }

    async fn get_tenant(&self, id: RecordId) -> Result<Tenant, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .tenants
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("tenant", id))
    }

    async fn create_tenant(&self, input: &TenantInput) -> Result<Tenant, RepositoryError> {
        let mut tables = self.tables.write().await;
        if let Some(unit_id) = input.unit_id {
            tables.require_unit(unit_id)?;
        }
        Tables::check_national_id(
            tables.tenants.values().map(|t| (t.id, t.national_id.as_str())),
            &input.national_id,
            None,
        )?;
        let tenant = Tenant {
            id: tables.next_id("tenants"),
            name: input.name.clone(),
            national_id: input.national_id.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            unit_id: input.unit_id,
        };
        tables.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn update_tenant(
        &self,
        id: RecordId,
        input: &TenantInput,
    ) -> Result<Tenant, RepositoryError> {
        let mut tables = self.tables.write().await;
        if let Some(unit_id) = input.unit_id {
            tables.require_unit(unit_id)?;
        }
        Tables::check_national_id(
            tables.tenants.values().map(|t| (t.id, t.national_id.as_str())),
            &input.national_id,
            Some(id),
        )?;
        let tenant = tables
            .tenants
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("tenant", id))?;
        tenant.name = input.name.clone();
        tenant.national_id = input.national_id.clone();
        tenant.phone = input.phone.clone();
        tenant.email = input.email.clone();
        tenant.unit_id = input.unit_id;
        Ok(tenant.clone())
    }

    async fn delete_tenant(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.tenants.remove(&id).is_none() {
            return Err(RepositoryError::not_found("tenant", id));
        }
        for contract in tables.contracts.values_mut() {
            contract.tenant_ids.retain(|tenant_id| *tenant_id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl ContractRepository for InMemoryRecordStore {
    async fn list_contracts(
        &self,
        criteria: &ContractCriteria,
        page: PageRequest,
    ) -> Result<Page<ContractListing>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut contracts: Vec<&Contract> = tables
            .contracts
            .values()
            .filter(|c| criteria.matches(c))
            .collect();
        contracts.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then(b.id.cmp(&a.id))
        });
        let listings = contracts
            .into_iter()
            .map(|c| tables.contract_listing(c))
            .collect();
        Ok(page.slice(listings))
    }

    async fn get_contract(&self, id: RecordId) -> Result<Contract, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .contracts
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("contract", id))
    }

    async fn find_active_contract(
        &self,
        unit_id: RecordId,
        date: NaiveDate,
    ) -> Result<Option<Contract>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(select_active_contract(tables.contracts.values(), unit_id, date).cloned())
    }

    async fn create_contract(&self, input: &ContractInput) -> Result<Contract, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_contract_refs(input)?;
        let contract = Contract {
            id: tables.next_id("contracts"),
            unit_id: input.unit_id,
            owner_id: input.owner_id,
            tenant_ids: sorted_tenant_ids(&input.tenant_ids),
            start_date: input.start_date,
            end_date: input.end_date,
            monthly_price: input.monthly_price.clone(),
            terms: input.terms.clone(),
        };
        tables.contracts.insert(contract.id, contract.clone());
        Ok(contract)
    }

    async fn update_contract(
        &self,
        id: RecordId,
        input: &ContractInput,
    ) -> Result<Contract, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_contract_refs(input)?;
        let contract = tables
            .contracts
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("contract", id))?;
        contract.unit_id = input.unit_id;
        contract.owner_id = input.owner_id;
        contract.tenant_ids = sorted_tenant_ids(&input.tenant_ids);
        contract.start_date = input.start_date;
        contract.end_date = input.end_date;
        contract.monthly_price = input.monthly_price.clone();
        contract.terms = input.terms.clone();
        Ok(contract.clone())
    }

    async fn delete_contract(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.contracts.contains_key(&id) {
            return Err(RepositoryError::not_found("contract", id));
        }
        tables.remove_contract(id);
        Ok(())
    }
}

#[async_trait]
impl PaymentTypeRepository for InMemoryRecordStore {
    async fn list_payment_types(
        &self,
        criteria: &PaymentTypeCriteria,
        page: PageRequest,
    ) -> Result<Page<PaymentType>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut types: Vec<PaymentType> = tables
            .payment_types
            .values()
            .filter(|t| criteria.matches(t))
            .cloned()
            .collect();
        types.sort_by(|a, b| compare_text(&a.name, &b.name).then(a.id.cmp(&b.id)));
        Ok(page.slice(types))
    }

    async fn active_payment_types(&self) -> Result<Vec<PaymentType>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut types: Vec<PaymentType> = tables
            .payment_types
            .values()
            .filter(|t| t.active)
            .cloned()
            .collect();
        types.sort_by(|a, b| compare_text(&a.name, &b.name).then(a.id.cmp(&b.id)));
        Ok(types)
    }

    async fn get_payment_type(&self, id: RecordId) -> Result<PaymentType, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .payment_types
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("payment type", id))
    }

    async fn create_payment_type(
        &self,
        input: &PaymentTypeInput,
        username: &str,
    ) -> Result<PaymentType, RepositoryError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let payment_type = PaymentType {
            id: tables.next_id("payment_types"),
            name: input.name.clone(),
            description: input.description.clone(),
            default_payer: input.default_payer,
            active: input.active,
            created_by: Some(username.to_string()),
            updated_by: Some(username.to_string()),
            created_at: Some(now),
            updated_at: Some(now),
        };
        tables
            .payment_types
            .insert(payment_type.id, payment_type.clone());
        Ok(payment_type)
    }

    async fn update_payment_type(
        &self,
        id: RecordId,
        input: &PaymentTypeInput,
        username: &str,
    ) -> Result<PaymentType, RepositoryError> {
        let mut tables = self.tables.write().await;
        let payment_type = tables
            .payment_types
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("payment type", id))?;
        payment_type.name = input.name.clone();
        payment_type.description = input.description.clone();
        payment_type.default_payer = input.default_payer;
        payment_type.active = input.active;
        payment_type.updated_by = Some(username.to_string());
        payment_type.updated_at = Some(Utc::now());
        Ok(payment_type.clone())
    }

    async fn delete_payment_type(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.payment_types.contains_key(&id) {
            return Err(RepositoryError::not_found("payment type", id));
        }
        if tables.payments.values().any(|p| p.payment_type_id == id) {
            return Err(RepositoryError::integrity(format!(
                "payment type {id} is referenced by payments"
            )));
        }
        tables.payment_types.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryRecordStore {
    async fn list_payments(
        &self,
        filter: &PaymentFilter,
        page: PageRequest,
    ) -> Result<PaymentPage, RepositoryError> {
        let tables = self.tables.read().await;
        let mut listings = tables.matching_payments(filter);
        let totals = PaymentTotals::accumulate(listings.iter().map(|l| &l.payment));
        listings.sort_by(|a, b| filter.compare(a, b));
        Ok(PaymentPage {
            page: page.slice(listings),
            totals,
        })
    }

    async fn get_payment(&self, id: RecordId) -> Result<Payment, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .payments
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("payment", id))
    }

    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_payment_refs(payment)?;
        let contract_id =
            select_active_contract(tables.contracts.values(), payment.unit_id, payment.date)
                .map(|c| c.id);
        let created = Payment {
            id: tables.next_id("payments"),
            unit_id: payment.unit_id,
            contract_id,
            payment_type_id: payment.payment_type_id,
            date: payment.date,
            description: payment.description.clone(),
            amount: payment.amount.clone(),
            paid: payment.paid,
            payer: payment.payer,
        };
        tables.payments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_payment(
        &self,
        id: RecordId,
        payment: &NewPayment,
    ) -> Result<Payment, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_payment_refs(payment)?;
        let existing = tables
            .payments
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("payment", id))?;
        existing.unit_id = payment.unit_id;
        existing.payment_type_id = payment.payment_type_id;
        existing.date = payment.date;
        existing.description = payment.description.clone();
        existing.amount = payment.amount.clone();
        existing.paid = payment.paid;
        existing.payer = payment.payer;
        Ok(existing.clone())
    }

    async fn toggle_paid(&self, id: RecordId) -> Result<Payment, RepositoryError> {
        let mut tables = self.tables.write().await;
        let payment = tables
            .payments
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("payment", id))?;
        payment.paid = !payment.paid;
        Ok(payment.clone())
    }

    async fn delete_payment(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables
            .payments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("payment", id))
    }
}

#[async_trait]
impl IncidentRepository for InMemoryRecordStore {
    async fn list_incidents(
        &self,
        criteria: &IncidentCriteria,
        page: PageRequest,
    ) -> Result<Page<Incident>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut incidents: Vec<Incident> = tables
            .incidents
            .values()
            .filter(|i| criteria.matches(i))
            .cloned()
            .collect();
        incidents.sort_by(|a, b| {
            b.reported_on
                .cmp(&a.reported_on)
                .then(b.id.cmp(&a.id))
        });
        Ok(page.slice(incidents))
    }

    async fn get_incident(&self, id: RecordId) -> Result<Incident, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .incidents
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("incident", id))
    }

    async fn create_incident(
        &self,
        input: &IncidentInput,
        reported_on: NaiveDate,
    ) -> Result<Incident, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.require_unit(input.unit_id)?;
        let incident = Incident {
            id: tables.next_id("incidents"),
            unit_id: input.unit_id,
            description: input.description.clone(),
            status: input.effective_status(),
            reported_on,
            resolved_on: input.resolved_on,
        };
        tables.incidents.insert(incident.id, incident.clone());
        Ok(incident)
    }

    async fn update_incident(
        &self,
        id: RecordId,
        input: &IncidentInput,
    ) -> Result<Incident, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.require_unit(input.unit_id)?;
        let incident = tables
            .incidents
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("incident", id))?;
        incident.unit_id = input.unit_id;
        incident.description = input.description.clone();
        incident.status = input.effective_status();
        incident.resolved_on = input.resolved_on;
        Ok(incident.clone())
    }

    async fn delete_incident(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables
            .incidents
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("incident", id))
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRecordStore {
    async fn list_documents(
        &self,
        criteria: &DocumentCriteria,
        page: PageRequest,
    ) -> Result<Page<Document>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut documents: Vec<Document> = tables
            .documents
            .values()
            .filter(|d| criteria.matches(d))
            .cloned()
            .collect();
        documents.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(page.slice(documents))
    }

    async fn get_document(&self, id: RecordId) -> Result<Document, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .documents
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("document", id))
    }

    async fn create_document(&self, document: &NewDocument) -> Result<Document, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.require_unit(document.unit_id)?;
        let created = Document {
            id: tables.next_id("documents"),
            unit_id: document.unit_id,
            description: document.description.clone(),
            file_path: document.file_path.clone(),
            uploaded_at: Utc::now(),
        };
        tables.documents.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_document(
        &self,
        id: RecordId,
        unit_id: RecordId,
        description: &str,
    ) -> Result<Document, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.require_unit(unit_id)?;
        let document = tables
            .documents
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("document", id))?;
        document.unit_id = unit_id;
        document.description = description.to_string();
        Ok(document.clone())
    }

    async fn delete_document(&self, id: RecordId) -> Result<Document, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables
            .documents
            .remove(&id)
            .ok_or_else(|| RepositoryError::not_found("document", id))
    }
}

#[async_trait]
impl SessionRepository for InMemoryRecordStore {
    async fn find_session(&self, token: &str) -> Result<Option<Session>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.get(token).cloned())
    }

    async fn save_session(&self, session: &Session) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use property_manager_shared::{PayerRole, UnitCategory};

    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    async fn seed_unit(store: &InMemoryRecordStore) -> (Owner, Unit) {
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
        (owner, unit)
    }

    #[tokio::test]
    async fn test_duplicate_national_id_is_an_integrity_error() {
        let store = InMemoryRecordStore::new();
        seed_unit(&store).await;
        let result = store
            .create_owner(&OwnerInput {
                name: "Other".to_string(),
                national_id: "X".to_string(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(RepositoryError::Integrity(_))));
    }

    #[tokio::test]
    async fn test_unit_with_tenants_cannot_be_deleted() {
        let store = InMemoryRecordStore::new();
        let (owner, unit) = seed_unit(&store).await;
        store
            .create_tenant(&TenantInput {
                name: "Luis".to_string(),
                national_id: "T1".to_string(),
                unit_id: Some(unit.id),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches!(
            store.delete_unit(unit.id).await,
            Err(RepositoryError::Integrity(_))
        ));
        assert!(matches!(
            store.delete_owner(owner.id).await,
            Err(RepositoryError::Integrity(_))
        ));
        assert!(store.get_unit(unit.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_deleting_owner_cascades_to_units_and_payments() {
        let store = InMemoryRecordStore::new();
        let (owner, unit) = seed_unit(&store).await;
        let payment_type = store
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
        let payment = store
            .create_payment(&NewPayment {
                unit_id: unit.id,
                payment_type_id: payment_type.id,
                date: date("2024-01-01"),
                description: String::new(),
                amount: BigDecimal::from_str("10.00").unwrap(),
                paid: false,
                payer: PayerRole::Tenant,
            })
            .await
            .unwrap();

        store.delete_owner(owner.id).await.unwrap();

        assert!(matches!(
            store.get_unit(unit.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(store.get_payment(payment.id).await.is_err());
        assert!(store.delete_payment_type(payment_type.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_deleting_contract_unlinks_payments() {
        let store = InMemoryRecordStore::new();
        let (owner, unit) = seed_unit(&store).await;
        let tenant = store
            .create_tenant(&TenantInput {
                name: "Luis".to_string(),
                national_id: "T1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let contract = store
            .create_contract(&ContractInput {
                unit_id: unit.id,
                owner_id: owner.id,
                tenant_ids: vec![tenant.id, tenant.id],
                start_date: date("2023-01-01"),
                end_date: None,
                monthly_price: BigDecimal::from(700),
                terms: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(contract.tenant_ids, vec![tenant.id]);

        let payment_type = store
            .create_payment_type(
                &PaymentTypeInput {
                    name: "Rent".to_string(),
                    description: String::new(),
                    default_payer: None,
                    active: true,
                },
                "admin",
            )
            .await
            .unwrap();
        let payment = store
            .create_payment(&NewPayment {
                unit_id: unit.id,
                payment_type_id: payment_type.id,
                date: date("2023-02-01"),
                description: String::new(),
                amount: BigDecimal::from(700),
                paid: true,
                payer: PayerRole::Tenant,
            })
            .await
            .unwrap();
        assert_eq!(payment.contract_id, Some(contract.id));

        store.delete_contract(contract.id).await.unwrap();
        let payment = store.get_payment(payment.id).await.unwrap();
        assert_eq!(payment.contract_id, None);
        assert!(matches!(
            store.delete_payment_type(payment_type.id).await,
            Err(RepositoryError::Integrity(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_missing_payment_is_not_found() {
        let store = InMemoryRecordStore::new();
        assert!(matches!(
            store.toggle_paid(42).await,
            Err(RepositoryError::NotFound { entity: "payment", id: 42 })
        ));
    }
}
