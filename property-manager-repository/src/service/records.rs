use chrono::NaiveDate;
use property_manager_shared::views::Choice;
use property_manager_shared::{
    Contract, ContractInput, Incident, IncidentInput, Owner, OwnerInput, PaymentType,
    PaymentTypeInput, RecordId, Tenant, TenantInput, Unit, UnitInput,
};
use tracing::info;

use super::{invalid_choice, PropertyService};
use crate::errors::ServiceError;

impl PropertyService {
    // Owners

    pub async fn get_owner(&self, id: RecordId) -> Result<Owner, ServiceError> {
        Ok(self.store.get_owner(id).await?)
    }

    pub async fn create_owner(&self, input: OwnerInput) -> Result<Owner, ServiceError> {
        input.check()?;
        let owner = self.store.create_owner(&input).await?;
        info!(owner_id = owner.id, "Created owner");
        Ok(owner)
    }

    pub async fn update_owner(&self, id: RecordId, input: OwnerInput) -> Result<Owner, ServiceError> {
        input.check()?;
        Ok(self.store.update_owner(id, &input).await?)
    }

    /// Deletes the owner with its units and everything hanging from them.
    pub async fn delete_owner(&self, id: RecordId) -> Result<(), ServiceError> {
        self.store.delete_owner(id).await?;
        info!(owner_id = id, "Deleted owner");
        Ok(())
    }

    pub async fn owner_choices(&self) -> Result<Vec<Choice>, ServiceError> {
        let owners = self.store.all_owners().await?;
        Ok(owners
            .iter()
            .map(|o| Choice::new(o.id.to_string(), o.display_name()))
            .collect())
    }

    // Units

    pub async fn get_unit(&self, id: RecordId) -> Result<Unit, ServiceError> {
        Ok(self.store.get_unit(id).await?)
    }

    pub async fn create_unit(&self, input: UnitInput) -> Result<Unit, ServiceError> {
        input.check()?;
        self.store
            .get_owner(input.owner_id)
            .await
            .map_err(|e| invalid_choice(e, "owner"))?;
        let unit = self.store.create_unit(&input).await?;
        info!(unit_id = unit.id, owner_id = unit.owner_id, "Created unit");
        Ok(unit)
    }

    pub async fn update_unit(&self, id: RecordId, input: UnitInput) -> Result<Unit, ServiceError> {
        input.check()?;
        self.store
            .get_owner(input.owner_id)
            .await
            .map_err(|e| invalid_choice(e, "owner"))?;
        Ok(self.store.update_unit(id, &input).await?)
    }

    /// Fails with an integrity error while tenants live in the unit.
    pub async fn delete_unit(&self, id: RecordId) -> Result<(), ServiceError> {
        self.store.delete_unit(id).await?;
        info!(unit_id = id, "Deleted unit");
        Ok(())
    }

    pub async fn unit_choices(&self) -> Result<Vec<Choice>, ServiceError> {
        let units = self.store.all_units().await?;
        Ok(units
            .iter()
            .map(|u| Choice::new(u.id.to_string(), u.display_name()))
            .collect())
    }

    // Tenants

    pub async fn get_tenant(&self, id: RecordId) -> Result<Tenant, ServiceError> {
        Ok(self.store.get_tenant(id).await?)
    }

    pub async fn create_tenant(&self, input: TenantInput) -> Result<Tenant, ServiceError> {
        input.check()?;
        self.check_optional_unit(input.unit_id).await?;
        let tenant = self.store.create_tenant(&input).await?;
        info!(tenant_id = tenant.id, "Created tenant");
        Ok(tenant)
    }

    pub async fn update_tenant(
        &self,
        id: RecordId,
        input: TenantInput,
    ) -> Result<Tenant, ServiceError> {
        input.check()?;
        self.check_optional_unit(input.unit_id).await?;
        Ok(self.store.update_tenant(id, &input).await?)
    }

    pub async fn delete_tenant(&self, id: RecordId) -> Result<(), ServiceError> {
        self.store.delete_tenant(id).await?;
        info!(tenant_id = id, "Deleted tenant");
        Ok(())
    }

    pub async fn tenant_choices(&self) -> Result<Vec<Choice>, ServiceError> {
        let tenants = self.store.all_tenants().await?;
        Ok(tenants
            .iter()
            .map(|t| Choice::new(t.id.to_string(), t.display_name()))
            .collect())
    }

    async fn check_optional_unit(&self, unit_id: Option<RecordId>) -> Result<(), ServiceError> {
        if let Some(unit_id) = unit_id {
            self.store
                .get_unit(unit_id)
                .await
                .map_err(|e| invalid_choice(e, "unit"))?;
        }
        Ok(())
    }

    // Contracts

    pub async fn get_contract(&self, id: RecordId) -> Result<Contract, ServiceError> {
        Ok(self.store.get_contract(id).await?)
    }

    pub async fn create_contract(&self, input: ContractInput) -> Result<Contract, ServiceError> {
        input.check()?;
        self.check_contract_references(&input).await?;
        let contract = self.store.create_contract(&input).await?;
        info!(
            contract_id = contract.id,
            unit_id = contract.unit_id,
            start_date = %contract.start_date,
            "Created contract"
        );
        Ok(contract)
    }

    pub async fn update_contract(
        &self,
        id: RecordId,
        input: ContractInput,
    ) -> Result<Contract, ServiceError> {
        input.check()?;
        self.check_contract_references(&input).await?;
        Ok(self.store.update_contract(id, &input).await?)
    }

    /// Payments of the contract stay, unlinked.
    pub async fn delete_contract(&self, id: RecordId) -> Result<(), ServiceError> {
        self.store.delete_contract(id).await?;
        info!(contract_id = id, "Deleted contract");
        Ok(())
    }

    async fn check_contract_references(&self, input: &ContractInput) -> Result<(), ServiceError> {
        self.store
            .get_unit(input.unit_id)
            .await
            .map_err(|e| invalid_choice(e, "unit"))?;
        self.store
            .get_owner(input.owner_id)
            .await
            .map_err(|e| invalid_choice(e, "owner"))?;
        for tenant_id in &input.tenant_ids {
            self.store
                .get_tenant(*tenant_id)
                .await
                .map_err(|e| invalid_choice(e, "tenant_ids"))?;
        }
        Ok(())
    }

    // Payment types

    pub async fn get_payment_type(&self, id: RecordId) -> Result<PaymentType, ServiceError> {
        Ok(self.store.get_payment_type(id).await?)
    }

    /// `username` is recorded as creator and last editor.
    pub async fn create_payment_type(
        &self,
        input: PaymentTypeInput,
        username: &str,
    ) -> Result<PaymentType, ServiceError> {
        input.check()?;
        let payment_type = self.store.create_payment_type(&input, username).await?;
        info!(
            payment_type_id = payment_type.id,
            username = %username,
            "Created payment type"
        );
        Ok(payment_type)
    }

    pub async fn update_payment_type(
        &self,
        id: RecordId,
        input: PaymentTypeInput,
        username: &str,
    ) -> Result<PaymentType, ServiceError> {
        input.check()?;
        Ok(self.store.update_payment_type(id, &input, username).await?)
    }

    /// Fails with an integrity error while payments use the type.
    pub async fn delete_payment_type(&self, id: RecordId) -> Result<(), ServiceError> {
        self.store.delete_payment_type(id).await?;
        info!(payment_type_id = id, "Deleted payment type");
        Ok(())
    }

    pub async fn payment_type_choices(&self) -> Result<Vec<Choice>, ServiceError> {
        let types = self.store.active_payment_types().await?;
        Ok(types
            .into_iter()
            .map(|t| Choice::new(t.id.to_string(), t.name))
            .collect())
    }

    // Incidents

    pub async fn get_incident(&self, id: RecordId) -> Result<Incident, ServiceError> {
        Ok(self.store.get_incident(id).await?)
    }

    /// Reports an incident on `today`.
    pub async fn create_incident(
        &self,
        input: IncidentInput,
        today: NaiveDate,
    ) -> Result<Incident, ServiceError> {
        input.check(today)?;
        self.store
            .get_unit(input.unit_id)
            .await
            .map_err(|e| invalid_choice(e, "unit"))?;
        let incident = self.store.create_incident(&input, today).await?;
        info!(
            incident_id = incident.id,
            unit_id = incident.unit_id,
            status = %incident.status,
            "Created incident"
        );
        Ok(incident)
    }

    /// The resolution date is checked against the stored report date.
    pub async fn update_incident(
        &self,
        id: RecordId,
        input: IncidentInput,
    ) -> Result<Incident, ServiceError> {
        let existing = self.store.get_incident(id).await?;
        input.check(existing.reported_on)?;
        self.store
            .get_unit(input.unit_id)
            .await
            .map_err(|e| invalid_choice(e, "unit"))?;
        Ok(self.store.update_incident(id, &input).await?)
    }

    pub async fn delete_incident(&self, id: RecordId) -> Result<(), ServiceError> {
        self.store.delete_incident(id).await?;
        info!(incident_id = id, "Deleted incident");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use property_manager_shared::UnitCategory;

    use super::*;
    use crate::blob::FileSystemBlobStore;
    use crate::memory::InMemoryRecordStore;

    fn service() -> PropertyService {
        PropertyService::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(FileSystemBlobStore::new(std::env::temp_dir())),
        )
    }

    fn owner_input(national_id: &str) -> OwnerInput {
        OwnerInput {
            name: "Ana".to_string(),
            national_id: national_id.to_string(),
            ..Default::default()
        }
    }

    fn unit_input(owner_id: RecordId) -> UnitInput {
        UnitInput {
            category: UnitCategory::Garage,
            address: "Calle Luna 3".to_string(),
            floor: String::new(),
            door: String::new(),
            area: 12.5,
            rooms: None,
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_national_id_is_integrity_error() {
        let service = service();
        service.create_owner(owner_input("X")).await.unwrap();
        assert!(matches!(
            service.create_owner(owner_input("X")).await,
            Err(ServiceError::Integrity(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_owner_name_is_validation_error() {
        let service = service();
        let mut input = owner_input("X");
        input.name = "  ".to_string();
        match service.create_owner(input).await {
            Err(ServiceError::Validation(errors)) => assert!(errors.field("name").is_some()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unit_requires_existing_owner() {
        let service = service();
        match service.create_unit(unit_input(42)).await {
            Err(ServiceError::Validation(errors)) => assert!(errors.field("owner").is_some()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unit_with_tenant_cannot_be_deleted() {
        let service = service();
        let owner = service.create_owner(owner_input("X")).await.unwrap();
        let unit = service.create_unit(unit_input(owner.id)).await.unwrap();
        let tenant = service
            .create_tenant(TenantInput {
                name: "Luis".to_string(),
                national_id: "T1".to_string(),
                unit_id: Some(unit.id),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches!(
            service.delete_unit(unit.id).await,
            Err(ServiceError::Integrity(_))
        ));
        service.delete_tenant(tenant.id).await.unwrap();
        service.delete_unit(unit.id).await.unwrap();
        assert!(matches!(
            service.get_unit(unit.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_choices_use_display_names() {
        let service = service();
        let owner = service.create_owner(owner_input("X")).await.unwrap();
        service.create_unit(unit_input(owner.id)).await.unwrap();

        let owners = service.owner_choices().await.unwrap();
        assert_eq!(owners, vec![Choice::new(owner.id.to_string(), "Ana (X)")]);
        let units = service.unit_choices().await.unwrap();
        assert_eq!(units[0].label, "Garage · Calle Luna 3");
    }

    #[tokio::test]
    async fn test_incident_resolution_checked_against_report_date() {
        let service = service();
        let owner = service.create_owner(owner_input("X")).await.unwrap();
        let unit = service.create_unit(unit_input(owner.id)).await.unwrap();
        let reported = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let incident = service
            .create_incident(
                IncidentInput {
                    unit_id: unit.id,
                    description: "Broken door".to_string(),
                    status: String::new(),
                    resolved_on: None,
                },
                reported,
            )
            .await
            .unwrap();
        assert_eq!(incident.status, "pending");
        assert_eq!(incident.reported_on, reported);

        let early = IncidentInput {
            unit_id: unit.id,
            description: "Broken door".to_string(),
            status: "resolved".to_string(),
            resolved_on: NaiveDate::from_ymd_opt(2024, 2, 1),
        };
        assert!(matches!(
            service.update_incident(incident.id, early).await,
            Err(ServiceError::Validation(_))
        ));

        let resolved = IncidentInput {
            unit_id: unit.id,
            description: "Broken door".to_string(),
            status: "resolved".to_string(),
            resolved_on: NaiveDate::from_ymd_opt(2024, 3, 5),
        };
        let updated = service.update_incident(incident.id, resolved).await.unwrap();
        assert_eq!(updated.status, "resolved");
        assert_eq!(updated.reported_on, reported);
    }
}
