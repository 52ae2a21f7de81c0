use chrono::NaiveDate;
use property_manager_shared::views::PaymentFormInitial;
use property_manager_shared::{ListParams, Payment, PaymentInput, RecordId};
use tracing::{debug, info};

use super::{invalid_choice, PropertyService};
use crate::errors::{RepositoryError, ServiceError};

impl PropertyService {
    /// Initial values for the new payment form.
    ///
    /// `unit` and `payment_type` preselect the matching fields when they are
    /// integers. The payer comes from the selected type's default payer.
    pub async fn payment_form_initial(
        &self,
        params: &ListParams,
        today: NaiveDate,
    ) -> Result<PaymentFormInitial, ServiceError> {
        let unit_id = params.parse_lenient::<RecordId>("unit");
        let payment_type_id = params.parse_lenient::<RecordId>("payment_type");
        let payer = match payment_type_id {
            Some(id) => match self.store.get_payment_type(id).await {
                Ok(payment_type) => payment_type.default_payer,
                Err(RepositoryError::NotFound { .. }) => None,
                Err(e) => return Err(e.into()),
            },
            None => None,
        };
        Ok(PaymentFormInitial {
            unit_id,
            payment_type_id,
            date: today,
            payer,
        })
    }

    pub async fn get_payment(&self, id: RecordId) -> Result<Payment, ServiceError> {
        Ok(self.store.get_payment(id).await?)
    }

    /// Creates a payment and links it to the contract of its unit in force on
    /// the payment date. A missing date means `today`.
    pub async fn create_payment(
        &self,
        input: PaymentInput,
        today: NaiveDate,
    ) -> Result<Payment, ServiceError> {
        input.check()?;
        self.check_payment_references(&input).await?;

        let date = input.date.unwrap_or(today);
        let payment = self
            .store
            .create_payment(&input.into_new_payment(date))
            .await?;

        info!(
            payment_id = payment.id,
            unit_id = payment.unit_id,
            contract_id = ?payment.contract_id,
            date = %payment.date,
            "Created payment"
        );
        Ok(payment)
    }

    /// Updates a payment. The contract link is kept as it was; it is only
    /// resolved on creation.
    pub async fn update_payment(
        &self,
        id: RecordId,
        input: PaymentInput,
    ) -> Result<Payment, ServiceError> {
        self.store.get_payment(id).await?;
        let Some(date) = input.date else {
            return Err(ServiceError::field("date", "This field is required."));
        };
        input.check()?;
        self.check_payment_references(&input).await?;

        let payment = self
            .store
            .update_payment(id, &input.into_new_payment(date))
            .await?;
        info!(payment_id = id, "Updated payment");
        Ok(payment)
    }

    /// Flips the paid flag of one payment.
    pub async fn toggle_paid(&self, id: RecordId) -> Result<Payment, ServiceError> {
        let payment = self.store.toggle_paid(id).await?;
        debug!(payment_id = id, paid = payment.paid, "Toggled payment");
        Ok(payment)
    }

    pub async fn delete_payment(&self, id: RecordId) -> Result<(), ServiceError> {
        self.store.delete_payment(id).await?;
        info!(payment_id = id, "Deleted payment");
        Ok(())
    }

    async fn check_payment_references(&self, input: &PaymentInput) -> Result<(), ServiceError> {
        self.store
            .get_unit(input.unit_id)
            .await
            .map_err(|e| invalid_choice(e, "unit"))?;
        self.store
            .get_payment_type(input.payment_type_id)
            .await
            .map_err(|e| invalid_choice(e, "payment_type"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use bigdecimal::BigDecimal;
    use property_manager_shared::{
        ContractInput, OwnerInput, PayerRole, PaymentTypeInput, TenantInput, UnitCategory,
        UnitInput,
    };

    use super::*;
    use crate::blob::FileSystemBlobStore;
    use crate::memory::InMemoryRecordStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        service: PropertyService,
        unit_id: RecordId,
        type_id: RecordId,
        contract_id: RecordId,
    }

    async fn fixture() -> Fixture {
        let service = PropertyService::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(FileSystemBlobStore::new(std::env::temp_dir())),
        );
        let owner = service
            .create_owner(OwnerInput {
                name: "Ana".to_string(),
                national_id: "X".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let unit = service
            .create_unit(UnitInput {
                category: UnitCategory::Apartment,
                address: "Calle Mayor 1".to_string(),
                floor: String::new(),
                door: String::new(),
                area: 80.0,
                rooms: Some(2),
                owner_id: owner.id,
            })
            .await
            .unwrap();
        let tenant = service
            .create_tenant(TenantInput {
                name: "Luis".to_string(),
                national_id: "T1".to_string(),
                unit_id: Some(unit.id),
                ..Default::default()
            })
            .await
            .unwrap();
        let contract = service
            .create_contract(ContractInput {
                unit_id: unit.id,
                owner_id: owner.id,
                tenant_ids: vec![tenant.id],
                start_date: date("2023-01-01"),
                end_date: Some(date("2023-12-31")),
                monthly_price: BigDecimal::from(750),
                terms: String::new(),
            })
            .await
            .unwrap();
        let payment_type = service
            .create_payment_type(
                PaymentTypeInput {
                    name: "Rent".to_string(),
                    description: String::new(),
                    default_payer: Some(PayerRole::Tenant),
                    active: true,
                },
                "admin",
            )
            .await
            .unwrap();
        Fixture {
            service,
            unit_id: unit.id,
            type_id: payment_type.id,
            contract_id: contract.id,
        }
    }

    fn input(fixture: &Fixture, on: Option<NaiveDate>) -> PaymentInput {
        PaymentInput {
            unit_id: fixture.unit_id,
            payment_type_id: fixture.type_id,
            date: on,
            description: "June rent".to_string(),
            amount: BigDecimal::from_str("750.00").unwrap(),
            paid: false,
            payer: PayerRole::Tenant,
        }
    }

    #[tokio::test]
    async fn test_create_links_contract_by_payment_date() {
        let f = fixture().await;
        let today = date("2030-01-01");

        let inside = f
            .service
            .create_payment(input(&f, Some(date("2023-06-15"))), today)
            .await
            .unwrap();
        assert_eq!(inside.contract_id, Some(f.contract_id));

        let outside = f
            .service
            .create_payment(input(&f, Some(date("2024-01-15"))), today)
            .await
            .unwrap();
        assert_eq!(outside.contract_id, None);
    }

    #[tokio::test]
    async fn test_create_defaults_date_to_today() {
        let f = fixture().await;
        let payment = f
            .service
            .create_payment(input(&f, None), date("2023-03-10"))
            .await
            .unwrap();
        assert_eq!(payment.date, date("2023-03-10"));
        assert_eq!(payment.contract_id, Some(f.contract_id));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_payment_type() {
        let f = fixture().await;
        let mut bad = input(&f, None);
        bad.payment_type_id = 999;
        match f.service.create_payment(bad, date("2023-03-10")).await {
            Err(ServiceError::Validation(errors)) => {
                assert!(errors.field("payment_type").is_some())
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_keeps_contract_link() {
        let f = fixture().await;
        let payment = f
            .service
            .create_payment(input(&f, Some(date("2023-06-15"))), date("2030-01-01"))
            .await
            .unwrap();

        let updated = f
            .service
            .update_payment(payment.id, input(&f, Some(date("2024-02-01"))))
            .await
            .unwrap();
        assert_eq!(updated.date, date("2024-02-01"));
        assert_eq!(updated.contract_id, Some(f.contract_id));

        let missing_date = f.service.update_payment(payment.id, input(&f, None)).await;
        assert!(matches!(missing_date, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_flag() {
        let f = fixture().await;
        let payment = f
            .service
            .create_payment(input(&f, None), date("2023-03-10"))
            .await
            .unwrap();

        assert!(f.service.toggle_paid(payment.id).await.unwrap().paid);
        assert!(!f.service.toggle_paid(payment.id).await.unwrap().paid);
        assert!(matches!(
            f.service.toggle_paid(999).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_form_initial_uses_type_default_payer() {
        let f = fixture().await;
        let params = ListParams::new(vec![
            ("unit".to_string(), f.unit_id.to_string()),
            ("payment_type".to_string(), f.type_id.to_string()),
        ]);
        let initial = f
            .service
            .payment_form_initial(&params, date("2024-05-01"))
            .await
            .unwrap();
        assert_eq!(initial.unit_id, Some(f.unit_id));
        assert_eq!(initial.payer, Some(PayerRole::Tenant));
        assert_eq!(initial.date, date("2024-05-01"));

        let params = ListParams::from_pairs(&[("unit", "abc"), ("payment_type", "404")]);
        let initial = f
            .service
            .payment_form_initial(&params, date("2024-05-01"))
            .await
            .unwrap();
        assert_eq!(initial.unit_id, None);
        assert_eq!(initial.payer, None);
    }
}
