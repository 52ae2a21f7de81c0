use async_trait::async_trait;
use bigdecimal::BigDecimal;
use property_manager_shared::{
    NewPayment, PageRequest, Payment, PaymentFilter, PaymentPage, PaymentTotals, RecordId,
};
use sqlx::QueryBuilder;

use super::contracts::ACTIVE_CONTRACT_FILTER;
use super::filters::{push_payment_conditions, push_payment_ordering};
use super::rows::{PaymentListingRow, PaymentRow};
use super::{fetch_page_on, PostgresRecordStore};
use crate::errors::RepositoryError;
use crate::interfaces::PaymentRepository;

const PAYMENT_COLUMNS: &str = "p.id, p.unit_id, p.contract_id, p.payment_type_id, p.date, \
     p.description, p.amount, p.paid, p.payer";

#[async_trait]
impl PaymentRepository for PostgresRecordStore {
    async fn list_payments(
        &self,
        filter: &PaymentFilter,
        page: PageRequest,
    ) -> Result<PaymentPage, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*)");
        push_payment_conditions(&mut count, filter);

        let mut select = QueryBuilder::new(format!(
            "SELECT {PAYMENT_COLUMNS}, u.address AS unit_address, pt.name AS payment_type_name"
        ));
        push_payment_conditions(&mut select, filter);
        push_payment_ordering(&mut select, filter);

        let mut sums = QueryBuilder::new(
            "SELECT SUM(p.amount) FILTER (WHERE p.paid), SUM(p.amount) FILTER (WHERE NOT p.paid)",
        );
        push_payment_conditions(&mut sums, filter);

        let mut tx = self.begin_snapshot().await?;
        let page = fetch_page_on(&mut tx, count, select, page, |row: PaymentListingRow| {
            row.try_into()
        })
        .await?;
        let (paid, pending): (Option<BigDecimal>, Option<BigDecimal>) =
            sums.build_query_as().fetch_one(&mut *tx).await?;
        tx.commit().await?;

        Ok(PaymentPage {
            page,
            totals: PaymentTotals::from_sums(paid, pending),
        })
    }

    async fn get_payment(&self, id: RecordId) -> Result<Payment, RepositoryError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepositoryError::not_found("payment", id))?
            .try_into()
    }

    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let contract_id: Option<RecordId> = sqlx::query_scalar(&format!(
            "SELECT c.id FROM contracts c {ACTIVE_CONTRACT_FILTER} FOR SHARE"
        ))
        .bind(payment.unit_id)
        .bind(payment.date)
        .fetch_optional(&mut *tx)
        .await?;

        let row: PaymentRow = sqlx::query_as(&format!(
            "INSERT INTO payments AS p \
             (unit_id, contract_id, payment_type_id, date, description, amount, paid, payer) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(payment.unit_id)
        .bind(contract_id)
        .bind(payment.payment_type_id)
        .bind(payment.date)
        .bind(&payment.description)
        .bind(&payment.amount)
        .bind(payment.paid)
        .bind(payment.payer.as_str())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        row.try_into()
    }

    async fn update_payment(
        &self,
        id: RecordId,
        payment: &NewPayment,
    ) -> Result<Payment, RepositoryError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "UPDATE payments AS p SET unit_id = $2, payment_type_id = $3, \
             date = $4, description = $5, amount = $6, paid = $7, payer = $8 \
             WHERE p.id = $1 RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(payment.unit_id)
        .bind(payment.payment_type_id)
        .bind(payment.date)
        .bind(&payment.description)
        .bind(&payment.amount)
        .bind(payment.paid)
        .bind(payment.payer.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepositoryError::not_found("payment", id))?
            .try_into()
    }

    async fn toggle_paid(&self, id: RecordId) -> Result<Payment, RepositoryError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "UPDATE payments AS p SET paid = NOT p.paid WHERE p.id = $1 RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepositoryError::not_found("payment", id))?
            .try_into()
    }

    async fn delete_payment(&self, id: RecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("payment", id));
        }
        Ok(())
    }
}
