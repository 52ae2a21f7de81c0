//! Row types read back from PostgreSQL and their conversion to domain records.
//!
//! Enumerations are stored as lowercase text; a value outside the known set
//! surfaces as `RepositoryError::InvalidValue`.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use property_manager_shared::{
    Contract, ContractListing, Document, Incident, Owner, OwnerSummary, PayerRole, Payment,
    PaymentListing, PaymentType, RecordId, Session, Tenant, TenantListing, Unit, UnitCategory,
    UnitListing,
};

use crate::errors::RepositoryError;

fn category(value: &str) -> Result<UnitCategory, RepositoryError> {
    UnitCategory::parse(value)
        .ok_or_else(|| RepositoryError::invalid_value(format!("unit category {value:?}")))
}

fn payer(value: &str) -> Result<PayerRole, RepositoryError> {
    PayerRole::parse(value)
        .ok_or_else(|| RepositoryError::invalid_value(format!("payer role {value:?}")))
}

#[derive(sqlx::FromRow)]
pub(crate) struct OwnerRow {
    id: RecordId,
    name: String,
    national_id: String,
    phone: String,
    email: String,
    address: String,
}

impl From<OwnerRow> for Owner {
    fn from(row: OwnerRow) -> Self {
        Owner {
            id: row.id,
            name: row.name,
            national_id: row.national_id,
            phone: row.phone,
            email: row.email,
            address: row.address,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct OwnerSummaryRow {
    #[sqlx(flatten)]
    owner: OwnerRow,
    unit_count: i64,
}

impl From<OwnerSummaryRow> for OwnerSummary {
    fn from(row: OwnerSummaryRow) -> Self {
        OwnerSummary {
            owner: row.owner.into(),
            unit_count: row.unit_count,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UnitRow {
    id: RecordId,
    category: String,
    address: String,
    floor: String,
    door: String,
    area: f64,
    rooms: Option<i32>,
    owner_id: RecordId,
}

impl TryFrom<UnitRow> for Unit {
    type Error = RepositoryError;

    fn try_from(row: UnitRow) -> Result<Self, Self::Error> {
        Ok(Unit {
            id: row.id,
            category: category(&row.category)?,
            address: row.address,
            floor: row.floor,
            door: row.door,
            area: row.area,
            rooms: row.rooms,
            owner_id: row.owner_id,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UnitListingRow {
    #[sqlx(flatten)]
    unit: UnitRow,
    owner_name: String,
    rented: bool,
}

impl TryFrom<UnitListingRow> for UnitListing {
    type Error = RepositoryError;

    fn try_from(row: UnitListingRow) -> Result<Self, Self::Error> {
        Ok(UnitListing {
            unit: row.unit.try_into()?,
            owner_name: row.owner_name,
            rented: row.rented,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TenantRow {
    id: RecordId,
    name: String,
    national_id: String,
    phone: String,
    email: String,
    unit_id: Option<RecordId>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            name: row.name,
            national_id: row.national_id,
            phone: row.phone,
            email: row.email,
            unit_id: row.unit_id,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TenantListingRow {
    #[sqlx(flatten)]
    tenant: TenantRow,
    unit_address: Option<String>,
    unit_category: Option<String>,
}

impl TryFrom<TenantListingRow> for TenantListing {
    type Error = RepositoryError;

    fn try_from(row: TenantListingRow) -> Result<Self, Self::Error> {
        Ok(TenantListing {
            tenant: row.tenant.into(),
            unit_address: row.unit_address,
            unit_category: row.unit_category.as_deref().map(category).transpose()?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ContractRow {
    id: RecordId,
    unit_id: RecordId,
    owner_id: RecordId,
    tenant_ids: Vec<RecordId>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    monthly_price: BigDecimal,
    terms: String,
}

impl From<ContractRow> for Contract {
    fn from(row: ContractRow) -> Self {
        Contract {
            id: row.id,
            unit_id: row.unit_id,
            owner_id: row.owner_id,
            tenant_ids: row.tenant_ids,
            start_date: row.start_date,
            end_date: row.end_date,
            monthly_price: row.monthly_price,
            terms: row.terms,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ContractListingRow {
    #[sqlx(flatten)]
    contract: ContractRow,
    unit_category: String,
    unit_address: String,
    unit_floor: String,
    unit_door: String,
    owner_name: String,
    tenant_names: Vec<String>,
}

impl TryFrom<ContractListingRow> for ContractListing {
    type Error = RepositoryError;

    fn try_from(row: ContractListingRow) -> Result<Self, Self::Error> {
        Ok(ContractListing {
            unit_label: Unit::label(
                category(&row.unit_category)?,
                &row.unit_address,
                &row.unit_floor,
                &row.unit_door,
            ),
            contract: row.contract.into(),
            owner_name: row.owner_name,
            tenant_names: row.tenant_names,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PaymentTypeRow {
    id: RecordId,
    name: String,
    description: String,
    default_payer: Option<String>,
    active: bool,
    created_by: Option<String>,
    updated_by: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentTypeRow> for PaymentType {
    type Error = RepositoryError;

    fn try_from(row: PaymentTypeRow) -> Result<Self, Self::Error> {
        Ok(PaymentType {
            id: row.id,
            name: row.name,
            description: row.description,
            default_payer: row.default_payer.as_deref().map(payer).transpose()?,
            active: row.active,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PaymentRow {
    id: RecordId,
    unit_id: RecordId,
    contract_id: Option<RecordId>,
    payment_type_id: RecordId,
    date: NaiveDate,
    description: String,
    amount: BigDecimal,
    paid: bool,
    payer: String,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepositoryError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            unit_id: row.unit_id,
            contract_id: row.contract_id,
            payment_type_id: row.payment_type_id,
            date: row.date,
            description: row.description,
            amount: row.amount,
            paid: row.paid,
            payer: payer(&row.payer)?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PaymentListingRow {
    #[sqlx(flatten)]
    payment: PaymentRow,
    unit_address: String,
    payment_type_name: String,
}

impl TryFrom<PaymentListingRow> for PaymentListing {
    type Error = RepositoryError;

    fn try_from(row: PaymentListingRow) -> Result<Self, Self::Error> {
        Ok(PaymentListing {
            payment: row.payment.try_into()?,
            unit_address: row.unit_address,
            payment_type_name: row.payment_type_name,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct IncidentRow {
    id: RecordId,
    unit_id: RecordId,
    description: String,
    status: String,
    reported_on: NaiveDate,
    resolved_on: Option<NaiveDate>,
}

impl From<IncidentRow> for Incident {
    fn from(row: IncidentRow) -> Self {
        Incident {
            id: row.id,
            unit_id: row.unit_id,
            description: row.description,
            status: row.status,
            reported_on: row.reported_on,
            resolved_on: row.resolved_on,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct DocumentRow {
    id: RecordId,
    unit_id: RecordId,
    description: String,
    file_path: String,
    uploaded_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            unit_id: row.unit_id,
            description: row.description,
            file_path: row.file_path,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SessionRow {
    token: String,
    username: String,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            token: row.token,
            username: row.username,
            expires_at: row.expires_at,
        }
    }
}
