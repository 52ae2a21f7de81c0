use chrono::NaiveDate;
use property_manager_shared::views::{PaymentListView, RecordListView, UnitListView};
use property_manager_shared::{
    ContractCriteria, ContractListing, Document, DocumentCriteria, Incident, IncidentCriteria,
    ListParams, OwnerCriteria, OwnerSummary, PageRequest, PaymentFilter, PaymentPage,
    PaymentType, PaymentTypeCriteria, TenantCriteria, TenantListing, UnitFilter,
};
use tracing::debug;

use super::PropertyService;
use crate::errors::ServiceError;

impl PropertyService {
    fn page_request(&self, params: &ListParams, size: u64) -> PageRequest {
        PageRequest::from_param(params.get("page"), size)
    }

    /// The unit list: filtered, sorted and paginated, each unit flagged as
    /// rented when a contract covers `today`.
    pub async fn list_units(
        &self,
        params: &ListParams,
        today: NaiveDate,
    ) -> Result<UnitListView, ServiceError> {
        let filter = UnitFilter::from_params(params);
        let request = self.page_request(params, self.config.unit_page_size);
        let page = self.store.list_units(&filter, today, request).await?;
        debug!(
            total = page.total_items,
            page = page.number,
            "Listed units"
        );
        Ok(UnitListView::new(page, params, filter.ordering.as_param()))
    }

    /// The payment list with totals over every matching payment.
    ///
    /// A `payment_type` value that is not an integer matches nothing; the
    /// totals are then all zero.
    pub async fn list_payments(&self, params: &ListParams) -> Result<PaymentListView, ServiceError> {
        let filter = PaymentFilter::from_params(params);
        let request = self.page_request(params, self.config.payment_page_size);
        let PaymentPage { page, totals } = self.store.list_payments(&filter, request).await?;
        let payment_types = self.store.active_payment_types().await?;
        debug!(
            total = page.total_items,
            page = page.number,
            unsatisfiable = filter.is_unsatisfiable(),
            "Listed payments"
        );
        Ok(PaymentListView::new(
            page,
            totals,
            params,
            filter.ordering.as_param(),
            payment_types,
        ))
    }

    pub async fn list_owners(
        &self,
        params: &ListParams,
    ) -> Result<RecordListView<OwnerSummary>, ServiceError> {
        let criteria = OwnerCriteria::from_params(params);
        let request = self.page_request(params, self.config.record_page_size);
        let page = self.store.list_owners(&criteria, request).await?;
        Ok(RecordListView::new(page, params, OwnerCriteria::KEYS))
    }

    pub async fn list_tenants(
        &self,
        params: &ListParams,
    ) -> Result<RecordListView<TenantListing>, ServiceError> {
        let criteria = TenantCriteria::from_params(params);
        let request = self.page_request(params, self.config.record_page_size);
        let page = self.store.list_tenants(&criteria, request).await?;
        Ok(RecordListView::new(page, params, TenantCriteria::KEYS))
    }

    pub async fn list_contracts(
        &self,
        params: &ListParams,
    ) -> Result<RecordListView<ContractListing>, ServiceError> {
        let criteria = ContractCriteria::from_params(params);
        let request = self.page_request(params, self.config.record_page_size);
        let page = self.store.list_contracts(&criteria, request).await?;
        Ok(RecordListView::new(page, params, ContractCriteria::KEYS))
    }

    pub async fn list_payment_types(
        &self,
        params: &ListParams,
    ) -> Result<RecordListView<PaymentType>, ServiceError> {
        let criteria = PaymentTypeCriteria::from_params(params);
        let request = self.page_request(params, self.config.record_page_size);
        let page = self.store.list_payment_types(&criteria, request).await?;
        Ok(RecordListView::new(page, params, PaymentTypeCriteria::KEYS))
    }

    pub async fn list_incidents(
        &self,
        params: &ListParams,
    ) -> Result<RecordListView<Incident>, ServiceError> {
        let criteria = IncidentCriteria::from_params(params);
        let request = self.page_request(params, self.config.record_page_size);
        let page = self.store.list_incidents(&criteria, request).await?;
        Ok(RecordListView::new(page, params, IncidentCriteria::KEYS))
    }

    pub async fn list_documents(
        &self,
        params: &ListParams,
    ) -> Result<RecordListView<Document>, ServiceError> {
        let criteria = DocumentCriteria::from_params(params);
        let request = self.page_request(params, self.config.record_page_size);
        let page = self.store.list_documents(&criteria, request).await?;
        Ok(RecordListView::new(page, params, DocumentCriteria::KEYS))
    }
}
