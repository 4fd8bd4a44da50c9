//! Reporting endpoints, read-only.

use crate::api::client::ApiClient;
use crate::errors::ClientError;
use crate::models::all_models::{
    AppointmentsByTypeReport, DepartmentRevenueReport, OverviewReport, PatientStatsReport,
    RevenueReport,
};

impl ApiClient {
    pub async fn revenue_report(&self) -> Result<RevenueReport, ClientError> {
        self.get("/reports/revenue").await
    }

    pub async fn patient_stats_report(&self) -> Result<PatientStatsReport, ClientError> {
        self.get("/reports/patients").await
    }

    pub async fn department_revenue_report(&self) -> Result<DepartmentRevenueReport, ClientError> {
        self.get("/reports/department-revenue").await
    }

    pub async fn appointments_by_type_report(
        &self,
    ) -> Result<AppointmentsByTypeReport, ClientError> {
        self.get("/reports/appointments-by-type").await
    }

    pub async fn overview_report(&self) -> Result<OverviewReport, ClientError> {
        self.get("/reports/overview").await
    }
}
