use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

//  USER & AUTHENTICATION STRUCTS
#[derive(
    Debug, Serialize, Deserialize, Display, EnumString, EnumIter, PartialEq, Eq, Hash, Clone, Copy,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    Patient,
    Pharmacist,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Identity {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_approved: bool,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
}

impl Identity {
    /// Patients are usable immediately; every other role waits for an
    /// administrator to flip the approval flag.
    pub fn needs_approval(&self) -> bool {
        self.role != UserRole::Patient && !self.is_approved
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: Identity,
}

//  NOTICES

#[derive(Debug, Serialize, Deserialize, Display, EnumString, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// An ephemeral, role-targeted message shown in the notification dropdown.
/// Never mutated after creation and never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notice {
    pub id: i64,
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub for_roles: Vec<UserRole>,
    pub created_at: DateTime<Utc>,
}

//  APPOINTMENTS

#[derive(Debug, Serialize, Deserialize, Display, EnumString, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Appointment {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub fee: Option<f64>,
}

impl Appointment {
    /// Canonical visibility rule: match by id only.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.patient_id == user_id || self.doctor_id == user_id
    }
}

//  PRESCRIPTIONS

#[derive(Debug, Serialize, Deserialize, Display, EnumString, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrescriptionStatus {
    Active,
    Dispensed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MedicationItem {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub quantity: u32,
}

impl MedicationItem {
    /// A row is complete when it at least names the drug and its dosage.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.dosage.trim().is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Prescription {
    pub prescription_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub diagnosis: String,
    pub medications: Vec<MedicationItem>,
    pub status: PrescriptionStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Prescription {
    /// Canonical visibility rule: match by id only.
    pub fn belongs_to(&self, patient_id: Uuid) -> bool {
        self.patient_id == patient_id
    }
}

//  INVENTORY

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InventoryItem {
    pub item_id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub expiry_date: Option<NaiveDate>,
    pub reorder_level: i64,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

//  REPORTS

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RevenueReport {
    pub total_revenue: f64,
    pub monthly: Vec<MonthlyRevenue>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PatientStatsReport {
    pub total_patients: i64,
    pub new_this_month: i64,
    pub by_gender: Vec<CountBucket>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DepartmentRevenueReport {
    pub departments: Vec<DepartmentRevenue>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DepartmentRevenue {
    pub department: String,
    pub revenue: f64,
    pub appointment_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppointmentsByTypeReport {
    pub buckets: Vec<CountBucket>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CountBucket {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OverviewReport {
    pub total_patients: i64,
    pub total_doctors: i64,
    pub total_appointments: i64,
    pub total_revenue: f64,
    pub pending_approvals: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Doctor).unwrap(),
            "\"doctor\""
        );
        assert_eq!(UserRole::Pharmacist.to_string(), "pharmacist");
    }

    #[test]
    fn role_enumeration_is_complete() {
        let all: Vec<UserRole> = UserRole::iter().collect();
        assert_eq!(all.len(), 4);
        assert!(all.contains(&UserRole::Admin));
        assert!(all.contains(&UserRole::Patient));
    }

    #[test]
    fn patients_never_need_approval() {
        let patient = Identity {
            user_id: Uuid::new_v4(),
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            role: UserRole::Patient,
            is_approved: false,
            specialization: None,
            license_number: None,
        };
        assert!(!patient.needs_approval());
    }

    #[test]
    fn unapproved_doctor_needs_approval() {
        let doctor = Identity {
            user_id: Uuid::new_v4(),
            name: "Dr. Smith".into(),
            email: "smith@example.com".into(),
            role: UserRole::Doctor,
            is_approved: false,
            specialization: Some("Cardiology".into()),
            license_number: Some("MD-1042".into()),
        };
        assert!(doctor.needs_approval());
    }

    #[test]
    fn incomplete_medication_row_detected() {
        let row = MedicationItem {
            name: "Amoxicillin".into(),
            dosage: "".into(),
            frequency: "twice daily".into(),
            duration: "7 days".into(),
            quantity: 14,
        };
        assert!(!row.is_complete());
    }
}
