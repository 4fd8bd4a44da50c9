//! Centralized notification emission.
//!
//! One function per domain event, each choosing its role targets
//! deliberately. Staff and patient get separately phrased notices about
//! the same fact: staff messages reference the patient by name, patient
//! messages reference the doctor. Broadcasting to all roles is reserved
//! for screen-navigation announcements.

use crate::handlers::notifications::{NoticeDraft, NotificationStore};
use crate::models::all_models::{
    Appointment, AppointmentStatus, Identity, InventoryItem, NoticeKind, Prescription, UserRole,
};

/// Emits the staff-facing and patient-facing notices for a status change.
pub fn appointment_status_changed(store: &NotificationStore, appointment: &Appointment) {
    let (kind, staff_verb, patient_verb) = match appointment.status {
        AppointmentStatus::Confirmed => (NoticeKind::Success, "confirmed", "confirmed"),
        AppointmentStatus::Completed => (NoticeKind::Success, "completed", "completed"),
        AppointmentStatus::Cancelled => (NoticeKind::Error, "cancelled", "cancelled"),
        AppointmentStatus::Pending => (NoticeKind::Info, "moved back to pending", "pending"),
    };

    store.add(
        NoticeDraft::new(
            kind,
            format!("Appointment {}", appointment.status),
            format!(
                "Appointment with {} on {} was {}",
                appointment.patient_name, appointment.date, staff_verb
            ),
        )
        .for_roles(vec![UserRole::Doctor, UserRole::Admin]),
    );

    store.add(
        NoticeDraft::new(
            kind,
            format!("Appointment {}", appointment.status),
            format!(
                "Your appointment with {} on {} is {}",
                appointment.doctor_name, appointment.date, patient_verb
            ),
        )
        .for_roles(vec![UserRole::Patient]),
    );
}

pub fn appointment_booked(store: &NotificationStore, appointment: &Appointment) {
    store.add(
        NoticeDraft::new(
            NoticeKind::Info,
            "New appointment request",
            format!(
                "{} requested {} on {}",
                appointment.patient_name, appointment.time_slot, appointment.date
            ),
        )
        .for_roles(vec![UserRole::Doctor, UserRole::Admin]),
    );

    store.add(
        NoticeDraft::new(
            NoticeKind::Success,
            "Appointment requested",
            format!(
                "Your appointment request with {} for {} was submitted",
                appointment.doctor_name, appointment.date
            ),
        )
        .for_roles(vec![UserRole::Patient]),
    );
}

pub fn prescription_created(store: &NotificationStore, prescription: &Prescription) {
    store.add(
        NoticeDraft::new(
            NoticeKind::Info,
            "New prescription",
            format!(
                "{} issued a prescription for {}",
                prescription.doctor_name, prescription.patient_name
            ),
        )
        .for_roles(vec![UserRole::Pharmacist, UserRole::Admin]),
    );

    store.add(
        NoticeDraft::new(
            NoticeKind::Success,
            "Prescription ready",
            format!("{} has written you a new prescription", prescription.doctor_name),
        )
        .for_roles(vec![UserRole::Patient]),
    );
}

pub fn prescription_dispensed(store: &NotificationStore, prescription: &Prescription) {
    store.add(
        NoticeDraft::new(
            NoticeKind::Success,
            "Prescription dispensed",
            format!("Prescription for {} was dispensed", prescription.patient_name),
        )
        .for_roles(vec![UserRole::Pharmacist, UserRole::Admin]),
    );

    store.add(
        NoticeDraft::new(
            NoticeKind::Success,
            "Medication ready",
            "Your medication has been dispensed and is ready for pickup",
        )
        .for_roles(vec![UserRole::Patient]),
    );
}

pub fn inventory_low_stock(store: &NotificationStore, item: &InventoryItem) {
    store.add(
        NoticeDraft::new(
            NoticeKind::Error,
            "Low stock",
            format!(
                "{} is down to {} units (reorder at {})",
                item.name, item.quantity, item.reorder_level
            ),
        )
        .for_roles(vec![UserRole::Pharmacist, UserRole::Admin]),
    );
}

/// A non-patient account registered and awaits review.
pub fn registration_pending(store: &NotificationStore, identity: &Identity) {
    store.add(
        NoticeDraft::new(
            NoticeKind::Info,
            "Approval needed",
            format!("New {} account for {} awaits approval", identity.role, identity.name),
        )
        .for_roles(vec![UserRole::Admin]),
    );
}

/// An administrator approved the account; tell that role's viewers.
pub fn user_approved(store: &NotificationStore, identity: &Identity) {
    store.add(
        NoticeDraft::new(
            NoticeKind::Success,
            "Account approved",
            format!("The account for {} has been approved", identity.name),
        )
        .for_roles(vec![identity.role]),
    );
}

/// Screen-navigation announcement. The only emitter that legitimately
/// broadcasts to every role.
pub fn screen_opened(store: &NotificationStore, screen: &str) {
    store.add(NoticeDraft::new(
        NoticeKind::Info,
        "Navigation",
        format!("Viewing {}", screen),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn cancelled_appointment() -> Appointment {
        Appointment {
            appointment_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            patient_name: "Maria Lopez".into(),
            doctor_id: Uuid::new_v4(),
            doctor_name: "Dr. Chen".into(),
            date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            time_slot: "10:00-10:30".into(),
            status: AppointmentStatus::Cancelled,
            reason: Some("checkup".into()),
            fee: Some(75.0),
        }
    }

    #[test]
    fn cancellation_emits_two_differently_phrased_notices() {
        let store = NotificationStore::new();
        appointment_status_changed(&store, &cancelled_appointment());

        assert_eq!(store.len(), 2);

        let staff = store.visible(Some(UserRole::Doctor));
        assert_eq!(staff.len(), 1);
        assert!(staff[0].message.contains("Maria Lopez"));

        let patient = store.visible(Some(UserRole::Patient));
        assert_eq!(patient.len(), 1);
        assert!(patient[0].message.contains("Dr. Chen"));

        assert!(store.visible(Some(UserRole::Pharmacist)).is_empty());
    }

    #[test]
    fn admin_sees_staff_phrasing_only() {
        let store = NotificationStore::new();
        appointment_status_changed(&store, &cancelled_appointment());

        let admin = store.visible(Some(UserRole::Admin));
        assert_eq!(admin.len(), 1);
        assert!(admin[0].message.contains("Maria Lopez"));
    }

    #[test]
    fn low_stock_targets_pharmacy_staff() {
        let store = NotificationStore::new();
        inventory_low_stock(
            &store,
            &InventoryItem {
                item_id: Uuid::new_v4(),
                name: "Insulin".into(),
                category: "Injectables".into(),
                quantity: 3,
                unit_price: 24.5,
                expiry_date: None,
                reorder_level: 10,
            },
        );

        assert_eq!(store.visible(Some(UserRole::Pharmacist)).len(), 1);
        assert_eq!(store.visible(Some(UserRole::Admin)).len(), 1);
        assert!(store.visible(Some(UserRole::Patient)).is_empty());
    }

    #[test]
    fn screen_opened_broadcasts_to_all_roles() {
        let store = NotificationStore::new();
        screen_opened(&store, "your appointments");

        use strum::IntoEnumIterator;
        for role in UserRole::iter() {
            assert_eq!(store.visible(Some(role)).len(), 1);
        }
    }
}
