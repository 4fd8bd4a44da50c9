//! Route guard and per-role capability table.
//!
//! The guard is a pure function of the session state and the route's role
//! allow-list, re-evaluated on every render. Role-to-route and
//! role-to-menu mappings live here as static tables so screens never
//! re-implement their own role checks.

use crate::handlers::session::SessionState;
use crate::models::all_models::UserRole;

/// Outcome of gating one render of a protected screen. Conditions are
/// checked in declaration order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Session not yet resolved. Render a placeholder, never redirect, so
    /// startup hydration cannot flash-redirect to login.
    Loading,
    /// Redirect to the login screen. The attempted route is discarded.
    Unauthenticated,
    /// Fixed informational screen with a back-to-login action that clears
    /// the session. Never redirects on its own.
    PendingApproval,
    /// Fixed access-denied screen. Never redirects.
    ForbiddenRole,
    Allowed,
}

/// Evaluates the guard for one render.
pub fn evaluate(state: &SessionState, allowed_roles: Option<&[UserRole]>) -> RouteOutcome {
    let session = match state {
        SessionState::Loading => return RouteOutcome::Loading,
        SessionState::Anonymous => return RouteOutcome::Unauthenticated,
        SessionState::Active(session) => session,
    };

    if session.identity.needs_approval() {
        return RouteOutcome::PendingApproval;
    }

    if let Some(allowed) = allowed_roles {
        if !allowed.contains(&session.identity.role) {
            return RouteOutcome::ForbiddenRole;
        }
    }

    RouteOutcome::Allowed
}

//  CAPABILITY TABLE

/// Routes each role may open. Consumed by `evaluate_path` and by the
/// navigation menu instead of ad hoc per-screen role checks.
pub fn allowed_routes(role: UserRole) -> &'static [&'static str] {
    match role {
        UserRole::Admin => &[
            "/dashboard",
            "/users",
            "/approvals",
            "/appointments",
            "/prescriptions",
            "/inventory",
            "/reports",
            "/profile",
        ],
        UserRole::Doctor => &[
            "/dashboard",
            "/appointments",
            "/patients",
            "/prescriptions",
            "/profile",
        ],
        UserRole::Patient => &[
            "/dashboard",
            "/appointments",
            "/prescriptions",
            "/profile",
        ],
        UserRole::Pharmacist => &[
            "/dashboard",
            "/prescriptions",
            "/inventory",
            "/profile",
        ],
    }
}

/// Menu entries shown to each role, in display order.
pub fn menu_entries(role: UserRole) -> &'static [&'static str] {
    match role {
        UserRole::Admin => &[
            "Dashboard",
            "Users",
            "Approvals",
            "Appointments",
            "Inventory",
            "Reports",
        ],
        UserRole::Doctor => &["Dashboard", "Appointments", "Patients", "Prescriptions"],
        UserRole::Patient => &["Dashboard", "Appointments", "Prescriptions"],
        UserRole::Pharmacist => &["Dashboard", "Prescriptions", "Inventory"],
    }
}

/// Guard applied by path instead of an explicit allow-list: the allow-list
/// is derived from the capability table, then fed through `evaluate` so
/// the precedence ladder exists in exactly one place.
pub fn evaluate_path(state: &SessionState, path: &str) -> RouteOutcome {
    use strum::IntoEnumIterator;

    let allowed: Vec<UserRole> = UserRole::iter()
        .filter(|role| allowed_routes(*role).contains(&path))
        .collect();
    evaluate(state, Some(&allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::session::ActiveSession;
    use crate::models::all_models::Identity;
    use uuid::Uuid;

    fn active(role: UserRole, approved: bool) -> SessionState {
        SessionState::Active(ActiveSession {
            identity: Identity {
                user_id: Uuid::new_v4(),
                name: "Test User".into(),
                email: "user@carelink.test".into(),
                role,
                is_approved: approved,
                specialization: None,
                license_number: None,
            },
            token: "tok".into(),
        })
    }

    #[test]
    fn anonymous_is_unauthenticated_regardless_of_allow_list() {
        assert_eq!(
            evaluate(&SessionState::Anonymous, None),
            RouteOutcome::Unauthenticated
        );
        assert_eq!(
            evaluate(&SessionState::Anonymous, Some(&[UserRole::Admin])),
            RouteOutcome::Unauthenticated
        );
    }

    #[test]
    fn loading_takes_precedence_over_everything() {
        assert_eq!(
            evaluate(&SessionState::Loading, Some(&[UserRole::Doctor])),
            RouteOutcome::Loading
        );
    }

    #[test]
    fn unapproved_doctor_is_pending_even_on_doctor_routes() {
        assert_eq!(
            evaluate(&active(UserRole::Doctor, false), Some(&[UserRole::Doctor])),
            RouteOutcome::PendingApproval
        );
    }

    #[test]
    fn patient_is_never_pending_approval() {
        assert_eq!(
            evaluate(&active(UserRole::Patient, false), None),
            RouteOutcome::Allowed
        );
        assert_eq!(
            evaluate(&active(UserRole::Patient, true), None),
            RouteOutcome::Allowed
        );
    }

    #[test]
    fn approved_admin_forbidden_on_doctor_only_route() {
        assert_eq!(
            evaluate(&active(UserRole::Admin, true), Some(&[UserRole::Doctor])),
            RouteOutcome::ForbiddenRole
        );
    }

    #[test]
    fn allow_list_absent_means_any_authenticated_approved_role() {
        assert_eq!(
            evaluate(&active(UserRole::Pharmacist, true), None),
            RouteOutcome::Allowed
        );
    }

    #[test]
    fn capability_table_gates_paths() {
        let admin = active(UserRole::Admin, true);
        assert_eq!(evaluate_path(&admin, "/reports"), RouteOutcome::Allowed);

        let patient = active(UserRole::Patient, true);
        assert_eq!(
            evaluate_path(&patient, "/inventory"),
            RouteOutcome::ForbiddenRole
        );
        assert_eq!(
            evaluate_path(&patient, "/appointments"),
            RouteOutcome::Allowed
        );
    }

    #[test]
    fn path_guard_follows_the_same_precedence_ladder() {
        assert_eq!(
            evaluate_path(&SessionState::Loading, "/dashboard"),
            RouteOutcome::Loading
        );
        assert_eq!(
            evaluate_path(&SessionState::Anonymous, "/dashboard"),
            RouteOutcome::Unauthenticated
        );
        assert_eq!(
            evaluate_path(&active(UserRole::Doctor, false), "/appointments"),
            RouteOutcome::PendingApproval
        );
        // A path no role owns denies everyone, authenticated or not.
        assert_eq!(
            evaluate_path(&active(UserRole::Admin, true), "/no-such-screen"),
            RouteOutcome::ForbiddenRole
        );
    }

    #[test]
    fn every_role_gets_a_dashboard() {
        use strum::IntoEnumIterator;
        for role in UserRole::iter() {
            assert!(allowed_routes(role).contains(&"/dashboard"));
            assert!(menu_entries(role).contains(&"Dashboard"));
        }
    }
}
