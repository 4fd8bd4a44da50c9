//! Client core for the CareLink healthcare administration app.
//!
//! Everything the UI layer calls into lives here: the session store, the
//! role-scoped notification store, the route guard and capability table,
//! the normalized entity cache, and the typed REST client for the
//! external CareLink API.

pub mod api;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod storage;

pub use api::ApiClient;
pub use errors::ClientError;
pub use handlers::cache::EntityCache;
pub use handlers::guard::{evaluate, evaluate_path, RouteOutcome};
pub use handlers::notifications::{NoticeDraft, NotificationStore};
pub use handlers::session::{SessionState, SessionStore};
pub use models::all_models::{Identity, Notice, NoticeKind, UserRole};
