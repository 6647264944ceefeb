//! Coordinators that keep the store in step with the backend.
//!
//! DESIGN
//! ======
//! Each coordinator owns an `Arc<dyn ReefApi>` and a `Store` clone, runs in
//! its own tokio task, and writes results through named store actions.
//! `activate()` returns a [`CoordinatorHandle`]; dropping it tears the timer
//! down. Coordinators never deduplicate overlapping requests and never
//! abort one in flight.

pub mod alerts;
pub mod conditions;
pub mod poller;
pub mod site_detail;

pub use alerts::AlertsCoordinator;
pub use conditions::ConditionsCoordinator;
pub use poller::CoordinatorHandle;
pub use site_detail::SiteDetailCoordinator;
