//! Application module - the dashboards without their rendering
//!
//! Each controller owns its local state, one [`Resource`] per data source,
//! and talks to the API through a [`RequestApi`](crate::interface::RequestApi)
//! implementation. [`MainPage`] resolves the session and mounts the admin or
//! student controller.

pub mod admin;
pub mod auth;
pub mod dialog;
pub mod main_page;
pub mod roster;
pub mod scope;
pub mod state;
pub mod student;

pub use admin::{AdminMenu, AdminPage};
pub use dialog::Dialog;
pub use main_page::{MainPage, MainView};
pub use roster::{Roster, Sequence};
pub use scope::{CancelHandle, ViewScope};
pub use state::{LoadState, Resource};
pub use student::StudentPage;

use crate::error::Result;
use std::future::Future;

/// Runs one fetch inside `scope` and records the outcome in `resource`.
pub(crate) async fn load_into<T, F>(
    scope: &ViewScope,
    resource: &mut Resource<T>,
    what: &str,
    fetch: F,
) -> Result<()>
where
    F: Future<Output = Result<T>>,
{
    resource.begin();
    match scope.run(fetch).await.and_then(|r| r) {
        Ok(data) => {
            resource.resolve(data);
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            resource.abandon();
            Err(e)
        }
        Err(e) => {
            log::error!("Error {what}: {e}");
            resource.reject(&e);
            Err(e)
        }
    }
}
