//! Composition root: resolves the session and mounts the matching dashboard.
//!
//! This is the only place that branches on role.

use super::{auth, AdminPage, StudentPage};
use crate::error::Result;
use crate::interface::RequestApi;
use crate::session::{Role, SessionContext};
use crate::store::TokenStore;

pub enum MainView<A: RequestApi> {
    SignedOut,
    Student(StudentPage<A>),
    Admin(AdminPage<A>),
}

impl<A: RequestApi> MainView<A> {
    pub fn role(&self) -> Role {
        match self {
            MainView::SignedOut => Role::None,
            MainView::Student(_) => Role::Student,
            MainView::Admin(_) => Role::Admin,
        }
    }
}

pub struct MainPage<A: RequestApi + Clone, S: TokenStore> {
    api: A,
    store: S,
    ctx: SessionContext,
    view: MainView<A>,
}

impl<A: RequestApi + Clone, S: TokenStore> MainPage<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            ctx: SessionContext::signed_out(),
            view: MainView::SignedOut,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn view(&self) -> &MainView<A> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MainView<A> {
        &mut self.view
    }

    /// Reads the stored token and mounts the dashboard for its role.
    ///
    /// A missing token, or one without a usable role, shows the signed-out
    /// view; that is not an error.
    pub async fn mount(&mut self) -> Result<()> {
        self.unmount_view();
        self.ctx = SessionContext::load(&self.store)?;

        self.view = match self.ctx.role() {
            Role::Admin => MainView::Admin(AdminPage::new(self.api.clone(), self.ctx.clone())),
            Role::Student => {
                MainView::Student(StudentPage::new(self.api.clone(), self.ctx.clone()))
            }
            Role::None => {
                if self.ctx.is_signed_in() {
                    log::warn!("Stored token carries no usable role, showing signed-out view");
                }
                MainView::SignedOut
            }
        };

        match &mut self.view {
            MainView::Admin(page) => page.mount().await,
            MainView::Student(page) => page.mount().await,
            MainView::SignedOut => Ok(()),
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        auth::login(&self.api, &self.store, username, password).await?;
        self.mount().await
    }

    /// Cancels the mounted dashboard's requests and forgets the token.
    pub fn logout(&mut self) -> Result<()> {
        self.unmount_view();
        self.ctx = auth::logout(&self.store)?;
        Ok(())
    }

    fn unmount_view(&mut self) {
        match &mut self.view {
            MainView::Admin(page) => page.unmount(),
            MainView::Student(page) => page.unmount(),
            MainView::SignedOut => {}
        }
        self.view = MainView::SignedOut;
    }
}
