//! Student dashboard: own enrolled courses and the request-course dialog.

use super::{load_into, CancelHandle, Dialog, Resource, ViewScope};
use crate::error::Result;
use crate::interface::RequestApi;
use crate::model::dtos::CourseClaim;
use crate::session::SessionContext;

pub struct StudentPage<A: RequestApi> {
    api: A,
    ctx: SessionContext,
    scope: ViewScope,
    courses: Resource<Vec<String>>,
    request_dialog: Dialog,
}

impl<A: RequestApi> StudentPage<A> {
    pub fn new(api: A, ctx: SessionContext) -> Self {
        Self {
            api,
            ctx,
            scope: ViewScope::new(),
            courses: Resource::default(),
            request_dialog: Dialog::default(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn courses(&self) -> &Resource<Vec<String>> {
        &self.courses
    }

    pub fn request_dialog(&self) -> &Dialog {
        &self.request_dialog
    }

    pub fn request_dialog_mut(&mut self) -> &mut Dialog {
        &mut self.request_dialog
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.scope.handle()
    }

    pub async fn mount(&mut self) -> Result<()> {
        self.fetch_courses().await
    }

    /// Cancels whatever is still in flight; later results are dropped.
    pub fn unmount(&mut self) {
        self.scope.cancel();
    }

    pub async fn fetch_courses(&mut self) -> Result<()> {
        let token = self.ctx.bearer()?;
        load_into(
            &self.scope,
            &mut self.courses,
            "fetching student courses",
            self.api.get_student_courses(token, self.ctx.username()),
        )
        .await
    }

    pub fn open_request_dialog(&mut self) {
        self.request_dialog.open();
    }

    pub fn cancel_request_dialog(&mut self) {
        self.request_dialog.cancel();
    }

    /// Sends the typed course as an enrollment request, then closes the
    /// dialog and reloads the course list.
    pub async fn submit_course_request(&mut self) -> Result<()> {
        let course = self.request_dialog.submission()?;
        let token = self.ctx.bearer()?;

        let claim = CourseClaim {
            username: self.ctx.username(),
            course: &course,
        };
        self.scope
            .run(self.api.request_course(token, claim))
            .await
            .and_then(|r| r)
            .map_err(|e| {
                log::error!("Error requesting course: {e}");
                e
            })?;

        log::info!("Course {course} requested");
        self.request_dialog.close();
        self.fetch_courses().await
    }
}
