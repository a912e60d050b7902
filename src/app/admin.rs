//! Admin dashboard: request queue, student roster, course catalog.
//!
//! Whoever mounts this controller has already decided the user is an admin;
//! it does not check the role itself. The server rejects non-admin tokens.

use super::{load_into, CancelHandle, Dialog, Resource, Roster, Sequence, ViewScope};
use crate::error::Result;
use crate::interface::RequestApi;
use crate::model::dtos::{CourseClaim, NewCourse, VerificationUpdate};
use crate::model::structs::{Course, CourseUpdateRequest, StudentDetails};
use crate::session::SessionContext;
use futures::stream::{FuturesUnordered, StreamExt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminMenu {
    #[default]
    Requests,
    Students,
    Courses,
}

pub struct AdminPage<A: RequestApi> {
    api: A,
    ctx: SessionContext,
    scope: ViewScope,
    menu: AdminMenu,
    requests: Resource<Vec<CourseUpdateRequest>>,
    roster: Resource<Roster>,
    roster_seq: Sequence,
    selected_student: Resource<StudentDetails>,
    catalog: Resource<Vec<Course>>,
    add_course_dialog: Dialog,
}

impl<A: RequestApi> AdminPage<A> {
    pub fn new(api: A, ctx: SessionContext) -> Self {
        Self {
            api,
            ctx,
            scope: ViewScope::new(),
            menu: AdminMenu::default(),
            requests: Resource::default(),
            roster: Resource::default(),
            roster_seq: Sequence::default(),
            selected_student: Resource::default(),
            catalog: Resource::default(),
            add_course_dialog: Dialog::default(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn menu(&self) -> AdminMenu {
        self.menu
    }

    pub fn set_menu(&mut self, menu: AdminMenu) {
        self.menu = menu;
    }

    pub fn requests(&self) -> &Resource<Vec<CourseUpdateRequest>> {
        &self.requests
    }

    /// Requests still showing Approve/Deny.
    pub fn pending_requests(&self) -> impl Iterator<Item = &CourseUpdateRequest> {
        self.requests.items().iter().filter(|r| r.is_pending())
    }

    pub fn can_review(&self, request: &CourseUpdateRequest) -> bool {
        request.is_pending()
    }

    pub fn roster(&self) -> &Resource<Roster> {
        &self.roster
    }

    pub fn selected_student(&self) -> &Resource<StudentDetails> {
        &self.selected_student
    }

    pub fn catalog(&self) -> &Resource<Vec<Course>> {
        &self.catalog
    }

    pub fn add_course_dialog(&self) -> &Dialog {
        &self.add_course_dialog
    }

    pub fn add_course_dialog_mut(&mut self) -> &mut Dialog {
        &mut self.add_course_dialog
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.scope.handle()
    }

    /// Loads every data source. They are independent: one failing does not
    /// stop the others, and the first error is returned.
    pub async fn mount(&mut self) -> Result<()> {
        let requests = self.fetch_course_requests().await;
        let students = self.fetch_students().await;
        let catalog = self.fetch_courses().await;
        requests.and(students).and(catalog)
    }

    pub fn unmount(&mut self) {
        self.scope.cancel();
    }

    pub async fn fetch_course_requests(&mut self) -> Result<()> {
        let token = self.ctx.bearer()?;
        load_into(
            &self.scope,
            &mut self.requests,
            "fetching course requests",
            self.api.get_course_requests(token),
        )
        .await
    }

    /// Loads the roster, then every student's courses concurrently.
    ///
    /// The roster is marked populated as soon as it arrives; course lists
    /// fill in as their requests complete. A failed course fetch is logged
    /// and leaves that student's entry as it was.
    pub async fn fetch_students(&mut self) -> Result<()> {
        let Self {
            api,
            ctx,
            scope,
            roster,
            roster_seq,
            ..
        } = self;
        let api: &A = api;
        let token = ctx.bearer()?;

        let listing_seq = roster_seq.issue();
        roster.begin();
        let students = match scope.run(api.get_students(token)).await.and_then(|r| r) {
            Ok(students) => students,
            Err(e) if e.is_cancelled() => {
                roster.abandon();
                return Err(e);
            }
            Err(e) => {
                log::error!("Error fetching students: {e}");
                roster.reject(&e);
                return Err(e);
            }
        };

        let usernames: Vec<String> = students.iter().map(|s| s.username.clone()).collect();
        roster
            .get_or_default_mut()
            .replace_students(listing_seq, students);
        roster.mark_populated();

        let mut enrichment: FuturesUnordered<_> = usernames
            .iter()
            .map(|username| {
                let seq = roster_seq.issue();
                async move {
                    let courses = api.get_student_courses(token, username).await;
                    (username.as_str(), seq, courses)
                }
            })
            .collect();

        while let Some((username, seq, courses)) = scope.run(enrichment.next()).await? {
            match courses {
                Ok(courses) => {
                    if let Some(roster) = roster.get_mut() {
                        roster.apply_courses(username, seq, courses);
                    }
                }
                Err(e) => log::error!("Error fetching courses for student {username}: {e}"),
            }
        }

        Ok(())
    }

    /// Re-reads one student's courses into the roster. Before the roster
    /// has loaded there is nothing to merge into and the result is dropped.
    pub async fn refresh_student_courses(&mut self, username: &str) -> Result<()> {
        let token = self.ctx.bearer()?;
        let seq = self.roster_seq.issue();

        let courses = self
            .scope
            .run(self.api.get_student_courses(token, username))
            .await
            .and_then(|r| r)
            .map_err(|e| {
                log::error!("Error fetching courses for student {username}: {e}");
                e
            })?;

        match self.roster.get_mut() {
            Some(roster) => {
                roster.apply_courses(username, seq, courses);
            }
            None => log::debug!("No roster loaded yet, dropping courses for {username}"),
        }
        Ok(())
    }

    /// Shows one student's details, replacing whichever was selected.
    pub async fn select_student(&mut self, username: &str) -> Result<()> {
        let token = self.ctx.bearer()?;
        load_into(
            &self.scope,
            &mut self.selected_student,
            "fetching student details",
            self.api.get_student_details(token, username),
        )
        .await
    }

    pub async fn fetch_courses(&mut self) -> Result<()> {
        let token = self.ctx.bearer()?;
        load_into(
            &self.scope,
            &mut self.catalog,
            "fetching courses",
            self.api.get_courses(token),
        )
        .await
    }

    /// Records the decision and reloads the request queue.
    pub async fn set_verification(
        &mut self,
        username: &str,
        course: &str,
        verified: bool,
    ) -> Result<()> {
        let token = self.ctx.bearer()?;
        let update = VerificationUpdate {
            username,
            course,
            verified,
        };

        let what = if verified { "approving" } else { "denying" };
        self.scope
            .run(self.api.update_course_verification(token, update))
            .await
            .and_then(|r| r)
            .map_err(|e| {
                log::error!("Error {what} course request: {e}");
                e
            })?;

        log::info!("Course request {username}/{course} verified={verified}");
        self.fetch_course_requests().await
    }

    pub async fn approve(&mut self, username: &str, course: &str) -> Result<()> {
        self.set_verification(username, course, true).await
    }

    pub async fn deny(&mut self, username: &str, course: &str) -> Result<()> {
        self.set_verification(username, course, false).await
    }

    pub fn open_add_course_dialog(&mut self) {
        self.add_course_dialog.open();
    }

    pub fn cancel_add_course_dialog(&mut self) {
        self.add_course_dialog.cancel();
    }

    /// Creates the typed course, closes the dialog and reloads the catalog.
    pub async fn submit_new_course(&mut self) -> Result<()> {
        let name = self.add_course_dialog.submission()?;
        let token = self.ctx.bearer()?;

        self.scope
            .run(self.api.create_course(token, NewCourse { name: &name }))
            .await
            .and_then(|r| r)
            .map_err(|e| {
                log::error!("Error adding course: {e}");
                e
            })?;

        log::info!("Course {name} added");
        self.add_course_dialog.close();
        self.fetch_courses().await
    }

    pub async fn delete_course(&mut self, name: &str) -> Result<()> {
        let token = self.ctx.bearer()?;
        self.scope
            .run(self.api.delete_course(token, name))
            .await
            .and_then(|r| r)
            .map_err(|e| {
                log::error!("Error deleting course: {e}");
                e
            })?;

        log::info!("Course {name} deleted");
        self.fetch_courses().await
    }

    /// Removes an enrolled course from a student and refreshes what the
    /// dashboard shows for that student.
    pub async fn drop_student_course(&mut self, username: &str, course: &str) -> Result<()> {
        let token = self.ctx.bearer()?;
        self.scope
            .run(
                self.api
                    .drop_student_course(token, CourseClaim { username, course }),
            )
            .await
            .and_then(|r| r)
            .map_err(|e| {
                log::error!("Error dropping course: {e}");
                e
            })?;

        log::info!("Course {course} dropped for {username}");
        self.refresh_student_courses(username).await?;

        let selected = self
            .selected_student
            .get()
            .is_some_and(|s| s.username == username);
        if selected {
            self.select_student(username).await?;
        }
        Ok(())
    }
}
