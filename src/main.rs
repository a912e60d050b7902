use std::path::PathBuf;

use clap::{Parser, Subcommand};
use course_desk::app::{auth, AdminPage, MainPage, MainView, Roster, StudentPage};
use course_desk::config::Config;
use course_desk::error::{ErrorKind, Result};
use course_desk::interface::HttpClient;
use course_desk::model::structs::{Course, CourseUpdateRequest, StudentDetails};
use course_desk::session::{Role, SessionContext};
use course_desk::store::{FileTokenStore, TokenStore};
use course_desk::ReqwestClient;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "course-desk")]
#[command(author, version, about = "Course management dashboards from the terminal", long_about = None)]
struct Cli {
    /// API root, e.g. http://localhost:8080/api (overrides COURSE_DESK_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Directory holding the stored token (overrides COURSE_DESK_TOKEN_DIR)
    #[arg(long, value_name = "DIR")]
    token_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the token
    Login {
        username: String,
        #[arg(short, long, env = "COURSE_DESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show who the stored token says you are
    Whoami,
    /// Create an account; an OTP is emailed for `verify`
    Register {
        username: String,
        #[arg(short, long, env = "COURSE_DESK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "student")]
        role: String,
        /// Required for admin accounts
        #[arg(long, default_value = "")]
        security_code: String,
    },
    /// Confirm a registration with the emailed OTP
    Verify { username: String, otp: String },
    /// Mount the dashboard for the stored session and print it
    Dashboard,
    /// List course requests (admin)
    Requests,
    /// Approve a course request (admin)
    Approve { username: String, course: String },
    /// Deny a course request (admin)
    Deny { username: String, course: String },
    /// List students with their courses (admin)
    Students,
    /// Show one student's details (admin)
    Student { username: String },
    /// List the course catalog
    Courses,
    /// Add a course to the catalog (admin)
    AddCourse { name: String },
    /// Remove a course from the catalog (admin)
    DeleteCourse { name: String },
    /// Remove a course from a student's enrollment (admin)
    DropCourse { username: String, course: String },
    /// List your enrolled courses (student)
    MyCourses,
    /// Ask an admin to enroll you in a course (student)
    RequestCourse { course: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load();
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url);
    }
    if let Some(dir) = cli.token_dir {
        config.token_dir = dir;
    }

    let api = ReqwestClient::new(&config).await?;
    let store = FileTokenStore::new(&config.token_dir);

    match cli.command {
        Commands::Login { username, password } => {
            let ctx = auth::login(&api, &store, &username, &password).await?;
            println!("Signed in as {} ({})", ctx.username(), ctx.role());
        }
        Commands::Logout => {
            auth::logout(&store)?;
            println!("Signed out");
        }
        Commands::Whoami => {
            let ctx = SessionContext::load(&store)?;
            if ctx.is_signed_in() {
                println!("{} ({})", ctx.username(), ctx.role());
            } else {
                println!("Not signed in");
            }
        }
        Commands::Register {
            username,
            password,
            role,
            security_code,
        } => {
            let ack = auth::register(
                &api,
                &username,
                &password,
                Role::parse(&role),
                &security_code,
            )
            .await?;
            println!("{}", ack.message);
        }
        Commands::Verify { username, otp } => {
            let ack = auth::verify_otp(&api, &username, &otp).await?;
            println!("{}", ack.message);
        }
        Commands::Dashboard => {
            let mut page = MainPage::new(api, store);
            let mounted = page.mount().await;
            match page.view() {
                MainView::Admin(admin) => {
                    print_requests(admin.requests().items());
                    if let Some(roster) = admin.roster().get() {
                        print_roster(roster);
                    }
                    print_catalog(admin.catalog().items());
                }
                MainView::Student(student) => {
                    println!("Signed in as {}", student.session().username());
                    print_student_courses(student.courses().items());
                }
                MainView::SignedOut => println!("Not signed in"),
            }
            mounted?;
        }
        Commands::Requests => {
            let mut admin = admin_page(api, &store)?;
            admin.fetch_course_requests().await?;
            print_requests(admin.requests().items());
        }
        Commands::Approve { username, course } => {
            let mut admin = admin_page(api, &store)?;
            admin.approve(&username, &course).await?;
            print_requests(admin.requests().items());
        }
        Commands::Deny { username, course } => {
            let mut admin = admin_page(api, &store)?;
            admin.deny(&username, &course).await?;
            print_requests(admin.requests().items());
        }
        Commands::Students => {
            let mut admin = admin_page(api, &store)?;
            admin.fetch_students().await?;
            if let Some(roster) = admin.roster().get() {
                print_roster(roster);
            }
        }
        Commands::Student { username } => {
            let mut admin = admin_page(api, &store)?;
            admin.select_student(&username).await?;
            if let Some(details) = admin.selected_student().get() {
                print_student(details);
            }
        }
        Commands::Courses => {
            let mut admin = admin_page(api, &store)?;
            admin.fetch_courses().await?;
            print_catalog(admin.catalog().items());
        }
        Commands::AddCourse { name } => {
            let mut admin = admin_page(api, &store)?;
            admin.open_add_course_dialog();
            admin.add_course_dialog_mut().set_input(name);
            admin.submit_new_course().await?;
            print_catalog(admin.catalog().items());
        }
        Commands::DeleteCourse { name } => {
            let mut admin = admin_page(api, &store)?;
            admin.delete_course(&name).await?;
            print_catalog(admin.catalog().items());
        }
        Commands::DropCourse { username, course } => {
            let mut admin = admin_page(api, &store)?;
            admin.drop_student_course(&username, &course).await?;
            println!("Dropped {course} for {username}");
        }
        Commands::MyCourses => {
            let mut student = student_page(api, &store)?;
            student.fetch_courses().await?;
            print_student_courses(student.courses().items());
        }
        Commands::RequestCourse { course } => {
            let mut student = student_page(api, &store)?;
            student.open_request_dialog();
            student.request_dialog_mut().set_input(course);
            student.submit_course_request().await?;
            println!("Course requested, waiting for admin approval");
            print_student_courses(student.courses().items());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn signed_in_context(store: &impl TokenStore) -> Result<SessionContext> {
    let ctx = SessionContext::load(store)?;
    if !ctx.is_signed_in() {
        return Err(ErrorKind::Unauthenticated("run `course-desk login` first".to_string()).into());
    }
    Ok(ctx)
}

fn admin_page(api: ReqwestClient, store: &impl TokenStore) -> Result<AdminPage<ReqwestClient>> {
    let ctx = signed_in_context(store)?;
    if ctx.role() != Role::Admin {
        log::warn!("Signed in as {}, admin endpoints will likely refuse", ctx.role());
    }
    Ok(AdminPage::new(api, ctx))
}

fn student_page(
    api: ReqwestClient,
    store: &impl TokenStore,
) -> Result<StudentPage<ReqwestClient>> {
    Ok(StudentPage::new(api, signed_in_context(store)?))
}

fn print_requests(requests: &[CourseUpdateRequest]) {
    println!("==================Course requests==================");
    for request in requests {
        let status = if request.is_pending() {
            "pending"
        } else {
            "verified"
        };
        println!(
            "Student: {:<24}Course: {:<24}Status: {}",
            request.username, request.course, status
        );
    }
}

fn print_roster(roster: &Roster) {
    println!("==================Students==================");
    for student in roster.students() {
        let courses = student
            .courses
            .as_ref()
            .map(|c| c.join(", "))
            .unwrap_or_else(|| "(loading)".to_string());
        println!(
            "Student: {:<24}Email: {:<28}Courses: {}",
            student.username, student.email, courses
        );
    }
}

fn print_student(details: &StudentDetails) {
    println!("==================Student==================");
    println!("Username: {}", details.username);
    println!("Role: {}", details.role);
    println!("Verified: {}", details.is_verified);
    println!("Courses: {}", details.courses.join(", "));
}

fn print_catalog(courses: &[Course]) {
    println!("==================Courses==================");
    for course in courses {
        println!("{}", course.name);
    }
}

fn print_student_courses(courses: &[String]) {
    println!("==================Enrolled courses==================");
    for course in courses {
        println!("{course}");
    }
}
