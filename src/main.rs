//! MedBook client binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tracing::{debug, info};

use medbook_client::adapters::{FileSessionStorage, ReqwestTransport};
use medbook_client::application::{
    AppShell, CancelAppointmentCommand, CancelAppointmentHandler, ClientError,
    CreateAppointmentHandler, CurrentUserHandler, CurrentUserQuery, ListDoctorAppointmentsHandler,
    ListDoctorsHandler, ListPatientAppointmentsHandler, LoginHandler, LogoutHandler,
    RegisterHandler, RequestPipeline, SessionContext,
};
use medbook_client::cli::{self, Args, Command};
use medbook_client::config::AppConfig;
use medbook_client::domain::appointment::{Appointment, AppointmentBook, AppointmentEvent, StatusFilter};
use medbook_client::domain::foundation::{Role, ValidationError};
use medbook_client::domain::session::SessionError;
use medbook_client::ports::TransportError;
use medbook_client::telemetry;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };
    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };
    telemetry::init(config.log_level.as_deref());
    debug!(base_url = %config.api.base_url, session_dir = %config.storage.session_dir.display(), "Configuration loaded");

    let Some(command) = args.command else {
        cli::print_help();
        return ExitCode::from(2);
    };

    match run(command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Client(e)) => {
            eprintln!("error [{}]: {}", e.code(), e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Environment configuration with command-line overrides applied.
fn load_config(args: &Args) -> Result<AppConfig, medbook_client::config::ConfigError> {
    let mut config = AppConfig::load()?;
    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(dir) = &args.session_dir {
        config.storage.session_dir = dir.clone();
    }
    if args.log_level.is_some() {
        config.log_level = args.log_level.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn run(command: Command, config: &AppConfig) -> Result<(), RunError> {
    let storage = Arc::new(FileSessionStorage::new(&config.storage.session_dir));
    let session = SessionContext::restore(storage).await;
    let transport = Arc::new(ReqwestTransport::new(&config.api.base_url, config.api.timeout())?);
    let pipeline = RequestPipeline::new(transport, session.clone());
    let mut shell = AppShell::new(session.clone());

    let result = execute(command, &pipeline, &mut shell).await;

    // Navigation follows whatever the session went through, including a
    // 401 that ended it mid-command.
    if shell.process_signals().await > 0 {
        println!("-> {}", shell.location());
    }
    result.map_err(RunError::from)
}

async fn execute(command: Command, pipeline: &RequestPipeline, shell: &mut AppShell) -> Result<(), ClientError> {
    let session = pipeline.session().clone();
    match command {
        Command::Login(cmd) => {
            let result = LoginHandler::new(pipeline.clone()).handle(cmd).await?;
            let role = result.user.role.map(|r| r.to_string()).unwrap_or_else(|| "unknown role".into());
            println!("Signed in as {} ({})", result.user.display_name(), role);
        }
        Command::Register(cmd) => {
            let email = cmd.email.clone();
            RegisterHandler::new(pipeline.clone()).handle(cmd).await?;
            println!("Account created for {}. Verify your email, then sign in.", email);
        }
        Command::Logout => {
            let result = LogoutHandler::new(pipeline.clone()).handle().await?;
            if let Some(e) = &result.remote_error {
                println!("Signed out locally (server said: {})", e);
            } else {
                println!("Signed out");
            }
        }
        Command::Whoami => {
            if !session.is_authenticated().await {
                println!("Not signed in");
                return Ok(());
            }
            let user = CurrentUserHandler::new(pipeline.clone()).handle(CurrentUserQuery).await?;
            println!("{}", user.display_name());
            if let Some(email) = &user.email {
                println!("  email: {}", email);
            }
            match user.role {
                Some(role) => println!("  role:  {}", role),
                None => println!("  role:  (unrecognized)"),
            }
        }
        Command::Appointments { filter } => list_appointments(pipeline, filter).await?,
        Command::Doctors => {
            let doctors = ListDoctorsHandler::new(pipeline.clone()).handle().await?;
            if doctors.is_empty() {
                println!("No doctors available");
            }
            for doctor in doctors {
                println!(
                    "{}  {}  {}",
                    doctor.id().unwrap_or("-"),
                    doctor.name.as_deref().unwrap_or("(unnamed)"),
                    doctor.specialty.as_deref().unwrap_or("")
                );
            }
        }
        Command::Book(cmd) => {
            let today = Local::now().date_naive();
            let appointment = CreateAppointmentHandler::new(pipeline.clone()).handle(cmd, today).await?;
            println!("Booked:");
            print_appointment(&appointment, Role::Patient);
        }
        Command::Cancel(id) => {
            let appointment = CancelAppointmentHandler::new(pipeline.clone())
                .handle(CancelAppointmentCommand { id })
                .await?;
            println!("Cancelled:");
            print_appointment(&appointment, session.snapshot().await.role().unwrap_or(Role::Patient));
        }
        Command::Navigate(path) => {
            let nav = shell.navigate(&path).await;
            if nav.redirected() {
                info!(requested = %nav.requested, location = %nav.location, "Redirected");
                println!("{} -> {} ({:?})", nav.requested, nav.location, nav.decision);
            } else {
                println!("{}", nav.location);
            }
        }
    }
    Ok(())
}

async fn list_appointments(pipeline: &RequestPipeline, filter: StatusFilter) -> Result<(), ClientError> {
    let state = pipeline.session().snapshot().await;
    if !state.is_authenticated() {
        return Err(SessionError::no_active_session("appointments.list").into());
    }

    let mut book = AppointmentBook::new();
    book.apply(AppointmentEvent::SetFilter(filter));
    book.apply(AppointmentEvent::FetchStart);

    let role = state.role();
    let fetched = match role {
        Some(Role::Doctor) => ListDoctorAppointmentsHandler::new(pipeline.clone()).handle().await,
        Some(Role::Patient) => ListPatientAppointmentsHandler::new(pipeline.clone()).handle().await,
        _ => Err(ValidationError::invalid_format("role", "no appointment list for this account").into()),
    };
    match fetched {
        Ok(appointments) => book.apply(AppointmentEvent::FetchSuccess(appointments)),
        Err(e) => {
            book.apply(AppointmentEvent::FetchFailure(e.to_string()));
            return Err(e);
        }
    }

    let visible = book.visible();
    if visible.is_empty() {
        match book.filter {
            StatusFilter::All => println!("No appointments"),
            filter => println!("No {} appointments", filter),
        }
    }
    for appointment in visible {
        print_appointment(appointment, role.unwrap_or(Role::Patient));
    }
    Ok(())
}

/// One line per appointment; the counterpart shown depends on who is looking.
fn print_appointment(appointment: &Appointment, viewer: Role) {
    let counterpart = match viewer {
        Role::Doctor => appointment.patient.as_ref(),
        _ => appointment.doctor.as_ref(),
    };
    println!(
        "{}  {} {}-{}  {:<9}  {}",
        appointment.id,
        appointment.date.format("%Y-%m-%d"),
        appointment.start_time.format("%H:%M"),
        appointment.end_time.format("%H:%M"),
        appointment.status.as_str(),
        counterpart.map(|p| p.display_name()).unwrap_or("-")
    );
}
