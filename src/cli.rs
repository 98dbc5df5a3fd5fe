//! Command-line interface for the `medbook` binary.
//!
//! Global options may appear anywhere; the first positional argument names
//! the command.

use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

use crate::application::{CreateAppointmentCommand, LoginCommand, RegisterCommand};
use crate::domain::appointment::StatusFilter;
use crate::domain::foundation::{AppointmentId, Role};

/// One CLI invocation.
#[derive(Debug, Clone)]
pub enum Command {
    Login(LoginCommand),
    Register(RegisterCommand),
    Logout,
    Whoami,
    Appointments { filter: StatusFilter },
    Doctors,
    Book(CreateAppointmentCommand),
    Cancel(AppointmentId),
    Navigate(String),
}

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub command: Option<Command>,
    /// Overrides `MEDBOOK__API__BASE_URL`.
    pub base_url: Option<String>,
    /// Overrides `MEDBOOK__STORAGE__SESSION_DIR`.
    pub session_dir: Option<PathBuf>,
    /// Overrides `MEDBOOK__LOG_LEVEL`.
    pub log_level: Option<String>,
    pub help: bool,
    pub version: bool,
}

/// Command-specific options, collected before the command is known.
#[derive(Debug, Default)]
struct Fields {
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
    name: Option<String>,
    role: Option<Role>,
    filter: Option<StatusFilter>,
    doctor: Option<String>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    notes: Option<String>,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut fields = Fields::default();
    let mut name: Option<String> = None;
    let mut positional = Vec::new();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => result.help = true,
            Short('V') | Long("version") => result.version = true,
            Long("base-url") => result.base_url = Some(parser.value()?.parse()?),
            Long("session-dir") => result.session_dir = Some(parser.value()?.parse()?),
            Short('l') | Long("log-level") => result.log_level = Some(parser.value()?.parse()?),
            Short('e') | Long("email") => fields.email = Some(parser.value()?.parse()?),
            Short('p') | Long("password") => fields.password = Some(parser.value()?.parse()?),
            Long("confirm-password") => fields.confirm_password = Some(parser.value()?.parse()?),
            Short('n') | Long("name") => fields.name = Some(parser.value()?.parse()?),
            Short('r') | Long("role") => {
                let value: String = parser.value()?.parse()?;
                fields.role = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("role", value))?,
                );
            }
            Short('f') | Long("filter") => {
                let value: String = parser.value()?.parse()?;
                fields.filter = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("filter", value))?,
                );
            }
            Short('d') | Long("doctor") => fields.doctor = Some(parser.value()?.parse()?),
            Long("date") => fields.date = Some(parser.value()?.parse()?),
            Long("start") => fields.start = Some(parser.value()?.parse()?),
            Long("end") => fields.end = Some(parser.value()?.parse()?),
            Long("notes") => fields.notes = Some(parser.value()?.parse()?),
            Value(val) => {
                let val = val.string()?;
                if name.is_none() {
                    name = Some(val);
                } else {
                    positional.push(val);
                }
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    match name {
        Some(name) => result.command = Some(build_command(&name, positional, fields)?),
        None if result.help || result.version => {}
        None => return Err(ArgsError::MissingCommand),
    }
    Ok(result)
}

fn build_command(name: &str, positional: Vec<String>, fields: Fields) -> Result<Command, ArgsError> {
    let mut positional = positional.into_iter();
    let command = match name {
        "login" => Command::Login(LoginCommand {
            email: require(fields.email, "email")?,
            password: require(fields.password, "password")?,
        }),
        "register" => {
            let password = require(fields.password, "password")?;
            Command::Register(RegisterCommand {
                name: require(fields.name, "name")?,
                email: require(fields.email, "email")?,
                confirm_password: fields.confirm_password.unwrap_or_else(|| password.clone()),
                password,
                role: fields.role.unwrap_or(Role::Patient),
            })
        }
        "logout" => Command::Logout,
        "whoami" => Command::Whoami,
        "appointments" => Command::Appointments {
            filter: fields.filter.unwrap_or_default(),
        },
        "doctors" => Command::Doctors,
        "book" => Command::Book(CreateAppointmentCommand {
            doctor: require(fields.doctor, "doctor")?,
            date: require(fields.date, "date")?,
            start: require(fields.start, "start")?,
            end: require(fields.end, "end")?,
            notes: fields.notes,
        }),
        "cancel" => {
            let value = positional.next().ok_or(ArgsError::MissingArgument("appointment id"))?;
            let id = AppointmentId::new(value.clone())
                .map_err(|_| ArgsError::InvalidValue("appointment id", value))?;
            Command::Cancel(id)
        }
        "navigate" => Command::Navigate(positional.next().ok_or(ArgsError::MissingArgument("path"))?),
        other => return Err(ArgsError::UnknownCommand(other.to_string())),
    };

    if let Some(extra) = positional.next() {
        return Err(ArgsError::UnexpectedArgument(extra));
    }
    Ok(command)
}

fn require(value: Option<String>, option: &'static str) -> Result<String, ArgsError> {
    value.ok_or(ArgsError::MissingOption(option))
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"medbook {version}
Client for the MedBook appointment booking platform

USAGE:
    medbook [OPTIONS] <COMMAND> [COMMAND OPTIONS]

COMMANDS:
    login         --email <EMAIL> --password <PASSWORD>
    register      --name <NAME> --email <EMAIL> --password <PASSWORD>
                  [--confirm-password <PASSWORD>] [--role patient|doctor]
    logout        Sign out (always clears the local session)
    whoami        Show the signed-in user as the backend sees it
    appointments  [--filter all|pending|confirmed|cancelled|completed]
    doctors       List doctors available for booking
    book          --doctor <ID> --date <YYYY-MM-DD> --start <HH:MM> --end <HH:MM> [--notes <TEXT>]
    cancel        <APPOINTMENT_ID>
    navigate      <PATH>  Show where the app would land for a location

OPTIONS:
        --base-url <URL>      Backend API base URL
        --session-dir <DIR>   Directory holding the persisted session
    -l, --log-level <LVL>     Tracing filter (error, warn, info, debug, trace)
    -h, --help                Print help
    -V, --version             Print version

ENVIRONMENT VARIABLES:
    MEDBOOK__API__BASE_URL          Backend API base URL
    MEDBOOK__API__TIMEOUT_SECS      Request timeout in seconds [default: 10]
    MEDBOOK__API__ENVIRONMENT       development, staging or production
    MEDBOOK__STORAGE__SESSION_DIR   Session directory [default: ~/.medbook]
    MEDBOOK__LOG_LEVEL              Tracing filter
    RUST_LOG                        Takes precedence over the log level
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("medbook {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("{0}")]
    Lexopt(#[from] lexopt::Error),

    #[error("invalid value for {0}: '{1}'")]
    InvalidValue(&'static str, String),

    #[error("unexpected argument: '{0}'")]
    UnexpectedArgument(String),

    #[error("no command given (try --help)")]
    MissingCommand,

    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("missing required option --{0}")]
    MissingOption(&'static str),

    #[error("missing {0}")]
    MissingArgument(&'static str),
}
