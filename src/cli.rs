use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    config::AppConfig,
    dto::operations::OperationDraft,
    error::AppResult,
    models::{Master, Operation, Service, Shift},
    params::{ActionFilter, StatusFilter},
    services::{
        auth_service,
        catalog_service::{self, Catalog},
        desk::Desk,
        operation_service::OperationStore,
        shift_log_service::{self, ShiftLogView},
        shift_service::ShiftGate,
    },
    session::{Session, SessionStore},
    state::AppState,
};

/// Front desk for an auto-service shop: operations, shifts and the service catalog.
#[derive(Parser, Debug)]
#[command(name = "autoservice-desk", version)]
pub struct Cli {
    /// Backend base url (overrides BACKEND_URL).
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Where the logged-in user is remembered (overrides SESSION_FILE).
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Request a login code for a phone number.
    Login {
        #[arg(long)]
        phone: String,
    },
    /// Submit the code received by SMS and start a session.
    Verify {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        code: String,
    },
    Register {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        name: String,
    },
    Logout,
    Whoami,
    #[command(subcommand)]
    Ops(OpsCommand),
    #[command(subcommand)]
    Shift(ShiftCommand),
    #[command(subcommand)]
    Services(ServicesCommand),
    #[command(subcommand)]
    Masters(MastersCommand),
    /// Load operations, services and shift status together.
    Desk,
}

#[derive(Subcommand, Debug)]
pub enum OpsCommand {
    List {
        /// all, pending, paid or cancelled
        #[arg(long, default_value = "all")]
        status: String,
    },
    Create {
        #[arg(long)]
        client: String,
        #[arg(long)]
        car: String,
        #[arg(long)]
        service: i64,
        /// Defaults to the service price.
        #[arg(long)]
        price: Option<i64>,
        #[arg(long)]
        comment: Option<String>,
    },
    Pay {
        id: i64,
        #[arg(long)]
        comment: Option<String>,
    },
    Cancel {
        id: i64,
        #[arg(long)]
        reason: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShiftCommand {
    Status,
    Open,
    Close,
    Logs {
        /// all, open or close
        #[arg(long, default_value = "all")]
        action: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServicesCommand {
    List,
    /// Masters qualified for a service.
    Masters { service_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum MastersCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    Assign {
        #[arg(long)]
        service: i64,
        #[arg(long)]
        master: i64,
    },
}

impl Cli {
    /// Applies command-line overrides on top of the environment config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(path) = &self.session_file {
            config.session_file = path.clone();
        }
    }
}

pub async fn run(command: Command, config: &AppConfig) -> AppResult<()> {
    let state = AppState::from_config(config)?;
    let mut session = Session::restore(SessionStore::new(&config.session_file))?;
    execute(command, &state, &mut session).await
}

/// Runs one command against `state` on behalf of `session`.
pub async fn execute(command: Command, state: &AppState, session: &mut Session) -> AppResult<()> {
    match command {
        Command::Login { phone } => {
            let phone = auth_service::request_code(state, &phone).await?;
            println!("Code sent to {phone}");
        }
        Command::Verify { phone, code } => {
            let user = auth_service::verify_code(state, session, &phone, &code).await?;
            println!("Welcome, {} ({})", user.name, user.role);
        }
        Command::Register { phone, name } => {
            let id = auth_service::register(state, &phone, &name).await?;
            println!("Registered user #{id}");
        }
        Command::Logout => {
            auth_service::logout(session)?;
            println!("Logged out");
        }
        Command::Whoami => match session.user() {
            Some(user) => println!("#{} {} ({})", user.id, user.name, user.role),
            None => println!("Not logged in"),
        },
        Command::Ops(command) => run_ops(state, session, command).await?,
        Command::Shift(command) => run_shift(state, session, command).await?,
        Command::Services(command) => run_services(state, session, command).await?,
        Command::Masters(command) => run_masters(state, session, command).await?,
        Command::Desk => run_desk(state, session).await?,
    }
    Ok(())
}

async fn run_ops(state: &AppState, session: &Session, command: OpsCommand) -> AppResult<()> {
    let mut store = OperationStore::default();
    match command {
        OpsCommand::List { status } => {
            let filter: StatusFilter = status.parse()?;
            store.refresh(state, session).await?;
            let counts = store.counts();
            println!(
                "all {} | pending {} | paid {} | cancelled {}",
                counts.all, counts.pending, counts.paid, counts.cancelled
            );
            print_operations(&store.filter(filter));
        }
        OpsCommand::Create {
            client,
            car,
            service,
            price,
            comment,
        } => {
            let mut gate = ShiftGate::for_session(session)?;
            let (shift, catalog) = tokio::join!(gate.refresh(state), Catalog::load(state, session));
            shift?;
            let catalog = catalog?;
            let draft = OperationDraft {
                client_name: client,
                car,
                service_id: service,
                price,
                comment,
            };
            let created = store.create(state, session, &gate, &catalog, draft).await?;
            println!("Created operation #{}", created.id);
            print_operations(&[&created]);
        }
        OpsCommand::Pay { id, comment } => {
            let paid = store.pay(state, session, id, comment).await?;
            print_operations(&[&paid]);
        }
        OpsCommand::Cancel { id, reason } => {
            let cancelled = store.cancel(state, session, id, &reason).await?;
            print_operations(&[&cancelled]);
        }
        OpsCommand::Delete { id } => {
            store.delete(state, session, id).await?;
            println!("Deleted operation #{id}");
        }
    }
    Ok(())
}

async fn run_shift(state: &AppState, session: &Session, command: ShiftCommand) -> AppResult<()> {
    match command {
        ShiftCommand::Status => {
            let gate = ShiftGate::load(state, session).await?;
            print_shift(gate.current());
        }
        ShiftCommand::Open => {
            let mut gate = ShiftGate::load(state, session).await?;
            let shift = gate.open(state).await?;
            print_shift(Some(shift));
        }
        ShiftCommand::Close => {
            let mut gate = ShiftGate::load(state, session).await?;
            let closed = gate.close(state).await?;
            println!("Shift #{} closed", closed.id);
        }
        ShiftCommand::Logs { action } => {
            let filter: ActionFilter = action.parse()?;
            let view = ShiftLogView::load(state, session).await?;
            let counts = view.counts();
            println!(
                "all {} | open {} | close {}",
                counts.all, counts.open, counts.close
            );
            for log in view.filter(filter) {
                println!(
                    "{:<6} {:<20} {:<5} {}  start {}  end {}  duration {}",
                    log.id,
                    log.operator_name.as_deref().unwrap_or("-"),
                    log.action,
                    log.timestamp.format("%d.%m.%Y %H:%M:%S"),
                    format_time(log.shift_start),
                    format_time(log.shift_end),
                    shift_log_service::format_duration(log),
                );
            }
        }
    }
    Ok(())
}

async fn run_services(state: &AppState, session: &Session, command: ServicesCommand) -> AppResult<()> {
    match command {
        ServicesCommand::List => {
            let catalog = Catalog::load(state, session).await?;
            print_services(catalog.services());
        }
        ServicesCommand::Masters { service_id } => {
            let masters = catalog_service::masters_for_service(state, session, service_id).await?;
            if masters.is_empty() {
                println!("No master found for service #{service_id}");
            } else {
                print_masters(&masters);
            }
        }
    }
    Ok(())
}

async fn run_masters(state: &AppState, session: &Session, command: MastersCommand) -> AppResult<()> {
    match command {
        MastersCommand::List => {
            let masters = catalog_service::list_masters(state, session).await?;
            print_masters(&masters);
        }
        MastersCommand::Create { name, phone } => {
            let master = catalog_service::create_master(state, session, &name, &phone).await?;
            println!("Master #{} added", master.id);
        }
        MastersCommand::Assign { service, master } => {
            catalog_service::assign_master(state, session, service, master).await?;
            println!("Master #{master} assigned to service #{service}");
        }
    }
    Ok(())
}

async fn run_desk(state: &AppState, session: &Session) -> AppResult<()> {
    let mut desk = Desk::new(session)?;
    let outcome = desk.refresh(state, session).await;

    if let Some(gate) = &desk.shift {
        if outcome.shift.as_ref().is_some_and(|r| r.is_ok()) {
            print_shift(gate.current());
        }
    }
    if outcome.catalog.is_ok() {
        print_services(desk.catalog.services());
    }
    if outcome.operations.is_ok() {
        print_operations(&desk.operations.filter(StatusFilter::All));
    }
    for (part, err) in outcome.errors() {
        eprintln!("{part}: {err}");
    }
    Ok(())
}

fn format_time(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|t| t.format("%d.%m.%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_shift(shift: Option<&Shift>) {
    match shift {
        Some(shift) => println!(
            "Shift #{} open since {}",
            shift.id,
            shift.start_time.format("%d.%m.%Y %H:%M:%S")
        ),
        None => println!("Shift closed"),
    }
}

fn print_operations(operations: &[&Operation]) {
    if operations.is_empty() {
        println!("No operations");
        return;
    }
    for op in operations {
        let service = op
            .service
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("service #{}", op.service_id));
        let master = op.master.as_ref().map(|m| m.name.as_str()).unwrap_or("not assigned");
        println!(
            "#{:<5} {:<10} {:<20} {:<15} {:<20} {:>8}  master: {}  {}",
            op.id,
            op.status,
            op.client_name,
            op.car,
            service,
            op.price,
            master,
            op.date.format("%d.%m.%Y"),
        );
        if let Some(comment) = &op.comment {
            println!("       comment: {comment}");
        }
        if let Some(reason) = &op.cancel_reason {
            println!("       cancel reason: {reason}");
        }
    }
}

fn print_services(services: &[Service]) {
    for service in services {
        println!("#{:<5} {:<30} {:>8}", service.id, service.name, service.price);
    }
}

fn print_masters(masters: &[Master]) {
    for master in masters {
        println!(
            "#{:<5} {:<30} {}",
            master.id,
            master.name,
            master.phone.as_deref().unwrap_or("-")
        );
    }
}
