//! Terminal client for the queue registration system.
//!
//! Submits applications, follows the waiting list as it changes and exposes
//! the handful of admin calls the sheet supports.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lantern-client -- watch 王小明
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Args, Parser, Subcommand};
use lantern_client::{
    AppError, ClientApp, ClientConfig,
    constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_ENDPOINT, DEFAULT_LOG_LEVEL, DEFAULT_STORE_PATH},
    domain::{
        AdminGateway, ApplicationForm, ClientName, ClientStatus, KeyValueStore, LightType,
        RetryPolicy, Settings,
    },
    infrastructure::{JsonFileStore, Preferences},
    ui::TerminalView,
    usecase::QueuePoller,
};
use lantern_shared::{logger::setup_logger, time::SystemClock};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, oneshot};

/// How often `watch` checks whether polling has stopped on its own
const WATCH_CHECK_INTERVAL: Duration = Duration::from_secs(1);

const REPL_PROMPT: &str = "lantern> ";

const REPL_HELP: &str = "\
commands:
  check [NAME]       follow NAME (or the remembered name)
  submit NAME        submit an application for NAME
  stop               stop automatic refresh
  settings           show today's light
  clear-cache        drop cached settings
  help               show this help
  quit               leave";

#[derive(Debug, Parser)]
#[command(name = "lantern-client", version, about = "Queue registration client")]
struct Cli {
    /// Apps Script web app URL
    #[arg(long, env = "LANTERN_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// JSON file used as local storage
    #[arg(long, env = "LANTERN_STORE", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Retry a failed poll after this many milliseconds instead of the refresh rate
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Stop polling after this many failures in a row
    #[arg(long)]
    max_failures: Option<u32>,

    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    cache_ttl_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit an application and follow the queue
    Submit(SubmitArgs),
    /// Follow the queue for NAME (defaults to the remembered name)
    Watch { name: Option<String> },
    /// Show today's meeting settings
    Settings,
    /// Interactive session
    Interactive,
    /// Admin operations
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Display preferences
    Prefs {
        /// Blank lines and indentation between rows
        #[arg(long)]
        large_text: Option<bool>,
    },
}

#[derive(Debug, Args)]
struct SubmitArgs {
    #[arg(long)]
    name: String,

    /// Extra form field, as key=value (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// List every applicant
    List {
        #[arg(long, env = "LANTERN_ADMIN_PASSWORD")]
        password: String,
    },
    /// Change the status of the applicant on sheet row ROW
    SetStatus {
        #[arg(long)]
        row: u32,
        /// Status label, e.g. 等待中
        #[arg(long)]
        status: String,
        #[arg(long, env = "LANTERN_ADMIN_PASSWORD")]
        password: String,
    },
    /// Dump every client row, or only the pending ones
    Clients {
        #[arg(long)]
        pending: bool,
    },
    /// Dump the raw rows of a sheet
    Data { sheet: String },
    /// Write marked rows (a JSON document) into a sheet
    Export { sheet: String, marked_data: String },
    /// Overwrite today's meeting settings
    UpdateSettings {
        #[arg(long)]
        light: String,
        #[arg(long, default_value = "")]
        meeting_link: String,
        #[arg(long)]
        max_waiting: u32,
    },
    /// Sheet maintenance functions
    #[command(subcommand)]
    System(SystemCommand),
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum SystemCommand {
    /// Create the sheets and headers
    Init,
    /// Check that the sheets are reachable
    Test,
    /// Fix malformed client rows
    Repair,
    /// Append a dummy client
    AddTestClient,
    /// Print the endpoint's current date (Asia/Taipei)
    Date,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

impl Cli {
    fn config(&self) -> ClientConfig {
        let mut retry_policy = RetryPolicy::default();
        if let Some(ms) = self.retry_delay_ms {
            retry_policy = retry_policy.with_retry_delay(Duration::from_millis(ms));
        }
        if let Some(max) = self.max_failures {
            retry_policy = retry_policy.with_max_consecutive_failures(max);
        }

        ClientConfig {
            endpoint: self.endpoint.clone(),
            store_path: self.store.clone(),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            retry_policy,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &cli.log_level);

    if let Err(e) = run(cli).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = cli.config();
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&config.store_path));

    // Preferences are read before the view exists since they shape it
    let large_text = Preferences::new(store.clone()).large_text();
    let view = Arc::new(TerminalView::new(large_text));
    let app = ClientApp::with_store(&config, view, store, Arc::new(SystemClock))?;
    tracing::debug!("Using endpoint {}", app.gateway.endpoint());

    match cli.command {
        Command::Submit(args) => submit(&app, args).await,
        Command::Watch { name } => watch(&app, name).await,
        Command::Settings => {
            let settings = app.load_settings.execute().await;
            println!("今日燈種: {}", settings.light_type);
            if !settings.meeting_link.is_empty() {
                println!("會議連結: {}", settings.meeting_link);
            }
            println!("等待人數上限: {}", settings.max_waiting_clients);
            Ok(())
        }
        Command::Interactive => interactive(&app).await,
        Command::Admin(command) => admin(&app, command).await,
        Command::Prefs { large_text } => {
            if let Some(enabled) = large_text {
                app.preferences.set_large_text(enabled);
            }
            println!("large text: {}", app.preferences.large_text());
            Ok(())
        }
    }
}

async fn submit(app: &ClientApp, args: SubmitArgs) -> Result<(), AppError> {
    let name = ClientName::new(args.name)?;
    let form = args
        .fields
        .into_iter()
        .fold(ApplicationForm::new(name.clone()), |form, (key, value)| {
            form.with_field(key, value)
        });

    app.submit_application.execute(form).await?;
    app.preferences.remember_client_name(&name);
    wait_while_polling(&app.poller).await;
    Ok(())
}

async fn watch(app: &ClientApp, name: Option<String>) -> Result<(), AppError> {
    let remembered = || app.preferences.client_name().map(ClientName::into_string);
    let name = name.or_else(remembered).unwrap_or_default();

    app.check_status.execute(&name).await?;
    wait_while_polling(&app.poller).await;
    Ok(())
}

/// Block until Ctrl-C or until the poller stops by itself.
async fn wait_while_polling(poller: &QueuePoller) {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut check = tokio::time::interval(WATCH_CHECK_INTERVAL);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted, stopping refresh");
                break;
            }
            _ = check.tick() => {
                if !poller.is_polling().await {
                    break;
                }
            }
        }
    }
    poller.stop_status_refresh().await;
}

async fn interactive(app: &ClientApp) -> Result<(), AppError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let (ready_tx, ready_rx) = oneshot::channel::<Result<(), String>>();

    // rustyline blocks on stdin; a plain thread does not hold up runtime shutdown
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => {
                let _ = ready_tx.send(Ok(()));
                editor
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e.to_string()));
                return;
            }
        };
        loop {
            match editor.readline(REPL_PROMPT) {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    let quit = matches!(line.trim(), "quit" | "exit");
                    if tx.send(line).is_err() || quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Readline error: {}", e);
                    break;
                }
            }
        }
    });

    ready_rx
        .await
        .map_err(|e| AppError::Readline(e.to_string()))?
        .map_err(AppError::Readline)?;

    println!("{REPL_HELP}");
    while let Some(line) = rx.recv().await {
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let argument = parts.next().map(str::trim).unwrap_or_default();

        match command {
            "" => {}
            "check" => {
                let name = if argument.is_empty() {
                    app.preferences
                        .client_name()
                        .map(ClientName::into_string)
                        .unwrap_or_default()
                } else {
                    argument.to_string()
                };
                // The view already told the user what went wrong
                if let Err(e) = app.check_status.execute(&name).await {
                    tracing::debug!("check failed: {}", e);
                }
            }
            "submit" => match ClientName::new(argument) {
                Ok(name) => {
                    if app
                        .submit_application
                        .execute(ApplicationForm::new(name.clone()))
                        .await
                        .is_ok()
                    {
                        app.preferences.remember_client_name(&name);
                    }
                }
                Err(e) => println!("{e}"),
            },
            "stop" => app.poller.stop_status_refresh().await,
            "settings" => {
                app.load_settings.execute().await;
            }
            "clear-cache" => {
                app.cache.clear();
                println!("cache cleared");
            }
            "help" => println!("{REPL_HELP}"),
            "quit" | "exit" => break,
            other => println!("unknown command `{other}`, try `help`"),
        }
    }

    app.poller.stop_status_refresh().await;
    Ok(())
}

async fn admin(app: &ClientApp, command: AdminCommand) -> Result<(), AppError> {
    let result = match command {
        AdminCommand::List { password } => app.gateway.get_admin_clients_list(&password).await?,
        AdminCommand::SetStatus {
            row,
            status,
            password,
        } => {
            let status = ClientStatus::from_label(&status);
            if let ClientStatus::Unknown(label) = &status {
                return Err(AppError::Usage(format!("unknown status `{label}`")));
            }
            app.gateway
                .update_client_status(row, &status, &password)
                .await?
        }
        AdminCommand::Clients { pending: false } => app.gateway.get_all_clients().await?,
        AdminCommand::Clients { pending: true } => app.gateway.get_pending_clients().await?,
        AdminCommand::Data { sheet } => app.gateway.get_all_data(&sheet).await?,
        AdminCommand::Export { sheet, marked_data } => {
            let marked_data = serde_json::from_str(&marked_data)
                .map_err(|e| AppError::Usage(format!("marked data is not JSON: {e}")))?;
            app.gateway.export_to_sheet(&sheet, marked_data).await?
        }
        AdminCommand::UpdateSettings {
            light,
            meeting_link,
            max_waiting,
        } => {
            let settings = Settings {
                light_type: LightType::from(light),
                meeting_link,
                max_waiting_clients: max_waiting.to_string(),
            };
            app.gateway.update_settings(&settings).await?
        }
        AdminCommand::System(command) => match command {
            SystemCommand::Init => app.gateway.initialize_system().await?,
            SystemCommand::Test => app.gateway.test_system().await?,
            SystemCommand::Repair => app.gateway.repair_client_data().await?,
            SystemCommand::AddTestClient => app.gateway.add_test_client().await?,
            SystemCommand::Date => app.gateway.get_taiwan_date().await?,
        },
    };

    let pretty = serde_json::to_string_pretty(&result)
        .map_err(|e| AppError::Usage(format!("cannot print response: {e}")))?;
    println!("{pretty}");
    Ok(())
}
