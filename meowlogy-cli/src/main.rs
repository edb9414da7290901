mod cli;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use meowlogy_api::ApiClient;
use meowlogy_commands::{auth, chat, facts};
use meowlogy_core::{Context, Data, Error};
use meowlogy_session::impls::session::load_session;
use meowlogy_session::store::DEFAULT_KEY_PREFIX;
use meowlogy_session::{DemoCredentials, SessionStore};

use crate::cli::{Cli, Commands, FactCommands, SessionBackend};

#[tokio::main]
async fn main() -> ExitCode {
    // Load the .env file before clap reads env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(?err, "command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let max_level = if verbose {
        Level::DEBUG
    } else {
        env::var("MEOWLOGY_LOG")
            .ok()
            .and_then(|value| value.trim().parse::<Level>().ok())
            .unwrap_or(Level::WARN)
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter_fn(move |metadata| {
            if *metadata.level() > max_level {
                return false;
            }

            let target = metadata.target();
            let noisy = ["hyper", "reqwest", "h2", "rustls"]
                .iter()
                .any(|prefix| target.starts_with(prefix));
            !noisy || *metadata.level() <= Level::WARN
        }));

    tracing_subscriber::registry().with(fmt_layer).init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    let api = match cli.api_url.as_deref() {
        Some(url) => ApiClient::new(url)?.with_timeout(env_secs("MEOWLOGY_HTTP_TIMEOUT_SECS")),
        None => ApiClient::from_env()?,
    };
    debug!(base_url = %api.base_url(), "api client ready");

    let store = build_store(
        cli.session_backend.unwrap_or_default(),
        cli.session_file.clone(),
    )
    .await;

    let data = Data {
        api,
        store,
        credentials: DemoCredentials::from_env(),
    };
    let session = match load_session(&data.store).await {
        Ok(session) => session,
        Err(err) => {
            warn!(?err, "failed to load the stored session; continuing signed out");
            Default::default()
        }
    };
    let mut ctx = Context::new(&data, session);

    match cli.command {
        Commands::Login { username, password } => {
            auth::login::login(&mut ctx, &username, &password).await
        }
        Commands::Logout => auth::logout::logout(&mut ctx).await,
        Commands::Signup {
            username,
            email,
            password,
            confirm,
        } => auth::signup::signup(&mut ctx, &username, &email, &password, &confirm).await,
        Commands::Whoami => auth::whoami::whoami(&ctx),
        Commands::Facts { command } => match command {
            FactCommands::List => facts::list::list(&ctx).await,
            FactCommands::Random => facts::random::random(&ctx).await,
            FactCommands::Add { fact } => facts::add::add(&ctx, &fact.join(" ")).await,
            FactCommands::Show { id } => facts::show::show(&ctx, &id).await,
            FactCommands::Like { id } => facts::like::like(&ctx, &id).await,
            FactCommands::Unlike { id } => facts::like::unlike(&ctx, &id).await,
            FactCommands::Delete { id } => facts::delete::delete(&ctx, &id).await,
        },
        Commands::Ask { question } => chat::ask::ask(&ctx, &question.join(" ")).await,
        Commands::Chat => chat::repl::chat(&ctx).await,
        Commands::Health => facts::health::health(&ctx).await,
    }
}

/// Picks the session store. Redis problems degrade to the file backend
/// instead of stopping the command.
async fn build_store(backend: SessionBackend, session_file: Option<PathBuf>) -> SessionStore {
    let key_prefix = env::var("MEOWLOGY_KEY_PREFIX")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_owned());
    let session_file = session_file.unwrap_or_else(SessionStore::default_file_path);
    let file_store = || SessionStore::file(&session_file, key_prefix.clone());

    let store = match backend {
        SessionBackend::Memory => SessionStore::memory(key_prefix.clone()),
        SessionBackend::File => file_store(),
        SessionBackend::Redis => match env::var("REDIS_URL") {
            Ok(redis_url) => match SessionStore::redis(&redis_url, key_prefix.clone()) {
                Ok(store) => store,
                Err(err) => {
                    warn!(?err, key_prefix = %key_prefix, "Failed to initialize Redis session store; using the session file.");
                    file_store()
                }
            },
            Err(_) => {
                warn!(key_prefix = %key_prefix, "Redis session backend selected but REDIS_URL is missing; using the session file.");
                file_store()
            }
        },
    };

    if store.is_redis_enabled() {
        if let Err(err) = store.ping().await {
            warn!(?err, "Redis ping failed; using the session file.");
            return file_store();
        }
        info!("Redis session store health check passed.");
    }

    debug!(backend = store.backend_name(), "session store ready");
    store
}

fn env_secs(key: &str) -> Option<Duration> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        Err(_) => None,
    }
}
