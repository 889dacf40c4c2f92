//! Create an administrator account and issue its first confirmation code.
//!
//! Superusers skip `/v1/auth/signup/`: the account is written directly and a
//! confirmation code is stored and mailed exactly as signup would. The code is
//! also printed so the administrator can call `/v1/auth/token/` before it
//! expires. `--reissue-code` issues a fresh code for an existing account.
//!
//! The code is signed with the server's token key, so `YAMDB_TOKEN_KEY_FILE`
//! must name the same key file the server reads.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use yamdb::domain::ports::{AccountService, UserRepository};
use yamdb::domain::{
    AccountServiceDeps, CONFIRMATION_TTL_MINUTES, ConfirmationCodeSigner, DomainAccountService,
    EmailAddress, NewUser, Username,
};
use yamdb::inbound::http::token_config::{BuildMode, TokenKeyConfig, token_key_from_env};
use yamdb::outbound::mail::mailer_from_settings;
use yamdb::outbound::persistence::{
    DbPool, DieselPendingConfirmationRepository, DieselUserRepository, PoolConfig,
    run_pending_migrations,
};
use yamdb::outbound::tokens::JwtAccessTokenIssuer;
use yamdb::settings::AppSettings;

const DATABASE_URL_ENV: &str = "YAMDB_DATABASE_URL";

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create an administrator account and issue its confirmation code",
    version
)]
struct CliArgs {
    /// Login name of the administrator.
    #[arg(long, value_name = "name")]
    username: String,
    /// Address the administrator will receive confirmation codes at.
    #[arg(long, value_name = "address", required_unless_present = "reissue_code")]
    email: Option<String>,
    /// Issue a fresh code for an existing account instead of creating one.
    #[arg(long = "reissue-code", conflicts_with = "email")]
    reissue_code: bool,
    /// Database connection URL. Falls back to `YAMDB_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let username = Username::new(&args.username).wrap_err("invalid --username")?;
    let new_user = match &args.email {
        Some(email) => Some(superuser_from_args(&args.username, email)?),
        None => None,
    };
    let settings = AppSettings::load_from_iter([OsString::from("create-superuser")])
        .wrap_err("failed to load settings")?;
    let database_url = resolve_database_url(args.database_url, settings.database_url.clone())?;
    let token_key = persistent_key(
        token_key_from_env(&DefaultEnv::new(), BuildMode::Release)
            .wrap_err("failed to load token key")?,
    )?;

    run_pending_migrations(&database_url)
        .await
        .wrap_err("failed to apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("failed to create database pool")?;
    let users = Arc::new(DieselUserRepository::new(pool.clone()));

    if let Some(new_user) = new_user {
        let user = users
            .create(&new_user)
            .await
            .wrap_err("failed to create superuser")?;
        println!("created superuser {} (id {})", user.username, user.id);
    }

    let accounts = DomainAccountService::new(AccountServiceDeps {
        users,
        pending: Arc::new(DieselPendingConfirmationRepository::new(pool)),
        mailer: mailer_from_settings(&settings).wrap_err("failed to configure mail")?,
        tokens: Arc::new(JwtAccessTokenIssuer::new(
            &token_key.key,
            settings.token_ttl(),
        )),
        signer: Arc::new(
            ConfirmationCodeSigner::new(&token_key.key).wrap_err("token key rejected")?,
        ),
        clock: Arc::new(DefaultClock),
    });
    let code = accounts
        .reissue_confirmation(&username)
        .await
        .wrap_err("failed to issue confirmation code")?;

    println!(
        "confirmation code for {username} (valid for {CONFIRMATION_TTL_MINUTES} minutes): {code}"
    );
    println!("exchange it with POST /v1/auth/token/");
    Ok(())
}

/// Reject keys generated for this process; the server could not verify codes
/// signed with them.
fn persistent_key(config: TokenKeyConfig) -> Result<TokenKeyConfig> {
    if config.ephemeral {
        return Err(eyre!(
            "a persistent token key is required; point YAMDB_TOKEN_KEY_FILE at the server's key"
        ));
    }
    Ok(config)
}

fn superuser_from_args(username: &str, email: &str) -> Result<NewUser> {
    let username = Username::for_registration(username).wrap_err("invalid --username")?;
    let email = EmailAddress::new(email).wrap_err("invalid --email")?;
    Ok(NewUser::superuser(username, email))
}

fn resolve_database_url(explicit: Option<String>, configured: Option<String>) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }
    match configured {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(eyre!("{DATABASE_URL_ENV} must not be empty")),
        None => Err(eyre!(
            "database URL missing: set --database-url or {DATABASE_URL_ENV}"
        )),
    }
}
