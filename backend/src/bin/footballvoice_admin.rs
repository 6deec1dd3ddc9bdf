//! Provision an admin account. The password is read from the first line of
//! standard input so it never appears in shell history or process lists.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, BufRead};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

use footballvoice::domain::{AdminService, EmailAddress};
use footballvoice::outbound::mailer::TracingMailer;
use footballvoice::outbound::persistence::{
    DbPool, DieselAdminRepository, DieselLoginCodeRepository, PoolConfig, run_pending_migrations,
};

/// `footballvoice-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "footballvoice-admin",
    about = "Create an admin account for the FootballVoice dashboard",
    version
)]
struct CliArgs {
    /// Display name of the new admin.
    #[arg(long, value_name = "name")]
    name: String,
    /// Sign-in email of the new admin.
    #[arg(long, value_name = "email")]
    email: String,
    /// Database connection URL.
    #[arg(long = "database-url", value_name = "url")]
    database_url: String,
    /// Apply pending migrations before inserting.
    #[arg(long)]
    migrate: bool,
}

fn read_password(input: impl BufRead) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    let mut input = input;
    input
        .read_line(&mut line)
        .wrap_err("failed to read password from stdin")?;
    let trimmed = Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_owned());
    if trimmed.is_empty() {
        return Err(eyre!("no password supplied on stdin"));
    }
    Ok(trimmed)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::parse();
    let email = EmailAddress::parse(&args.email).wrap_err("invalid --email")?;
    let password = read_password(io::stdin().lock())?;

    if args.migrate {
        run_pending_migrations(&args.database_url)
            .await
            .wrap_err("database migration failed")?;
    }
    let pool = DbPool::new(PoolConfig::new(args.database_url.as_str()).with_max_size(1))
        .await
        .wrap_err("database pool setup failed")?;
    let service = AdminService::new(
        Arc::new(DieselAdminRepository::new(pool.clone())),
        Arc::new(DieselLoginCodeRepository::new(pool)),
        Arc::new(TracingMailer),
        Arc::new(DefaultClock),
    );

    let profile = service
        .provision(&args.name, email, &password)
        .await
        .map_err(|err| eyre!("could not create admin: {}", err.message()))?;
    println!("created admin {} <{}>", profile.id, profile.email);
    Ok(())
}
