//! Passage CLI - Main Entry Point
//!
//! Wires configuration, the reqwest transport and the auth session together,
//! then runs one authentication operation per invocation.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use passage_application::{AuthSession, HttpTransport};
use passage_domain::{AuthSuccessResponse, User};
use passage_infrastructure::{DEFAULT_BASE_URL, ReqwestTransport, TracingReporter, TransportConfig};

#[derive(Parser, Debug)]
#[command(name = "passage", version, about = "Sign in to the authentication service")]
struct Cli {
    /// Base URL of the service; auth endpoints resolve under it.
    #[arg(long, env = "PASSAGE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "PASSAGE_TIMEOUT_MS", default_value_t = 30_000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Show the currently signed-in user.
    Me,
    /// Email a one-time sign-in code.
    RequestCode(CodeRequestArgs),
    /// Verify a one-time sign-in code.
    VerifyCode(VerifyArgs),
    /// Request a code, read it from stdin, and verify it.
    Login(CodeRequestArgs),
    /// Sign in as a guest.
    Anonymous,
    /// Sign out.
    SignOut,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct CodeRequestArgs {
    /// Address the code is sent to.
    #[arg(long)]
    email: String,
    /// Use the dashboard login flow.
    #[arg(long)]
    dashboard: bool,
}

#[derive(Args, Debug, PartialEq, Eq)]
struct VerifyArgs {
    /// Address the code was sent to.
    #[arg(long)]
    email: String,
    /// The one-time code.
    #[arg(long)]
    code: String,
    /// Use the dashboard login flow.
    #[arg(long)]
    dashboard: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = TransportConfig::new(&cli.base_url)?
        .with_timeout(Duration::from_millis(cli.timeout_ms));
    tracing::debug!(base_url = %config.base_url, "starting Passage v{}", env!("CARGO_PKG_VERSION"));

    let transport = Arc::new(ReqwestTransport::new(config)?);
    let session = AuthSession::builder(transport)
        .reporter(Arc::new(TracingReporter::new()))
        .build();

    let mut states = session.subscribe();
    let initial = states.recv().await.flatten();
    tracing::debug!(signed_in = initial.is_some(), "startup probe finished");

    let outcome = run(&session, cli.command).await;
    session.dispose();
    outcome
}

async fn run<T>(session: &AuthSession<T>, command: Command) -> Result<(), Box<dyn Error>>
where
    T: HttpTransport + ?Sized + 'static,
{
    match command {
        Command::Me => {
            let user = session.get_current_user().await?;
            print_user(user.as_ref())?;
        }
        Command::RequestCode(args) => {
            session.request_sign_in_code(&args.email, args.dashboard).await?;
            println!("Sign-in code sent to {}", args.email);
        }
        Command::VerifyCode(args) => {
            let response = session
                .verify_sign_in_code(&args.email, &args.code, args.dashboard)
                .await?;
            print_signed_in(&response)?;
        }
        Command::Login(args) => {
            session.request_sign_in_code(&args.email, args.dashboard).await?;
            println!("Sign-in code sent to {}. Enter it below:", args.email);

            let code = read_code().await?;
            let response = session
                .verify_sign_in_code(&args.email, &code, args.dashboard)
                .await?;
            print_signed_in(&response)?;
        }
        Command::Anonymous => {
            let response = session.sign_in_anonymously().await?;
            print_signed_in(&response)?;
        }
        Command::SignOut => {
            session.sign_out().await;
            println!("Signed out");
        }
    }
    Ok(())
}

async fn read_code() -> Result<String, Box<dyn Error>> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    let code = line.trim();
    if code.is_empty() {
        return Err("no code entered".into());
    }
    Ok(code.to_string())
}

fn print_user(user: Option<&User>) -> Result<(), serde_json::Error> {
    match user {
        Some(user) => println!("{}", serde_json::to_string_pretty(user)?),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn print_signed_in(response: &AuthSuccessResponse) -> Result<(), serde_json::Error> {
    println!("Signed in as {} (token {})", response.user.label(), response.token.preview());
    print_user(Some(&response.user))
}
