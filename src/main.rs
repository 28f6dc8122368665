use std::net::SocketAddr;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use socratic_seminar::{
    config::Config,
    models::{ConversationMessage, PaymentClaim, SeminarState},
    payment::WalletClient,
    routes::create_router,
    utils::init_logger,
    SeminarGraph,
};

#[derive(Parser)]
#[command(name = "socratic-seminar", version, about = "Payment-gated Socratic dialogue agent")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (wallet service and seminar agent)
    Serve,
    /// Run one seminar turn from the terminal
    Ask {
        /// The question or statement to examine
        message: String,
        /// Cashu token paying for the turn
        #[arg(long)]
        token: Option<String>,
        /// Claimed amount in sats
        #[arg(long, default_value_t = 0)]
        amount: u64,
    },
    /// Show the balance reported by the wallet service
    Balance,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        dev_mode = config.payment.dev_mode,
        model = %config.llm.model,
        "Configuration loaded"
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Ask { message, token, amount } => ask(config, message, token, amount).await,
        Command::Balance => balance(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting Socratic Seminar backend...");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = socratic_seminar::build_state(config)?;
    let app = create_router(state);

    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

async fn ask(config: Config, message: String, token: Option<String>, amount: u64) -> anyhow::Result<()> {
    let graph = SeminarGraph::from_config(&config)?;

    let mut state = SeminarState::new(vec![ConversationMessage::human(message)]);
    if let Some(token) = token {
        state = state.with_payment(PaymentClaim::new(token, amount));
    }

    let result = graph.invoke(state).await?;

    if !result.payment_validated {
        let reason = result.payment_error.as_deref().unwrap_or("payment rejected");
        anyhow::bail!("Run ended before the agent replied: {}", reason);
    }

    if let Some(reply) = result.messages.last() {
        println!("{}", reply.content());
    }
    if let Some(amount) = result.redeemed_amount {
        info!(amount, "Payment redeemed");
    }
    Ok(())
}

async fn balance(config: Config) -> anyhow::Result<()> {
    let client = WalletClient::new(&config.wallet)?;
    let balance = client.balance().await?;
    println!("{}", serde_json::to_string_pretty(&balance)?);
    Ok(())
}
