use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use spotify_token_swap::{
    DEFAULT_TIMEOUT, RelayConfig, RelayError, RelayServer, TokenRelay, load_tls_config,
    setup_tracing,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "spotify-token-swap",
    version,
    about = "Swap and refresh Spotify OAuth tokens without shipping the client secret."
)]
struct Cli {
    /// Port to listen on
    port: u16,

    /// Address to bind; pass `::` to accept IPv6 as well on dual-stack hosts
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// PEM certificate chain for the HTTPS listener
    #[arg(long, default_value = "server.crt")]
    cert: PathBuf,

    /// PEM private key for the HTTPS listener
    #[arg(long, default_value = "server.key")]
    key: PathBuf,

    /// Deadline for each call to the token endpoint, in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    log_format: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_tracing(&cli.log_level, &cli.log_format);

    if let Err(err) = run(cli).await {
        error!(error = %err, "token swap relay stopped");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RelayError> {
    // rustls needs a process-wide crypto provider before the listener starts.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let config =
        RelayConfig::from_env()?.with_timeout(Duration::from_secs(cli.timeout_secs))?;
    info!(
        client_id = %config.client_id,
        token_url = %config.token_url,
        timeout = ?config.timeout,
        "starting token swap relay"
    );

    let tls = load_tls_config(&cli.cert, &cli.key).await?;
    let relay = TokenRelay::new(config)?;
    let addr = SocketAddr::new(cli.bind, cli.port);

    RelayServer::new(relay).serve_tls(addr, tls).await
}
