use alloy_network::EthereumWallet;
use alloy_provider::ProviderBuilder;
use alloy_signer_local::PrivateKeySigner;
use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use poolsafe_coordinator::MultisigService;
use poolsafe_store::MemoryStore;
use safe_multisig::provider::{AlloyEvmProvider, EvmProvider};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use url::Url;

use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "poolsafe-server",
    version = poolsafe_version::VERSION,
    about = "Multisig transaction coordinator for the lending pool platform"
)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080", env = "POOLSAFE_LISTEN")]
    listen: String,

    /// Ethereum JSON-RPC endpoint.
    #[arg(long, env = "POOLSAFE_RPC_URL")]
    rpc_url: Url,

    /// Private key used to submit execution transactions. Without it the
    /// server can propose and collect signatures but not execute.
    #[arg(long, env = "POOLSAFE_EXECUTOR_KEY")]
    executor_key: Option<String>,

    /// Allowed CORS origins, comma separated. "*" allows everything.
    #[arg(long, default_value = "*", value_delimiter = ',', env = "POOLSAFE_CORS_ORIGINS")]
    cors_allowed_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let provider: Arc<dyn EvmProvider> = match &args.executor_key {
        Some(key) => {
            let signer: PrivateKeySigner = key.parse()?;
            let wallet = EthereumWallet::from(signer);
            let inner = ProviderBuilder::new().wallet(wallet).on_http(args.rpc_url.clone());
            Arc::new(AlloyEvmProvider::new(inner))
        }
        None => {
            let inner = ProviderBuilder::new().on_http(args.rpc_url.clone());
            Arc::new(AlloyEvmProvider::new(inner))
        }
    };

    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(MultisigService::new(store, provider));

    let router = poolsafe_server::create_router(service)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&args.cors_allowed_origins)?);

    let listener = TcpListener::bind(&args.listen).await?;
    tracing::info!(version = poolsafe_version::VERSION, "server listening at {}", args.listen);

    axum::serve(listener, router).await?;

    Ok(())
}

fn create_cors_layer<S>(allowed_origins: &[S]) -> eyre::Result<CorsLayer>
where
    S: AsRef<str>,
{
    if allowed_origins.iter().map(AsRef::as_ref).any(|s| s == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(AsRef::as_ref)
        .map(HeaderValue::from_str)
        .collect::<Result<_, _>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Ok(cors)
}
