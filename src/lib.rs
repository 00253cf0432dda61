pub mod cache;
pub mod cli;
pub mod error;
pub mod logging;
pub mod models;
pub mod qa;
pub mod server;
pub mod slack;
pub mod workflow;

use cli::Args;
use log::{ info, warn };
use qa::QaConfig;
use server::api::AppState;
use server::Server;
use slack::reply::{ HttpReplyDispatcher, ReplyConfig, ReplyDispatcher };
use std::error::Error;
use std::num::NonZeroU32;
use std::sync::Arc;
use workflow::{ AskSettings, AskWorkflow, FeedbackWorkflow };

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Q&A Base URL: {}", args.qa_base_url);
    info!("Docs Root URL: {}", args.docs_root_url);
    info!("Cache Type: {}", args.cache_type);
    info!("Cache Namespace: {}", args.cache_namespace);
    info!("Cache TTL: {}s", args.cache_ttl_secs);
    info!("Reply Attempts: {} (errors: {})", args.reply_attempts, args.error_reply_attempts);
    info!("Rate Limit: {}/s", args.rate_limit_per_second);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    args.validate()?;

    let http = reqwest::Client
        ::builder()
        .user_agent(concat!("docs-askbot/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let store = cache::create_store(&args).await?;
    store.ping().await?;
    info!("Conversation store is reachable");

    let qa = qa::new_client(QaConfig::from(&args), http.clone());
    let replies: Arc<dyn ReplyDispatcher> = Arc::new(
        HttpReplyDispatcher::new(http, ReplyConfig::from(&args))
    );

    let ask = Arc::new(
        AskWorkflow::new(store, qa.clone(), replies.clone(), AskSettings::from(&args))
    );
    let feedback = Arc::new(FeedbackWorkflow::new(qa, replies.clone()));

    let rate = NonZeroU32::new(args.rate_limit_per_second).ok_or("rate limit must be non-zero")?;
    let state = AppState::new(args.signing_secret.clone(), ask, feedback, replies, rate);

    info!("Starting server on: {}", args.server_addr);
    Server::new(args.server_addr.clone(), state, args).run().await
}
