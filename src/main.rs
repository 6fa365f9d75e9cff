use std::sync::Arc;

use rustformbot::{config::BotConfig, form::LogSink, schema::schema, state::BuilderState};
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::error_handlers::IgnoringErrorHandlerSafe;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let config = BotConfig::from_env()?;

    tracing_log::LogTracer::init()?;
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from_level(config.log_level))
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let bot = Bot::new(config.token);
    tracing::info!("Starting bot...");

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![InMemStorage::<BuilderState>::new(), Arc::new(LogSink)])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            tracing::info!(url = %webhook.url, addr = %webhook.addr, "listening for webhook updates");
            let listener = webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await?;
            dispatcher
                .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
                .await
        }
        None => dispatcher.dispatch().await,
    }

    Ok(())
}
