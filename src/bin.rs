//! Command-line entry point for `faq-bot`.
//!
//! Parses flags, installs the tracing subscriber, loads the configuration and
//! either validates it (`--check-config`) or runs the webhook server.

use std::path::PathBuf;

use clap::Parser;
use faq_bot::base::{config::Config, types::Void};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Faq-bot: answers LINE messages from keyword lists.
///
/// Settings are read from a TOML file and may be overridden by `FAQ_BOT_*`
/// environment variables (e.g. `FAQ_BOT_LISTEN_ADDRESS=127.0.0.1:8080`).
/// Sensitive messages get an escalation reply, purchase requests a sales
/// hand-off, and common questions their FAQ answer.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Config file to read instead of `.hidden/config.toml`.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v: DEBUG, -vv: TRACE).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP/HTTP (endpoint from `OTEL_EXPORTER_OTLP_ENDPOINT`).
    #[arg(long)]
    otlp: bool,
    /// Load and validate the configuration, print a summary, then exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    init_tracing(args.verbose, args.otlp)?;

    let config = Config::load(args.config.as_deref())?;

    if args.check_config {
        info!(
            listen_address = %config.listen_address,
            webhook_path = %config.webhook_path,
            verify_signature = config.verify_signature,
            policy = ?config.event_policy,
            danger_words = config.keywords.danger_words.len(),
            buy_words = config.keywords.buy_words.len(),
            faq_entries = config.keywords.faq.len(),
            "Configuration is valid."
        );

        return Ok(());
    }

    faq_bot::start(config).await
}

fn init_tracing(verbose: u8, otlp: bool) -> Void {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // One line per finished span.
    let stdout = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_level(true)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    // Span export stays off unless asked for.
    let otel = if otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_batch_exporter(exporter).build().tracer("faq-bot");

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).try_init()?;

    Ok(())
}
