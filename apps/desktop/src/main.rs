use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use client_core::{
    CostEstimatorClient, FormData, FormUpdate, SubmissionPhase, WebhookBackend,
};

mod config;
mod render;

use render::{EstimateRenderer, SplitPaneRenderer, WizardRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Two-screen flow: form first, results after a successful estimate.
    Wizard,
    /// Form pane and results pane rendered together.
    Split,
}

#[derive(Parser, Debug)]
#[command(about = "Estimate monthly running costs for a voice-AI deployment")]
struct Args {
    #[arg(long, default_value_t = 0)]
    calls_per_day: u32,
    /// Average call duration in minutes.
    #[arg(long, default_value_t = 0)]
    avg_call_duration: u32,
    #[arg(long, default_value_t = 0)]
    estimated_users: u32,
    /// LLM provider label, e.g. "OpenAI".
    #[arg(long)]
    llm: Option<String>,
    /// STT provider label, e.g. "Deepgram".
    #[arg(long)]
    stt: Option<String>,
    /// TTS provider label, e.g. "ElevenLabs".
    #[arg(long)]
    tts: Option<String>,
    /// Knowledge base bucket, e.g. "Medium (1-10MB)".
    #[arg(long)]
    knowledge_base: Option<String>,
    /// Overrides the configured estimation webhook endpoint.
    #[arg(long)]
    webhook_url: Option<String>,
    #[arg(long, value_enum, default_value_t = Layout::Wizard)]
    layout: Layout,
    /// Replays the failed submission up to this many times.
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

fn build_form(args: &Args) -> Result<FormData> {
    let mut form = FormData::default()
        .apply(FormUpdate::CallsPerDay(args.calls_per_day))
        .apply(FormUpdate::AvgCallDuration(args.avg_call_duration))
        .apply(FormUpdate::EstimatedUsers(args.estimated_users));

    if let Some(raw) = args.llm.as_deref() {
        form = form.apply(FormUpdate::LlmProvider(Some(raw.parse()?)));
    }
    if let Some(raw) = args.stt.as_deref() {
        form = form.apply(FormUpdate::SttProvider(Some(raw.parse()?)));
    }
    if let Some(raw) = args.tts.as_deref() {
        form = form.apply(FormUpdate::TtsProvider(Some(raw.parse()?)));
    }
    if let Some(raw) = args.knowledge_base.as_deref() {
        form = form.apply(FormUpdate::KnowledgeBaseSize(Some(raw.parse()?)));
    }

    Ok(form)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let form = build_form(&args)?;
    if !form.validate() {
        anyhow::bail!(
            "form is incomplete; missing: {}",
            form.missing_fields().join(", ")
        );
    }

    let mut settings = config::load_settings();
    if let Some(url) = args.webhook_url.clone() {
        settings.webhook_url = url;
    }
    let endpoint = config::parse_webhook_url(&settings.webhook_url)?;
    let backend = WebhookBackend::with_timeout(
        endpoint,
        Duration::from_secs(settings.request_timeout_seconds),
    )?;
    let client = CostEstimatorClient::new(Arc::new(backend));

    let renderer: Box<dyn EstimateRenderer> = match args.layout {
        Layout::Wizard => Box::new(WizardRenderer),
        Layout::Split => Box::new(SplitPaneRenderer),
    };

    let mut snapshot = client.submit(&form).await?;

    let mut retries_left = args.retries;
    while snapshot.phase == SubmissionPhase::Failed && retries_left > 0 {
        retries_left -= 1;
        tracing::info!(retries_left, "estimate submission failed, retrying");
        snapshot = client.retry().await;
    }

    println!("{}", renderer.render(&snapshot, &form));

    if snapshot.phase == SubmissionPhase::Failed {
        std::process::exit(1);
    }

    Ok(())
}
