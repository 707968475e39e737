//! Terminal presentations over the estimator session state.
//!
//! Both layouts are pure functions of the same snapshot; no control logic
//! lives here.

use std::fmt::Display;

use client_core::{FormData, Screen, SessionSnapshot, SubmissionPhase};
use shared::protocol::{CostEstimate, RangeTriple};

pub trait EstimateRenderer {
    fn render(&self, snapshot: &SessionSnapshot, form: &FormData) -> String;
}

/// Two-screen flow: the form until the first success, then the results.
pub struct WizardRenderer;

impl EstimateRenderer for WizardRenderer {
    fn render(&self, snapshot: &SessionSnapshot, form: &FormData) -> String {
        match (snapshot.screen, snapshot.estimate.as_ref()) {
            (Screen::Results, Some(estimate)) => render_results(estimate),
            _ => render_form_screen(snapshot, form),
        }
    }
}

/// Split-pane flow: form pane and results pane over the same state.
pub struct SplitPaneRenderer;

impl EstimateRenderer for SplitPaneRenderer {
    fn render(&self, snapshot: &SessionSnapshot, form: &FormData) -> String {
        let mut out = render_form_screen(snapshot, form);
        out.push('\n');
        match snapshot.estimate.as_ref() {
            Some(estimate) => out.push_str(&render_results(estimate)),
            None => out.push_str("No estimate yet. Submit the form to calculate one.\n"),
        }
        out
    }
}

fn selection<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "(not selected)".to_owned(),
    }
}

fn money(range: &RangeTriple) -> String {
    format!(
        "${:.2} - ${:.2} (avg ${:.2})",
        range.min, range.max, range.avg
    )
}

fn render_form_screen(snapshot: &SessionSnapshot, form: &FormData) -> String {
    let mut out = String::new();
    out.push_str("Voice AI Cost Estimator\n");
    out.push_str("=======================\n");
    out.push_str(&format!("Calls per day:        {}\n", form.calls_per_day));
    out.push_str(&format!(
        "Avg call duration:    {} min\n",
        form.avg_call_duration
    ));
    out.push_str(&format!("Estimated users:      {}\n", form.estimated_users));
    out.push_str(&format!(
        "LLM provider:         {}\n",
        selection(&form.llm_provider)
    ));
    out.push_str(&format!(
        "STT provider:         {}\n",
        selection(&form.stt_provider)
    ));
    out.push_str(&format!(
        "TTS provider:         {}\n",
        selection(&form.tts_provider)
    ));
    out.push_str(&format!(
        "Knowledge base size:  {}\n",
        selection(&form.knowledge_base_size)
    ));

    match snapshot.phase {
        SubmissionPhase::Submitting => out.push_str("\nCalculating estimate...\n"),
        SubmissionPhase::Failed => {
            if let Some(message) = &snapshot.failure_message {
                out.push_str(&format!("\n{message}\n"));
            }
        }
        SubmissionPhase::Idle | SubmissionPhase::Success => {}
    }

    out
}

fn render_results(estimate: &CostEstimate) -> String {
    let summary = &estimate.cost_summary;
    let details = &estimate.service_details;

    let mut out = String::new();
    out.push_str("Estimated Monthly Costs\n");
    out.push_str("=======================\n");
    out.push_str(&format!(
        "Total:               {}\n",
        money(&summary.total_monthly_cost)
    ));
    out.push_str(&format!("LLM:                 {}\n", money(&summary.llm_cost)));
    out.push_str(&format!(
        "Knowledge base:      {}\n",
        money(&summary.knowledge_base_token_cost)
    ));
    out.push_str(&format!("Speech-to-text:      {}\n", money(&summary.stt_cost)));
    out.push_str(&format!("Text-to-speech:      {}\n", money(&summary.tts_cost)));
    out.push_str(&format!(
        "Voice carrier:       {}\n",
        money(&summary.voice_carrier_cost)
    ));
    out.push_str(&format!(
        "Server:              {}\n",
        money(&summary.server_cost)
    ));
    out.push_str(&format!(
        "Per user:            {}\n",
        money(&summary.cost_per_user)
    ));
    out.push_str(&format!(
        "Per call:            {}\n",
        money(&summary.cost_per_call)
    ));

    out.push_str("\nServices\n");
    out.push_str("--------\n");
    out.push_str(&format!(
        "LLM:   {} {} ({})\n",
        details.llm.provider, details.llm.model, details.llm.description
    ));
    out.push_str(&format!(
        "STT:   {} {} ({})\n",
        details.stt.provider, details.stt.model, details.stt.description
    ));
    out.push_str(&format!(
        "TTS:   {} {} ({})\n",
        details.tts.provider, details.tts.model, details.tts.description
    ));
    out.push_str(&format!("Carrier: {}\n", details.voice_carrier.provider));
    out.push_str(&format!(
        "Server:  {} ({})\n",
        details.server.provider, details.server.instance_type
    ));

    if let Some(recs) = &estimate.recommendations {
        out.push_str("\nRecommendations\n");
        out.push_str("---------------\n");
        out.push_str(&format!("Best value LLM:    {}\n", recs.best_value_llm));
        out.push_str(&format!("Best quality LLM:  {}\n", recs.best_quality_llm));
        out.push_str(&format!("Best balanced LLM: {}\n", recs.best_balanced_llm));
        out.push_str(&format!("Best STT:          {}\n", recs.best_stt));
        out.push_str(&format!("Best TTS:          {}\n", recs.best_tts));
    }

    out
}
