//! Console frontend: startup health probe, patient lookup flow, chat loop.
//!
//! Rendering helpers are pure string builders so the timeline presentation
//! (agent label, confidence meter, inline citations) stays testable; the
//! loop functions only do prompt/read/print plumbing around them.

use std::io::{self, BufRead, Write};

use crate::backend::{BackendClient, BackendError};
use crate::config;
use crate::confidence::{
    confidence_percent, estimate_confidence, inline_citation_labels, ConfidenceBand,
};
use crate::export::{self, ExportError};
use crate::models::{Citation, LookupStatus, PatientReport};
use crate::session::{agent_label, describe_handoff, ChatSession, Role, TimelineEntry};

const DISCLAIMER: &str =
    "This is an AI assistant for educational purposes only. Not medical advice.";

/// Meter bar width in characters.
const METER_WIDTH: usize = 10;

const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Backend not reachable ({0})")]
    BackendUnreachable(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// How a chat loop ended.
enum ChatExit {
    ChangePatient,
    Quit,
}

/// Run the console app: health probe, then lookup → chat until quit.
pub fn run(client: &BackendClient) -> Result<(), AppError> {
    if let Err(e) = client.health() {
        tracing::error!(error = %e, "Health check failed");
        return Err(AppError::BackendUnreachable(client.base_url().to_string()));
    }

    println!("{} — Post-Discharge (Nephrology) POC", config::APP_NAME);
    println!("{DISCLAIMER}");
    println!();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let patient = match resolve_patient(client, &mut input)? {
            Some(p) => p,
            None => return Ok(()),
        };

        let mut session = ChatSession::new(patient);
        match chat_loop(client, &mut session, &mut input)? {
            ChatExit::ChangePatient => continue,
            ChatExit::Quit => return Ok(()),
        }
    }
}

/// Patient lookup flow. Returns `None` when the user quits.
fn resolve_patient(
    client: &BackendClient,
    input: &mut impl BufRead,
) -> Result<Option<PatientReport>, AppError> {
    println!("Find your discharge report.");

    // A non-numeric reply to the "multiple matches" prompt is carried over
    // as the next lookup query.
    let mut pending: Option<String> = None;

    loop {
        let name = match pending.take() {
            Some(line) => line,
            None => match prompt_line("Enter your full name (or :quit): ", input)? {
                Some(line) => line,
                None => return Ok(None),
            },
        };
        if name.is_empty() {
            continue;
        }
        if name == ":quit" {
            return Ok(None);
        }

        let result = match client.lookup_patient(&name) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Patient lookup failed");
                println!("Lookup failed. Please try again.");
                continue;
            }
        };

        match result.status {
            LookupStatus::NotFound => {
                println!("No patient found.");
            }
            LookupStatus::Multiple => {
                println!("Multiple matches found. Please refine:");
                for (i, m) in result.matches.iter().enumerate() {
                    println!("  {}. {}", i + 1, m.patient_name);
                }
                let choice = match prompt_line("Pick a number or retype the name: ", input)? {
                    Some(line) => line,
                    None => return Ok(None),
                };
                match choice.parse::<usize>() {
                    Ok(n) if n >= 1 && n <= result.matches.len() => {
                        if let Some(report) = result.matches.into_iter().nth(n - 1) {
                            println!("{}", render_patient_summary(&report));
                            return Ok(Some(report));
                        }
                    }
                    _ => pending = Some(choice),
                }
            }
            LookupStatus::Ok => {
                if let Some(report) = result.matches.into_iter().next() {
                    println!("{}", render_patient_summary(&report));
                    return Ok(Some(report));
                }
                // "ok" with no matches is a backend bug; retry rather than crash.
                tracing::warn!("Lookup returned ok with no matches");
                println!("No patient found.");
            }
        }
    }
}

/// Chat loop for one resolved patient.
fn chat_loop(
    client: &BackendClient,
    session: &mut ChatSession,
    input: &mut impl BufRead,
) -> Result<ChatExit, AppError> {
    println!(
        "Patient: {} • Diagnosis: {}",
        session.patient().patient_name,
        session.patient().diagnosis
    );
    println!("Commands: :citations  :logs  :patient  :quit");

    loop {
        let line = match prompt_line("you> ", input)? {
            Some(line) => line,
            None => return Ok(ChatExit::Quit),
        };

        match line.as_str() {
            ":quit" => return Ok(ChatExit::Quit),
            ":patient" => {
                session.reset();
                return Ok(ChatExit::ChangePatient);
            }
            ":citations" => {
                println!("{}", render_citation_list(session.last_citations()));
            }
            ":logs" => match export::download_agent_log(client, &config::exports_dir()) {
                Ok(path) => println!("Agent log saved to {}", path.display()),
                Err(ExportError::Backend(e)) => {
                    tracing::warn!(error = %e, "Log export failed");
                    println!("Could not fetch the agent log.");
                }
                Err(ExportError::Io(e)) => {
                    tracing::warn!(error = %e, "Log export failed");
                    println!("Could not write the agent log.");
                }
            },
            _ => {
                if session.send(client, &line).is_some() {
                    if let Some(handoff) = session.last_handoff() {
                        println!("{}", describe_handoff(handoff));
                    }
                    if let Some(entry) = session.entries().last() {
                        if entry.role == Role::Assistant {
                            println!("{}", render_assistant_entry(entry));
                        }
                    }
                }
            }
        }
    }
}

fn prompt_line(prompt: &str, input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

// ═══════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════

fn band_color(band: ConfidenceBand) -> &'static str {
    match band {
        ConfidenceBand::High => ANSI_GREEN,
        ConfidenceBand::Medium => ANSI_YELLOW,
        ConfidenceBand::Low => ANSI_RED,
    }
}

/// Text confidence meter: colored bar, rounded percent, band name.
pub fn render_confidence_meter(value: f64) -> String {
    let pct = confidence_percent(value);
    let band = ConfidenceBand::from_fraction(value);
    let filled = (pct as usize * METER_WIDTH).div_ceil(100).min(METER_WIDTH);
    format!(
        "{}[{}{}] {}% {}{}",
        band_color(band),
        "█".repeat(filled),
        "░".repeat(METER_WIDTH - filled),
        pct,
        band.as_str(),
        ANSI_RESET,
    )
}

/// One assistant turn: agent label, meter (except for local system turns),
/// answer text, and up to three inline citation labels.
pub fn render_assistant_entry(entry: &TimelineEntry) -> String {
    let agent = entry.agent.as_deref().unwrap_or("system");
    let mut out = String::new();

    if agent == "system" {
        out.push_str(&format!("[{}]\n", agent_label(agent)));
    } else {
        let conf = estimate_confidence(Some(entry.citations.as_slice()));
        out.push_str(&format!(
            "[{}] {}\n",
            agent_label(agent),
            render_confidence_meter(conf)
        ));
    }

    out.push_str(&entry.content);

    let cites = inline_citation_labels(&entry.citations);
    if !cites.is_empty() {
        out.push('\n');
        out.push_str(&cites);
    }
    out
}

/// Citation viewer: section (or "Reference"), page, score to 3 decimals.
pub fn render_citation_list(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return "No citations.".to_string();
    }

    let mut out = String::from("Source Citations");
    for (i, c) in citations.iter().enumerate() {
        let mut line = format!("\n  {}. {}", i + 1, c.section.as_deref().unwrap_or("Reference"));
        if let Some(page) = c.page {
            line.push_str(&format!(" (p. {page})"));
        }
        if let Some(score) = c.score {
            line.push_str(&format!(" • score: {score:.3}"));
        }
        out.push_str(&line);
    }
    out
}

/// Discharge report summary shown after a successful lookup.
pub fn render_patient_summary(report: &PatientReport) -> String {
    format!(
        "Summary\n  Diagnosis: {}\n  Medications: {}\n  Dietary: {}\n  Follow-up: {}\n  Warnings: {}\n  Discharge: {}",
        report.diagnosis,
        report.medications.join(", "),
        report.dietary_restrictions.join(", "),
        report.follow_up_instructions.join("; "),
        report.warning_signs.join("; "),
        report.discharge_instructions.join("; "),
    )
}
