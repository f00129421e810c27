use crate::infra::FileClipboard;
use agent_card::analytics::{RecordingAnalytics, UtmParams};
use agent_card::config::AppConfig;
use agent_card::contacts::{Contact, ContactDirectory, VCardSource, VCardStore};
use agent_card::error::AppError;
use agent_card::workflows::estimation::{EstimationContext, EstimationStarter};
use agent_card::workflows::leads::{LeadCaptureService, LeadKind, RecordingMailer};
use agent_card::workflows::qualification::{
    build_dossier, copy_dossier, dossier_mailto, render_text, FieldKey, FieldUpdate, FormAnswers,
    ProjectionContext, QualificationSession, StepCatalog, TransitionOutcome, WorkflowAction,
    WorkflowStatus,
};
use chrono::Utc;
use clap::Args;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DossierArgs {
    /// Answers as inline JSON (camelCase keys) or a path to a JSON file
    #[arg(long)]
    pub(crate) answers: String,
    /// Contact whose card the dossier is addressed to
    #[arg(long, default_value = "matthis")]
    pub(crate) contact: String,
    /// Also write the dossier to this file, as the copy button would
    #[arg(long)]
    pub(crate) copy_to: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct VCardArgs {
    /// Contact slug
    pub(crate) slug: String,
    /// Directory holding `contacts/{slug}.vcf` overrides (defaults to APP_PUBLIC_DIR)
    #[arg(long)]
    pub(crate) public_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Contact whose qualification flow is walked through
    #[arg(long, default_value = "matthis")]
    pub(crate) contact: String,
    /// Write the final dossier to this file
    #[arg(long)]
    pub(crate) copy_to: Option<PathBuf>,
    /// Skip the newsletter and private-access sign-up part of the demo
    #[arg(long)]
    pub(crate) skip_leads: bool,
}

fn lookup(directory: &ContactDirectory, slug: &str) -> Result<Contact, AppError> {
    directory
        .by_slug(slug)
        .cloned()
        .ok_or_else(|| AppError::UnknownContact(slug.to_string()))
}

pub(crate) fn load_answers(raw: &str) -> Result<FormAnswers, AppError> {
    let text = if raw.trim_start().starts_with('{') {
        raw.to_string()
    } else {
        fs::read_to_string(raw)?
    };
    Ok(serde_json::from_str(&text)?)
}

fn copy_to_file(path: PathBuf, dossier: &str) {
    let clipboard = FileClipboard::new(path.clone());
    let now = Utc::now();
    let feedback = copy_dossier(&clipboard, dossier, now);
    if feedback.is_copied(now) {
        println!("{} -> {}", feedback.button_label(now), path.display());
    } else {
        println!("Copie impossible vers {}", path.display());
    }
}

pub(crate) fn run_dossier(args: DossierArgs) -> Result<(), AppError> {
    let DossierArgs {
        answers,
        contact,
        copy_to,
    } = args;

    let directory = ContactDirectory::standard();
    let contact = lookup(&directory, &contact)?;
    let answers = load_answers(&answers)?;
    let dossier = build_dossier(&answers, contact.name);

    println!("{dossier}");
    if let Some(path) = copy_to {
        copy_to_file(path, &dossier);
    }
    Ok(())
}

pub(crate) fn run_vcard(args: VCardArgs) -> Result<(), AppError> {
    let public_dir = match args.public_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.assets.public_dir,
    };
    let store = VCardStore::new(public_dir, ContactDirectory::standard());
    let (body, source) = store
        .resolve(&args.slug)
        .ok_or_else(|| AppError::UnknownContact(args.slug.clone()))?;

    if source == VCardSource::StaticFile {
        eprintln!("(static file)");
    }
    println!("{body}");
    Ok(())
}

/// Scripted answers, grouped by the step that collects them.
fn scripted_answers() -> Vec<Vec<(FieldKey, Value)>> {
    vec![
        vec![
            (FieldKey::FullName, json!("Nolwenn Le Bihan")),
            (FieldKey::Email, json!("nolwenn@example.bzh")),
            (FieldKey::Phone, json!("06 11 22 33 44")),
            (FieldKey::ContactPreference, json!("phone")),
            (FieldKey::HasExperience, json!("yes")),
        ],
        vec![
            (FieldKey::ProjectType, json!("sell")),
            (FieldKey::ProjectLocation, json!("Châteaulin")),
            (FieldKey::PropertyType, json!("other")),
            (FieldKey::PropertyTypeOther, json!("Longère")),
            (FieldKey::PropertyDetails, json!("140 m², 2 000 m² de terrain")),
            (FieldKey::PropertyCondition, json!("light")),
            (FieldKey::Motivation, json!("Départ à la retraite")),
        ],
        vec![
            (FieldKey::Timeline, json!("soon")),
            (FieldKey::FinancingStatus, json!("cash")),
            (FieldKey::SellBeforeBuy, json!("yes")),
        ],
        vec![
            (FieldKey::PriceExpectation, json!("310 000 €")),
            (FieldKey::PriceEstimationMethod, json!("comparison")),
            (FieldKey::ContactedAgencies, json!("yes")),
            (FieldKey::ContactedAgencyDetails, json!("Une estimation en 2023")),
        ],
        vec![
            (FieldKey::DiscoveredVia, json!("recommendation")),
            (FieldKey::ReasonToWork, json!("Suivi rigoureux et connaissance du secteur")),
            (FieldKey::MotivationLevel, json!(9)),
        ],
        vec![
            (FieldKey::CallbackPreference, json!("yes")),
            (FieldKey::ValidationAccepted, json!(true)),
            (FieldKey::CommitmentConfirmed, json!(true)),
        ],
    ]
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        contact,
        copy_to,
        skip_leads,
    } = args;

    let directory = ContactDirectory::standard();
    let contact = lookup(&directory, &contact)?;
    let analytics = RecordingAnalytics::default();
    let utms = UtmParams::from_pairs([("utm_source", "cli"), ("utm_medium", "demo")]);

    let mut starter = EstimationStarter::new(
        Arc::new(analytics.clone()),
        EstimationContext {
            utms: utms.clone(),
            ..EstimationContext::default()
        },
    );
    starter.start();

    let steps = Arc::new(StepCatalog::standard());
    let mut session = QualificationSession::start_with_utms(
        steps,
        Arc::new(analytics.clone()),
        contact.name,
        utms,
    );
    let ctx = ProjectionContext {
        contact_email: contact.email,
        copied: false,
    };

    println!("Qualification demo for {}", contact.name);

    // An empty first step is refused before any answer is given.
    if let TransitionOutcome::Blocked { missing, .. } = session.apply(WorkflowAction::Next)? {
        println!("\n{}", render_text(&session.view(ctx)));
        println!("-> blocked, {} field(s) to complete", missing.len());
    }

    for fields in scripted_answers() {
        for (field, value) in fields {
            session.apply(WorkflowAction::UpdateField(FieldUpdate::new(field, value)))?;
        }
        let outcome = session.apply(WorkflowAction::Next)?;
        println!("\n{}", render_text(&session.view(ctx)));
        println!("-> {}", describe(&outcome));
    }

    if session.state().status == WorkflowStatus::Review {
        let outcome = session.apply(WorkflowAction::Submit)?;
        println!("\n{}", render_text(&session.view(ctx)));
        println!("-> {}", describe(&outcome));
    }

    let dossier = session.dossier();
    println!("\n{dossier}");
    if let Some(email) = contact.email {
        println!("\nS'envoyer une copie: {}", dossier_mailto(email, &dossier));
    }
    if let Some(path) = copy_to {
        copy_to_file(path, &dossier);
    }

    println!("\nAnalytics events:");
    for event in analytics.events() {
        println!("  - {} {:?}", event.name, event.properties);
    }

    if skip_leads {
        return Ok(());
    }

    println!("\nSign-up demo (mail kept in memory)");
    let mailer = RecordingMailer::default();
    let leads = LeadCaptureService::new(Arc::new(mailer.clone()));
    for (kind, email) in [
        (LeadKind::Newsletter, "lecteur@example.bzh"),
        (LeadKind::PrivateAccess, "pas-une-adresse"),
    ] {
        match leads.capture(kind, &json!({ "email": email })) {
            Ok(receipt) => println!("- {:?}: {}", kind, receipt.message.replace('\n', " ")),
            Err(err) => println!("- {:?}: {}", kind, err),
        }
    }
    for email in mailer.sent() {
        println!("  notified: {}", email.subject);
    }

    Ok(())
}

fn describe(outcome: &TransitionOutcome) -> String {
    match outcome {
        TransitionOutcome::Advanced { from, to } => format!("step {} -> {}", from + 1, to + 1),
        TransitionOutcome::Blocked { missing, .. } => {
            format!("blocked, {} field(s) to complete", missing.len())
        }
        TransitionOutcome::EnteredReview => "review".to_string(),
        TransitionOutcome::Submitted => "submitted".to_string(),
        TransitionOutcome::Rejected { reason } => format!("rejected: {}", reason.message()),
        other => format!("{other:?}"),
    }
}
