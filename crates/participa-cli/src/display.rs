//! Terminal rendering for classifications, protocol records and drafts.

use participa_classify::ClassificationResult;
use participa_core::protocol::format_date;
use participa_core::{ProtocolRecord, Subject, SubmissionResponse};
use participa_form::{FieldErrors, Step};
use participa_store::StoredDraft;

const LABEL_WIDTH: usize = 18;

fn field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("  {label:<LABEL_WIDTH$} {value}");
    }
}

// ── Classification ──

pub fn print_classification(result: &ClassificationResult) {
    println!("=== {} ===", result.subject_label);
    println!("{}", result.confidence.description());
    println!();
    field("subject", &result.subject_id);
    field("agency", &result.suggested_agency);
    field("confidence", result.confidence.as_str());
    field("keywords", &result.matched_keywords.join(", "));
    println!();
}

pub fn print_subjects(subjects: &[&Subject]) {
    if subjects.is_empty() {
        println!("(no subjects)");
        return;
    }
    for s in subjects {
        println!("  {:<14} {:<24} {}", s.id, s.label, s.suggested_agency);
    }
}

// ── Protocols ──

pub fn print_protocols(records: &[&ProtocolRecord]) {
    if records.is_empty() {
        println!("Nenhum protocolo registrado.");
        return;
    }
    println!(
        "{:<20} {:<18} {:<8} {:<16} {:<9} AGENCY",
        "PROTOCOL", "SUBJECT", "CHANNEL", "CREATED", "STATUS"
    );
    for r in records {
        println!(
            "{:<20} {:<18} {:<8} {:<16} {:<9} {}",
            r.protocol,
            r.subject_label,
            r.channel.display_name(),
            format_date(&r.created_at),
            r.status.as_str(),
            r.suggested_agency
        );
    }
    println!("\n{} protocolo(s)", records.len());
}

pub fn print_submission(reply: &SubmissionResponse) {
    println!("=== {} ===", reply.protocol);
    println!("{}", reply.message);
}

// ── Drafts ──

pub fn print_draft(draft: &StoredDraft) {
    let step = Step::try_from(draft.current_step)
        .map(|s| s.title().to_string())
        .unwrap_or_else(|_| draft.current_step.to_string());
    println!("=== Rascunho ({step}) ===");
    println!();

    println!("Identificação");
    let id = &draft.identification;
    if id.is_anonymous {
        field("anonymous", "yes");
    } else {
        field("name", &id.name);
        field("email", &id.email);
        field("phone", &id.phone);
    }
    println!();

    if draft.subject.is_selected() {
        println!("Assunto");
        field("subject", &draft.subject.subject_label);
        field("agency", &draft.subject.suggested_agency);
        println!();
    }

    println!("Conteúdo");
    field("channel", draft.content.channel.display_name());
    field("text", &draft.content.text);
    println!();
}

pub fn field_errors_message(errors: &FieldErrors) -> String {
    errors.messages().join("\n")
}
