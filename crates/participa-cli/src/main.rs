mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use participa_classify::KeywordClassifier;
use participa_core::protocol::{filter_by_subject, search_records, unique_subjects};
use participa_core::{
    Attachment, Channel, Config, SUBJECT_CATEGORIES, SubmitMode, UserIdentification, generate_protocol,
    search_subjects,
};
use participa_form::{FieldErrors, FormController, NoopViewport, QuickVoiceSession, validate_submission};
use participa_store::{DraftStore, FileStore, KeyValueStore, ProtocolRegistry};
use participa_sync::SubmissionAdapter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "participa", version, about = "Participa DF ombudsman submissions")]
struct Cli {
    /// Directory holding drafts and the protocol list.
    #[arg(long, env = "PARTICIPA_DATA_DIR", default_value = ".participa", global = true)]
    data_dir: PathBuf,

    /// Submission endpoint URL. Without one, submissions use the local fallback.
    #[arg(long, env = "PARTICIPA_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// What to do when the endpoint fails: `demo` or `strict`.
    #[arg(long, env = "PARTICIPA_SUBMIT_MODE", default_value = "demo", global = true)]
    submit_mode: SubmitMode,

    /// Report accessibility mode in submission metadata.
    #[arg(long, env = "PARTICIPA_ACCESSIBILITY", global = true)]
    accessibility: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Suggest a subject and agency for a text.
    Classify {
        text: Vec<String>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List subject categories, optionally filtered by a search query.
    Subjects {
        #[arg(long)]
        search: Option<String>,
    },
    /// Generate a protocol number without recording it.
    Protocol,
    /// Manage recorded protocols.
    #[command(subcommand)]
    Protocols(ProtocolsCommand),
    /// Inspect the in-progress wizard draft.
    #[command(subcommand)]
    Draft(DraftCommand),
    /// Fill in the wizard from flags and submit.
    Submit(SubmitArgs),
    /// Quick voice mode from transcript segments.
    Quick {
        /// Final transcript segments, in order.
        #[arg(required = true)]
        segments: Vec<String>,
        /// Replace the transcript before classifying.
        #[arg(long)]
        edit: Option<String>,
        /// Recording length in seconds.
        #[arg(long, default_value_t = 0)]
        duration: u32,
    },
}

#[derive(Subcommand)]
enum ProtocolsCommand {
    List {
        /// Exact subject label.
        #[arg(long)]
        subject: Option<String>,
        /// Match against protocol, subject and agency.
        #[arg(long)]
        search: Option<String>,
        /// Print the distinct subjects instead.
        #[arg(long)]
        subjects: bool,
    },
    Delete {
        protocol: String,
    },
    Clear,
}

#[derive(Subcommand)]
enum DraftCommand {
    Show,
    Clear,
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long)]
    anonymous: bool,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    /// Subject id; classified from the text when omitted.
    #[arg(long)]
    subject: Option<String>,
    #[arg(long, default_value = "text")]
    channel: Channel,
    #[arg(long, default_value = "")]
    text: String,
    /// Media file for audio, image or video channels.
    #[arg(long)]
    attach: Option<PathBuf>,
    /// MIME type of the attachment; guessed from the extension when omitted.
    #[arg(long)]
    mime: Option<String>,
    /// Audio length in seconds.
    #[arg(long)]
    duration: Option<u32>,
    /// Agree to the terms.
    #[arg(long)]
    consent: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.data_dir.clone(), cli.endpoint.clone(), cli.submit_mode)
        .context("invalid configuration")?
        .with_accessibility_mode(cli.accessibility);
    tracing::debug!(data_dir = %config.data_dir().display(), mode = %config.submit_mode(), "participa v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Classify { text, json } => {
            let result = KeywordClassifier::default().classify(&text.join(" "));
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                display::print_classification(&result);
            }
        }
        Command::Subjects { search } => {
            let subjects = match search {
                Some(q) => search_subjects(&q),
                None => SUBJECT_CATEGORIES.iter().collect(),
            };
            display::print_subjects(&subjects);
        }
        Command::Protocol => println!("{}", generate_protocol()),
        Command::Protocols(cmd) => run_protocols(&config, cmd)?,
        Command::Draft(cmd) => run_draft(&config, cmd)?,
        Command::Submit(args) => run_submit(config, args).await?,
        Command::Quick {
            segments,
            edit,
            duration,
        } => run_quick(&config, segments, edit, duration)?,
    }

    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store = FileStore::open(config.data_dir())
        .with_context(|| format!("opening data directory {}", config.data_dir().display()))?;
    Ok(Arc::new(store))
}

fn run_protocols(config: &Config, cmd: ProtocolsCommand) -> anyhow::Result<()> {
    let registry = ProtocolRegistry::new(open_store(config)?);
    match cmd {
        ProtocolsCommand::List {
            subject,
            search,
            subjects,
        } => {
            let records = registry.list();
            if subjects {
                for s in unique_subjects(&records) {
                    println!("{s}");
                }
                return Ok(());
            }
            let by_subject = filter_by_subject(&records, subject.as_deref().unwrap_or(""));
            let hits = search_records(by_subject, search.as_deref().unwrap_or(""));
            display::print_protocols(&hits);
        }
        ProtocolsCommand::Delete { protocol } => {
            if !registry.delete(&protocol) {
                bail!("protocol {protocol} not found");
            }
            println!("Protocolo {protocol} removido.");
        }
        ProtocolsCommand::Clear => {
            registry.clear_all();
            println!("Todos os protocolos foram removidos.");
        }
    }
    Ok(())
}

fn run_draft(config: &Config, cmd: DraftCommand) -> anyhow::Result<()> {
    let drafts = DraftStore::new(open_store(config)?);
    match cmd {
        DraftCommand::Show => match drafts.load() {
            Some(draft) => {
                display::print_draft(&draft);
                let pending = validate_submission(&draft.restore());
                if !pending.is_empty() {
                    println!("Pendências");
                    for message in pending {
                        println!("  - {message}");
                    }
                }
            }
            None => println!("Nenhum rascunho salvo."),
        },
        DraftCommand::Clear => {
            drafts.clear();
            println!("Rascunho removido.");
        }
    }
    Ok(())
}

async fn run_submit(config: Config, args: SubmitArgs) -> anyhow::Result<()> {
    let store = open_store(&config)?;
    let registry = ProtocolRegistry::new(store.clone());
    let adapter = SubmissionAdapter::from_config(config, registry);

    let mut form = FormController::mount(DraftStore::new(store), NoopViewport);
    form.reset();
    form.next();

    form.set_identification(UserIdentification {
        is_anonymous: args.anonymous,
        name: args.name,
        email: args.email,
        phone: args.phone,
    });
    form.confirm_identification().map_err(fail)?;

    match &args.subject {
        Some(id) => {
            if !form.select_subject_by_id(id) {
                bail!("unknown subject '{id}'");
            }
        }
        None => {
            let suggestion = KeywordClassifier::default().classify(&args.text);
            eprintln!(
                "  Subject: {} ({})",
                suggestion.subject_label,
                suggestion.confidence.description()
            );
            form.set_subject(suggestion.selection());
        }
    }
    form.confirm_subject().map_err(fail)?;

    form.select_channel(args.channel);
    form.set_text(args.text);
    if let Some(path) = &args.attach {
        let attachment = read_attachment(path, args.mime.as_deref(), args.channel, args.duration)?;
        form.attach(attachment).map_err(fail)?;
    }
    form.confirm_content().map_err(fail)?;

    form.set_consent(args.consent);
    let reply = form.submit(&adapter).await.map_err(fail)?;
    display::print_submission(&reply);
    Ok(())
}

fn run_quick(config: &Config, segments: Vec<String>, edit: Option<String>, duration: u32) -> anyhow::Result<()> {
    let registry = ProtocolRegistry::new(open_store(config)?);
    let mut session = QuickVoiceSession::new(registry, NoopViewport);

    session.start_recording()?;
    for segment in &segments {
        session.push_final(segment);
    }
    for _ in 0..duration {
        if session.tick() {
            eprintln!("  Recording limit reached at {}", session.timer());
            break;
        }
    }
    session.stop_recording(None);

    session.edit_transcript()?;
    if let Some(text) = edit {
        session.set_transcript(text);
    }
    session.review_transcript()?;
    eprintln!("  Transcript: {}", session.transcript().text());

    let result = session.confirm_text()?.clone();
    display::print_classification(&result);
    let protocol = session.finish()?;
    println!("Protocolo: {protocol}");
    Ok(())
}

fn fail(errors: FieldErrors) -> anyhow::Error {
    anyhow::anyhow!(display::field_errors_message(&errors))
}

fn read_attachment(
    path: &Path,
    mime: Option<&str>,
    channel: Channel,
    duration: Option<u32>,
) -> anyhow::Result<Attachment> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = match mime {
        Some(m) => m.to_string(),
        None => guess_mime(path, channel)
            .with_context(|| format!("cannot guess the type of {}; pass --mime", path.display()))?
            .to_string(),
    };
    let attachment = Attachment::new(file_name, mime, data);
    Ok(match duration {
        Some(secs) => attachment.with_duration(secs),
        None => attachment,
    })
}

fn guess_mime(path: &Path, channel: Channel) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match (ext.as_str(), channel) {
        ("jpg" | "jpeg", _) => "image/jpeg",
        ("png", _) => "image/png",
        ("gif", _) => "image/gif",
        ("webp", _) => "image/webp",
        ("mp4", Channel::Audio) | ("m4a", _) => "audio/mp4",
        ("mp4", _) => "video/mp4",
        ("webm", Channel::Audio) => "audio/webm",
        ("webm", _) => "video/webm",
        ("mov", _) => "video/quicktime",
        ("mp3", _) => "audio/mpeg",
        ("wav", _) => "audio/wav",
        ("ogg", _) => "audio/ogg",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a/foto.JPG"), Channel::Image), Some("image/jpeg"));
        assert_eq!(guess_mime(Path::new("v.webm"), Channel::Video), Some("video/webm"));
        assert_eq!(guess_mime(Path::new("v.webm"), Channel::Audio), Some("audio/webm"));
        assert_eq!(guess_mime(Path::new("v.mov"), Channel::Video), Some("video/quicktime"));
        assert_eq!(guess_mime(Path::new("doc.pdf"), Channel::Image), None);
        assert_eq!(guess_mime(Path::new("noext"), Channel::Image), None);
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from([
            "participa",
            "--submit-mode",
            "strict",
            "submit",
            "--anonymous",
            "--channel",
            "video",
            "--consent",
        ])
        .unwrap();
        assert_eq!(cli.submit_mode, SubmitMode::Strict);
        match cli.command {
            Command::Submit(args) => {
                assert!(args.anonymous);
                assert_eq!(args.channel, Channel::Video);
                assert!(args.consent);
            }
            _ => panic!("expected submit"),
        }
    }
}
