mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use patentwise_app::{
    AdminConsole, Admission, AnalysisService, AnalysisView, DashboardService, IdentityGate, Route,
    SignupForm, SubmissionWorkflow, admit, backend_from_config,
};
use patentwise_core::keywords::default_domain_keywords;
use patentwise_core::{
    AnalysisResult, Domain, LogFilter, LogLevel, PatentwiseConfig, Principal, Role, SessionState,
    SubmissionId, UserId,
};
use patentwise_risk::{RiskReport, classify, classify_novelty, derive_alerts};
use patentwise_store::{Backend, DocumentUpload};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patentwise", version, about = "Patent disclosure intake and risk review")]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(long, env = "PATENTWISE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Credentials {
    #[arg(long, env = "PATENTWISE_EMAIL")]
    email: String,
    #[arg(long, env = "PATENTWISE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum AdminListing {
    Users,
    Keywords,
    Logs,
}

#[derive(Subcommand)]
enum Command {
    /// Show whether a session may open a route.
    Route {
        path: String,
        #[arg(long, conflicts_with = "anonymous")]
        role: Option<Role>,
        #[arg(long)]
        anonymous: bool,
    },
    /// Map a score in [0, 1] to its risk tier.
    Classify {
        score: f64,
        /// Use the novelty scale, where low scores are risky.
        #[arg(long)]
        novelty: bool,
    },
    /// Print a risk card for an analysis result JSON file.
    Report { path: PathBuf },
    /// Create an account and sign it in.
    Signup {
        #[arg(long, env = "PATENTWISE_EMAIL")]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "PATENTWISE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long, default_value = "inventor")]
        role: Role,
    },
    /// Sign in and submit a disclosure through the wizard.
    Submit {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        inventors: Option<String>,
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
        /// Suggested from keywords when omitted.
        #[arg(long)]
        domain: Option<Domain>,
    },
    /// Show the signed-in user's submissions and alerts.
    Dashboard {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Show the analysis for one submission.
    Analysis {
        id: String,
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Admin listings.
    Admin {
        #[arg(value_enum)]
        listing: AdminListing,
        #[command(flatten)]
        credentials: Credentials,
        /// Only log records at this level.
        #[arg(long)]
        level: Option<LogLevel>,
        /// Only log records from this service.
        #[arg(long)]
        service: Option<String>,
        #[arg(long, default_value_t = patentwise_core::logs::DEFAULT_LOG_LIMIT)]
        limit: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("building log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("patentwise v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Route {
            path,
            role,
            anonymous,
        } => cmd_route(&path, role.filter(|_| !anonymous)),
        Command::Classify { score, novelty } => cmd_classify(score, novelty),
        Command::Signup {
            email,
            name,
            password,
            confirm_password,
            role,
        } => {
            let backend = backend_from_config(&config.backend)?;
            let form = SignupForm::new(email, name, password, confirm_password).with_role(role);
            cmd_signup(&backend, form).await
        }
        Command::Report { path } => cmd_report(&path, &config),
        Command::Submit {
            credentials,
            title,
            description,
            inventors,
            file,
            text,
            domain,
        } => {
            let backend = backend_from_config(&config.backend)?;
            let gate = sign_in(&backend, &credentials).await?;
            let content = match (file, text) {
                (Some(path), _) => Content::File(path),
                (None, Some(text)) => Content::Text(text),
                (None, None) => bail!("either --file or --text is required"),
            };
            let draft = DraftArgs {
                title,
                description,
                inventors,
                content,
                domain,
            };
            cmd_submit(&gate, &backend, &config, draft).await
        }
        Command::Dashboard { credentials } => {
            let backend = backend_from_config(&config.backend)?;
            let gate = sign_in(&backend, &credentials).await?;
            cmd_dashboard(&gate, &backend).await
        }
        Command::Analysis { id, credentials } => {
            let backend = backend_from_config(&config.backend)?;
            let gate = sign_in(&backend, &credentials).await?;
            cmd_analysis(&gate, &backend, &config, &SubmissionId::from(id.as_str())).await
        }
        Command::Admin {
            listing,
            credentials,
            level,
            service,
            limit,
        } => {
            let backend = backend_from_config(&config.backend)?;
            let gate = sign_in(&backend, &credentials).await?;
            let filter = LogFilter {
                level,
                service,
                limit,
                ..LogFilter::default()
            };
            cmd_admin(&gate, &backend, listing, &filter).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PatentwiseConfig> {
    let config = match path {
        Some(path) => PatentwiseConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PatentwiseConfig::default(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn sign_in(backend: &Backend, credentials: &Credentials) -> Result<IdentityGate> {
    let mut gate = IdentityGate::new(backend.sessions.clone());
    if gate.resolve().await.is_authenticated() {
        gate.sign_out().await;
    }
    gate.sign_in(&credentials.email, &credentials.password)
        .await
        .with_context(|| format!("signing in as {}", credentials.email))?;
    Ok(gate)
}

async fn cmd_signup(backend: &Backend, form: SignupForm) -> Result<()> {
    let mut gate = IdentityGate::new(backend.sessions.clone());
    if gate.resolve().await.is_authenticated() {
        gate.sign_out().await;
    }
    let email = form.email.clone();
    let principal = gate
        .sign_up(form)
        .await
        .with_context(|| format!("registering {email}"))?;
    println!(
        "Registered {} ({}) as {}",
        principal.email, principal.user_id, principal.role
    );
    Ok(())
}

fn cmd_route(path: &str, role: Option<Role>) -> Result<()> {
    let state = match role {
        Some(role) => SessionState::Authenticated(Principal {
            user_id: UserId::from("cli"),
            email: "cli@localhost".into(),
            name: "CLI".into(),
            role,
        }),
        None => SessionState::Unauthenticated,
    };
    let route = Route::parse(path);
    match admit(&route, &state) {
        Admission::Admit => println!("{route}: admit"),
        Admission::Redirect(to) => println!("{route}: redirect to {to}"),
        Admission::Pending => println!("{route}: pending"),
    }
    Ok(())
}

fn cmd_classify(score: f64, novelty: bool) -> Result<()> {
    if !(0.0..=1.0).contains(&score) {
        bail!("score must be within [0, 1], got {score}");
    }
    let tier = if novelty {
        classify_novelty(score)
    } else {
        classify(score)
    };
    println!("{tier}");
    Ok(())
}

fn cmd_report(path: &Path, config: &PatentwiseConfig) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let result: AnalysisResult = serde_json::from_str(&raw)
        .with_context(|| format!("parsing analysis result from {}", path.display()))?;
    let report = RiskReport::from_analysis(
        &result,
        config.risk.similarity_alert_threshold,
        config.risk.distribution_epsilon,
    );
    let alerts = derive_alerts(
        result.submission_id.as_str(),
        &result,
        config.risk.similarity_alert_threshold,
        Utc::now(),
    );
    display::print_report_card(&report, &alerts);
    Ok(())
}

enum Content {
    File(PathBuf),
    Text(String),
}

struct DraftArgs {
    title: String,
    description: String,
    inventors: Option<String>,
    content: Content,
    domain: Option<Domain>,
}

async fn cmd_submit(
    gate: &IdentityGate,
    backend: &Backend,
    config: &PatentwiseConfig,
    args: DraftArgs,
) -> Result<()> {
    let mut wf = SubmissionWorkflow::new(gate, backend, config.upload.clone())?;

    wf.set_title(args.title)?;
    wf.set_description(args.description)?;
    if let Some(inventors) = args.inventors {
        wf.set_inventors(inventors)?;
    }
    eprintln!("  {} ok", wf.step());
    wf.next()?;

    match args.content {
        Content::File(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            wf.attach_document(DocumentUpload::new(file_name, bytes))
                .await
                .context("attaching document")?;
        }
        Content::Text(text) => wf.set_raw_text(text)?,
    }
    eprintln!("  {} ok", wf.step());
    wf.next()?;

    let domain = match args.domain {
        Some(domain) => domain,
        None => wf
            .suggest_domain(&default_domain_keywords())
            .context("no domain given and none could be suggested; pass --domain")?,
    };
    wf.set_domain(domain)?;
    eprintln!("  {} ok ({})", wf.step(), domain.label());
    wf.next()?;

    display::print_recap(&wf.draft().recap());
    wf.submit()?;
    wf.settle().await.context("submitting disclosure")?;

    match wf.submission_id() {
        Some(id) => println!("Submitted: {id}"),
        None => bail!("submission finished without an id"),
    }
    Ok(())
}

async fn cmd_dashboard(gate: &IdentityGate, backend: &Backend) -> Result<()> {
    let service = DashboardService::new(gate, backend)?;
    let dashboard = service.load().await.context("loading dashboard")?;
    let name = gate.principal().map(|p| p.name.as_str()).unwrap_or_default();
    display::print_dashboard(name, &dashboard);
    Ok(())
}

async fn cmd_analysis(
    gate: &IdentityGate,
    backend: &Backend,
    config: &PatentwiseConfig,
    id: &SubmissionId,
) -> Result<()> {
    let service = AnalysisService::new(gate, backend, config.risk.clone())?;
    match service.view(id).await.context("loading analysis")? {
        AnalysisView::Ready(page) => display::print_report_card(&page.report, &page.alerts),
        AnalysisView::NotReady => println!("Analysis for {id} is still in progress."),
        AnalysisView::Missing => println!("No submission {id}."),
    }
    Ok(())
}

async fn cmd_admin(
    gate: &IdentityGate,
    backend: &Backend,
    listing: AdminListing,
    filter: &LogFilter,
) -> Result<()> {
    let console = AdminConsole::new(gate, backend)?;
    match listing {
        AdminListing::Users => {
            let users = console.users().await.context("listing users")?;
            display::print_users(&users);
        }
        AdminListing::Keywords => {
            let keywords = console
                .domain_keywords()
                .await
                .context("listing domain keywords")?;
            display::print_keywords(&keywords);
        }
        AdminListing::Logs => {
            let logs = console
                .system_logs(filter)
                .await
                .context("loading system logs")?;
            display::print_logs(&logs);
        }
    }
    Ok(())
}
