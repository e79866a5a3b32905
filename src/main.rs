use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use mindmorph_client::adapters::{
    all_exporters, ApiClient, FileTokenStore, HttpAuthGateway, HttpResultReader, LocalDownloadSink,
    QuestionnaireClient, TextClient, TwitterClient,
};
use mindmorph_client::application::flow::{FlowError, QuestionnaireFlow, TextFlow, TwitterFlow};
use mindmorph_client::application::{
    AssessmentStrategy, AuthOutcome, DownloadReportCommand, DownloadReportHandler, FlowController,
    GuardDecision, Redirect, ResultService, Route, RouteGuard, SessionContext,
};
use mindmorph_client::config::{AppConfig, ConfigError};
use mindmorph_client::domain::assessment::{AssessmentMode, HistoryView};
use mindmorph_client::domain::foundation::{ClientError, PredictionId};
use mindmorph_client::ports::ExportFormat;
use mindmorph_client::telemetry::{self, TelemetryError};

#[derive(Debug, Parser)]
#[command(name = "mindmorph")]
#[command(about = "MBTI personality assessments from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and remember the session (password from the terminal or MINDMORPH_PASSWORD)
    Login {
        #[arg(long)]
        email: String,
    },

    /// Create an account and sign in (password from the terminal or MINDMORPH_PASSWORD)
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List past predictions for a mode
    History { mode: AssessmentMode },

    /// Export a stored prediction into the download directory
    Report {
        mode: AssessmentMode,
        id: String,
        /// pdf, html or markdown (defaults to the configured format)
        #[arg(long)]
        format: Option<ExportFormat>,
    },

    /// Answer the questionnaire interactively
    Questionnaire,

    /// Analyze a piece of writing
    Text {
        /// File to read; omit to use the built-in sample
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Analyze a Twitter account
    Twitter {
        /// Handle to analyze; omit to list the suggested demo accounts
        username: Option<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Flow(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Not signed in. Run `mindmorph login` first.")]
    NotSignedIn,

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Uses the flow's own wording for the failure.
    fn flow<S: AssessmentStrategy>(flow: &FlowController<S>, err: FlowError) -> Self {
        if err.redirect().is_some() {
            return CliError::NotSignedIn;
        }
        CliError::Flow(flow.error_message().unwrap_or_else(|| err.to_string()))
    }
}

/// Everything a command needs, wired once from configuration.
struct App {
    config: AppConfig,
    session: Arc<SessionContext>,
    api: ApiClient,
}

impl App {
    fn build(config: AppConfig) -> Result<Self, CliError> {
        let base = ApiClient::new(&config.api)?;
        let store = Arc::new(FileTokenStore::new(&config.session.token_path));
        let gateway = Arc::new(HttpAuthGateway::new(base.clone()));
        let session = Arc::new(SessionContext::new(gateway, store));
        let api = base.with_credentials(session.clone());
        Ok(Self {
            config,
            session,
            api,
        })
    }

    /// Restores the stored session and applies the guard for `route`.
    async fn enter(&self, route: Route) -> Result<(), CliError> {
        let state = self.session.restore().await;
        match RouteGuard::new().check(&route, state) {
            GuardDecision::Render => Ok(()),
            GuardDecision::ShowLoading | GuardDecision::Redirect(_) => Err(CliError::NotSignedIn),
        }
    }

    fn results(&self) -> ResultService {
        ResultService::new(Arc::new(HttpResultReader::new(self.api.clone())))
    }

    async fn run(&self, command: Commands) -> Result<(), CliError> {
        match command {
            Commands::Login { email } => {
                let password = read_password("Password: ").await?;
                match self.session.login(&email, &password).await {
                    AuthOutcome::Authenticated(session) => {
                        println!("Signed in as {} <{}>", session.user().name, session.user().email);
                        Ok(())
                    }
                    AuthOutcome::Rejected(reason) => Err(CliError::Rejected(reason)),
                }
            }
            Commands::Signup { name, email } => {
                let (password, confirm) = match std::env::var(PASSWORD_ENV) {
                    Ok(password) => (password.clone(), password),
                    Err(_) => (
                        read_password("Password: ").await?,
                        read_password("Confirm password: ").await?,
                    ),
                };
                match self.session.signup(&name, &email, &password, &confirm).await {
                    AuthOutcome::Authenticated(session) => {
                        println!("Welcome, {}!", session.user().name);
                        Ok(())
                    }
                    AuthOutcome::Rejected(reason) => Err(CliError::Rejected(reason)),
                }
            }
            Commands::Logout => {
                self.session.restore().await;
                self.session.logout().await;
                println!("Signed out");
                Ok(())
            }
            Commands::Whoami => {
                self.enter(Route::Home).await?;
                let user = self.session.user().ok_or(CliError::NotSignedIn)?;
                println!("{} <{}> ({})", user.name, user.email, user.id);
                Ok(())
            }
            Commands::History { mode } => {
                self.enter(Route::History(mode)).await?;
                let history = self.results().fetch_history(mode).await?;
                print_history(mode, &history);
                Ok(())
            }
            Commands::Report { mode, id, format } => {
                let id = PredictionId::new(id).map_err(ClientError::from)?;
                self.enter(Route::result(mode, id.clone())).await?;
                let handler = DownloadReportHandler::new(
                    self.results(),
                    all_exporters(),
                    Arc::new(LocalDownloadSink::new(&self.config.export.download_dir)),
                );
                let saved = handler
                    .handle(DownloadReportCommand {
                        mode,
                        id,
                        format: format.unwrap_or(self.config.export.default_format),
                    })
                    .await
                    .map_err(|e| match e.redirect() {
                        Some(_) => CliError::NotSignedIn,
                        None => CliError::Other(e.to_string()),
                    })?;
                println!("Saved {} ({} bytes)", saved.path.display(), saved.size_bytes);
                println!("sha256 {}", saved.checksum);
                Ok(())
            }
            Commands::Questionnaire => self.questionnaire().await,
            Commands::Text { file } => self.text(file).await,
            Commands::Twitter { username } => self.twitter(username).await,
        }
    }

    async fn questionnaire(&self) -> Result<(), CliError> {
        self.enter(Route::Start(AssessmentMode::Questionnaire)).await?;
        let flow = QuestionnaireFlow::from_api(Arc::new(QuestionnaireClient::new(self.api.clone())));
        flow.start().await.map_err(|e| CliError::flow(&flow, e))?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let Some(question) = flow.current_question() else {
                break;
            };
            let progress = flow.progress();
            println!("\n[{}/{}] {}", progress.current, progress.total, question.scenario);
            for choice in &question.choices {
                println!("  {}) {}", choice.label, choice.text);
            }

            let line = lines
                .next_line()
                .await
                .map_err(|e| CliError::Other(e.to_string()))?
                .ok_or_else(|| CliError::Other("Input closed before the questionnaire finished".into()))?;
            let label = line.trim().to_uppercase();
            if label == "<" {
                let _ = flow.previous();
                continue;
            }
            if let Err(e) = flow.answer(flow.cursor(), &label) {
                println!("{}", e);
                continue;
            }
            if flow.is_last_question() || flow.all_answered() {
                if submit_with_retry(&flow, &mut lines).await? {
                    break;
                }
            } else {
                let _ = flow.next();
            }
        }
        self.print_completion(flow.result_route())
    }

    async fn text(&self, file: Option<PathBuf>) -> Result<(), CliError> {
        self.enter(Route::Start(AssessmentMode::Text)).await?;
        let flow = TextFlow::from_api(Arc::new(TextClient::new(self.api.clone())));
        flow.start().await.map_err(|e| CliError::flow(&flow, e))?;

        match file {
            Some(path) => {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| CliError::Other(format!("{}: {}", path.display(), e)))?;
                flow.set_text(text).map_err(|e| CliError::flow(&flow, e))?;
            }
            None => flow.use_sample_text().map_err(|e| CliError::flow(&flow, e))?,
        }

        let metrics = flow.metrics();
        println!("{} characters, {} words", metrics.characters, metrics.words);
        flow.submit().await.map_err(|e| CliError::flow(&flow, e))?;
        self.print_completion(flow.result_route())
    }

    async fn twitter(&self, username: Option<String>) -> Result<(), CliError> {
        self.enter(Route::Start(AssessmentMode::Twitter)).await?;
        let flow = TwitterFlow::from_api(
            Arc::new(TwitterClient::new(self.api.clone())),
            self.config.twitter.data_source,
        );
        flow.start().await.map_err(|e| CliError::flow(&flow, e))?;

        let Some(username) = username else {
            for suggestion in flow.suggestions() {
                println!("@{}", suggestion);
            }
            return Ok(());
        };

        flow.set_username(username).map_err(|e| CliError::flow(&flow, e))?;
        flow.submit().await.map_err(|e| CliError::flow(&flow, e))?;
        self.print_completion(flow.result_route())
    }

    fn print_completion(&self, route: Option<Route>) -> Result<(), CliError> {
        match route {
            Some(Route::Result(mode, id)) => {
                println!("Prediction saved: {} (mindmorph report {} {})", id, mode, id);
                Ok(())
            }
            _ => Err(CliError::Other("Assessment did not complete".into())),
        }
    }
}

const PASSWORD_ENV: &str = "MINDMORPH_PASSWORD";

/// Reads a password from `MINDMORPH_PASSWORD`, or from the terminal without echo.
async fn read_password(prompt: &'static str) -> Result<String, CliError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt))
        .await
        .map_err(|e| CliError::Other(e.to_string()))?
        .map_err(|e| CliError::Other(format!("Could not read password: {}", e)))
}

/// Submits, offering a retry while the failure is recoverable. The flow keeps
/// its draft between attempts.
///
/// Returns `false` when a local validation failure sends the user back to
/// answering.
async fn submit_with_retry<S, R>(
    flow: &FlowController<S>,
    lines: &mut Lines<R>,
) -> Result<bool, CliError>
where
    S: AssessmentStrategy,
    R: AsyncBufRead + Unpin,
{
    loop {
        match flow.submit().await {
            Ok(_) => return Ok(true),
            Err(FlowError::Validation(_)) => {
                println!("{}", flow.error_message().unwrap_or_default());
                return Ok(false);
            }
            Err(e) if e.redirect().is_some() => return Err(CliError::NotSignedIn),
            Err(e) => {
                println!("Submission failed: {}", e);
                println!("Press Enter to retry, or type q to quit.");
                let answer = lines
                    .next_line()
                    .await
                    .map_err(|io| CliError::Other(io.to_string()))?;
                match answer {
                    Some(line) if !line.trim().eq_ignore_ascii_case("q") => continue,
                    _ => return Err(CliError::flow(flow, e)),
                }
            }
        }
    }
}

fn print_history(mode: AssessmentMode, history: &HistoryView) {
    let Some(stats) = history.stats() else {
        println!("No {} predictions yet.", mode.label());
        return;
    };
    println!(
        "{} predictions, {} characters analyzed, latest {}",
        stats.count, stats.total_characters, stats.latest_type
    );
    for prediction in history.entries() {
        let date = prediction
            .metadata
            .timestamp
            .as_ref()
            .map(|t| t.date_label())
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {}  {}", date, prediction.mbti_type, prediction.id);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;
    telemetry::init_tracing(&config.logging)?;
    App::build(config)?.run(cli.command).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
