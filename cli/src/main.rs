use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use frames::dispatch::Dispatcher;
use frames::{Frame, FrameKind, Usage};
use futures_util::StreamExt;
use serde_json::Value;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

type WsStream = tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("timed out waiting for websocket frame")]
    Timeout,
    #[error("server returned error for {context}: {message}")]
    ServerError { context: String, message: String },
    #[error("stream failed: {0}")]
    StreamFailed(String),
    #[error("upload stopped after {uploaded} of {total} files: {source}")]
    UploadAborted {
        uploaded: usize,
        total: usize,
        #[source]
        source: Box<CliError>,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "jobdesk-cli", about = "Job application assistant API and websocket CLI")]
struct Cli {
    #[arg(long, env = "JOBDESK_API_BASE_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Seconds to wait for a streamed reply to finish.
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    timeout: Duration,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check backend health.
    Ping,
    Projects(ProjectsCommand),
    /// Upload files to a project, one at a time.
    Upload {
        project_id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Invoke a skill and stream its output.
    Skill(SkillArgs),
    /// Send a chat message and stream the reply.
    Chat { project_id: String, message: String },
    /// Show next-step suggestions.
    Suggestions { project_id: String },
    /// Fetch a rendered document preview.
    Preview(PreviewArgs),
    /// Print every frame on a project's websocket.
    Watch { project_id: String },
}

#[derive(Args, Debug)]
struct ProjectsCommand {
    #[command(subcommand)]
    command: ProjectsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProjectsSubcommand {
    List,
    Create {
        #[arg(long)]
        institution: String,
        #[arg(long)]
        position: String,
        /// Application date, `YYYY-MM-DD`.
        #[arg(long)]
        date: String,
    },
}

#[derive(Args, Debug)]
struct SkillArgs {
    project_id: String,
    skill_name: String,
    #[arg(long, default_value = "Analyze the job posting and save the analysis as JSON")]
    prompt: String,
    #[arg(long, default_value_t = false)]
    use_api: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    project_id: String,
    filename: String,
    /// Fetch the PDF rendering instead of HTML.
    #[arg(long, default_value_t = false)]
    pdf: bool,
    /// Output path for the PDF; defaults to the filename with a `.pdf` extension.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext {
        base_url: cli.base_url.trim_end_matches('/').to_owned(),
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Projects(projects) => run_projects(&ctx, projects).await,
        Command::Upload { project_id, files } => run_upload(&ctx, &project_id, files).await,
        Command::Skill(args) => run_skill(&ctx, args).await,
        Command::Chat { project_id, message } => run_chat(&ctx, &project_id, &message).await,
        Command::Suggestions { project_id } => {
            let json = api_request(&ctx, reqwest::Method::GET, &next_steps_path(&project_id), None).await?;
            print_json(&json)
        }
        Command::Preview(args) => run_preview(&ctx, args).await,
        Command::Watch { project_id } => run_watch(&ctx, &project_id).await,
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let json = api_request(cli, reqwest::Method::GET, "/health", None).await?;
    let status = json.get("status").and_then(Value::as_str).unwrap_or("unknown");
    println!("{status}");
    Ok(())
}

async fn run_projects(cli: &CliContext, projects: ProjectsCommand) -> Result<(), CliError> {
    match projects.command {
        ProjectsSubcommand::List => {
            let json = api_request(cli, reqwest::Method::GET, "/api/projects", None).await?;
            print_json(&json)
        }
        ProjectsSubcommand::Create {
            institution,
            position,
            date,
        } => {
            let body = serde_json::json!({
                "institution": institution,
                "position": position,
                "date": date,
            });
            let json = api_request(cli, reqwest::Method::POST, "/api/projects", Some(body)).await?;
            print_json(&json)
        }
    }
}

async fn run_upload(cli: &CliContext, project_id: &str, files: Vec<PathBuf>) -> Result<(), CliError> {
    let total = files.len();
    for (uploaded, path) in files.iter().enumerate() {
        if let Err(error) = upload_file(cli, project_id, path).await {
            return Err(CliError::UploadAborted {
                uploaded,
                total,
                source: Box::new(error),
            });
        }
        eprintln!("uploaded {}", path.display());
    }
    eprintln!("upload complete: {total} files");
    Ok(())
}

async fn upload_file(cli: &CliContext, project_id: &str, path: &Path) -> Result<Value, CliError> {
    let bytes = tokio::fs::read(path).await?;
    let part = reqwest::multipart::Part::bytes(bytes).file_name(upload_file_name(path));
    let form = reqwest::multipart::Form::new().part("file", part);
    let url = api_url(&cli.base_url, &format!("/api/files/upload/{project_id}"));
    let response = reqwest::Client::new().post(url).multipart(form).send().await?;
    read_json_response(response, "upload").await
}

fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned())
}

async fn run_skill(cli: &CliContext, args: SkillArgs) -> Result<(), CliError> {
    // Subscribe before triggering so no early frame is missed.
    let mut stream = connect_project(cli, &args.project_id).await?;

    let body = serde_json::json!({
        "project_id": args.project_id,
        "skill_name": args.skill_name,
        "prompt": args.prompt,
        "stream": true,
        "use_api": args.use_api,
    });
    let ack = api_request(cli, reqwest::Method::POST, "/api/skills/invoke", Some(body)).await?;
    eprintln!("skill accepted: {ack}");

    let outcome = Rc::new(RefCell::new(None));
    let dispatcher = skill_dispatcher(print_delta, outcome.clone());
    let result = stream_until_done(&mut stream, cli.timeout, &dispatcher, &outcome).await;
    println!();
    report_outcome(result?)
}

async fn run_chat(cli: &CliContext, project_id: &str, message: &str) -> Result<(), CliError> {
    let mut stream = connect_project(cli, project_id).await?;

    let body = serde_json::json!({
        "project_id": project_id,
        "message": message,
        "context": chat_context(cli, project_id).await,
    });
    let ack = api_request(cli, reqwest::Method::POST, "/api/chat/message", Some(body)).await?;
    let message_id = ack
        .get("message_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned);
    if let Some(skill) = ack.pointer("/intent/skill").and_then(Value::as_str) {
        eprintln!("intent: {skill}");
    }

    let outcome = Rc::new(RefCell::new(None));
    let dispatcher = chat_dispatcher(message_id, print_delta, outcome.clone());
    let result = stream_until_done(&mut stream, cli.timeout, &dispatcher, &outcome).await;
    println!();
    report_outcome(result?)
}

/// Chat context for `project_id`, looked up from the project list. Missing
/// projects yield empty fields rather than failing the send.
async fn chat_context(cli: &CliContext, project_id: &str) -> Value {
    let projects = match api_request(cli, reqwest::Method::GET, "/api/projects", None).await {
        Ok(projects) => projects,
        Err(error) => {
            eprintln!("project lookup failed: {error}");
            Value::Null
        }
    };
    let project = projects
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .find(|p| p.get("project_id").and_then(Value::as_str) == Some(project_id))
        })
        .cloned()
        .unwrap_or(Value::Null);
    let field = |name: &str| project.get(name).and_then(Value::as_str).unwrap_or_default().to_owned();
    serde_json::json!({
        "institution": field("institution"),
        "position": field("position"),
        "stage": field("current_stage"),
    })
}

async fn run_preview(cli: &CliContext, args: PreviewArgs) -> Result<(), CliError> {
    let kind = if args.pdf { "pdf" } else { "html" };
    let url = api_url(
        &cli.base_url,
        &format!("/api/preview/{kind}/{}/{}", args.project_id, args.filename),
    );
    let response = reqwest::Client::new().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status.as_u16(), &body));
    }

    if args.pdf {
        let out = args
            .out
            .unwrap_or_else(|| Path::new(&args.filename).with_extension("pdf"));
        let bytes = response.bytes().await?;
        tokio::fs::write(&out, &bytes).await?;
        eprintln!("wrote {} ({} bytes)", out.display(), bytes.len());
    } else {
        println!("{}", response.text().await?);
    }
    Ok(())
}

async fn run_watch(cli: &CliContext, project_id: &str) -> Result<(), CliError> {
    let url = ws_url(&cli.base_url, project_id)?;
    let (mut stream, _) = connect_async(url)
        .await
        .map_err(|error| CliError::WsConnect(Box::new(error)))?;
    eprintln!("watching project {project_id}");

    loop {
        let text = match recv_text(&mut stream, None).await {
            Ok(text) => text,
            Err(CliError::WsClosed) => {
                eprintln!("websocket closed");
                return Ok(());
            }
            Err(error) => return Err(error),
        };
        if let Some(frame) = decode_or_drop(&text) {
            println!("{}", frames::encode_frame(&frame));
        }
    }
}

/// Outcome of one streamed skill run or chat reply.
#[derive(Debug, Clone, PartialEq)]
enum StreamOutcome {
    Completed(Option<Usage>),
    Failed(String),
}

type OutcomeSlot = Rc<RefCell<Option<StreamOutcome>>>;

fn print_delta(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Route `skill_*` frames: text deltas to `sink`, terminal frames to `outcome`.
fn skill_dispatcher(sink: impl Fn(&str) + 'static, outcome: OutcomeSlot) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.on(FrameKind::SkillStart, |frame| {
        if let Frame::SkillStart { skill_name: Some(name) } = frame {
            eprintln!("skill started: {name}");
        }
    });
    dispatcher.on_each(&[FrameKind::SkillToken, FrameKind::SkillOutput], move |frame| {
        if let Some(text) = frame.text_delta() {
            sink(text);
        }
    });
    dispatcher.on_each(&[FrameKind::SkillComplete, FrameKind::SkillError], move |frame| match frame {
        Frame::SkillComplete { usage } => *outcome.borrow_mut() = Some(StreamOutcome::Completed(*usage)),
        Frame::SkillError { error } => *outcome.borrow_mut() = Some(StreamOutcome::Failed(error.clone())),
        _ => {}
    });
    dispatcher.on(FrameKind::FileCreated, |frame| {
        if let Frame::FileCreated { filename, .. } = frame {
            eprintln!("file created: {filename}");
        }
    });
    dispatcher.on_unhandled(|frame| eprintln!("ignored frame: {}", frame.type_tag()));
    dispatcher
}

/// Route `chat_*` frames for `message_id` (any message when `None`).
fn chat_dispatcher(message_id: Option<String>, sink: impl Fn(&str) + 'static, outcome: OutcomeSlot) -> Dispatcher {
    let matches = move |frame: &Frame| match &message_id {
        Some(id) => frame.message_id() == Some(id.as_str()),
        None => true,
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.on_each(&FrameKind::CHAT, move |frame| {
        if !matches(frame) {
            return;
        }
        match frame {
            Frame::ChatStart { intent: Some(intent), .. } if intent.runs_skill() => {
                eprintln!("running: {}", intent.skill);
            }
            Frame::ChatToken { token, .. } => sink(token),
            Frame::ChatComplete { usage, .. } => *outcome.borrow_mut() = Some(StreamOutcome::Completed(*usage)),
            Frame::ChatError { error, .. } => *outcome.borrow_mut() = Some(StreamOutcome::Failed(error.clone())),
            _ => {}
        }
    });
    dispatcher.on_unhandled(|frame| eprintln!("ignored frame: {}", frame.type_tag()));
    dispatcher
}

fn report_outcome(outcome: StreamOutcome) -> Result<(), CliError> {
    match outcome {
        StreamOutcome::Completed(usage) => {
            if let Some(usage) = usage {
                eprintln!("usage: {}", usage.label());
            }
            Ok(())
        }
        StreamOutcome::Failed(error) => Err(CliError::StreamFailed(error)),
    }
}

/// Feed frames to `dispatcher` until a listener fills `outcome`, the socket
/// closes, or `timeout` elapses.
async fn stream_until_done(
    stream: &mut WsStream,
    timeout: Duration,
    dispatcher: &Dispatcher,
    outcome: &OutcomeSlot,
) -> Result<StreamOutcome, CliError> {
    let fut = async {
        loop {
            let text = recv_text(stream, None).await?;
            let Some(frame) = decode_or_drop(&text) else {
                continue;
            };
            dispatcher.dispatch(&frame);
            if let Some(done) = outcome.borrow_mut().take() {
                return Ok(done);
            }
        }
    };
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| CliError::Timeout)?
}

async fn connect_project(cli: &CliContext, project_id: &str) -> Result<WsStream, CliError> {
    let url = ws_url(&cli.base_url, project_id)?;
    let (mut stream, _) = connect_async(url)
        .await
        .map_err(|error| CliError::WsConnect(Box::new(error)))?;
    wait_for_connected(&mut stream).await?;
    Ok(stream)
}

async fn wait_for_connected(stream: &mut WsStream) -> Result<(), CliError> {
    loop {
        let text = recv_text(stream, Some(Duration::from_secs(5))).await?;
        if let Some(Frame::Connection { status, .. }) = decode_or_drop(&text) {
            eprintln!("websocket {status}");
            return Ok(());
        }
    }
}

/// Decode one socket payload. Malformed frames are logged and skipped so a
/// single bad frame never aborts a run.
fn decode_or_drop(text: &str) -> Option<Frame> {
    match frames::decode_frame(text) {
        Ok(frame) => Some(frame),
        Err(error) => {
            eprintln!("frame dropped: {error}");
            None
        }
    }
}

/// Next text payload from the socket. Binary frames are accepted as UTF-8.
async fn recv_text(stream: &mut WsStream, timeout: Option<Duration>) -> Result<String, CliError> {
    let fut = async {
        loop {
            let Some(message) = stream.next().await else {
                return Err(CliError::WsClosed);
            };
            match message.map_err(|error| CliError::WsConnect(Box::new(error)))? {
                Message::Text(text) => return Ok(text.as_str().to_owned()),
                Message::Binary(bytes) => {
                    return String::from_utf8(bytes.to_vec()).map_err(|error| CliError::ServerError {
                        context: "websocket".to_owned(),
                        message: error.to_string(),
                    });
                }
                Message::Close(_) => return Err(CliError::WsClosed),
                _ => {}
            }
        }
    };
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| CliError::Timeout)?,
        None => fut.await,
    }
}

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = reqwest::Client::new();
    let request = client.request(method, api_url(&cli.base_url, path));
    let request = if let Some(json) = body {
        request.json(&json)
    } else {
        request
    };
    let response = request.send().await?;
    read_json_response(response, path).await
}

async fn read_json_response(response: reqwest::Response, context: &str) -> Result<Value, CliError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        let mut error = status_error(status.as_u16(), &body);
        if let CliError::ServerError { context: c, .. } = &mut error {
            *c = format!("{context} ({c})");
        }
        return Err(error);
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}

fn status_error(status: u16, body: &str) -> CliError {
    CliError::ServerError {
        context: format!("HTTP {status}"),
        message: error_detail(body).unwrap_or_else(|| body.trim().to_owned()),
    }
}

/// The backend's `detail` field, if the body is a JSON error document.
fn error_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn api_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

fn next_steps_path(project_id: &str) -> String {
    format!("/suggestions/{project_id}/next-steps")
}

fn ws_url(base_url: &str, project_id: &str) -> Result<String, CliError> {
    let base = base_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("http://") {
        return Ok(format!("ws://{rest}/ws/{project_id}"));
    }
    if let Some(rest) = base.strip_prefix("https://") {
        return Ok(format!("wss://{rest}/ws/{project_id}"));
    }

    Err(CliError::InvalidBaseUrl(base_url.to_owned()))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
