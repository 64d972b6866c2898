//! # inkwell 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정과 저장소 로딩
//! 4. 하위 명령 실행 (login, logout, list, edit)
//!
//! `edit`는 에디터 페이지 하나를 마운트하고, 사용자가 마운트 지점 파일을
//! 고친 뒤 Enter를 누르면 저장하고 언마운트합니다.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkwell::{
    auth,
    editor::JsonFileFactory,
    models::StructuredDocument,
    storage::FileStore,
    ApiClient, Config, EditorPage, PageOptions, SaveOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "inkwell", version, about = "Write and publish articles from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the access token
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// List articles on the backend
    List,
    /// Open the editor, then save on Enter
    Edit {
        /// Existing article to update; a new article is created when omitted
        #[arg(long, value_name = "ID")]
        article_id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Mark the article as published
        #[arg(long)]
        publish: bool,
        /// Start a new article from this JSON document
        #[arg(long, value_name = "PATH", conflicts_with = "article_id")]
        from: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkwell=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::info!(
        "Using backend {} (token check: {:?})",
        config.api_base_url,
        config.verify_mode
    );

    let mut store = FileStore::open(&config.storage_path)
        .with_context(|| format!("opening storage {}", config.storage_path))?;
    let api = ApiClient::new(&config)?;

    match cli.command {
        Command::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ").await?,
            };
            let session = auth::login(&api, &mut store, &username, &password).await?;
            println!(
                "Logged in{}",
                session
                    .owner_id
                    .map(|id| format!(" as {}", id))
                    .unwrap_or_default()
            );
        }
        Command::Logout => {
            auth::logout(&mut store)?;
            println!("Logged out, credentials removed from {}", store.path().display());
        }
        Command::List => {
            for article in api.list_articles().await? {
                println!("{}", serde_json::to_string(&article)?);
            }
        }
        Command::Edit {
            article_id,
            title,
            publish,
            from,
        } => {
            let seed = match from {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?;
                    Some(StructuredDocument::from_json_str(&raw)?)
                }
                None => None,
            };
            let options = PageOptions {
                article_id,
                title,
                published: publish,
                seed,
            };

            let mut page =
                EditorPage::mount(api, &store, JsonFileFactory, &config.editor_holder, options)
                    .await?;
            if let Some(status) = page.status() {
                println!("{}", status);
            }
            if !page.session().is_authenticated() {
                println!("Not logged in, changes will not be saved");
            }
            let Some(widget) = page.editor().widget() else {
                anyhow::bail!("editor could not be opened");
            };

            prompt(&format!(
                "Edit {} and press Enter to save: ",
                widget.path().display()
            ))
            .await?;

            let outcome = page.save().await;
            match &outcome {
                SaveOutcome::Skipped => println!("Not logged in, nothing was saved"),
                SaveOutcome::Busy => println!("A save is already in progress"),
                SaveOutcome::Saved { response, .. } => {
                    println!("{}", page.status().unwrap_or_default());
                    println!("{}", serde_json::to_string_pretty(response)?);
                }
                SaveOutcome::Failed { message } => println!("{}", message),
            }
            page.unmount();

            if !outcome.is_saved() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn prompt(message: &str) -> Result<String> {
    eprint!("{}", message);
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("reading stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
