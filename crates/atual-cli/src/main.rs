use clap::{Parser, Subcommand, ValueEnum};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use url::Url;

#[derive(Parser)]
#[command(name = "atualbot")]
#[command(about = "A CLI for operating the Atual.bot service")]
struct Cli {
    /// Base URL for the Atual.bot service
    #[arg(long, env = "ATUAL_SERVICE_URL", default_value = "http://localhost:5000")]
    service_url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read or change bot configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Register a job post
    AddJob {
        title: String,
        /// Link to the original posting; enables click tracking
        #[arg(short, long)]
        source_url: Option<String>,
        #[arg(short, long)]
        company: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        job_type: Option<String>,
        #[arg(long)]
        work_mode: Option<String>,
    },
    /// Register a news post
    AddNews {
        title: String,
        source_url: String,
        #[arg(short, long)]
        summary: Option<String>,
        #[arg(long)]
        source_name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Repeat for several tags
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Queue a job or news post for delivery to groups
    Publish {
        #[arg(value_enum)]
        content_type: ContentType,
        content_id: i32,
        /// Target group ids
        #[arg(required = true, num_args = 1..)]
        group_ids: Vec<i32>,
    },
    /// List registered groups
    Groups,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print one key, or every key when omitted
    Get { key: Option<String> },
    /// Set a key; values that parse as JSON are sent as JSON
    Set {
        key: String,
        value: String,
        #[arg(short, long)]
        description: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ContentType {
    Job,
    News,
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            ContentType::Job => "job",
            ContentType::News => "news",
        }
    }
}

#[derive(Serialize)]
struct SetConfigPayload {
    value: Value,
    description: Option<String>,
}

#[derive(Serialize)]
struct NewJobPayload {
    title: String,
    source_url: Option<String>,
    company: Option<String>,
    location: Option<String>,
    salary: Option<String>,
    job_type: Option<String>,
    work_mode: Option<String>,
}

#[derive(Serialize)]
struct NewNewsPayload {
    title: String,
    source_url: String,
    summary: Option<String>,
    source_name: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
}

#[derive(Serialize)]
struct PublishPayload {
    content_type: &'static str,
    content_id: i32,
    group_ids: Vec<i32>,
}

/// Response body shared by every endpoint of the service.
#[derive(Deserialize)]
struct Envelope {
    success: bool,
    message: Option<String>,
    #[serde(default)]
    data: Value,
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = Client::new();
    let base = &cli.service_url;

    let response = match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Get { key: None } => client.get(base.join("api/config")?).send().await?,
            ConfigAction::Get { key: Some(key) } => {
                client
                    .get(base.join(&format!("api/config/{key}"))?)
                    .send()
                    .await?
            }
            ConfigAction::Set {
                key,
                value,
                description,
            } => {
                let payload = SetConfigPayload {
                    value: parse_config_value(&value),
                    description,
                };
                client
                    .post(base.join(&format!("api/config/{key}"))?)
                    .json(&payload)
                    .send()
                    .await?
            }
        },
        Commands::AddJob {
            title,
            source_url,
            company,
            location,
            salary,
            job_type,
            work_mode,
        } => {
            let payload = NewJobPayload {
                title,
                source_url,
                company,
                location,
                salary,
                job_type,
                work_mode,
            };
            client
                .post(base.join("api/jobs")?)
                .json(&payload)
                .send()
                .await?
        }
        Commands::AddNews {
            title,
            source_url,
            summary,
            source_name,
            category,
            tags,
        } => {
            let payload = NewNewsPayload {
                title,
                source_url,
                summary,
                source_name,
                category,
                tags,
            };
            client
                .post(base.join("api/news")?)
                .json(&payload)
                .send()
                .await?
        }
        Commands::Publish {
            content_type,
            content_id,
            group_ids,
        } => {
            let payload = PublishPayload {
                content_type: content_type.as_str(),
                content_id,
                group_ids,
            };
            client
                .post(base.join("api/publish")?)
                .json(&payload)
                .send()
                .await?
        }
        Commands::Groups => client.get(base.join("api/groups")?).send().await?,
    };

    report(response).await
}

/// Accepts `["a","b"]`, `42` or `true` as JSON; anything else is a plain string.
fn parse_config_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

async fn report(response: Response) -> Result<(), Box<dyn Error>> {
    let status = response.status();
    let text = response.text().await?;

    match serde_json::from_str::<Envelope>(&text) {
        Ok(envelope) if envelope.success => {
            if let Some(message) = envelope.message {
                println!("{message}");
            }
            if !envelope.data.is_null() {
                println!("{}", serde_json::to_string_pretty(&envelope.data)?);
            }
            Ok(())
        }
        Ok(envelope) => Err(format!(
            "Request failed ({status}): {}",
            envelope.error.unwrap_or_default()
        )
        .into()),
        Err(_) => Err(format!("Request failed ({status}): {text}").into()),
    }
}
