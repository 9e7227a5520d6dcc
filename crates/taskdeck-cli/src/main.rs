//! Taskdeck CLI, a command-line client for the Taskdeck API.
//!
//! Set TASKDECK_API_URL (or API_URL); defaults to http://localhost:4000.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use taskdeck_api_client::{ApiClient, CreateTaskRequest, ImageUpload, TaskStatus};
use taskdeck_cli::{init_tracing, task_line};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskdeck", about = "Taskdeck API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks in creation order
    List {
        /// Filter by status: pending, in-progress, completed
        #[arg(long)]
        status: Option<TaskStatus>,
        /// 1-based page number
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
        /// One line per task instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Get a single task by ID
    Get {
        /// Task UUID
        id: Uuid,
    },
    /// Create a task, optionally uploading an image for it
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Image file to upload and attach (jpg, png or webp)
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Change the status of a task
    Status {
        /// Task UUID
        id: Uuid,
        /// pending, in-progress or completed
        status: TaskStatus,
    },
    /// Upload an image and attach it to an existing task
    Attach {
        /// Task UUID
        id: Uuid,
        /// Image file (jpg, png or webp)
        image: PathBuf,
    },
    /// Delete a task by ID
    Delete {
        /// Task UUID
        id: Uuid,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let client = ApiClient::from_env().context("Failed to create API client")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            status,
            page,
            limit,
            plain,
        } => {
            let response = client.list_tasks(status, page, limit).await?;
            if plain {
                for task in &response.tasks {
                    println!("{}", task_line(task));
                }
            } else {
                print_json(&response)?;
            }
        }
        Commands::Get { id } => {
            let task = client.get_task(id).await?;
            print_json(&task)?;
        }
        Commands::Create {
            title,
            description,
            status,
            image,
        } => {
            let request = CreateTaskRequest {
                description,
                status,
                ..CreateTaskRequest::new(title)
            };
            let task = match image {
                Some(path) => {
                    let upload = ImageUpload::from_path(&path)?;
                    client.create_task_with_image(&request, &upload).await?
                }
                None => client.create_task(&request).await?,
            };
            print_json(&task)?;
        }
        Commands::Status { id, status } => {
            client.update_task_status(id, status).await?;
            print_json(&serde_json::json!({ "id": id, "status": status }))?;
        }
        Commands::Attach { id, image } => {
            let upload = ImageUpload::from_path(&image)?;
            let confirmed = client.upload_image(&upload, Some(id)).await?;
            print_json(&confirmed)?;
        }
        Commands::Delete { id } => {
            client.delete_task(id).await?;
            print_json(&serde_json::json!({ "success": true, "message": format!("Task {} deleted", id) }))?;
        }
    }

    Ok(())
}
