use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use doclink_widget::{
    CandidateFile, ClipboardChain, CopyOutcome, HttpUploadClient, Notification,
    NotificationVariant, UploadWidget, WidgetState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "doclink-upload")]
#[command(about = "Upload a PDF or Word document and get a shareable link")]
struct Args {
    /// Document to upload; exactly one is accepted
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Base URL of the doclink server
    #[arg(long, env = "DOCLINK_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Copy the link to the clipboard
    #[arg(long)]
    copy: bool,

    /// Open the link in the default browser
    #[arg(long)]
    open: bool,

    /// Print the upload response as JSON instead of just the link
    #[arg(long)]
    json: bool,
}

fn print_notifications(notifications: Vec<Notification>) {
    for notification in notifications {
        let marker = match notification.variant {
            NotificationVariant::Default => "-",
            NotificationVariant::Destructive => "!",
        };
        eprintln!(
            "{marker} {}: {}",
            notification.title, notification.description
        );
    }
}

async fn confirm(filename: &str) -> Result<bool> {
    eprint!("Upload {filename}? [y/N] ");
    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn open_in_browser(url: &str) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        tokio::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = tokio::process::Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        tokio::process::Command::new("xdg-open")
    };

    let status = command
        .arg(url)
        .status()
        .await
        .context("Failed to launch a browser")?;
    if !status.success() {
        bail!("Browser launcher exited with {status}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the link
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let client = HttpUploadClient::new(&args.server);
    tracing::debug!(upload_url = client.upload_url(), "Using server");
    let mut widget = UploadWidget::new(client);

    let mut candidates = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let candidate = CandidateFile::from_path(path, widget.policy())
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        candidates.push(candidate);
    }

    let selected = widget.select(candidates);
    print_notifications(widget.drain_notifications());
    selected?;

    if !args.yes {
        let filename = match widget.state() {
            WidgetState::Selected(file) => file.name.clone(),
            _ => bail!("No file selected"),
        };
        if !confirm(&filename).await? {
            widget.cancel()?;
            eprintln!("Cancelled");
            return Ok(());
        }
    }

    let uploaded = widget.upload().await.cloned();
    print_notifications(widget.drain_notifications());
    let uploaded = uploaded?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&uploaded)?);
    } else {
        println!("{}", uploaded.url);
    }

    if args.copy {
        if widget.copy_link(&ClipboardChain::system())? == CopyOutcome::Manual {
            eprintln!("Copy the link above by hand");
        }
        print_notifications(widget.drain_notifications());
    }

    if args.open {
        open_in_browser(widget.open_link()?).await?;
    }

    widget.close_dialog()?;
    Ok(())
}
