use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chat_transcript::config::ChatConfig;
use chat_transcript::logging::init_logging;
use chat_transcript::transcript::{ActionRender, ActionRendererRegistry, Message};
use chat_transcript::ui::terminal::TranscriptView;
use chat_transcript::ChatRenderer;
use clap::Parser;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use tracing::debug;

/// Render a chat transcript (JSON array of messages) to the terminal.
#[derive(Parser, Debug)]
#[command(name = "chat-transcript", version)]
struct Args {
    /// Transcript file: a JSON array of messages.
    #[arg(short, long)]
    transcript: PathBuf,

    /// Config file with labels and icons (defaults to the user config dir).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat the last message as still streaming.
    #[arg(long)]
    in_progress: bool,

    /// Static in-progress label for an action, as NAME=TEXT. Repeatable.
    #[arg(long = "label", value_parser = parse_label)]
    labels: Vec<(String, String)>,

    /// Only print the last HEIGHT rows, as a scrolled viewport would.
    #[arg(long)]
    height: Option<u16>,

    /// Viewport width used together with --height.
    #[arg(long, default_value_t = 80)]
    width: u16,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_label(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, text)) if !name.is_empty() => Ok((name.to_string(), text.to_string())),
        _ => Err(format!("expected NAME=TEXT, got `{raw}`")),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ChatConfig::load_or_default(args.config.as_deref())?;
    let raw = fs::read_to_string(&args.transcript)
        .with_context(|| format!("Failed to read transcript {}", args.transcript.display()))?;
    let messages: Vec<Message> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse transcript {}", args.transcript.display()))?;
    debug!("Loaded {} messages", messages.len());

    let mut registry = ActionRendererRegistry::new();
    for (name, text) in args.labels {
        registry.register(name, ActionRender::Label(text));
    }

    let icons = config.icons.clone();
    let mut renderer = ChatRenderer::new(config, Arc::new(registry));
    let pass = renderer
        .render(&messages, args.in_progress)
        .context("Failed to render transcript")?;

    let mut view = TranscriptView::new(icons);
    view.update(&pass.rows);

    match args.height {
        Some(height) => {
            if let Some(request) = pass.scroll {
                view.apply_scroll(request, height);
            }
            let area = Rect::new(0, 0, args.width, height);
            let mut buf = Buffer::empty(area);
            (&view).render(area, &mut buf);
            for y in 0..height {
                let row: String = (0..args.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect();
                println!("{}", row.trim_end());
            }
        }
        None => {
            for line in view.lines() {
                let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
                println!("{text}");
            }
        }
    }

    Ok(())
}
