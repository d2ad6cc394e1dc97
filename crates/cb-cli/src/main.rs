//! Headless coloring book session.
//!
//! Loads an image, replays a script of user actions against the editor,
//! writes the flattened composite and/or the request body, and optionally
//! submits it to the save endpoint.
//!
//!   coloring-book --image page.png --script session.json --output out.png
//!   coloring-book -i page.png -s session.json --payload body.json --submit

mod script;
mod sink;

use anyhow::{Context, Result};
use cb_core::Size;
use cb_editor::{Editor, EditorConfig};
use clap::Parser;
use sink::HttpSink;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "coloring-book", about = "Replay and export a coloring book session")]
struct Args {
    /// Image to color in.
    #[arg(short, long, value_name = "FILE")]
    image: Option<PathBuf>,

    /// JSON list of actions to replay.
    #[arg(short, long, value_name = "SCRIPT.json")]
    script: Option<PathBuf>,

    /// Workspace width in logical pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Workspace height in logical pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Device pixel ratio (values below 1 are treated as 1).
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Write the flattened composite PNG here.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the save request body (JSON) here.
    #[arg(long, value_name = "FILE")]
    payload: Option<PathBuf>,

    /// POST the drawing to the configured endpoint.
    #[arg(long)]
    submit: bool,

    /// Override the endpoint from the config file.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Editor config (JSON).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<EditorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EditorConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EditorConfig::default(),
    };
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}

/// Log and drop queued notices.
fn drain_notices(editor: &mut Editor) {
    for notice in editor.take_notices() {
        if notice.is_warning() {
            log::warn!("{notice}");
        } else {
            log::info!("{notice}");
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let mut editor: Editor = Editor::new(config)?;
    editor.resize(Size::new(args.width, args.height), args.dpr)?;

    if let Some(path) = &args.image {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading image {}", path.display()))?;
        editor.load_bytes(&bytes);
    }
    if let Some(path) = &args.script {
        let actions = script::load(path)?;
        script::apply(&mut editor, &actions)?;
    }
    drain_notices(&mut editor);

    if let Some(path) = &args.output {
        let png = editor.composite_png()?;
        std::fs::write(path, &png).with_context(|| format!("writing {}", path.display()))?;
        log::info!("composite written to {}", path.display());
    }

    let needs_payload = args.payload.is_some() || args.submit;
    if !needs_payload {
        return Ok(ExitCode::SUCCESS);
    }
    let payload = editor.export()?;
    if let Some(path) = &args.payload {
        std::fs::write(path, payload.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("request body written to {}", path.display());
    }

    if args.submit {
        let config = editor.config();
        let sink = HttpSink::new(config.endpoint.clone(), config.request_timeout())?;
        let outcome = sink.submit(&payload).await;
        let saved = editor.complete_save(outcome);
        drain_notices(&mut editor);
        if !saved {
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_and_endpoint_override() {
        let args = Args::parse_from(["coloring-book", "--endpoint", "http://localhost/save"]);
        assert_eq!(args.width, 800.0);
        assert_eq!(args.dpr, 1.0);
        assert!(!args.submit);

        let config = load_config(&args).unwrap();
        assert_eq!(config.endpoint, "http://localhost/save");
        assert_eq!(config.default_brush_size, 12);
    }
}
