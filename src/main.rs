//! RemoteFocus - TV menu demo
//!
//! Main entry point. Reads remote input from stdin, one per line: an action
//! name (`left`, `up`, `right`, `down`, `enter`, `back`) or a raw key code.

use anyhow::Context;
use remotefocus::config::{self, AppConfig};
use remotefocus::input::{InputAction, InputQueue, InputSender, KeyMap};
use remotefocus::speech::{Announcer, SpeechBackend, SpeechSettings, TracingBackend};
use std::io::BufRead;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RemoteFocus v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("speech")
        .enable_time()
        .build()
        .context("failed to start speech runtime")?;

    let announcer = Announcer::spawn_on(
        runtime.handle(),
        speech_backend(&config.speech),
        config.speech.clone(),
    );

    let queue = InputQueue::new(KeyMap::new(&config.input));
    let sender = queue.sender();
    let reader = std::thread::Builder::new()
        .name("stdin-input".to_string())
        .spawn(move || read_stdin(sender))
        .context("failed to start input thread")?;

    let mut app = app::TvMenuApp::new(announcer, config.navigation.clone())?;
    print_help();

    while !reader.is_finished() || !queue.is_empty() {
        queue.wait_with(POLL_INTERVAL, |action| {
            app.handle(action);
            let focused = app.navigator().focused_label().unwrap_or("nothing");
            println!("[{}] focus: {}", app.page().label(), focused);
        });
    }

    tracing::info!("Input closed, shutting down");
    drop(app);
    runtime.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}

fn speech_backend(settings: &SpeechSettings) -> Box<dyn SpeechBackend> {
    #[cfg(feature = "native-tts")]
    {
        match remotefocus::speech::NativeTtsBackend::new(settings) {
            Ok(backend) => return Box::new(backend),
            Err(e) => tracing::warn!("Native speech unavailable, logging instead: {}", e),
        }
    }

    #[cfg(not(feature = "native-tts"))]
    let _ = settings;

    Box::new(TracingBackend)
}

fn read_stdin(sender: InputSender) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "q" | "quit" | "exit") {
            break;
        }

        let sent = if let Ok(code) = input.parse::<u32>() {
            sender.send_key(code)
        } else {
            match input.parse::<InputAction>() {
                Ok(action) => sender.send_action(action),
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            }
        };
        if !sent {
            break;
        }
    }
}

fn print_help() {
    println!("Remote control: type an action or a key code, then Enter. `quit` exits.");
    for action in InputAction::ALL {
        println!("  {:<6} {}", action.name(), action.description());
    }
}
