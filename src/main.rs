use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use talkie_gateway::speech::{
    CaptureSettings, ConsoleSynthesizer, LineRecognizer, SpeechCapture, SpeechOutput,
};
use talkie_gateway::{Config, ConversationController, LocalEngine, RemoteEngine, ResponseEngine};

/// Talkie - voice chat gateway for AI assistants
#[derive(Parser)]
#[command(name = "talkie", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "TALKIE_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway (chat proxy + health)
    Serve,
    /// Ask the response engine a single question
    Ask {
        /// The question text
        text: String,

        /// Use the remote engine against a running chat proxy
        #[arg(long)]
        remote: bool,

        /// Chat proxy endpoint (remote engine only)
        #[arg(long, env = "TALKIE_CHAT_ENDPOINT")]
        endpoint: Option<String>,
    },
    /// Interactive voice-style loop on the terminal
    Repl {
        /// Use the remote engine against a running chat proxy
        #[arg(long)]
        remote: bool,

        /// Chat proxy endpoint (remote engine only)
        #[arg(long, env = "TALKIE_CHAT_ENDPOINT")]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,talkie_gateway=info",
        1 => "info,talkie_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        None | Some(Command::Serve) => serve(&config).await,
        Some(Command::Ask {
            text,
            remote,
            endpoint,
        }) => ask(&config, &text, remote, endpoint).await,
        Some(Command::Repl { remote, endpoint }) => repl(&config, remote, endpoint).await,
    }
}

/// Run the HTTP gateway until interrupted
async fn serve(config: &Config) -> anyhow::Result<()> {
    tracing::info!(port = config.server.port, "starting talkie gateway");
    talkie_gateway::api::serve(config).await?;
    Ok(())
}

/// One-shot question through a response engine
async fn ask(
    config: &Config,
    text: &str,
    remote: bool,
    endpoint: Option<String>,
) -> anyhow::Result<()> {
    let reply = if remote {
        let endpoint = endpoint.unwrap_or_else(|| config.engine.endpoint.clone());
        RemoteEngine::new(endpoint).respond(text, &[]).await?
    } else {
        LocalEngine::new().respond(text, &[]).await?
    };

    println!("{reply}");
    Ok(())
}

/// Interactive loop: typed lines play the role of recognized speech
async fn repl(config: &Config, remote: bool, endpoint: Option<String>) -> anyhow::Result<()> {
    let recognizer = LineRecognizer::new();
    let closed = recognizer.closed_flag();

    let capture = SpeechCapture::new(
        Box::new(recognizer),
        CaptureSettings::from_voice(&config.voice),
    );
    let output = SpeechOutput::new(Arc::new(ConsoleSynthesizer::new()), config.voice.clone());

    println!("Type a line and press enter to \"speak\"; ctrl-d to quit.");

    if remote {
        let endpoint = endpoint.unwrap_or_else(|| config.engine.endpoint.clone());
        tracing::info!(endpoint = %endpoint, "repl using remote engine");
        let controller = ConversationController::new(capture, output, RemoteEngine::new(endpoint));
        run_repl(controller, &closed).await;
    } else {
        let controller = ConversationController::new(capture, output, LocalEngine::new());
        run_repl(controller, &closed).await;
    }

    Ok(())
}

/// Drive turns until stdin closes
async fn run_repl<E: ResponseEngine>(
    mut controller: ConversationController<E>,
    closed: &std::sync::atomic::AtomicBool,
) {
    loop {
        controller.run_turn().await;

        if closed.load(std::sync::atomic::Ordering::Relaxed) {
            break;
        }
        if controller.session().needs_credential {
            tracing::warn!("set OPENAI_API_KEY on the gateway and try again");
        }
        // Let queued output flush before the next prompt
        tokio::task::yield_now().await;
    }
}
