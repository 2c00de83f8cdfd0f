mod repl;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use canvas::SharedSketch;
use clap::{Parser, Subcommand};
use client::{ClientAgent, ClientError, Editor};
use protocol::{DEFAULT_PORT, ProtocolError};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::repl::{HELP, ReplCommand};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("invalid protocol line: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("stdin: {0}")]
    Io(#[from] std::io::Error),
    #[error("json encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sketch", about = "Shared sketch client")]
struct Cli {
    #[arg(long, env = "SKETCH_HOST", default_value = "localhost")]
    host: String,

    #[arg(long, env = "SKETCH_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive the editor from stdin; the sketch is printed after every remote change.
    Connect,
    /// Send one raw protocol line and exit.
    Send { line: String },
    /// Print the server's sketch as JSON lines once it has been quiet for a while.
    Dump {
        #[arg(long, default_value_t = 300)]
        quiet_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let addr = format!("{}:{}", cli.host, cli.port);

    match cli.command {
        Command::Connect => run_connect(&addr).await,
        Command::Send { line } => run_send(&addr, &line).await,
        Command::Dump { quiet_ms } => run_dump(&addr, Duration::from_millis(quiet_ms)).await,
    }
}

async fn run_connect(addr: &str) -> Result<(), CliError> {
    let sketch = SharedSketch::new();
    let printer = sketch.clone();
    let agent = ClientAgent::connect(addr, sketch.clone(), move || print_sketch(&printer)).await?;
    let mut editor = Editor::new(sketch.clone());
    eprintln!("{HELP}");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let input = tokio::select! {
            line = stdin.next_line() => line?,
            () = agent.wait_closed() => {
                eprintln!("server hung up");
                return Ok(());
            }
        };
        let Some(input) = input else { break };

        let command = match ReplCommand::parse(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        let outgoing = match command {
            ReplCommand::Mode(mode) => {
                editor.set_mode(mode);
                None
            }
            ReplCommand::Shape(kind) => {
                editor.set_shape_kind(kind);
                None
            }
            ReplCommand::Color(color) => {
                editor.set_color(color);
                None
            }
            ReplCommand::Press(p) => editor.press(p),
            ReplCommand::Drag(p) => editor.drag(p),
            ReplCommand::Release => editor.release(),
            ReplCommand::Raw(line) => match protocol::Command::parse(&line) {
                // Applied locally first, like any other outgoing command.
                Ok(cmd) => {
                    sketch.update(|s| cmd.apply(s));
                    Some(cmd)
                }
                Err(e) => {
                    eprintln!("{e}");
                    None
                }
            },
            ReplCommand::List => {
                print_sketch(&sketch);
                None
            }
            ReplCommand::Help => {
                eprintln!("{HELP}");
                None
            }
            ReplCommand::Quit => break,
        };

        if let Some(cmd) = outgoing {
            println!("> {cmd}");
            agent.send(&cmd)?;
        }
        if let Some(shape) = editor.pending() {
            println!("pending: {shape}");
        }
    }

    agent.close().await;
    Ok(())
}

async fn run_send(addr: &str, line: &str) -> Result<(), CliError> {
    let command = protocol::Command::parse(line)?;
    let agent = ClientAgent::connect(addr, SharedSketch::new(), || {}).await?;
    agent.send(&command)?;
    agent.close().await;
    Ok(())
}

async fn run_dump(addr: &str, quiet: Duration) -> Result<(), CliError> {
    let sketch = SharedSketch::new();
    let received = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&received);
    let agent = ClientAgent::connect(addr, sketch.clone(), move || {
        counter.fetch_add(1, Ordering::Relaxed);
    })
    .await?;

    // Seed lines arrive back to back; stop once a full quiet period passes.
    let mut seen = u64::MAX;
    loop {
        let now = received.load(Ordering::Relaxed);
        if now == seen || agent.is_hung_up() {
            break;
        }
        seen = now;
        tokio::time::sleep(quiet).await;
    }

    for (id, shape) in sketch.snapshot() {
        let json = serde_json::json!({ "id": id, "shape": shape });
        println!("{}", serde_json::to_string(&json)?);
    }
    agent.close().await;
    Ok(())
}

fn print_sketch(sketch: &SharedSketch) {
    let shapes = sketch.snapshot();
    println!("sketch: {} shape(s)", shapes.len());
    for (id, shape) in shapes {
        println!("  {id}: {shape}");
    }
}
