//! Command-line interface for kafka-frames
//!
//! # Usage Examples
//!
//! ```bash
//! # Stream a topic to stdout as NDJSON frames
//! kafka-frames stream --brokers localhost:9092 --topic events
//!
//! # Stream with SASL credentials over TLS
//! KAFKA_PASSWORD=s3cret kafka-frames stream \
//!   --brokers broker:9093 \
//!   --topic events \
//!   --auth-type SCRAM-SHA-256 \
//!   --username alice \
//!   --use-tls
//!
//! # Check connectivity
//! kafka-frames check --brokers localhost:9092
//! ```

use clap::{Args, Parser, Subcommand};
use frame_sink::JsonlSink;
use kafka_frames::{check_health, run_stream, StreamEnd, StreamRequest};
use kafka_frames_source::BridgeConfig;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "kafka-frames")]
#[command(about = "Stream Kafka topics as flat tabular frames")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a topic to stdout, one JSON frame per line
    Stream {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Topic to stream
        #[arg(long)]
        topic: String,
    },

    /// Check connectivity to the configured cluster
    Check {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

#[derive(Args)]
struct ConnectionArgs {
    /// Kafka brokers (comma-separated list)
    #[arg(long, env = "KAFKA_BROKERS")]
    brokers: String,

    /// Client identifier (defaults to the tool name)
    #[arg(long, default_value = "")]
    client_id: String,

    /// Consumer group ID (defaults to the tool name)
    #[arg(long, default_value = "")]
    group_id: String,

    /// SASL mechanism name, or "none"
    #[arg(long, default_value = "none")]
    auth_type: String,

    /// SASL username
    #[arg(long, default_value = "")]
    username: String,

    /// SASL password
    #[arg(long, env = "KAFKA_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Enable TLS towards the brokers
    #[arg(long)]
    use_tls: bool,
}

impl From<ConnectionArgs> for BridgeConfig {
    fn from(args: ConnectionArgs) -> Self {
        BridgeConfig {
            bootstrap_servers: args.brokers,
            client_id: args.client_id,
            group_id: args.group_id,
            auth_mechanism: args.auth_type,
            username: args.username,
            password: args.password,
            use_tls: args.use_tls,
            ..BridgeConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing; frames go to stdout, logs stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stream { connection, topic } => {
            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupt received, cancelling stream");
                    ctrl_c.cancel();
                }
            });

            let sink = JsonlSink::stdout();
            let request = StreamRequest { topic_name: topic };
            match run_stream(connection.into(), request, &sink, cancel).await? {
                StreamEnd::NotConfigured => {
                    anyhow::bail!("no topic configured");
                }
                StreamEnd::Cancelled => tracing::info!("stream cancelled"),
                StreamEnd::Shutdown => tracing::info!("stream ended"),
            }
        }
        Commands::Check { connection } => {
            let status = check_health(connection.into()).await;
            println!("{}", status.message);
            if !status.healthy {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
