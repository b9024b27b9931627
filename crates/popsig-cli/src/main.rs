//! popsig - sign HTTP requests with a proof-of-possession key
//!
//! Host-side wrapper around popsig-core: loads key files, collects the
//! request parts and prints the `Signature` header value. Diagnostics go
//! to stderr so stdout stays machine-readable.

mod config;
mod keyfile;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use popsig_core::{
    verify_envelope, IntegerEncoding, ProofKey, RequestParts, RequestSigner,
    SignatureEnvelope, Timestamp, SIGNATURE_HEADER,
};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{OutputFormat, SignerConfig};
use crate::keyfile::load_private_key;

#[derive(Parser)]
#[command(name = "popsig")]
#[command(about = "Proof-of-possession request signatures (ECDSA P-256)", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file (overrides POPSIG_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the public key coordinates of a private key
    Pubkey {
        /// PKCS#8 private key (DER or PEM)
        #[arg(short, long)]
        key: PathBuf,

        /// Print a JWK proof key instead of hex coordinates
        #[arg(long)]
        jwk: bool,

        /// Coordinate width policy
        #[arg(long, value_enum)]
        encoding: Option<EncodingArg>,
    },

    /// Sign a request
    Sign {
        /// PKCS#8 private key (DER or PEM)
        #[arg(short, long)]
        key: PathBuf,

        #[command(flatten)]
        request: RequestArgs,

        /// Unix seconds to sign at instead of the current time
        #[arg(long)]
        at: Option<i64>,

        /// Signature component width policy
        #[arg(long, value_enum)]
        encoding: Option<EncodingArg>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Verify a signature header value against a request
    Verify {
        /// Private key whose public half is used
        #[arg(short, long, conflicts_with = "jwk", required_unless_present = "jwk")]
        key: Option<PathBuf>,

        /// JWK proof key file
        #[arg(long)]
        jwk: Option<PathBuf>,

        /// Base64 `Signature` header value
        #[arg(short, long)]
        signature: String,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Decode a signature header value
    Inspect {
        /// Base64 `Signature` header value
        #[arg(short, long)]
        signature: String,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// HTTP method
    #[arg(short, long, default_value = "POST")]
    method: String,

    /// Request URL or path, exactly as sent
    #[arg(short, long)]
    url: String,

    /// Authorization header value
    #[arg(short, long, default_value = "")]
    authorization: String,

    /// Request body
    #[arg(short, long, conflicts_with = "body_file")]
    body: Option<String>,

    /// File holding the request body
    #[arg(long)]
    body_file: Option<PathBuf>,
}

impl RequestArgs {
    fn body_bytes(&self) -> Result<Vec<u8>> {
        match (&self.body, &self.body_file) {
            (Some(body), _) => Ok(body.as_bytes().to_vec()),
            (None, Some(path)) => {
                fs::read(path).with_context(|| format!("reading body {}", path.display()))
            }
            (None, None) => Ok(Vec::new()),
        }
    }

    fn parts<'a>(&'a self, body: &'a [u8]) -> RequestParts<'a> {
        RequestParts::new(
            self.method.as_bytes(),
            self.url.as_bytes(),
            self.authorization.as_bytes(),
            body,
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Minimal,
    FixedWidth,
}

impl From<EncodingArg> for IntegerEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Minimal => IntegerEncoding::Minimal,
            EncodingArg::FixedWidth => IntegerEncoding::FixedWidth,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popsig=info,popsig_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = SignerConfig::resolve(cli.config.as_deref())?;
    debug!(?config, "resolved configuration");

    match cli.command {
        Commands::Pubkey { key, jwk, encoding } => {
            let encoding = encoding.map(Into::into).unwrap_or(config.integer_encoding);
            handle_pubkey(&key, jwk, encoding)
        }
        Commands::Sign {
            key,
            request,
            at,
            encoding,
            format,
        } => {
            let encoding = encoding.map(Into::into).unwrap_or(config.integer_encoding);
            let format = format.unwrap_or(config.output_format);
            handle_sign(&key, &request, at, encoding, format)
        }
        Commands::Verify {
            key,
            jwk,
            signature,
            request,
        } => handle_verify(key.as_deref(), jwk.as_deref(), &signature, &request),
        Commands::Inspect { signature } => handle_inspect(&signature),
    }
}

fn handle_pubkey(key: &Path, jwk: bool, encoding: IntegerEncoding) -> Result<()> {
    let point = load_private_key(key)?.public_point()?;
    let output = if jwk {
        serde_json::to_value(point.proof_key(encoding))?
    } else {
        let (x, y) = point.coordinates(encoding);
        json!({ "x": hex::encode(x), "y": hex::encode(y) })
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn handle_sign(
    key: &Path,
    request: &RequestArgs,
    at: Option<i64>,
    encoding: IntegerEncoding,
    format: OutputFormat,
) -> Result<()> {
    let signer = RequestSigner::new(&load_private_key(key)?).with_encoding(encoding);
    let body = request.body_bytes()?;
    let timestamp = match at {
        Some(unix) => Timestamp::from_unix_seconds(unix)?,
        None => Timestamp::now()?,
    };

    let envelope = signer.sign_at(timestamp, &request.parts(&body))?;
    info!(
        method = %request.method,
        url = %request.url,
        timestamp = timestamp.as_u64(),
        "signed request"
    );

    match format {
        OutputFormat::Header => println!("{}", envelope.to_header_value()),
        OutputFormat::Hex => println!("{}", hex::encode(envelope.to_bytes())),
    }
    Ok(())
}

fn handle_verify(
    key: Option<&Path>,
    jwk: Option<&Path>,
    signature: &str,
    request: &RequestArgs,
) -> Result<()> {
    let public = match (key, jwk) {
        (Some(key), _) => load_private_key(key)?.public_point()?,
        (None, Some(jwk)) => {
            let content = fs::read_to_string(jwk)
                .with_context(|| format!("reading JWK {}", jwk.display()))?;
            let proof_key: ProofKey = serde_json::from_str(&content).context("parsing JWK")?;
            proof_key.to_public_point()?
        }
        (None, None) => anyhow::bail!("either --key or --jwk is required"),
    };

    let envelope = SignatureEnvelope::from_header_value(signature)?;
    let body = request.body_bytes()?;
    verify_envelope(&public, &request.parts(&body), &envelope)
        .with_context(|| format!("{} header does not match request", SIGNATURE_HEADER))?;

    println!("✓ Signature valid");
    println!("  Signed at: {}", describe_timestamp(envelope.timestamp()));
    println!("  Key X: {}", hex::encode(public.x()));
    Ok(())
}

fn handle_inspect(signature: &str) -> Result<()> {
    let envelope = SignatureEnvelope::from_header_value(signature)?;
    println!("Signature Envelope:");
    println!("  Version: {}", envelope.version());
    println!("  Timestamp: {}", envelope.timestamp());
    println!("  Signed at: {}", describe_timestamp(envelope.timestamp()));
    println!("  r||s length: {} bytes", envelope.components().len());
    println!("  r||s: {}", hex::encode(envelope.components()));
    if envelope.components().len() < 64 {
        println!("\n  Note: components are minimally encoded; r/s boundary is ambiguous");
    }
    Ok(())
}

fn describe_timestamp(timestamp: Timestamp) -> String {
    timestamp
        .to_datetime()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|_| "out of range".to_string())
}
