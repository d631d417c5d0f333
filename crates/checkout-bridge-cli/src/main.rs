//! checkout-bridge CLI
//!
//! Drives the checkout bridge against the sandbox SDK so configurations and
//! event sequences can be checked without a device.

use anyhow::{Context, Result};
use checkout_bridge::core::{
    ComponentConfiguration, ComponentKind, PaymentMethods, RawConfiguration, RootConfiguration,
    SessionConfiguration,
};
use checkout_bridge::sandbox::SandboxSdk;
use checkout_bridge::{
    CallResponse, CheckoutEvent, CheckoutModule, EventEnvelope, OpenRequest, StyleRegistry,
};
use checkout_bridge_transport::JsonCodec;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod script;
mod settings;

use script::Step;
use settings::CheckoutSettings;

#[derive(Parser)]
#[command(name = "checkout-bridge")]
#[command(author, version, about = "Exercise the checkout bridge against a sandbox SDK", long_about = None)]
struct Cli {
    /// Log filter for bridge diagnostics (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a component and play a scripted checkout, printing host events
    Run {
        /// Path to checkout.toml
        #[arg(short, long, default_value = "checkout.toml")]
        settings: PathBuf,

        /// Component to open (dropin, card, googlepay, applepay, ideal, ...)
        #[arg(short, long, default_value = "dropin")]
        component: String,

        /// Payment methods response JSON (standalone flow, or the session catalogue)
        #[arg(short, long)]
        payment_methods: Option<PathBuf>,

        /// Report the wallet as unavailable on this device
        #[arg(long)]
        wallet_unavailable: bool,

        /// Steps to play after opening: submit, provide, complete, cancel,
        /// fail[:message], hide, redirect, threeds, result:<code>
        #[arg(value_name = "STEP")]
        steps: Vec<Step>,
    },

    /// Parse checkout.toml and print the configuration a component would receive
    Check {
        /// Path to checkout.toml
        #[arg(short, long, default_value = "checkout.toml")]
        settings: PathBuf,

        /// Component to resolve the configuration for
        #[arg(short, long, default_value = "dropin")]
        component: String,
    },

    /// Replay host calls (one JSON object per line) and print the responses
    Call {
        /// Path to checkout.toml
        #[arg(short, long, default_value = "checkout.toml")]
        settings: PathBuf,

        /// File with host calls, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match cli.command {
        Commands::Run {
            settings,
            component,
            payment_methods,
            wallet_unavailable,
            steps,
        } => run(
            &settings,
            &component,
            payment_methods.as_deref(),
            wallet_unavailable,
            &steps,
        ),
        Commands::Check {
            settings,
            component,
        } => check(&settings, &component),
        Commands::Call { settings, input } => call(&settings, &input),
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print each host event as one JSON line on stdout
fn print_event(event: CheckoutEvent) {
    match EventEnvelope::new(event).to_bytes() {
        Ok(bytes) => {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(&bytes);
            let _ = stdout.write_all(b"\n");
        }
        Err(err) => tracing::error!(error = %err, "failed to encode event"),
    }
}

fn load_payment_methods(path: Option<&Path>) -> Result<Option<Value>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payment methods: {path:?}"))?;
    let value = serde_json::from_str(&content).context("Failed to parse payment methods")?;
    Ok(Some(value))
}

fn sandbox_for(settings: &CheckoutSettings, payment_methods: Option<&Value>) -> Result<SandboxSdk> {
    let sdk = SandboxSdk::new();
    match (&settings.session, payment_methods) {
        (Some(_), Some(value)) => {
            let methods = PaymentMethods::from_value(value)
                .context("Payment methods are not a valid catalogue")?;
            Ok(sdk.with_session_methods(methods))
        }
        _ => Ok(sdk),
    }
}

fn run(
    settings_path: &Path,
    component: &str,
    payment_methods_path: Option<&Path>,
    wallet_unavailable: bool,
    steps: &[Step],
) -> Result<()> {
    let settings = CheckoutSettings::from_file(settings_path)?;
    let payment_methods = load_payment_methods(payment_methods_path)?;

    let sdk = sandbox_for(&settings, payment_methods.as_ref())?;
    sdk.set_wallet_available(!wallet_unavailable);

    let module = CheckoutModule::with_styles(
        settings.bridge.clone(),
        Arc::new(sdk.clone()),
        Arc::new(print_event),
        Arc::new(StyleRegistry::new()),
    )?;

    let mut request = OpenRequest::new(component, settings.to_configuration());
    if settings.session.is_none()
        && let Some(payment_methods) = payment_methods
    {
        request = request.with_payment_methods(payment_methods);
    }

    let outcome = module.open_blocking(request);
    eprintln!("open {component}: {outcome:?}");

    for step in steps {
        eprintln!("{}", step.apply(&module, &sdk));
    }

    eprintln!("final state: {}", module.state());
    module.shutdown()?;
    Ok(())
}

fn check(settings_path: &Path, component: &str) -> Result<()> {
    let settings = CheckoutSettings::from_file(settings_path)?;
    let raw = RawConfiguration::from_value(settings.to_configuration());

    let root = RootConfiguration::parse(&raw).context("Root configuration is invalid")?;
    let session = SessionConfiguration::detect(&raw).context("Session configuration is invalid")?;
    let kind = ComponentKind::from_name(component);
    let merged = ComponentConfiguration::merge(&root, session.as_ref(), &kind, &raw, None)
        .with_context(|| format!("Configuration cannot open '{component}'"))?;

    let summary = json!({
        "component": kind.name(),
        "environment": merged.environment,
        "clientKey": merged.client_key,
        "payment": merged.payment,
        "locale": merged.locale,
        "sessionIdentifier": merged.session_identifier,
        "method": merged.method,
    });
    let output = JsonCodec::pretty().encode_string(&summary)?;

    println!("✓ {} configuration is valid", kind.name());
    println!("{output}");
    Ok(())
}

fn call(settings_path: &Path, input: &Path) -> Result<()> {
    let settings = CheckoutSettings::from_file(settings_path)?;
    let sdk = SandboxSdk::new();
    let module = CheckoutModule::with_styles(
        settings.bridge.clone(),
        Arc::new(sdk),
        Arc::new(print_event),
        Arc::new(StyleRegistry::new()),
    )?;

    let reader: Box<dyn BufRead> = if input.as_os_str() == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        let file = std::fs::File::open(input)
            .with_context(|| format!("Failed to open host calls: {input:?}"))?;
        Box::new(std::io::BufReader::new(file))
    };

    for line in reader.lines() {
        let line = line.context("Failed to read host call")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = module.dispatch_json(line.as_bytes());
        match CallResponse::from_bytes(&response) {
            Ok(decoded) => match decoded.error_kind() {
                Some(kind) => eprintln!(
                    "rejected ({kind}): {}",
                    decoded.error_message.unwrap_or_default()
                ),
                None => eprintln!("accepted"),
            },
            Err(_) => eprintln!("{}", String::from_utf8_lossy(&response)),
        }
    }

    module.shutdown()?;
    Ok(())
}
