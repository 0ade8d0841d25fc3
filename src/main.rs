use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use cliresms::{
    AppConfig, Carrier, Credentials, InstallOutcome, MessageText, PackageDescriptor, Recipient,
    SendWebText, WebTextClient, install_scripts,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// cliresms - send web texts (SMS) through Irish carrier portals
///
/// Portal URLs and form layouts are read from the config file
/// (default: <config dir>/cliresms/config.toml).
///
/// Examples:
///   cliresms send -c three -m "running late" 0871234567
///   echo "hello" | cliresms send 0861234567 0851234567
#[derive(Parser, Debug)]
#[command(name = "cliresms", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a web text
    Send(SendArgs),

    /// Show package information
    About(AboutArgs),

    /// Copy the cliresms executable into a directory on your PATH
    Install(InstallArgs),
}

#[derive(clap::Args, Debug)]
struct SendArgs {
    /// Carrier portal to use: three, o2 or vodafone
    #[arg(long, short = 'c', env = "CLIRESMS_CARRIER")]
    carrier: Option<Carrier>,

    /// Portal user name (overrides the config file)
    #[arg(long, short = 'u', env = "CLIRESMS_USERNAME")]
    username: Option<String>,

    /// Portal password (overrides the config file)
    #[arg(long, short = 'p', env = "CLIRESMS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Config file path
    #[arg(long, env = "CLIRESMS_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Send messages longer than the portal limit as several texts
    #[arg(long)]
    split: bool,

    /// Message text; read from stdin when omitted
    #[arg(long, short = 'm')]
    message: Option<String>,

    /// Recipient phone numbers; Irish numbers need no country prefix
    #[arg(required = true, value_name = "NUMBER")]
    recipients: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct AboutArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct InstallArgs {
    /// Target directory (defaults to the platform's user executable dir)
    #[arg(long, value_name = "DIR")]
    bin_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Send(args) => send(args).await,
        Commands::About(args) => about(args),
        Commands::Install(args) => install(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cliresms={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}

async fn send(args: SendArgs) -> Result<()> {
    let config = AppConfig::discover(args.config.as_deref())?;
    let carrier = args
        .carrier
        .or(config.default_carrier)
        .context("no carrier given; pass --carrier or set default_carrier in the config file")?;
    let account = config.account(carrier)?;

    let username = args
        .username
        .or_else(|| account.username.clone())
        .with_context(|| format!("no username for {carrier}; pass --username"))?;
    let password = args
        .password
        .or_else(|| account.password.clone())
        .with_context(|| format!("no password for {carrier}; pass --password"))?;

    let text = match args.message {
        Some(text) => text,
        None => {
            debug!("reading message from stdin");
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read message from stdin")?;
            text.trim_end_matches(['\r', '\n']).to_owned()
        }
    };

    let recipients = args
        .recipients
        .iter()
        .map(Recipient::parse)
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = WebTextClient::builder(
        carrier,
        Credentials::new(username, password)?,
        account.portal.clone(),
    );
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = config.user_agent.as_deref() {
        builder = builder.user_agent(user_agent);
    }
    let client = builder.build()?;

    let request = SendWebText::new(
        recipients,
        MessageText::new(text)?,
        client.profile().max_recipients,
    )?;
    let report = client.send(&request, args.split).await?;

    println!(
        "Sent {} part(s) to {} via {}",
        report.parts,
        report.recipients.join(", "),
        report.carrier.display_name()
    );
    Ok(())
}

fn about(args: AboutArgs) -> Result<()> {
    let descriptor = PackageDescriptor::current();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    println!("{} {}", descriptor.name, descriptor.version);
    println!("{}", descriptor.description);
    println!("homepage: {}", descriptor.homepage);
    println!("license:  {}", descriptor.license);
    println!("scripts:  {}", descriptor.scripts.join(", "));
    Ok(())
}

fn install(args: InstallArgs) -> Result<()> {
    let bin_dir = match args.bin_dir {
        Some(dir) => dir,
        None => dirs::executable_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("bin")))
            .context("cannot determine an install directory; pass --bin-dir")?,
    };
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let source_dir = exe
        .parent()
        .context("running executable has no parent directory")?;

    for script in install_scripts(&PackageDescriptor::current(), source_dir, &bin_dir)? {
        match script.outcome {
            InstallOutcome::Installed => println!("installed {}", script.path.display()),
            InstallOutcome::Unchanged => println!("up to date {}", script.path.display()),
        }
    }
    Ok(())
}
