use clap::Parser;
use colored::Colorize;
use mailprobe_core::{
    get_formatter, BulkChecker, MailKind, OutputFormat, Probe, ProxyConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailprobe")]
#[command(about = "Check whether mailboxes are registered with a webmail provider")]
#[command(version)]
struct Cli {
    /// Provider to check against (microsoft or yahoo)
    #[arg(short, long)]
    provider: String,

    /// Addresses to check
    #[arg(required = true)]
    emails: Vec<String>,

    /// Output format (human or json)
    #[arg(short, long, default_value = "human")]
    format: String,

    /// Concurrent checks
    #[arg(short, long, default_value_t = 4)]
    concurrency: usize,

    /// Proxy host:port to route checks through
    #[arg(long, default_value = "")]
    proxy_host: String,

    /// Proxy scheme
    #[arg(long, default_value = "http")]
    proxy_scheme: String,

    /// Proxy username
    #[arg(long, default_value = "")]
    proxy_user: String,

    /// Proxy password
    #[arg(long, default_value = "")]
    proxy_password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let kind: MailKind = match cli.provider.parse() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("{} {}", "Error:".bright_red(), e);
            std::process::exit(1);
        }
    };
    let output_format: OutputFormat = cli.format.parse().unwrap_or_default();

    let proxy = ProxyConfig {
        host: cli.proxy_host,
        scheme: cli.proxy_scheme,
        user: cli.proxy_user,
        password: cli.proxy_password,
    };

    let probe = match Probe::new(kind, &proxy) {
        Ok(probe) => probe,
        Err(e) => {
            eprintln!("{} {}", "Error:".bright_red(), e);
            std::process::exit(1);
        }
    };

    let checker = BulkChecker::new(probe).with_concurrency(cli.concurrency);
    let results = checker.execute(cli.emails, None).await;

    let formatter = get_formatter(output_format);
    println!("{}", formatter.format_report(&results));

    Ok(())
}
