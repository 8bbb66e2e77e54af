use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use headerview::config::ParserConfig;
use headerview::http::parser::{parse_header_block, parse_request_head};
use headerview::{HttpHeaders, ParseError, ReadOnlyHttpHeaders, ReadableHeaders};

/// Print a raw request head as seen through a read-only header view
#[derive(Parser, Debug)]
#[command(name = "headerview", version)]
struct Args {
    /// File holding the request head, `-` for stdin
    #[arg(default_value = "-")]
    input: String,

    /// TOML file with parser limits
    #[arg(short, long)]
    config: Option<String>,

    /// Input has header lines only, no request line
    #[arg(long)]
    headers_only: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse input: {0}")]
    Parse(#[from] ParseError),
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "headerview=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = args
        .config
        .as_deref()
        .map(ParserConfig::from_file)
        .unwrap_or_default();
    tracing::debug!(?config, "using parser limits");

    let input = read_input(&args.input)?;

    if args.headers_only {
        let text = String::from_utf8(input).map_err(|_| ParseError::InvalidUtf8)?;
        let headers = parse_header_block(&text, &config)?;
        print_headers(&headers);
    } else {
        let head = parse_request_head(&input, &config)?;
        println!("{:?} {} {:?}", head.method, head.target, head.version);
        print_headers(head.headers());
    }

    Ok(())
}

fn read_input(path: &str) -> std::io::Result<Vec<u8>> {
    if path == "-" {
        let mut input = Vec::new();
        std::io::stdin().read_to_end(&mut input)?;
        return Ok(input);
    }
    std::fs::read(path)
}

fn print_headers(headers: &ReadOnlyHttpHeaders<Arc<HttpHeaders>>) {
    for (name, values) in headers.iter() {
        for value in values {
            println!("{name}: {value}");
        }
    }

    match headers.content_type() {
        Some(content_type) => println!("content type: {content_type}"),
        None => println!("content type: (none)"),
    }

    let accept = headers.accept();
    if accept.is_empty() {
        println!("accept: (none)");
    }
    for media_type in accept {
        println!("accept: {media_type} (q={})", media_type.quality());
    }
}
