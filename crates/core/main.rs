#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{error, process, time::Duration};

mod commands;

use commands::Commands;

use doi_api::{Resolver, ResolverBuilder};

use clap::{Args, Parser};
use eyre::{eyre, Context};
use log::{error, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> Result<(), Box<dyn error::Error>> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                verbosity,
                quiet,
                timeout,
                headers,
                proxy,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let resolver = build_resolver(timeout, &headers, proxy)?;
    let message = command.execute(&resolver)?;
    println!("{message}");
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<(), Box<dyn error::Error>> {
    // if quiet then ignore verbosity but still show errors and warnings
    let verbosity = if quiet { 1 } else { verbosity + 2 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

fn build_resolver(
    timeout: Option<u64>,
    headers: &[String],
    proxy: Option<String>,
) -> eyre::Result<Resolver> {
    let mut builder = Resolver::builder();

    if let Some(secs) = timeout {
        trace!("'timeout' option used with value of '{secs}'");
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder = headers
        .iter()
        .map(String::as_str)
        .try_fold(builder, add_header)?;

    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .wrap_err_with(|| eyre!("Cannot set up the handle resolver"))
}

fn add_header(builder: ResolverBuilder, header: &str) -> eyre::Result<ResolverBuilder> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| eyre!("Header '{header}' is not in the form 'name: value'"))?;
    Ok(builder.header(name.trim(), value.trim()))
}

#[derive(Parser)]
#[clap(name = "doi")]
#[clap(about = "Resolve DOIs through the doi.org handle API")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Only errors and warnings are written to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,

    /// Request timeout in seconds
    #[clap(short, long, global = true)]
    timeout: Option<u64>,

    /// Extra request header in the form 'name: value', may be repeated
    #[clap(short = 'H', long = "header", global = true)]
    headers: Vec<String>,

    /// Send requests through this proxy
    #[clap(long, global = true)]
    proxy: Option<String>,
}

#[test]
fn header_is_split_on_first_colon() {
    let builder = add_header(Resolver::builder(), "Accept: application/json; charset=utf-8");
    assert!(builder.is_ok());

    let builder = add_header(Resolver::builder(), "no-colon");
    assert!(builder.is_err());
}
