use doi_api::{Query, Resolver};

use clap::{AppSettings, Subcommand};
use eyre::{eyre, Context};
use log::{info, trace};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Resolve a handle and print the response as JSON
    #[clap(setting(AppSettings::ArgRequiredElseHelp))]
    Resolve {
        /// The handle (DOI) to resolve
        handle: String,

        /// Only return values of this type, may be repeated
        #[clap(long = "type")]
        types: Vec<String>,

        /// Only return the value at this index, may be repeated
        #[clap(long = "index")]
        indices: Vec<u32>,

        /// Ask the server for pretty printed JSON
        #[clap(long)]
        pretty: bool,

        /// Bypass the proxy cache and query a primary handle server
        #[clap(long)]
        auth: bool,

        /// Request an authenticated response from the source handle server
        #[clap(long)]
        cert: bool,
    },
    /// Print the URL a DOI points at
    #[clap(setting(AppSettings::ArgRequiredElseHelp))]
    Url {
        /// The DOI to get the URL of
        doi: String,

        /// Print every alternate location instead of the preferred one
        #[clap(short, long)]
        all: bool,
    },
}

impl Commands {
    pub fn execute(self, resolver: &Resolver) -> eyre::Result<String> {
        match self {
            Commands::Resolve {
                handle,
                types,
                indices,
                pretty,
                auth,
                cert,
            } => {
                trace!("resolve subcommand called with the value of '{handle}'");
                let query = indices
                    .into_iter()
                    .fold(Query::new().value_types(types), Query::index)
                    .pretty(pretty)
                    .auth(auth)
                    .cert(cert);

                let response = resolver.resolve(&handle, &query)?;
                info!("Response code {}", response.code());
                serde_json::to_string_pretty(&response)
                    .wrap_err_with(|| eyre!("Cannot print the response for '{handle}'"))
            }
            Commands::Url { doi, all } => {
                trace!("url subcommand called with the value of '{doi}'");
                let target = resolver.get_url(&doi, all)?;
                Ok(target.into_vec().join("\n"))
            }
        }
    }
}
