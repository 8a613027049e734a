//! cfgvti command - create VTI tunnel interfaces.

mod keywords;

use std::net::Ipv4Addr;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use vtilink::netlink::{Connection, Error, VtiLink};
use vtilink::util::ifname::{self, IFNAMSIZ};
use vtilink::util::{parse_ipv4, parse_key};

#[derive(Parser)]
#[command(
    name = "cfgvti",
    version,
    about = "VTI tunnel configuration tool",
    after_help = "Keyword form is also accepted: cfgvti add name NAME key MARK remote IP local IP"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a VTI interface.
    Add {
        /// Interface name.
        name: String,

        /// Tunnel key (mark), as an integer or dotted-quad.
        #[arg(long)]
        key: String,

        /// Remote endpoint address.
        #[arg(long)]
        remote: String,

        /// Local endpoint address.
        #[arg(long)]
        local: String,
    },

    /// Delete a VTI interface (not supported).
    Del {
        #[arg(num_args = 0.., allow_hyphen_values = true, hide = true)]
        args: Vec<String>,
    },
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Add {
                name,
                key,
                remote,
                local,
            } => add(name, &key, &remote, &local),
            Command::Del { .. } => bail!("Invalid action \"del\""),
        }
    }
}

fn add(name: String, key: &str, remote: &str, local: &str) -> anyhow::Result<()> {
    let key = parse_key(key).with_context(|| format!("Invalid value for \"key\" {}", key))?;
    let remote: Ipv4Addr =
        parse_ipv4(remote).with_context(|| format!("Invalid \"remote\" address {}", remote))?;
    let local: Ipv4Addr =
        parse_ipv4(local).with_context(|| format!("Invalid \"local\" address {}", local))?;

    if key == 0 || remote.is_unspecified() || local.is_unspecified() {
        bail!("Invalid values for \"add\"");
    }

    // Reject the name before opening a socket
    if !ifname::fits(&name) {
        return Err(Error::NameTooLong {
            name,
            max: IFNAMSIZ - 1,
        }
        .into());
    }

    let vti = VtiLink::new(name, local, remote, key);
    let mut conn = Connection::new().context("Failed to open the rt_netlink socket")?;
    conn.add_link(&vti)?;

    tracing::debug!(?vti, "created vti link");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse_from(keywords::rewrite(std::env::args_os().collect()));

    if let Err(e) = cli.command.run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
