use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
mod auth;
use keystretch::crypto::{self, SALT_LEN};
use keystretch::encoding::decode_b64;
use keystretch::output::{self, OutputFormat};
use keystretch::{HashAlgorithm, KdfParams, RoundType, derive_key, derive_key_b64, expand_cost};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct StretchArgs {
    /// Digest algorithm, by name or OpenPGP id (md5, sha1, sha224, sha256, sha384, sha512)
    #[arg(long, short, env = "KEYSTRETCH_ALGORITHM", default_value = "sha256")]
    algorithm: HashAlgorithm,

    /// Round type: simple, salted or iterated
    #[arg(long, short, env = "KEYSTRETCH_ROUND", default_value = "iterated")]
    round: RoundType,

    /// Iterated cost byte (expanded to (16 + c & 15) << ((c >> 4) + 6) bytes)
    #[arg(long, short, env = "KEYSTRETCH_COST", default_value_t = 96)]
    cost: u8,
}

impl StretchArgs {
    fn to_kdf_params(&self) -> Result<KdfParams> {
        Ok(KdfParams::new(self.algorithm, self.round, self.cost)?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "keystretch")]
#[command(
    version,
    about = "Stretch a passphrase into key material with OpenPGP-style S2K rounds."
)]
struct Cli {
    /// Log debug events to stderr
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Derives a key from a passphrase and salt
    Derive {
        #[command(flatten)]
        stretch: StretchArgs,

        /// Number of key bytes to produce
        #[arg(
            long,
            short = 'n',
            default_value_t = 32,
            value_parser = clap::value_parser!(u32).range(1..=65536)
        )]
        length: u32,

        /// Base64 salt
        #[arg(long, env = "KEYSTRETCH_SALT", default_value = "")]
        salt_b64: String,

        /// Base64 passphrase (default: KEYSTRETCH_PASSPHRASE, stdin or a prompt)
        #[arg(long)]
        passphrase_b64: Option<String>,

        /// Output format: base64, hex or json
        #[arg(long, short, default_value = "base64")]
        format: OutputFormat,
    },

    /// Hashes a base64 payload or stdin
    Digest {
        #[arg(long, short, env = "KEYSTRETCH_ALGORITHM", default_value = "sha256")]
        algorithm: HashAlgorithm,

        /// Base64 payload (otherwise stdin is hashed)
        #[arg(long)]
        b64: Option<String>,

        #[arg(long, short, default_value = "hex")]
        format: OutputFormat,
    },

    /// Prints fresh random bytes for use as a salt
    Salt {
        #[arg(
            long,
            short = 'n',
            default_value_t = SALT_LEN as u32,
            value_parser = clap::value_parser!(u32).range(1..=1024)
        )]
        length: u32,

        #[arg(long, short, default_value = "base64")]
        format: OutputFormat,
    },

    /// Lists the supported digest algorithms
    Algorithms,

    /// Shows how many bytes an iterated round hashes for a cost byte
    #[command(arg_required_else_help = true)]
    Cost { cost: u8 },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // optional; lets KEYSTRETCH_* defaults live in a .env file
    let _ = dotenvy::dotenv();
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Derive {
            stretch,
            length,
            salt_b64,
            passphrase_b64,
            format,
        } => {
            let params = stretch.to_kdf_params()?;
            let length = length as usize;

            let key = match passphrase_b64 {
                Some(passphrase_b64) => derive_key_b64(
                    &passphrase_b64,
                    &salt_b64,
                    length,
                    params.algorithm(),
                    params.round_type(),
                    params.cost(),
                )?,
                None => {
                    let salt = decode_b64("salt", &salt_b64)?;
                    let passphrase = auth::read_passphrase()?;
                    derive_key(passphrase.as_bytes(), &salt, length, &params)
                        .context("key derivation failed")?
                }
            };

            let text = output::render_key(&key, &params, format)?;
            println!("{}", text.as_str());
        }
        Commands::Digest {
            algorithm,
            b64,
            format,
        } => {
            let data = match b64 {
                Some(payload) => decode_b64("payload", &payload)?,
                None => {
                    let mut buf = zeroize::Zeroizing::new(Vec::new());
                    std::io::stdin()
                        .read_to_end(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };

            let digest = keystretch::digest(algorithm, &data)?;
            println!("{}", output::render_digest(algorithm, &digest, format)?);
        }
        Commands::Salt { length, format } => {
            let length = length as usize;
            let text = if length == SALT_LEN {
                output::render_bytes(&crypto::generate_salt()?, format)?
            } else {
                output::render_bytes(&crypto::random_bytes(length)?, format)?
            };
            println!("{text}");
        }
        Commands::Algorithms => {
            println!("{:<4}  {:<10}  {}", "Id", "Name", "Digest");
            println!("{:-<4}  {:-<10}  {:-<6}", "", "", "");
            for alg in HashAlgorithm::ALL {
                let len = match alg.digest_len() {
                    Some(len) => format!("{len} bytes"),
                    None => "unsupported".to_string(),
                };
                println!("{:<4}  {:<10}  {len}", alg.id(), alg.name());
            }
        }
        Commands::Cost { cost } => {
            println!("{}", expand_cost(cost));
        }
    }

    Ok(())
}
