use super::*;

#[derive(Clone, Default, Debug, Parser)]
pub struct Options {
  #[arg(long = "chain", value_enum, help = "Use <CHAIN>. [default: dogecoin]")]
  pub(crate) chain_argument: Option<Chain>,
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(long, help = "Load configuration from <CONFIG_DIR>.")]
  pub(crate) config_dir: Option<PathBuf>,
  #[arg(long, help = "Use fee rate of <FEE_RATE> koinu/byte. [default: 1.0]")]
  pub(crate) fee_rate: Option<FeeRate>,
  #[clap(long, short, help = "Specify output format. [default: json]")]
  pub(crate) format: Option<OutputFormat>,
  #[arg(long, help = "Split content into parts of at most <MAX_CHUNK_LEN> bytes. [default: 240]")]
  pub(crate) max_chunk_len: Option<usize>,
  #[arg(
    long,
    help = "Carry at most <MAX_PAYLOAD_LEN> envelope bytes per chained transaction. [default: 1500]"
  )]
  pub(crate) max_payload_len: Option<usize>,
  #[arg(
    long,
    help = "Lock <POSTAGE> koinu in every hash-lock and destination output. [default: 100000]"
  )]
  pub(crate) postage: Option<u64>,
  #[arg(long, short, help = "Use regtest. Equivalent to `--chain dogecoin-regtest`.")]
  pub(crate) regtest: bool,
  #[arg(
    long,
    help = "Sign transactions by piping base64 PSBTs through <SIGNER> command."
  )]
  pub(crate) signer: Option<String>,
  #[arg(long, short, help = "Use testnet. Equivalent to `--chain dogecoin-testnet`.")]
  pub(crate) testnet: bool,
}
