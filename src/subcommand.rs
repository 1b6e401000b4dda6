use super::*;

pub mod inscribe;
pub mod plan;
pub mod sign;
pub mod split;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  #[command(about = "Inscribe a file")]
  Inscribe(inscribe::Inscribe),
  #[command(about = "Show how a file would be partitioned across chained transactions")]
  Plan(plan::Plan),
  #[command(about = "Sign a base64 PSBT read from stdin with a secret key")]
  Sign(sign::Sign),
  #[command(about = "Split coins into equal outputs")]
  Split(split::Split),
}

impl Subcommand {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    match self {
      Self::Inscribe(inscribe) => inscribe.run(settings),
      Self::Plan(plan) => plan.run(settings),
      Self::Sign(sign) => sign.run(),
      Self::Split(split) => split.run(settings),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
  #[default]
  Json,
  Yaml,
  Minify,
}

pub trait Output: Send {
  fn print(&self, format: OutputFormat);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print(&self, format: OutputFormat) {
    match format {
      OutputFormat::Json => serde_json::to_writer_pretty(io::stdout(), self).ok(),
      OutputFormat::Yaml => serde_yaml::to_writer(io::stdout(), self).ok(),
      OutputFormat::Minify => serde_json::to_writer(io::stdout(), self).ok(),
    };
    println!();
  }
}

pub(crate) type SubcommandResult = Result<Option<Box<dyn Output>>, Error>;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
  pub txid: Txid,
  pub hex: String,
}

impl From<&Transaction> for SignedTransaction {
  fn from(transaction: &Transaction) -> Self {
    Self {
      txid: transaction.compute_txid(),
      hex: consensus::encode::serialize_hex(transaction),
    }
  }
}

/// Run `future` to completion on a fresh runtime.
pub(crate) fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, Error> {
  Ok(
    tokio::runtime::Builder::new_multi_thread()
      .enable_all()
      .build()?
      .block_on(future),
  )
}

/// Content type of `path`, unless overridden.
pub(crate) fn content_type(path: &Path, content_type: Option<String>) -> String {
  content_type.unwrap_or_else(|| {
    mime_guess::from_path(path)
      .first_or_octet_stream()
      .essence_str()
      .to_string()
  })
}
