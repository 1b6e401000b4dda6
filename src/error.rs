use super::*;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum SnafuError {
  #[snafu(display("Failed to parse address `{input}`"))]
  AddressParse { input: String },
  #[snafu(display("{err}"))]
  Anyhow { err: anyhow::Error },
  #[snafu(display(
    "Chain needs {needed} funding coins but the split only produced {available}"
  ))]
  ChainStarvation { needed: usize, available: usize },
  #[snafu(display("Failed to decode transaction for coin {txid}"))]
  CoinDecode {
    source: consensus::encode::FromHexError,
    txid: Txid,
  },
  #[snafu(display("Failed to parse coin file `{}`", path.display()))]
  CoinFile {
    source: serde_json::Error,
    path: PathBuf,
  },
  #[snafu(display("Coin {outpoint} does not match its transaction"))]
  CoinOutput { outpoint: OutPoint },
  #[snafu(display("Coin source failed: {error}"))]
  CoinSource { error: BoxError },
  #[snafu(display("Failed to create taproot control block"))]
  ControlBlock,
  #[snafu(display("Failed to parse fee rate `{input}`"))]
  FeeRateParse {
    source: std::num::ParseFloatError,
    input: String,
  },
  #[snafu(display("Failed to finalize input {input}"))]
  Finalize {
    source: miniscript::psbt::Error,
    input: usize,
  },
  #[snafu(display("Incomplete taproot tree"))]
  IncompleteTaprootTree,
  #[snafu(display(
    "Insufficient funds: {} koinu available, {} koinu required",
    available.to_sat(),
    required.to_sat()
  ))]
  InsufficientFunds { available: Amount, required: Amount },
  #[snafu(display("Invalid chain `{chain}`"))]
  InvalidChain { chain: String },
  #[snafu(display("Invalid fee rate `{rate}`"))]
  InvalidFeeRate { rate: f64 },
  #[snafu(display("I/O error at `{}`", path.display()))]
  Io { source: io::Error, path: PathBuf },
  #[snafu(display("Signer returned no signature for input {input}"))]
  MissingSignature { input: usize },
  #[snafu(display("Split requires at least one coin"))]
  NoCoins,
  #[snafu(display("Failed to build PSBT"))]
  Psbt { source: psbt::Error },
  #[snafu(display("Signer failed: {error}"))]
  Signer { error: BoxError },
  #[snafu(display("Failed to build taproot tree"))]
  TaprootBuilder {
    source: bitcoin::taproot::TaprootBuilderError,
  },
  #[snafu(display("Address `{input}` is not a supported funding address"))]
  UnsupportedAddress { input: String },
  #[snafu(display("Split requires at least one output"))]
  ZeroOutputs,
}

impl From<Error> for SnafuError {
  fn from(err: Error) -> SnafuError {
    Self::Anyhow { err }
  }
}

/// `anyhow::Context` shadows `snafu::ResultExt::context`, so snafu contexts
/// are attached through this adapter instead.
pub(crate) trait ResultExt<T, E>: Sized {
  fn snafu_context<C, E2>(self, context: C) -> Result<T, E2>
  where
    C: snafu::IntoError<E2, Source = E>,
    E2: std::error::Error + snafu::ErrorCompat;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E> {
  fn snafu_context<C, E2>(self, context: C) -> Result<T, E2>
  where
    C: snafu::IntoError<E2, Source = E>,
    E2: std::error::Error + snafu::ErrorCompat,
  {
    use snafu::ResultExt;
    self.context(context)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insufficient_funds_reports_koinu() {
    assert_eq!(
      SnafuError::InsufficientFunds {
        available: Amount::from_sat(5),
        required: Amount::from_sat(100_000),
      }
      .to_string(),
      "Insufficient funds: 5 koinu available, 100000 koinu required",
    );
  }

  #[test]
  fn signer_errors_are_passed_through() {
    let err = SnafuError::Signer {
      error: "user rejected".into(),
    };

    assert_eq!(err.to_string(), "Signer failed: user rejected");
  }
}
