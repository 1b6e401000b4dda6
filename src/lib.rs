#![allow(
  clippy::large_enum_variant,
  clippy::result_large_err,
  clippy::too_many_arguments
)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    draft::Draft,
    error::ResultExt,
    options::Options,
    settings::Settings,
    subcommand::{OutputFormat, Subcommand},
  },
  anyhow::{Context, Error, anyhow, ensure},
  async_trait::async_trait,
  bitcoin::{
    Amount, OutPoint, Psbt, PublicKey, Script, ScriptBuf, Sequence, Transaction, TxIn, TxOut,
    Txid, Witness, XOnlyPublicKey,
    absolute::LockTime,
    consensus,
    opcodes::all::{OP_CHECKSIGVERIFY, OP_DROP, OP_PUSHNUM_1},
    psbt,
    secp256k1::Secp256k1,
    taproot::{LeafVersion, TaprootBuilder},
    transaction::Version,
  },
  clap::Parser,
  dogscribe_envelope::{Chunk, Inscription, Plan},
  serde::{Deserialize, Serialize},
  serde_with::{DeserializeFromStr, SerializeDisplay},
  snafu::Snafu,
  std::{
    collections::{BTreeMap, VecDeque},
    env,
    fmt::{self, Display, Formatter},
    fs,
    io,
    ops::Range,
    path::{Path, PathBuf},
    process,
    str::FromStr,
  },
};

pub use {
  self::{
    address::{AddressKind, ChainAddress},
    chain::Chain,
    coin::{Coin, CoinSource, StaticCoins},
    fee::FeeEstimator,
    fee_rate::FeeRate,
    finalizer::Finalizer,
    key_signer::KeySigner,
    legacy::{ChainedInscription, Limits},
    signer::{BoxError, CommandSigner, SignOptions, Signer},
    splitter::Split,
    taproot::{ServiceFee, TaprootInscription},
  },
  dogscribe_envelope as envelope,
  error::SnafuError,
};

mod address;
mod arguments;
mod chain;
mod coin;
mod config;
mod draft;
mod error;
mod fee;
mod fee_rate;
mod finalizer;
mod key_signer;
mod legacy;
mod options;
mod settings;
mod signer;
mod splitter;
pub mod subcommand;
mod taproot;

/// Value of the hash-lock and destination outputs, in koinu.
pub const DEFAULT_POSTAGE: Amount = Amount::from_sat(100_000);

pub type Result<T = (), E = SnafuError> = std::result::Result<T, E>;

fn default<T: Default>() -> T {
  Default::default()
}

pub fn main() {
  env_logger::init();

  let args = Arguments::parse();

  let format = args.options.format;

  match args.run() {
    Err(err) => {
      eprintln!("error: {err}");

      if let SnafuError::Anyhow { err } = err {
        for (i, err) in err.chain().skip(1).enumerate() {
          if i == 0 {
            eprintln!();
            eprintln!("because:");
          }

          eprintln!("- {err}");
        }

        if env::var_os("RUST_BACKTRACE")
          .map(|val| val == "1")
          .unwrap_or_default()
        {
          eprintln!("{}", err.backtrace());
        }
      } else {
        for (i, err) in snafu::ErrorCompat::iter_chain(&err).skip(1).enumerate() {
          if i == 0 {
            eprintln!();
            eprintln!("because:");
          }

          eprintln!("- {err}");
        }
      }

      process::exit(1);
    }
    Ok(output) => {
      if let Some(output) = output {
        output.print(format.unwrap_or_default());
      }
    }
  }
}
