use {
  super::*,
  bitcoin::bech32::Hrp,
  clap::ValueEnum,
};

#[derive(Default, ValueEnum, Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chain {
  #[default]
  #[value(alias("doge"))]
  Dogecoin,
  #[value(alias("doge-testnet"))]
  DogecoinTestnet,
  DogecoinRegtest,
  #[value(alias("bells"))]
  Bellscoin,
  #[value(alias("bells-testnet"))]
  BellscoinTestnet,
}

impl Chain {
  /// Base58check version byte of pay-to-pubkey-hash addresses.
  pub fn p2pkh_prefix(self) -> u8 {
    match self {
      Self::Dogecoin => 0x1e,
      Self::DogecoinTestnet => 0x71,
      Self::DogecoinRegtest => 0x6f,
      Self::Bellscoin => 0x19,
      Self::BellscoinTestnet => 0x21,
    }
  }

  /// Base58check version byte of pay-to-script-hash addresses.
  pub fn p2sh_prefix(self) -> u8 {
    match self {
      Self::Dogecoin => 0x16,
      Self::DogecoinTestnet | Self::DogecoinRegtest | Self::BellscoinTestnet => 0xc4,
      Self::Bellscoin => 0x1e,
    }
  }

  /// Human-readable part of segwit addresses, if the chain has segwit.
  pub fn hrp(self) -> Option<Hrp> {
    let hrp = match self {
      Self::Dogecoin | Self::DogecoinTestnet | Self::DogecoinRegtest => return None,
      Self::Bellscoin => "bel",
      Self::BellscoinTestnet => "tbel",
    };

    Hrp::parse(hrp).ok()
  }
}

impl Display for Chain {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(
      f,
      "{}",
      match self {
        Self::Dogecoin => "dogecoin",
        Self::DogecoinTestnet => "dogecoin-testnet",
        Self::DogecoinRegtest => "dogecoin-regtest",
        Self::Bellscoin => "bellscoin",
        Self::BellscoinTestnet => "bellscoin-testnet",
      }
    )
  }
}

impl FromStr for Chain {
  type Err = SnafuError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "dogecoin" | "doge" | "mainnet" => Ok(Self::Dogecoin),
      "dogecoin-testnet" | "doge-testnet" | "testnet" => Ok(Self::DogecoinTestnet),
      "dogecoin-regtest" | "doge-regtest" | "regtest" => Ok(Self::DogecoinRegtest),
      "bellscoin" | "bells" => Ok(Self::Bellscoin),
      "bellscoin-testnet" | "bells-testnet" => Ok(Self::BellscoinTestnet),
      _ => Err(SnafuError::InvalidChain {
        chain: s.to_string(),
      }),
    }
  }
}
