use {
  super::*,
  bitcoin::{
    PubkeyHash, WPubkeyHash, base58,
    bech32::{Fe32, segwit},
    hashes::Hash,
    key::{CompressedPublicKey, TweakedPublicKey},
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressKind {
  P2pkh,
  P2wpkh,
  P2tr,
}

/// An address reduced to the output script it pays and the kind of spend
/// needed to claim coins sent to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainAddress {
  script_pubkey: ScriptBuf,
  kind: AddressKind,
}

impl ChainAddress {
  pub fn parse(input: &str, chain: Chain) -> Result<Self> {
    let invalid = || SnafuError::AddressParse {
      input: input.into(),
    };

    if let Some(hrp) = chain.hrp() {
      if input
        .to_lowercase()
        .starts_with(&format!("{}1", hrp.as_str()))
      {
        return Self::parse_segwit(input, chain);
      }
    }

    let data = base58::decode_check(input).map_err(|_| invalid())?;

    let (version, payload) = data.split_first().ok_or_else(invalid)?;

    if *version == chain.p2sh_prefix() && payload.len() == 20 {
      return Err(SnafuError::UnsupportedAddress {
        input: input.into(),
      });
    }

    snafu::ensure!(*version == chain.p2pkh_prefix(), error::AddressParse { input });

    let hash = <[u8; 20]>::try_from(payload).map_err(|_| invalid())?;

    Ok(Self {
      script_pubkey: ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(hash)),
      kind: AddressKind::P2pkh,
    })
  }

  fn parse_segwit(input: &str, chain: Chain) -> Result<Self> {
    let (hrp, version, program) = segwit::decode(input).map_err(|_| SnafuError::AddressParse {
      input: input.into(),
    })?;

    snafu::ensure!(Some(hrp) == chain.hrp(), error::AddressParse { input });

    if version == Fe32::Q {
      if let Ok(hash) = <[u8; 20]>::try_from(program.as_slice()) {
        return Ok(Self {
          script_pubkey: ScriptBuf::new_p2wpkh(&WPubkeyHash::from_byte_array(hash)),
          kind: AddressKind::P2wpkh,
        });
      }
    }

    if version == Fe32::P {
      if let Ok(key) = XOnlyPublicKey::from_slice(&program) {
        return Ok(Self {
          script_pubkey: ScriptBuf::new_p2tr_tweaked(TweakedPublicKey::dangerous_assume_tweaked(
            key,
          )),
          kind: AddressKind::P2tr,
        });
      }
    }

    Err(SnafuError::UnsupportedAddress {
      input: input.into(),
    })
  }

  pub fn p2pkh(public_key: &PublicKey) -> Self {
    Self {
      script_pubkey: ScriptBuf::new_p2pkh(&public_key.pubkey_hash()),
      kind: AddressKind::P2pkh,
    }
  }

  pub fn p2wpkh(public_key: &CompressedPublicKey) -> Self {
    Self {
      script_pubkey: ScriptBuf::new_p2wpkh(&public_key.wpubkey_hash()),
      kind: AddressKind::P2wpkh,
    }
  }

  /// Key-path taproot address for `internal_key`, with no script tree.
  pub fn p2tr(internal_key: XOnlyPublicKey) -> Self {
    Self {
      script_pubkey: ScriptBuf::new_p2tr(&Secp256k1::verification_only(), internal_key, None),
      kind: AddressKind::P2tr,
    }
  }

  pub fn script_pubkey(&self) -> &ScriptBuf {
    &self.script_pubkey
  }

  pub fn kind(&self) -> AddressKind {
    self.kind
  }
}
