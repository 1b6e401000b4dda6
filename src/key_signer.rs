use {
  super::*,
  bitcoin::{
    EcdsaSighashType, TapLeafHash, TapSighashType, ecdsa,
    hashes::Hash,
    key::{CompressedPublicKey, Keypair, TapTweak},
    secp256k1::{All, Message, SecretKey},
    sighash::{Prevouts, SighashCache},
    taproot,
  },
};

/// Signs every input it can with a single secret key.
///
/// Pay-to-taproot inputs get a key-path signature with the BIP-86 tweak, or
/// script-path signatures for each of their `tap_scripts` when
/// `disable_key_tweak` is set. P2WPKH inputs are signed as segwit v0. All
/// other inputs are signed as legacy spends of their `redeem_script`, or of
/// their output script if they have none.
pub struct KeySigner {
  secp: Secp256k1<All>,
  secret_key: SecretKey,
}

impl KeySigner {
  pub fn new(secret_key: SecretKey) -> Self {
    Self {
      secp: Secp256k1::new(),
      secret_key,
    }
  }

  fn keypair(&self) -> Keypair {
    Keypair::from_secret_key(&self.secp, &self.secret_key)
  }

  pub fn public_key(&self) -> PublicKey {
    PublicKey::new(self.secret_key.public_key(&self.secp))
  }

  pub fn compressed_public_key(&self) -> CompressedPublicKey {
    CompressedPublicKey(self.secret_key.public_key(&self.secp))
  }

  pub fn x_only_public_key(&self) -> XOnlyPublicKey {
    self.keypair().x_only_public_key().0
  }

  fn ecdsa(&self, digest: [u8; 32]) -> ecdsa::Signature {
    ecdsa::Signature {
      signature: self
        .secp
        .sign_ecdsa_low_r(&Message::from_digest(digest), &self.secret_key),
      sighash_type: EcdsaSighashType::All,
    }
  }

  fn schnorr(&self, digest: [u8; 32], keypair: &Keypair) -> taproot::Signature {
    taproot::Signature {
      signature: self
        .secp
        .sign_schnorr_no_aux_rand(&Message::from_digest(digest), keypair),
      sighash_type: TapSighashType::Default,
    }
  }

  pub fn sign(&self, psbt: &mut Psbt, options: SignOptions) -> Result<(), BoxError> {
    let prevouts = psbt
      .inputs
      .iter()
      .zip(&psbt.unsigned_tx.input)
      .enumerate()
      .map(|(index, (input, txin))| {
        input
          .witness_utxo
          .clone()
          .or_else(|| {
            let vout = usize::try_from(txin.previous_output.vout).ok()?;
            input.non_witness_utxo.as_ref()?.output.get(vout).cloned()
          })
          .ok_or_else(|| format!("input {index} has no previous output"))
      })
      .collect::<Result<Vec<TxOut>, String>>()?;

    let unsigned_tx = psbt.unsigned_tx.clone();
    let mut cache = SighashCache::new(&unsigned_tx);
    let keypair = self.keypair();
    let x_only_public_key = self.x_only_public_key();

    for (index, (input, prevout)) in psbt.inputs.iter_mut().zip(&prevouts).enumerate() {
      let script_pubkey = &prevout.script_pubkey;

      if script_pubkey.is_p2tr() && options.disable_key_tweak {
        let leaves = input
          .tap_scripts
          .values()
          .map(|(script, version)| TapLeafHash::from_script(script, *version))
          .collect::<Vec<TapLeafHash>>();

        for leaf_hash in leaves {
          let sighash = cache.taproot_script_spend_signature_hash(
            index,
            &Prevouts::All(prevouts.as_slice()),
            leaf_hash,
            TapSighashType::Default,
          )?;

          input.tap_script_sigs.insert(
            (x_only_public_key, leaf_hash),
            self.schnorr(sighash.to_byte_array(), &keypair),
          );
        }
      } else if script_pubkey.is_p2tr() {
        let sighash = cache.taproot_key_spend_signature_hash(
          index,
          &Prevouts::All(prevouts.as_slice()),
          TapSighashType::Default,
        )?;

        let tweaked = keypair
          .tap_tweak(&self.secp, input.tap_merkle_root)
          .to_inner();

        input.tap_key_sig = Some(self.schnorr(sighash.to_byte_array(), &tweaked));
      } else if script_pubkey.is_p2wpkh() {
        let sighash = cache.p2wpkh_signature_hash(
          index,
          script_pubkey,
          prevout.value,
          EcdsaSighashType::All,
        )?;

        input
          .partial_sigs
          .insert(self.public_key(), self.ecdsa(sighash.to_byte_array()));
      } else {
        let script_code = input
          .redeem_script
          .clone()
          .unwrap_or_else(|| script_pubkey.clone());

        let sighash =
          cache.legacy_signature_hash(index, &script_code, EcdsaSighashType::All.to_u32())?;

        input
          .partial_sigs
          .insert(self.public_key(), self.ecdsa(sighash.to_byte_array()));
      }
    }

    log::debug!("signed {} inputs", psbt.inputs.len());

    Ok(())
  }
}

#[async_trait]
impl Signer for KeySigner {
  async fn sign_psbt(&self, mut psbt: Psbt, options: SignOptions) -> Result<Psbt, BoxError> {
    self.sign(&mut psbt, options)?;
    Ok(psbt)
  }
}
