use {super::*, miniscript::psbt::PsbtExt};

/// How a signed PSBT becomes a complete transaction.
#[derive(Debug, Clone, Copy)]
pub enum Finalizer<'a> {
  /// Every input is finalized from its own signatures.
  Standard,
  /// Input 0 spends a hash-lock by pushing the chunks that lock drops,
  /// followed by the signature and the lock itself. Remaining inputs are
  /// standard.
  Chained {
    chunks: &'a [Chunk],
    lock: &'a Script,
  },
  /// Input 0 spends the single leaf in its `tap_scripts`. Remaining inputs
  /// are standard.
  ScriptPath,
}

impl Finalizer<'_> {
  pub(crate) fn finalize(&self, psbt: &mut Psbt) -> Result {
    let standard = match self {
      Self::Standard => 0,
      Self::Chained { chunks, lock } => {
        finalize_chained(psbt, chunks, lock)?;
        1
      }
      Self::ScriptPath => {
        finalize_script_path(psbt)?;
        1
      }
    };

    let secp = Secp256k1::verification_only();

    for input in standard..psbt.inputs.len() {
      if finalize_key_path(&mut psbt.inputs[input]) {
        continue;
      }

      psbt
        .finalize_inp_mut(&secp, input)
        .snafu_context(error::Finalize { input })?;
    }

    Ok(())
  }
}

/// `<chunks> <signature> <lock>`
pub(crate) fn unlock_script(chunks: &[Chunk], signature: &[u8], lock: &Script) -> ScriptBuf {
  let mut unlock = Vec::with_capacity(chunks.len() + 2);
  unlock.extend_from_slice(chunks);
  unlock.push(Chunk::from_bytes(signature));
  unlock.push(Chunk::from_bytes(lock.as_bytes()));
  Chunk::to_script(&unlock)
}

/// Taproot key-path spends carry no descriptor, so they are finalized
/// straight from `tap_key_sig`.
fn finalize_key_path(input: &mut psbt::Input) -> bool {
  let p2tr = input
    .witness_utxo
    .as_ref()
    .is_some_and(|utxo| utxo.script_pubkey.is_p2tr());

  if !p2tr {
    return false;
  }

  let Some(signature) = input.tap_key_sig.take() else {
    return false;
  };

  input.final_script_witness = Some(Witness::from_slice(&[signature.to_vec()]));
  input.tap_internal_key = None;
  input.tap_merkle_root = None;
  input.tap_key_origins.clear();
  input.sighash_type = None;

  true
}

fn finalize_chained(psbt: &mut Psbt, chunks: &[Chunk], lock: &Script) -> Result {
  let input = psbt
    .inputs
    .first_mut()
    .ok_or(SnafuError::MissingSignature { input: 0 })?;

  let signature = input
    .partial_sigs
    .values()
    .next()
    .ok_or(SnafuError::MissingSignature { input: 0 })?
    .to_vec();

  input.final_script_sig = Some(unlock_script(chunks, &signature, lock));
  input.partial_sigs.clear();
  input.sighash_type = None;
  input.redeem_script = None;
  input.bip32_derivation.clear();

  Ok(())
}

fn finalize_script_path(psbt: &mut Psbt) -> Result {
  let input = psbt
    .inputs
    .first_mut()
    .ok_or(SnafuError::MissingSignature { input: 0 })?;

  let signature = input
    .tap_script_sigs
    .values()
    .next()
    .ok_or(SnafuError::MissingSignature { input: 0 })?
    .to_vec();

  let (control_block, (script, _)) = input
    .tap_scripts
    .iter()
    .next()
    .ok_or(SnafuError::ControlBlock)?;

  let mut witness = Witness::new();
  witness.push(signature);
  witness.push(script.as_bytes());
  witness.push(control_block.serialize());

  input.final_script_witness = Some(witness);
  input.tap_script_sigs.clear();
  input.tap_scripts.clear();
  input.tap_key_origins.clear();
  input.tap_internal_key = None;
  input.tap_merkle_root = None;
  input.sighash_type = None;

  Ok(())
}
