use super::*;

/// A transaction under construction, with the PSBT metadata of each input.
#[derive(Debug, Clone)]
pub struct Draft {
  pub(crate) version: Version,
  pub(crate) inputs: Vec<(TxIn, psbt::Input)>,
  pub(crate) outputs: Vec<TxOut>,
}

impl Draft {
  pub(crate) fn new(version: Version) -> Self {
    Self {
      version,
      inputs: Vec::new(),
      outputs: Vec::new(),
    }
  }

  pub(crate) fn input(&mut self, previous_output: OutPoint, sequence: Sequence, input: psbt::Input) {
    self.inputs.push((
      TxIn {
        previous_output,
        sequence,
        script_sig: ScriptBuf::new(),
        witness: Witness::new(),
      },
      input,
    ));
  }

  pub(crate) fn to_psbt(&self) -> Result<Psbt> {
    let mut psbt = Psbt::from_unsigned_tx(Transaction {
      version: self.version,
      lock_time: LockTime::ZERO,
      input: self.inputs.iter().map(|(txin, _)| txin.clone()).collect(),
      output: self.outputs.clone(),
    })
    .snafu_context(error::Psbt)?;

    for (slot, (_, input)) in psbt.inputs.iter_mut().zip(&self.inputs) {
      *slot = input.clone();
    }

    Ok(psbt)
  }
}
