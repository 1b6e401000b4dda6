use super::*;

/// Prices transactions by signing and measuring them.
///
/// Nothing is cached between calls. Every fee comes from a fresh signature,
/// so signers whose signature length varies are always priced by what they
/// actually produced.
pub struct FeeEstimator<'a> {
  signer: &'a dyn Signer,
  fee_rate: FeeRate,
}

impl<'a> FeeEstimator<'a> {
  pub fn new(signer: &'a dyn Signer, fee_rate: FeeRate) -> Self {
    Self { signer, fee_rate }
  }

  pub fn fee_rate(&self) -> FeeRate {
    self.fee_rate
  }

  /// Sign `draft`, finalize it with `finalizer` and extract the transaction.
  pub(crate) async fn complete(
    &self,
    draft: &Draft,
    finalizer: &Finalizer<'_>,
    options: SignOptions,
  ) -> Result<Transaction> {
    let psbt = draft.to_psbt()?;

    let mut psbt = self
      .signer
      .sign_psbt(psbt, options)
      .await
      .map_err(|error| SnafuError::Signer { error })?;

    finalizer.finalize(&mut psbt)?;

    Ok(psbt.extract_tx_unchecked_fee_rate())
  }

  /// Fee for `draft` once `placeholders` are appended, measured on a signed
  /// and finalized copy that is then discarded.
  pub(crate) async fn fee(
    &self,
    draft: &Draft,
    placeholders: impl IntoIterator<Item = TxOut>,
    finalizer: &Finalizer<'_>,
    options: SignOptions,
  ) -> Result<Amount> {
    let mut simulation = draft.clone();
    simulation.outputs.extend(placeholders);

    let transaction = self.complete(&simulation, finalizer, options).await?;

    let size = transaction.total_size();
    let fee = self.fee_rate.fee(size);

    log::debug!(
      "simulated transaction is {size} bytes, fee {} koinu at {} koinu/byte",
      fee.to_sat(),
      self.fee_rate,
    );

    Ok(fee)
  }
}

/// Zero-value output standing in for change while a fee is measured.
pub(crate) fn placeholder(script_pubkey: &Script) -> TxOut {
  TxOut {
    value: Amount::ZERO,
    script_pubkey: script_pubkey.to_owned(),
  }
}
