use {super::*, fee::placeholder};

/// Spends every coin in a pool into `count` equal outputs paying `address`.
#[derive(Debug, Clone)]
pub struct Split<'a> {
  pub coins: &'a [Coin],
  pub address: &'a ChainAddress,
  pub count: usize,
}

impl Split<'_> {
  pub async fn build(&self, estimator: &FeeEstimator<'_>) -> Result<Transaction> {
    if self.coins.is_empty() {
      return Err(SnafuError::NoCoins);
    }

    if self.count == 0 {
      return Err(SnafuError::ZeroOutputs);
    }

    let mut draft = Draft::new(Version::ONE);

    for coin in self.coins {
      draft.input(coin.outpoint, Sequence::MAX, coin.psbt_input(self.address.kind())?);
    }

    let available = self.coins.iter().map(|coin| coin.value).sum::<Amount>();

    let fee = estimator
      .fee(
        &draft,
        (0..self.count).map(|_| placeholder(self.address.script_pubkey())),
        &Finalizer::Standard,
        SignOptions::default(),
      )
      .await?;

    let count = self.count as u64;

    let value = available
      .checked_sub(fee)
      .map(|remaining| remaining / count)
      .filter(|value| *value > Amount::ZERO)
      .ok_or(SnafuError::InsufficientFunds {
        available,
        required: fee + Amount::from_sat(count),
      })?;

    draft.outputs = (0..self.count)
      .map(|_| TxOut {
        value,
        script_pubkey: self.address.script_pubkey().clone(),
      })
      .collect();

    let transaction = estimator
      .complete(&draft, &Finalizer::Standard, SignOptions::default())
      .await?;

    log::info!(
      "split {} koinu across {} outputs of {} koinu, fee {} koinu",
      available.to_sat(),
      self.count,
      value.to_sat(),
      fee.to_sat(),
    );

    Ok(transaction)
  }
}
