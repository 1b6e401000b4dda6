use {
  super::*,
  dogscribe_envelope::{MAX_CHUNK_LEN, MAX_PAYLOAD_LEN, count_transactions, partition},
  fee::placeholder,
  std::iter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
  /// Value of every hash-lock output and of the destination output.
  pub postage: Amount,
  /// Largest content part pushed by the envelope.
  pub max_chunk_len: usize,
  /// Largest serialized partition carried by one transaction.
  pub max_payload_len: usize,
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      postage: DEFAULT_POSTAGE,
      max_chunk_len: MAX_CHUNK_LEN,
      max_payload_len: MAX_PAYLOAD_LEN,
    }
  }
}

/// An inscription staged across a chain of pay-to-script-hash transactions.
///
/// Each link locks `postage` behind
///
/// ```text
/// <public key> OP_CHECKSIGVERIFY OP_DROP... OP_TRUE
/// ```
///
/// with one `OP_DROP` per chunk in the partition it is paired with. Spending
/// a link pushes that partition, so the envelope lands on chain piece by
/// piece in the unlocking scripts. The last transaction pays the destination.
#[derive(Debug, Clone)]
pub struct ChainedInscription {
  pub inscription: Inscription,
  pub public_key: PublicKey,
  pub source: ChainAddress,
  pub destination: ScriptBuf,
  pub limits: Limits,
}

#[derive(Debug)]
struct Link {
  coin: Coin,
  lock: ScriptBuf,
  chunks: Range<usize>,
}

impl ChainedInscription {
  pub fn envelope(&self) -> Vec<Chunk> {
    self.inscription.legacy_envelope(self.limits.max_chunk_len)
  }

  pub fn plan(&self) -> Plan {
    Plan::new(&self.envelope(), self.limits.max_payload_len)
  }

  pub fn lock_script(public_key: &PublicKey, drops: usize) -> ScriptBuf {
    let mut chunks = vec![
      Chunk::from_bytes(public_key.to_bytes()),
      Chunk::from_opcode(OP_CHECKSIGVERIFY),
    ];
    chunks.extend(iter::repeat_n(Chunk::from_opcode(OP_DROP), drops));
    chunks.push(Chunk::from_opcode(OP_PUSHNUM_1));
    Chunk::to_script(&chunks)
  }

  /// Build the whole chain: the split transaction funding every link, then
  /// one transaction per partition, then the transaction paying the
  /// destination. Broadcast in the returned order.
  pub async fn build(
    &self,
    signer: &dyn Signer,
    fee_rate: FeeRate,
    coins: &[Coin],
  ) -> Result<Vec<Transaction>> {
    let estimator = FeeEstimator::new(signer, fee_rate);

    let split = Split {
      coins,
      address: &self.source,
      count: self.plan().transactions(),
    }
    .build(&estimator)
    .await?;

    let funding = (0..)
      .map_while(|vout| Coin::from_transaction(&split, vout))
      .collect();

    let mut transactions = vec![split];
    transactions.extend(self.links(&estimator, funding).await?);

    Ok(transactions)
  }

  /// Build the chain links from already split `funding` coins, one coin per
  /// transaction, skipping the split.
  pub async fn build_links(
    &self,
    signer: &dyn Signer,
    fee_rate: FeeRate,
    funding: Vec<Coin>,
  ) -> Result<Vec<Transaction>> {
    self
      .links(&FeeEstimator::new(signer, fee_rate), funding.into())
      .await
  }

  async fn links(
    &self,
    estimator: &FeeEstimator<'_>,
    mut funding: VecDeque<Coin>,
  ) -> Result<Vec<Transaction>> {
    let envelope = self.envelope();
    let partitions = partition(&envelope, self.limits.max_payload_len);
    let needed = count_transactions(&partitions);
    let available = funding.len();

    log::info!(
      "inscribing {} bytes of {} in {} partitions",
      self.inscription.body.len(),
      self.inscription.content_type,
      partitions.len(),
    );

    let mut next_coin = move || {
      funding
        .pop_front()
        .ok_or(SnafuError::ChainStarvation { needed, available })
    };

    let mut transactions = Vec::with_capacity(needed);
    let mut pending = None;

    for chunks in partitions {
      let lock = Self::lock_script(&self.public_key, chunks.len());

      let output = TxOut {
        value: self.limits.postage,
        script_pubkey: ScriptBuf::new_p2sh(&lock.script_hash()),
      };

      let transaction = self
        .link(estimator, &envelope, pending.as_ref(), next_coin()?, output)
        .await?;

      pending = Some(Link {
        coin: Coin::from_transaction(&transaction, 0).ok_or(SnafuError::CoinOutput {
          outpoint: OutPoint {
            txid: transaction.compute_txid(),
            vout: 0,
          },
        })?,
        lock,
        chunks,
      });

      transactions.push(transaction);
    }

    let output = TxOut {
      value: self.limits.postage,
      script_pubkey: self.destination.clone(),
    };

    let transaction = self
      .link(estimator, &envelope, pending.as_ref(), next_coin()?, output)
      .await?;

    transactions.push(transaction);

    Ok(transactions)
  }

  async fn link(
    &self,
    estimator: &FeeEstimator<'_>,
    envelope: &[Chunk],
    pending: Option<&Link>,
    coin: Coin,
    output: TxOut,
  ) -> Result<Transaction> {
    let mut draft = Draft::new(Version::ONE);
    let mut available = coin.value;

    if let Some(link) = pending {
      draft.input(
        link.coin.outpoint,
        Sequence::MAX,
        psbt::Input {
          non_witness_utxo: Some(link.coin.transaction.clone()),
          redeem_script: Some(link.lock.clone()),
          ..default()
        },
      );
      available += link.coin.value;
    }

    draft.input(
      coin.outpoint,
      Sequence::ENABLE_LOCKTIME_NO_RBF,
      coin.psbt_input(self.source.kind())?,
    );

    draft.outputs.push(output.clone());

    let finalizer = match pending {
      None => Finalizer::Standard,
      Some(link) => Finalizer::Chained {
        chunks: &envelope[link.chunks.clone()],
        lock: &link.lock,
      },
    };

    let fee = estimator
      .fee(
        &draft,
        [placeholder(self.source.script_pubkey())],
        &finalizer,
        SignOptions::default(),
      )
      .await?;

    let required = output.value + fee;

    let change = available
      .checked_sub(required)
      .filter(|change| *change > Amount::ZERO)
      .ok_or(SnafuError::InsufficientFunds {
        available,
        required,
      })?;

    draft.outputs.push(TxOut {
      value: change,
      script_pubkey: self.source.script_pubkey().clone(),
    });

    let transaction = estimator
      .complete(&draft, &finalizer, SignOptions::default())
      .await?;

    log::debug!(
      "built link {} spending {}, fee {} koinu, change {} koinu",
      transaction.compute_txid(),
      pending.map_or(0, |link| link.chunks.len()),
      fee.to_sat(),
      change.to_sat(),
    );

    Ok(transaction)
  }
}
