use {super::*, fee::placeholder};

/// Extra output paid by every taproot reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFee {
  pub script_pubkey: ScriptBuf,
  pub amount: Amount,
}

/// An inscription revealed in a single taproot script-path spend.
///
/// The commit transaction pays reveal fee, postage and service fee into an
/// output committing to the envelope script. The reveal transaction spends
/// it through that script and pays postage to the destination.
#[derive(Debug, Clone)]
pub struct TaprootInscription {
  pub inscription: Inscription,
  /// Key checked by the envelope script, also used as the internal key.
  pub public_key: XOnlyPublicKey,
  pub source: ChainAddress,
  pub destination: ScriptBuf,
  pub postage: Amount,
  pub service_fee: Option<ServiceFee>,
}

struct Commitment {
  script: ScriptBuf,
  spend_info: bitcoin::taproot::TaprootSpendInfo,
  control_block: bitcoin::taproot::ControlBlock,
}

impl Commitment {
  fn script_pubkey(&self) -> ScriptBuf {
    ScriptBuf::new_p2tr_tweaked(self.spend_info.output_key())
  }

  fn input(&self, value: Amount, internal_key: XOnlyPublicKey) -> psbt::Input {
    psbt::Input {
      witness_utxo: Some(TxOut {
        value,
        script_pubkey: self.script_pubkey(),
      }),
      tap_internal_key: Some(internal_key),
      tap_merkle_root: self.spend_info.merkle_root(),
      tap_scripts: [(
        self.control_block.clone(),
        (self.script.clone(), LeafVersion::TapScript),
      )]
      .into(),
      ..default()
    }
  }
}

impl TaprootInscription {
  fn commitment(&self) -> Result<Commitment> {
    let script = self.inscription.taproot_script(&self.public_key);

    let spend_info = TaprootBuilder::new()
      .add_leaf(0, script.clone())
      .snafu_context(error::TaprootBuilder)?
      .finalize(&Secp256k1::verification_only(), self.public_key)
      .map_err(|_| SnafuError::IncompleteTaprootTree)?;

    let control_block = spend_info
      .control_block(&(script.clone(), LeafVersion::TapScript))
      .ok_or(SnafuError::ControlBlock)?;

    Ok(Commitment {
      script,
      spend_info,
      control_block,
    })
  }

  fn reveal_draft(&self, commitment: &Commitment, commit: OutPoint, value: Amount) -> Draft {
    let mut draft = Draft::new(Version::TWO);

    draft.input(
      commit,
      Sequence::ENABLE_RBF_NO_LOCKTIME,
      commitment.input(value, self.public_key),
    );

    draft.outputs.push(TxOut {
      value: self.postage,
      script_pubkey: self.destination.clone(),
    });

    if let Some(service_fee) = &self.service_fee {
      draft.outputs.push(TxOut {
        value: service_fee.amount,
        script_pubkey: service_fee.script_pubkey.clone(),
      });
    }

    draft
  }

  /// Amount the commit output must carry: the reveal fee, measured against a
  /// zero-value placeholder input, plus postage and service fee.
  pub async fn required_amount(&self, estimator: &FeeEstimator<'_>) -> Result<Amount> {
    self
      .required_amount_for(estimator, &self.commitment()?)
      .await
  }

  async fn required_amount_for(
    &self,
    estimator: &FeeEstimator<'_>,
    commitment: &Commitment,
  ) -> Result<Amount> {
    let draft = self.reveal_draft(commitment, OutPoint::null(), Amount::ZERO);

    let fee = estimator
      .fee(
        &draft,
        [],
        &Finalizer::ScriptPath,
        SignOptions {
          disable_key_tweak: true,
        },
      )
      .await?;

    Ok(draft.outputs.iter().map(|output| output.value).sum::<Amount>() + fee)
  }

  /// Build the commit and reveal transactions, in broadcast order.
  ///
  /// `coins` is first asked for the commit output value. When the coins it
  /// returns cannot also pay the commit fee, it is asked again for output
  /// plus fee.
  pub async fn build(
    &self,
    signer: &dyn Signer,
    fee_rate: FeeRate,
    coins: &dyn CoinSource,
  ) -> Result<Vec<Transaction>> {
    let estimator = FeeEstimator::new(signer, fee_rate);

    let commitment = self.commitment()?;

    let required = self.required_amount_for(&estimator, &commitment).await?;

    log::info!(
      "inscribing {} bytes of {}, commit output {} koinu",
      self.inscription.body.len(),
      self.inscription.content_type,
      required.to_sat(),
    );

    let mut request = required;

    let (commit, fee) = loop {
      let coins = coins
        .coins(request)
        .await
        .map_err(|error| SnafuError::CoinSource { error })?;

      if coins.is_empty() {
        return Err(SnafuError::InsufficientFunds {
          available: Amount::ZERO,
          required: request,
        });
      }

      let mut commit = Draft::new(Version::TWO);

      for coin in &coins {
        commit.input(
          coin.outpoint,
          Sequence::ENABLE_RBF_NO_LOCKTIME,
          coin.psbt_input(self.source.kind())?,
        );
      }

      commit.outputs.push(TxOut {
        value: required,
        script_pubkey: commitment.script_pubkey(),
      });

      let fee = estimator
        .fee(
          &commit,
          [placeholder(self.source.script_pubkey())],
          &Finalizer::Standard,
          SignOptions::default(),
        )
        .await?;

      let available = coins.iter().map(|coin| coin.value).sum::<Amount>();

      if let Some(change) = available
        .checked_sub(required + fee)
        .filter(|change| *change > Amount::ZERO)
      {
        commit.outputs.push(TxOut {
          value: change,
          script_pubkey: self.source.script_pubkey().clone(),
        });

        break (commit, fee);
      }

      let shortfall = required + fee + Amount::ONE_SAT;

      if shortfall <= request {
        return Err(SnafuError::InsufficientFunds {
          available,
          required: required + fee,
        });
      }

      log::debug!(
        "{} koinu of coins cannot pay commit fee {} koinu, requesting {} koinu",
        available.to_sat(),
        fee.to_sat(),
        shortfall.to_sat(),
      );

      request = shortfall;
    };

    let commit = estimator
      .complete(&commit, &Finalizer::Standard, SignOptions::default())
      .await?;

    let reveal = self.reveal_draft(
      &commitment,
      OutPoint {
        txid: commit.compute_txid(),
        vout: 0,
      },
      required,
    );

    let reveal = estimator
      .complete(
        &reveal,
        &Finalizer::ScriptPath,
        SignOptions {
          disable_key_tweak: true,
        },
      )
      .await?;

    log::debug!(
      "commit {} fee {} koinu, reveal {}",
      commit.compute_txid(),
      fee.to_sat(),
      reveal.compute_txid(),
    );

    Ok(vec![commit, reveal])
  }
}
