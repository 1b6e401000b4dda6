use super::*;

/// An unspent output together with the transaction that created it.
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
  pub outpoint: OutPoint,
  pub value: Amount,
  pub transaction: Transaction,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CoinEntry {
  txid: Txid,
  vout: u32,
  value: u64,
  hex: String,
}

impl Coin {
  /// Output `vout` of `transaction`, or `None` if there is no such output.
  pub fn from_transaction(transaction: &Transaction, vout: u32) -> Option<Self> {
    let output = transaction.output.get(usize::try_from(vout).ok()?)?;

    Some(Self {
      outpoint: OutPoint {
        txid: transaction.compute_txid(),
        vout,
      },
      value: output.value,
      transaction: transaction.clone(),
    })
  }

  /// Load coins from a JSON array of `{ txid, vout, value, hex }` entries.
  pub fn load(path: &Path) -> Result<Vec<Self>> {
    let file = fs::File::open(path).snafu_context(error::Io { path })?;

    let entries: Vec<CoinEntry> =
      serde_json::from_reader(io::BufReader::new(file)).snafu_context(error::CoinFile { path })?;

    entries.into_iter().map(Self::from_entry).collect()
  }

  fn from_entry(entry: CoinEntry) -> Result<Self> {
    let transaction = consensus::encode::deserialize_hex::<Transaction>(&entry.hex)
      .snafu_context(error::CoinDecode { txid: entry.txid })?;

    let outpoint = OutPoint {
      txid: entry.txid,
      vout: entry.vout,
    };

    let coin = Self::from_transaction(&transaction, entry.vout)
      .filter(|coin| coin.outpoint == outpoint && coin.value.to_sat() == entry.value)
      .ok_or(SnafuError::CoinOutput { outpoint })?;

    Ok(coin)
  }

  pub(crate) fn txout(&self) -> Result<TxOut> {
    usize::try_from(self.outpoint.vout)
      .ok()
      .and_then(|vout| self.transaction.output.get(vout))
      .cloned()
      .ok_or(SnafuError::CoinOutput {
        outpoint: self.outpoint,
      })
  }

  /// PSBT input metadata a signer needs to spend this coin.
  pub(crate) fn psbt_input(&self, kind: AddressKind) -> Result<psbt::Input> {
    let mut input = psbt::Input::default();

    match kind {
      AddressKind::P2pkh => input.non_witness_utxo = Some(self.transaction.clone()),
      AddressKind::P2wpkh => {
        input.non_witness_utxo = Some(self.transaction.clone());
        input.witness_utxo = Some(self.txout()?);
      }
      AddressKind::P2tr => input.witness_utxo = Some(self.txout()?),
    }

    Ok(input)
  }
}

/// Supplies funding coins covering at least a minimum amount.
#[async_trait]
pub trait CoinSource: Send + Sync {
  async fn coins(&self, min_amount: Amount) -> Result<Vec<Coin>, BoxError>;
}

/// A fixed pool of coins, handed out whole when it covers the request.
#[derive(Debug, Clone, Default)]
pub struct StaticCoins(pub Vec<Coin>);

#[async_trait]
impl CoinSource for StaticCoins {
  async fn coins(&self, min_amount: Amount) -> Result<Vec<Coin>, BoxError> {
    let total = self.0.iter().map(|coin| coin.value).sum::<Amount>();

    if total < min_amount {
      log::debug!("coin pool holds {total}, below requested {min_amount}");
      return Ok(Vec::new());
    }

    Ok(self.0.clone())
  }
}

#[cfg(test)]
mod tests {
  use {super::*, bitcoin::transaction::Version};

  fn transaction() -> Transaction {
    Transaction {
      version: Version::ONE,
      lock_time: LockTime::ZERO,
      input: vec![TxIn::default()],
      output: vec![
        TxOut {
          value: Amount::from_sat(1_000),
          script_pubkey: ScriptBuf::new(),
        },
        TxOut {
          value: Amount::from_sat(2_000),
          script_pubkey: ScriptBuf::new(),
        },
      ],
    }
  }

  #[test]
  fn from_transaction() {
    let transaction = transaction();

    let coin = Coin::from_transaction(&transaction, 1).unwrap();

    assert_eq!(coin.outpoint.txid, transaction.compute_txid());
    assert_eq!(coin.outpoint.vout, 1);
    assert_eq!(coin.value, Amount::from_sat(2_000));

    assert_eq!(Coin::from_transaction(&transaction, 2), None);
  }

  #[test]
  fn load() {
    let transaction = transaction();
    let txid = transaction.compute_txid();
    let hex = consensus::encode::serialize_hex(&transaction);

    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("coins.json");

    fs::write(
      &path,
      format!(r#"[{{"txid":"{txid}","vout":0,"value":1000,"hex":"{hex}"}}]"#),
    )
    .unwrap();

    assert_eq!(
      Coin::load(&path).unwrap(),
      [Coin::from_transaction(&transaction, 0).unwrap()],
    );
  }

  #[test]
  fn load_rejects_mismatched_value() {
    let transaction = transaction();
    let txid = transaction.compute_txid();
    let hex = consensus::encode::serialize_hex(&transaction);

    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("coins.json");

    fs::write(
      &path,
      format!(r#"[{{"txid":"{txid}","vout":1,"value":1000,"hex":"{hex}"}}]"#),
    )
    .unwrap();

    assert!(matches!(
      Coin::load(&path).unwrap_err(),
      SnafuError::CoinOutput { .. },
    ));
  }

  #[test]
  fn load_reports_missing_file() {
    let tempdir = tempfile::tempdir().unwrap();

    assert!(matches!(
      Coin::load(&tempdir.path().join("missing.json")).unwrap_err(),
      SnafuError::Io { .. },
    ));
  }

  #[test]
  fn psbt_input_by_kind() {
    let coin = Coin::from_transaction(&transaction(), 0).unwrap();

    let input = coin.psbt_input(AddressKind::P2pkh).unwrap();
    assert!(input.non_witness_utxo.is_some());
    assert!(input.witness_utxo.is_none());

    let input = coin.psbt_input(AddressKind::P2wpkh).unwrap();
    assert_eq!(input.witness_utxo.unwrap().value, Amount::from_sat(1_000));

    let input = coin.psbt_input(AddressKind::P2tr).unwrap();
    assert!(input.non_witness_utxo.is_none());
    assert!(input.witness_utxo.is_some());
  }

  #[tokio::test]
  async fn static_coins() {
    let transaction = transaction();
    let coins = StaticCoins(vec![
      Coin::from_transaction(&transaction, 0).unwrap(),
      Coin::from_transaction(&transaction, 1).unwrap(),
    ]);

    assert_eq!(coins.coins(Amount::from_sat(3_000)).await.unwrap().len(), 2);
    assert!(coins.coins(Amount::from_sat(3_001)).await.unwrap().is_empty());
  }
}
