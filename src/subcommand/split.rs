use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Split {
  #[arg(long, help = "Pay outputs to <ADDRESS>.")]
  address: String,
  #[arg(long, help = "Spend coins listed in JSON <COINS> file.")]
  coins: PathBuf,
  #[arg(long, help = "Create <COUNT> equal outputs.")]
  count: usize,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub transaction: SignedTransaction,
  pub value: u64,
}

impl Split {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let address = ChainAddress::parse(&self.address, settings.chain())?;

    let coins = Coin::load(&self.coins)?;

    let signer = settings.signer()?;

    let transaction = block_on(async {
      crate::Split {
        coins: &coins,
        address: &address,
        count: self.count,
      }
      .build(&FeeEstimator::new(&signer, settings.fee_rate()))
      .await
    })??;

    Ok(Some(Box::new(Output {
      value: transaction
        .output
        .first()
        .map(|output| output.value.to_sat())
        .unwrap_or_default(),
      transaction: SignedTransaction::from(&transaction),
    })))
  }
}
