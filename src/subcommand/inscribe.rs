use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Inscribe {
  #[arg(long, help = "Fund the inscription with coins listed in JSON <COINS> file.")]
  coins: PathBuf,
  #[arg(long, help = "Use <CONTENT_TYPE> instead of guessing from the file extension.")]
  content_type: Option<String>,
  #[arg(long, help = "Send inscription to <DESTINATION>.")]
  destination: String,
  #[arg(
    long,
    help = "Lock hash-lock outputs to, or reveal the envelope with, <PUBLIC_KEY>."
  )]
  public_key: PublicKey,
  #[arg(long, help = "Send change to, and spend coins of, <SOURCE>.")]
  source: String,
  #[arg(long, help = "Reveal in a single taproot script-path spend.")]
  taproot: bool,
  #[arg(help = "Inscribe <FILE>.")]
  file: PathBuf,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub transactions: Vec<SignedTransaction>,
}

impl Inscribe {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let chain = settings.chain();

    let body = fs::read(&self.file)
      .with_context(|| format!("failed to read `{}`", self.file.display()))?;

    let inscription = Inscription::new(content_type(&self.file, self.content_type), body);

    let source = ChainAddress::parse(&self.source, chain)?;

    let destination = ChainAddress::parse(&self.destination, chain)?
      .script_pubkey()
      .clone();

    let coins = Coin::load(&self.coins)?;

    let signer = settings.signer()?;

    let fee_rate = settings.fee_rate();

    let transactions = if self.taproot {
      let inscription = TaprootInscription {
        inscription,
        public_key: self.public_key.inner.x_only_public_key().0,
        source,
        destination,
        postage: settings.limits().postage,
        service_fee: settings.service_fee()?,
      };

      block_on(inscription.build(&signer, fee_rate, &StaticCoins(coins)))??
    } else {
      let inscription = ChainedInscription {
        inscription,
        public_key: self.public_key,
        source,
        destination,
        limits: settings.limits(),
      };

      block_on(inscription.build(&signer, fee_rate, &coins))??
    };

    Ok(Some(Box::new(Output {
      transactions: transactions.iter().map(SignedTransaction::from).collect(),
    })))
  }
}
