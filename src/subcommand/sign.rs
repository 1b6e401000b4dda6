use {
  super::*,
  base64::{Engine, engine::general_purpose::STANDARD},
  bitcoin::secp256k1::SecretKey,
};

#[derive(Debug, Parser)]
pub(crate) struct Sign {
  #[arg(long, help = "Sign script-path spends with the untweaked key.")]
  disable_key_tweak: bool,
  #[arg(long, help = "Sign with hex-encoded <SECRET_KEY>.")]
  secret_key: SecretKey,
}

impl Sign {
  pub(crate) fn run(self) -> SubcommandResult {
    let input = io::read_to_string(io::stdin()).context("failed to read PSBT from stdin")?;

    let mut psbt = Psbt::deserialize(
      &STANDARD
        .decode(input.trim())
        .context("failed to decode base64 PSBT")?,
    )
    .context("failed to deserialize PSBT")?;

    KeySigner::new(self.secret_key)
      .sign(
        &mut psbt,
        SignOptions {
          disable_key_tweak: self.disable_key_tweak,
        },
      )
      .map_err(|err| anyhow!("failed to sign PSBT: {err}"))?;

    println!("{}", STANDARD.encode(psbt.serialize()));

    Ok(None)
  }
}
