use {
  super::*,
  base64::{Engine, engine::general_purpose::STANDARD},
  std::process::Stdio,
  tokio::{io::AsyncWriteExt, process::Command},
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignOptions {
  /// Sign script-path spends with the untweaked key.
  pub disable_key_tweak: bool,
}

/// Signs every input of a PSBT it holds a key for.
///
/// Signatures are returned in the PSBT: `partial_sigs` for ECDSA inputs,
/// `tap_key_sig` or `tap_script_sigs` for taproot inputs. Errors are passed
/// back to the caller untouched.
#[async_trait]
pub trait Signer: Send + Sync {
  async fn sign_psbt(&self, psbt: Psbt, options: SignOptions) -> Result<Psbt, BoxError>;
}

/// Delegates signing to an external program.
///
/// The program receives a base64 PSBT on stdin and must print the signed
/// base64 PSBT on stdout. `--disable-key-tweak` is appended to its arguments
/// when script-path signatures are requested.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSigner {
  program: String,
  args: Vec<String>,
}

impl CommandSigner {
  pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
    Self {
      program: program.into(),
      args,
    }
  }

  /// Split a command line on whitespace.
  pub fn parse(command: &str) -> Option<Self> {
    let mut words = command.split_whitespace().map(str::to_string);
    let program = words.next()?;
    Some(Self::new(program, words.collect()))
  }
}

#[async_trait]
impl Signer for CommandSigner {
  async fn sign_psbt(&self, psbt: Psbt, options: SignOptions) -> Result<Psbt, BoxError> {
    let mut command = Command::new(&self.program);

    command
      .args(&self.args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true);

    if options.disable_key_tweak {
      command.arg("--disable-key-tweak");
    }

    log::debug!("running signer `{}`", self.program);

    let mut child = command.spawn()?;

    let mut stdin = child
      .stdin
      .take()
      .ok_or("signer stdin unavailable")?;

    stdin.write_all(STANDARD.encode(psbt.serialize()).as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    drop(stdin);

    let output = child.wait_with_output().await?;

    if !output.status.success() {
      return Err(
        format!(
          "signer `{}` exited with {}: {}",
          self.program,
          output.status,
          String::from_utf8_lossy(&output.stderr).trim(),
        )
        .into(),
      );
    }

    let signed = STANDARD.decode(String::from_utf8(output.stdout)?.trim())?;

    Ok(Psbt::deserialize(&signed)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse() {
    assert_eq!(
      CommandSigner::parse("wallet sign --account 1"),
      Some(CommandSigner::new(
        "wallet",
        vec!["sign".into(), "--account".into(), "1".into()],
      )),
    );

    assert_eq!(CommandSigner::parse("  "), None);
  }

  fn psbt() -> Psbt {
    Psbt::from_unsigned_tx(Transaction {
      version: Version::ONE,
      lock_time: LockTime::ZERO,
      input: vec![TxIn::default()],
      output: vec![TxOut {
        value: Amount::from_sat(1),
        script_pubkey: ScriptBuf::new(),
      }],
    })
    .unwrap()
  }

  #[tokio::test]
  async fn psbt_is_piped_through_program() {
    let psbt = psbt();

    assert_eq!(
      CommandSigner::parse("cat")
        .unwrap()
        .sign_psbt(psbt.clone(), SignOptions::default())
        .await
        .unwrap(),
      psbt,
    );
  }

  #[tokio::test]
  async fn failing_program_is_an_error() {
    let err = CommandSigner::new("sh", vec!["-c".into(), "cat > /dev/null; exit 3".into()])
      .sign_psbt(psbt(), SignOptions::default())
      .await
      .unwrap_err();

    assert!(err.to_string().starts_with("signer `sh` exited with"));
  }
}
