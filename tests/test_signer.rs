use {
  super::*,
  bitcoin::secp256k1::SecretKey,
  dogscribe::KeySigner,
  std::sync::Mutex,
};

pub(crate) const SECRET_KEY: [u8; 32] = [7; 32];

/// Signs with a single in-memory key and remembers the options of every call.
pub(crate) struct TestSigner {
  calls: Mutex<Vec<SignOptions>>,
  signer: KeySigner,
}

impl TestSigner {
  pub(crate) fn new() -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      signer: KeySigner::new(SecretKey::from_slice(&SECRET_KEY).unwrap()),
    }
  }

  pub(crate) fn public_key(&self) -> PublicKey {
    self.signer.public_key()
  }

  pub(crate) fn x_only_public_key(&self) -> XOnlyPublicKey {
    self.signer.x_only_public_key()
  }

  pub(crate) fn p2pkh(&self) -> ChainAddress {
    ChainAddress::p2pkh(&self.public_key())
  }

  pub(crate) fn p2wpkh(&self) -> ChainAddress {
    ChainAddress::p2wpkh(&self.signer.compressed_public_key())
  }

  pub(crate) fn p2tr(&self) -> ChainAddress {
    ChainAddress::p2tr(self.x_only_public_key())
  }

  pub(crate) fn calls(&self) -> Vec<SignOptions> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl Signer for TestSigner {
  async fn sign_psbt(&self, psbt: Psbt, options: SignOptions) -> Result<Psbt, BoxError> {
    self.calls.lock().unwrap().push(options);
    self.signer.sign_psbt(psbt, options).await
  }
}

/// Signs nothing, for exercising error paths.
pub(crate) struct FailingSigner;

#[async_trait]
impl Signer for FailingSigner {
  async fn sign_psbt(&self, _psbt: Psbt, _options: SignOptions) -> Result<Psbt, BoxError> {
    Err("signer refused".into())
  }
}
