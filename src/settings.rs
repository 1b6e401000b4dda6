use {super::*, config::Config};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Settings {
  chain: Option<Chain>,
  config: Option<PathBuf>,
  config_dir: Option<PathBuf>,
  fee_rate: Option<FeeRate>,
  max_chunk_len: Option<usize>,
  max_payload_len: Option<usize>,
  postage: Option<u64>,
  service_fee_address: Option<String>,
  service_fee_amount: Option<u64>,
  signer: Option<String>,
}

impl Settings {
  /// Merge command-line options, `DOGSCRIBE_` environment variables, the
  /// config file and defaults, in that order of priority.
  pub fn merge(options: Options, env: BTreeMap<String, String>) -> Result<Self, Error> {
    let settings = Settings::from_options(options).or(Settings::from_env(env)?);

    let config_path = match &settings.config {
      Some(path) => Some(path.clone()),
      None => settings
        .config_dir
        .as_ref()
        .map(|dir| dir.join("dogscribe.yaml"))
        .filter(|path| path.exists()),
    };

    let config = match &config_path {
      Some(path) => serde_yaml::from_reader::<_, Config>(
        fs::File::open(path).with_context(|| format!("failed to open config file `{}`", path.display()))?,
      )
      .with_context(|| format!("failed to deserialize config file `{}`", path.display()))?,
      None => Config::default(),
    };

    settings.or(Settings::from_config(config)).or_defaults()
  }

  fn or(self, source: Settings) -> Self {
    Self {
      chain: self.chain.or(source.chain),
      config: self.config.or(source.config),
      config_dir: self.config_dir.or(source.config_dir),
      fee_rate: self.fee_rate.or(source.fee_rate),
      max_chunk_len: self.max_chunk_len.or(source.max_chunk_len),
      max_payload_len: self.max_payload_len.or(source.max_payload_len),
      postage: self.postage.or(source.postage),
      service_fee_address: self.service_fee_address.or(source.service_fee_address),
      service_fee_amount: self.service_fee_amount.or(source.service_fee_amount),
      signer: self.signer.or(source.signer),
    }
  }

  fn or_defaults(self) -> Result<Self, Error> {
    let limits = Limits::default();

    let settings = Self {
      chain: Some(self.chain.unwrap_or_default()),
      config: self.config,
      config_dir: self.config_dir,
      fee_rate: Some(self.fee_rate.unwrap_or_default()),
      max_chunk_len: Some(self.max_chunk_len.unwrap_or(limits.max_chunk_len)),
      max_payload_len: Some(self.max_payload_len.unwrap_or(limits.max_payload_len)),
      postage: Some(self.postage.unwrap_or(limits.postage.to_sat())),
      service_fee_address: self.service_fee_address,
      service_fee_amount: self.service_fee_amount,
      signer: self.signer,
    };

    ensure!(
      settings.max_chunk_len != Some(0),
      "max chunk length must be greater than zero",
    );

    ensure!(
      settings.service_fee_address.is_some() == settings.service_fee_amount.is_some(),
      "service fee requires both an address and an amount",
    );

    Ok(settings)
  }

  fn from_options(options: Options) -> Self {
    Self {
      chain: options
        .chain_argument
        .or(options.regtest.then_some(Chain::DogecoinRegtest))
        .or(options.testnet.then_some(Chain::DogecoinTestnet)),
      config: options.config,
      config_dir: options.config_dir,
      fee_rate: options.fee_rate,
      max_chunk_len: options.max_chunk_len,
      max_payload_len: options.max_payload_len,
      postage: options.postage,
      service_fee_address: None,
      service_fee_amount: None,
      signer: options.signer,
    }
  }

  fn from_env(env: BTreeMap<String, String>) -> Result<Self, Error> {
    let get_string = |key: &str| env.get(key).cloned();

    let get_path = |key: &str| env.get(key).map(PathBuf::from);

    let get_parsed = |key: &str| -> Result<Option<u64>, Error> {
      env
        .get(key)
        .map(|value| value.parse::<u64>())
        .transpose()
        .with_context(|| format!("failed to parse environment variable DOGSCRIBE_{key} as u64"))
    };

    let get_usize = |key: &str| -> Result<Option<usize>, Error> {
      env
        .get(key)
        .map(|value| value.parse::<usize>())
        .transpose()
        .with_context(|| format!("failed to parse environment variable DOGSCRIBE_{key} as usize"))
    };

    Ok(Self {
      chain: env
        .get("CHAIN")
        .map(|chain| chain.parse::<Chain>())
        .transpose()
        .context("failed to parse environment variable DOGSCRIBE_CHAIN as chain")?,
      config: get_path("CONFIG"),
      config_dir: get_path("CONFIG_DIR"),
      fee_rate: env
        .get("FEE_RATE")
        .map(|rate| rate.parse::<FeeRate>())
        .transpose()
        .context("failed to parse environment variable DOGSCRIBE_FEE_RATE as fee rate")?,
      max_chunk_len: get_usize("MAX_CHUNK_LEN")?,
      max_payload_len: get_usize("MAX_PAYLOAD_LEN")?,
      postage: get_parsed("POSTAGE")?,
      service_fee_address: get_string("SERVICE_FEE_ADDRESS"),
      service_fee_amount: get_parsed("SERVICE_FEE_AMOUNT")?,
      signer: get_string("SIGNER"),
    })
  }

  fn from_config(config: Config) -> Self {
    let (service_fee_address, service_fee_amount) = match config.service_fee {
      Some(service_fee) => (Some(service_fee.address), Some(service_fee.amount)),
      None => (None, None),
    };

    Self {
      chain: config.chain,
      config: None,
      config_dir: None,
      fee_rate: config.fee_rate,
      max_chunk_len: config.max_chunk_len,
      max_payload_len: config.max_payload_len,
      postage: config.postage,
      service_fee_address,
      service_fee_amount,
      signer: config.signer,
    }
  }

  pub fn chain(&self) -> Chain {
    self.chain.unwrap_or_default()
  }

  pub fn fee_rate(&self) -> FeeRate {
    self.fee_rate.unwrap_or_default()
  }

  pub fn limits(&self) -> Limits {
    let defaults = Limits::default();

    Limits {
      postage: self.postage.map_or(defaults.postage, Amount::from_sat),
      max_chunk_len: self.max_chunk_len.unwrap_or(defaults.max_chunk_len),
      max_payload_len: self.max_payload_len.unwrap_or(defaults.max_payload_len),
    }
  }

  pub fn service_fee(&self) -> Result<Option<ServiceFee>, Error> {
    let (Some(address), Some(amount)) = (&self.service_fee_address, self.service_fee_amount) else {
      return Ok(None);
    };

    let address = ChainAddress::parse(address, self.chain())
      .with_context(|| format!("invalid service fee address `{address}`"))?;

    Ok(Some(ServiceFee {
      script_pubkey: address.script_pubkey().clone(),
      amount: Amount::from_sat(amount),
    }))
  }

  pub fn signer(&self) -> Result<CommandSigner, Error> {
    self
      .signer
      .as_deref()
      .and_then(CommandSigner::parse)
      .ok_or_else(|| anyhow!("no signer configured, pass `--signer` or set `signer` in the config file"))
  }
}
