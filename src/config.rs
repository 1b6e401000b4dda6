use super::*;

#[derive(Deserialize, Default, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) chain: Option<Chain>,
  pub(crate) fee_rate: Option<FeeRate>,
  pub(crate) max_chunk_len: Option<usize>,
  pub(crate) max_payload_len: Option<usize>,
  pub(crate) postage: Option<u64>,
  pub(crate) service_fee: Option<ServiceFeeConfig>,
  pub(crate) signer: Option<String>,
}

#[derive(Deserialize, PartialEq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ServiceFeeConfig {
  pub(crate) address: String,
  pub(crate) amount: u64,
}
