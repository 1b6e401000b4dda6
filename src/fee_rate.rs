use super::*;

/// Fee rate in koinu per byte of serialized transaction.
#[derive(Debug, PartialEq, Clone, Copy, DeserializeFromStr, SerializeDisplay)]
pub struct FeeRate(f64);

impl FromStr for FeeRate {
  type Err = SnafuError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let rate = f64::from_str(s).snafu_context(error::FeeRateParse { input: s })?;
    Self::try_from(rate)
  }
}

impl TryFrom<f64> for FeeRate {
  type Error = SnafuError;

  fn try_from(rate: f64) -> Result<Self, Self::Error> {
    if rate.is_sign_negative() | rate.is_nan() | rate.is_infinite() {
      return Err(SnafuError::InvalidFeeRate { rate });
    }

    Ok(Self(rate))
  }
}

impl Display for FeeRate {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl FeeRate {
  /// Fee for `size` bytes, rounded up to the next whole koinu.
  #[allow(clippy::cast_possible_truncation)]
  #[allow(clippy::cast_sign_loss)]
  #[allow(clippy::cast_precision_loss)]
  pub fn fee(&self, size: usize) -> Amount {
    Amount::from_sat((self.0 * size as f64).ceil() as u64)
  }
}

impl Default for FeeRate {
  fn default() -> Self {
    Self(1.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse() {
    assert_eq!("1.0".parse::<FeeRate>().unwrap().0, 1.0);
    assert_eq!("7.5".parse::<FeeRate>().unwrap().0, 7.5);
    assert_eq!("0".parse::<FeeRate>().unwrap().0, 0.0);
    assert!("-4.2".parse::<FeeRate>().is_err());
    assert!("inf".parse::<FeeRate>().is_err());
    assert!("NaN".parse::<FeeRate>().is_err());
    assert_eq!(
      "foo".parse::<FeeRate>().unwrap_err().to_string(),
      "Failed to parse fee rate `foo`",
    );
  }

  #[test]
  fn fee_rounds_up() {
    assert_eq!(FeeRate(1.0).fee(100), Amount::from_sat(100));
    assert_eq!(FeeRate(0.5).fee(101), Amount::from_sat(51));
    assert_eq!(FeeRate(2.5).fee(3), Amount::from_sat(8));
    assert_eq!(FeeRate(0.0).fee(250), Amount::ZERO);
  }

  #[test]
  fn fee_scales_linearly() {
    let size = 1234;
    assert_eq!(FeeRate(10.0).fee(size), FeeRate(1.0).fee(size) * 10);
  }
}
