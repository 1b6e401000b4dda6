use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Plan {
  #[arg(long, help = "Use <CONTENT_TYPE> instead of guessing from the file extension.")]
  content_type: Option<String>,
  #[arg(help = "Plan inscription of <FILE>.")]
  file: PathBuf,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Partition {
  pub chunks: usize,
  pub bytes: usize,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub content_type: String,
  pub content_len: usize,
  pub envelope_len: usize,
  pub partitions: Vec<Partition>,
  pub transactions: usize,
}

impl Plan {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let body = fs::read(&self.file)
      .with_context(|| format!("failed to read `{}`", self.file.display()))?;

    let content_type = content_type(&self.file, self.content_type);

    let limits = settings.limits();

    let inscription = Inscription::new(content_type, body);

    let chunks = inscription.legacy_envelope(limits.max_chunk_len);

    let plan = envelope::Plan::new(&chunks, limits.max_payload_len);

    ensure!(
      Inscription::decode_legacy(&chunks)? == inscription,
      "envelope does not decode to its content",
    );

    Ok(Some(Box::new(Output {
      content_len: inscription.body.len(),
      content_type: inscription.content_type,
      envelope_len: plan.envelope_len(),
      transactions: plan.transactions(),
      partitions: plan
        .partitions
        .iter()
        .zip(&plan.sizes)
        .map(|(range, bytes)| Partition {
          chunks: range.len(),
          bytes: *bytes,
        })
        .collect(),
    })))
  }
}
