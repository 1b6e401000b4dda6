use super::*;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
  #[error("envelope is empty")]
  Empty,
  #[error("envelope does not start with the protocol marker")]
  MissingProtocolId,
  #[error("envelope part count is missing or malformed")]
  PartCount,
  #[error("envelope content type is missing or not UTF-8")]
  ContentType,
  #[error("envelope truncated with {remaining} parts outstanding")]
  Truncated { remaining: usize },
  #[error("expected part index {expected}, found {found:?}")]
  OutOfOrder {
    expected: usize,
    found: Option<usize>,
  },
  #[error("envelope has {count} unexpected trailing chunks")]
  TrailingChunks { count: usize },
}

/// Content and content type of a single inscription.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inscription {
  pub content_type: String,
  pub body: Vec<u8>,
}

impl Inscription {
  pub fn new(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
    Self {
      content_type: content_type.into(),
      body: body.into(),
    }
  }

  /// Chunk sequence for the legacy chained scheme:
  ///
  /// ```text
  /// "ord" <part count> <content type> (<parts remaining> <part>)*
  /// ```
  ///
  /// Parts are at most `max_chunk_len` bytes. Each carries the number of
  /// parts still to come, so a reader can detect a truncated envelope.
  ///
  /// # Panics
  ///
  /// Panics if `max_chunk_len` is zero.
  pub fn legacy_envelope(&self, max_chunk_len: usize) -> Vec<Chunk> {
    let parts = self.body.chunks(max_chunk_len).collect::<Vec<&[u8]>>();

    let mut chunks = Vec::with_capacity(3 + parts.len() * 2);

    chunks.push(Chunk::from_bytes(PROTOCOL_ID));
    chunks.push(Chunk::from_number(parts.len()));
    chunks.push(Chunk::from_bytes(self.content_type.as_bytes()));

    for (n, part) in parts.iter().enumerate() {
      chunks.push(Chunk::from_number(parts.len() - n - 1));
      chunks.push(Chunk::from_bytes(*part));
    }

    chunks
  }

  /// Chunk sequence for the taproot scheme, a single script-path leaf:
  ///
  /// ```text
  /// <key> OP_CHECKSIG OP_FALSE OP_IF
  ///   "ord" 0x01 <content type> OP_0 <body>*
  /// OP_ENDIF
  /// ```
  ///
  /// The body is only split to respect the maximum script element size.
  pub fn taproot_envelope(&self, key: &XOnlyPublicKey) -> Vec<Chunk> {
    let mut chunks = vec![
      Chunk::from_bytes(key.serialize()),
      Chunk::from_opcode(OP_CHECKSIG),
      Chunk::from_opcode(opcodes::OP_FALSE),
      Chunk::from_opcode(OP_IF),
      Chunk::from_bytes(PROTOCOL_ID),
      Chunk::from_bytes(CONTENT_TYPE_TAG),
      Chunk::from_bytes(self.content_type.as_bytes()),
      Chunk::from_number(0),
    ];

    chunks.extend(
      self
        .body
        .chunks(MAX_SCRIPT_ELEMENT_SIZE)
        .map(|part| Chunk::from_bytes(part)),
    );

    chunks.push(Chunk::from_opcode(OP_ENDIF));

    chunks
  }

  pub fn taproot_script(&self, key: &XOnlyPublicKey) -> ScriptBuf {
    Chunk::to_script(&self.taproot_envelope(key))
  }

  /// Reassemble an inscription from a legacy envelope.
  pub fn decode_legacy(chunks: &[Chunk]) -> Result<Self, DecodeError> {
    let mut chunks = chunks.iter();

    let marker = chunks.next().ok_or(DecodeError::Empty)?;

    if marker.data() != Some(PROTOCOL_ID.as_slice()) {
      return Err(DecodeError::MissingProtocolId);
    }

    let count = chunks
      .next()
      .and_then(Chunk::to_number)
      .ok_or(DecodeError::PartCount)?;

    let content_type = chunks
      .next()
      .map(|chunk| chunk.data().unwrap_or_default().to_vec())
      .and_then(|bytes| String::from_utf8(bytes).ok())
      .ok_or(DecodeError::ContentType)?;

    let mut body = Vec::new();

    for expected in (0..count).rev() {
      let index = chunks.next().ok_or(DecodeError::Truncated {
        remaining: expected + 1,
      })?;

      let found = index.to_number();

      if found != Some(expected) {
        return Err(DecodeError::OutOfOrder { expected, found });
      }

      let part = chunks.next().ok_or(DecodeError::Truncated {
        remaining: expected + 1,
      })?;

      body.extend_from_slice(part.data().unwrap_or_default());
    }

    let trailing = chunks.count();

    if trailing > 0 {
      return Err(DecodeError::TrailingChunks { count: trailing });
    }

    Ok(Self { content_type, body })
  }
}
