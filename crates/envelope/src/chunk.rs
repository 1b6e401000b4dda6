use super::*;

#[derive(Debug, Error, PartialEq)]
pub enum ChunkError {
  #[error("push at offset {offset} truncated: expected {expected} bytes, found {found}")]
  Truncated {
    offset: usize,
    expected: usize,
    found: usize,
  },
}

/// A single script element: an opcode, optionally followed by pushed data.
///
/// The opcode alone determines how the data length is encoded, so the data is
/// never stored separately from the opcode that pushes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
  opcode: u8,
  data: Option<Vec<u8>>,
}

impl Chunk {
  /// Push `data` with the smallest push opcode for its length.
  pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
    let data = data.into();

    let opcode = match data.len() {
      0 => return Self::from_opcode(OP_PUSHBYTES_0),
      len @ 1..=75 => len as u8,
      76..=0xff => OP_PUSHDATA1.to_u8(),
      0x100..=0xffff => OP_PUSHDATA2.to_u8(),
      _ => OP_PUSHDATA4.to_u8(),
    };

    Self {
      opcode,
      data: Some(data),
    }
  }

  /// Push the number `n`.
  ///
  /// Numbers of 128 and above are pushed as two bytes, `n % 256` then
  /// `n / 256` truncated to a byte. This is not minimal script number
  /// encoding, but existing envelopes use exactly these bytes and decoders
  /// depend on them.
  pub fn from_number(n: usize) -> Self {
    match n {
      0 => Self::from_opcode(OP_PUSHBYTES_0),
      1..=16 => Self {
        opcode: OP_PUSHNUM_1.to_u8() + (n - 1) as u8,
        data: None,
      },
      17..=127 => Self {
        opcode: 1,
        data: Some(vec![n as u8]),
      },
      _ => Self {
        opcode: 2,
        data: Some(vec![(n % 256) as u8, (n / 256) as u8]),
      },
    }
  }

  pub fn from_opcode(opcode: Opcode) -> Self {
    Self {
      opcode: opcode.to_u8(),
      data: None,
    }
  }

  pub fn opcode(&self) -> u8 {
    self.opcode
  }

  pub fn data(&self) -> Option<&[u8]> {
    self.data.as_deref()
  }

  /// Inverse of [`Chunk::from_number`].
  pub fn to_number(&self) -> Option<usize> {
    match (self.opcode, self.data()) {
      (0, None) => Some(0),
      (opcode, None) if (OP_PUSHNUM_1.to_u8()..=OP_PUSHNUM_16.to_u8()).contains(&opcode) => {
        Some(usize::from(opcode - OP_PUSHNUM_1.to_u8()) + 1)
      }
      (1, Some([n])) => Some((*n).into()),
      (2, Some([low, high])) => Some(usize::from(*low) + usize::from(*high) * 256),
      _ => None,
    }
  }

  fn prefix_len(&self) -> usize {
    match self.data {
      None => 0,
      Some(_) => match self.opcode {
        0x4c => 1,
        0x4d => 2,
        0x4e => 4,
        _ => 0,
      },
    }
  }

  /// Bytes this chunk occupies once serialized.
  pub fn serialized_len(&self) -> usize {
    1 + self.prefix_len() + self.data.as_ref().map(Vec::len).unwrap_or_default()
  }

  fn write(&self, script: &mut Vec<u8>) {
    script.push(self.opcode);

    let Some(data) = &self.data else {
      return;
    };

    let len = data.len();

    match self.prefix_len() {
      1 => script.push(len as u8),
      2 => script.extend_from_slice(&(len as u16).to_le_bytes()),
      4 => script.extend_from_slice(&(len as u32).to_le_bytes()),
      _ => {}
    }

    script.extend_from_slice(data);
  }

  /// Serialize `chunks` into the exact bytes a script interpreter executes.
  pub fn serialize(chunks: &[Chunk]) -> Vec<u8> {
    let mut script = Vec::with_capacity(chunks.iter().map(Chunk::serialized_len).sum());

    for chunk in chunks {
      chunk.write(&mut script);
    }

    script
  }

  pub fn to_script(chunks: &[Chunk]) -> ScriptBuf {
    ScriptBuf::from_bytes(Self::serialize(chunks))
  }

  /// Split a serialized script back into chunks.
  pub fn parse(script: &[u8]) -> Result<Vec<Chunk>, ChunkError> {
    let mut chunks = Vec::new();
    let mut cursor = 0;

    while let Some(&opcode) = script.get(cursor) {
      let offset = cursor;
      cursor += 1;

      let prefix = match opcode {
        0x01..=0x4b => None,
        0x4c => Some(1),
        0x4d => Some(2),
        0x4e => Some(4),
        _ => {
          chunks.push(Chunk { opcode, data: None });
          continue;
        }
      };

      let len = match prefix {
        None => opcode.into(),
        Some(prefix) => {
          let bytes = take(script, &mut cursor, prefix, offset)?;
          bytes
            .iter()
            .rev()
            .fold(0, |len, &byte| len << 8 | usize::from(byte))
        }
      };

      let data = take(script, &mut cursor, len, offset)?;

      chunks.push(Chunk {
        opcode,
        data: Some(data.to_vec()),
      });
    }

    Ok(chunks)
  }
}

fn take<'a>(
  script: &'a [u8],
  cursor: &mut usize,
  len: usize,
  offset: usize,
) -> Result<&'a [u8], ChunkError> {
  let bytes = script
    .get(*cursor..)
    .and_then(|rest| rest.get(..len))
    .ok_or(ChunkError::Truncated {
      offset,
      expected: len,
      found: script.len().saturating_sub(*cursor),
    })?;

  *cursor += len;

  Ok(bytes)
}
