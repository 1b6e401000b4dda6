use super::*;

/// Split `chunks` into consecutive ranges, one per chained transaction.
///
/// The first range opens with the envelope's first chunk. Every range then
/// grows a pair of chunks at a time until its serialized length would exceed
/// `max_payload_len`, at which point the last pair is handed to the next
/// range. A pair that is larger than the ceiling on its own still gets a
/// range, so the walk always terminates.
pub fn partition(chunks: &[Chunk], max_payload_len: usize) -> Vec<Range<usize>> {
  let mut partitions = Vec::new();
  let mut start = 0;

  while start < chunks.len() {
    let mut end = start;
    let mut len = 0;

    if partitions.is_empty() {
      len += chunks[end].serialized_len();
      end += 1;
    }

    let mut previous = end;

    while len <= max_payload_len && end < chunks.len() {
      previous = end;
      let next = (end + 2).min(chunks.len());
      len += chunks[end..next]
        .iter()
        .map(Chunk::serialized_len)
        .sum::<usize>();
      end = next;
    }

    if len > max_payload_len && previous > start {
      end = previous;
    }

    partitions.push(start..end);
    start = end;
  }

  partitions
}

/// Transactions needed to carry `partitions`: one per partition plus the
/// final transaction that spends the last hash-lock to the destination.
pub fn count_transactions(partitions: &[Range<usize>]) -> usize {
  partitions.len() + 1
}

/// Dry run of a chained inscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
  pub partitions: Vec<Range<usize>>,
  pub sizes: Vec<usize>,
}

impl Plan {
  pub fn new(envelope: &[Chunk], max_payload_len: usize) -> Self {
    let partitions = partition(envelope, max_payload_len);

    let sizes = partitions
      .iter()
      .map(|range| {
        envelope[range.clone()]
          .iter()
          .map(Chunk::serialized_len)
          .sum()
      })
      .collect();

    Self { partitions, sizes }
  }

  pub fn transactions(&self) -> usize {
    count_transactions(&self.partitions)
  }

  pub fn envelope_len(&self) -> usize {
    self.sizes.iter().sum()
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  fn envelope(len: usize) -> Vec<Chunk> {
    Inscription::new("text/plain", vec![0x5a; len]).legacy_envelope(MAX_CHUNK_LEN)
  }

  fn size(chunks: &[Chunk]) -> usize {
    chunks.iter().map(Chunk::serialized_len).sum()
  }

  #[test]
  fn partitions_cover_envelope_in_order() {
    for len in [0, 1, 239, 240, 241, 1500, 4000, 25_000] {
      let envelope = envelope(len);
      let partitions = partition(&envelope, MAX_PAYLOAD_LEN);

      let mut cursor = 0;
      for range in &partitions {
        assert_eq!(range.start, cursor, "gap before {range:?} for {len} bytes");
        assert!(range.end > range.start, "empty partition for {len} bytes");
        cursor = range.end;
      }
      assert_eq!(cursor, envelope.len());

      let rebuilt = partitions
        .iter()
        .flat_map(|range| envelope[range.clone()].iter().cloned())
        .collect::<Vec<Chunk>>();
      assert_eq!(rebuilt, envelope);
    }
  }

  #[test]
  fn partitions_respect_ceiling() {
    let envelope = envelope(25_000);

    for range in partition(&envelope, MAX_PAYLOAD_LEN) {
      assert!(size(&envelope[range.clone()]) <= MAX_PAYLOAD_LEN, "{range:?}");
    }
  }

  #[test]
  fn first_partition_starts_with_marker() {
    let envelope = envelope(4000);
    let partitions = partition(&envelope, MAX_PAYLOAD_LEN);

    assert_eq!(partitions[0].start, 0);
    assert_eq!(envelope[0], Chunk::from_bytes(PROTOCOL_ID));
  }

  #[test]
  fn partitions_grow_by_pairs() {
    let envelope = envelope(4000);
    let partitions = partition(&envelope, MAX_PAYLOAD_LEN);

    assert_eq!(partitions[0].len() % 2, 1);

    for range in &partitions[1..partitions.len() - 1] {
      assert_eq!(range.len() % 2, 0, "{range:?}");
    }
  }

  #[test]
  fn expected_boundaries() {
    // marker (4), count (2), content type (11), then pairs of index (1) and part (242)
    let envelope = envelope(4000);

    assert_eq!(envelope.len(), 37);
    assert_eq!(
      partition(&envelope, MAX_PAYLOAD_LEN),
      [0..15, 15..27, 27..37],
    );
  }

  #[test]
  fn lone_marker_when_first_pair_overflows() {
    let envelope = [
      Chunk::from_bytes(PROTOCOL_ID),
      Chunk::from_number(1),
      Chunk::from_bytes(vec![0; 100]),
      Chunk::from_number(0),
      Chunk::from_bytes(vec![0; 40]),
    ];

    assert_eq!(partition(&envelope, 50), [0..1, 1..3, 3..5]);
  }

  #[test]
  fn oversized_pair_still_terminates() {
    let envelope = [
      Chunk::from_bytes(PROTOCOL_ID),
      Chunk::from_number(1),
      Chunk::from_bytes(vec![0; 100]),
    ];

    assert_eq!(partition(&envelope, 10), [0..1, 1..3]);
  }

  #[test]
  fn small_inscription_needs_two_transactions() {
    let plan = Plan::new(&envelope(10), MAX_PAYLOAD_LEN);

    assert_eq!(plan.partitions, [0..5]);
    assert_eq!(plan.transactions(), 2);
  }

  #[test]
  fn empty_envelope_has_no_partitions() {
    assert!(partition(&[], MAX_PAYLOAD_LEN).is_empty());
    assert_eq!(count_transactions(&[]), 1);
  }

  #[test]
  fn plan_sizes_match_serialization() {
    let envelope = envelope(10_000);
    let plan = Plan::new(&envelope, MAX_PAYLOAD_LEN);

    assert_eq!(plan.partitions.len(), plan.sizes.len());
    assert_eq!(plan.envelope_len(), Chunk::serialize(&envelope).len());
    assert_eq!(plan.transactions(), plan.partitions.len() + 1);
  }
}
