use super::*;

fn chained(signer: &TestSigner, source: ChainAddress, body: Vec<u8>) -> ChainedInscription {
  ChainedInscription {
    inscription: Inscription::new("text/plain;charset=utf-8", body),
    public_key: signer.public_key(),
    source,
    destination: signer.p2pkh().script_pubkey().clone(),
    limits: Limits::default(),
  }
}

fn body(len: usize) -> Vec<u8> {
  (0..len).map(|i| (i % 251) as u8).collect()
}

#[tokio::test]
async fn small_inscription_needs_one_link_and_a_final_transaction() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2pkh(), b"hello".to_vec());
  let coins = funding(&signer.p2pkh(), &[10_000_000]);

  let transactions = inscription
    .build(&signer, FeeRate::default(), &coins)
    .await
    .unwrap();

  assert_eq!(transactions.len(), 3);
  assert_eq!(transactions[0].output.len(), 2);
  assert_eq!(transactions[1].input.len(), 1);
  assert_eq!(transactions[2].input.len(), 2);
}

#[tokio::test]
async fn split_funds_every_link() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2pkh(), body(4000));
  let coins = funding(&signer.p2pkh(), &[6_000_000, 4_000_000]);

  let transactions = inscription
    .build(&signer, FeeRate::default(), &coins)
    .await
    .unwrap();

  let split = &transactions[0];

  assert_eq!(inscription.plan().partitions.len(), 3);
  assert_eq!(transactions.len(), 5);
  assert_eq!(split.input.len(), 2);
  assert_eq!(split.output.len(), 4);

  let txid = split.compute_txid();

  for (vout, transaction) in transactions[1..].iter().enumerate() {
    assert_eq!(
      transaction.input.last().unwrap().previous_output,
      OutPoint {
        txid,
        vout: vout.try_into().unwrap(),
      },
    );
  }
}

#[tokio::test]
async fn links_spend_the_previous_hash_lock() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2pkh(), body(4000));
  let coins = funding(&signer.p2pkh(), &[10_000_000]);

  let transactions = inscription
    .build(&signer, FeeRate::default(), &coins)
    .await
    .unwrap();

  for pair in transactions[1..].windows(2) {
    let (previous, next) = (&pair[0], &pair[1]);

    assert_eq!(
      next.input[0].previous_output,
      OutPoint {
        txid: previous.compute_txid(),
        vout: 0,
      },
    );

    assert_eq!(previous.output[0].value, Limits::default().postage);

    let unlock = Chunk::parse(next.input[0].script_sig.as_bytes()).unwrap();
    let lock = ScriptBuf::from_bytes(unlock.last().unwrap().data().unwrap().to_vec());

    assert_eq!(
      previous.output[0].script_pubkey,
      ScriptBuf::new_p2sh(&lock.script_hash()),
    );
  }

  let last = transactions.last().unwrap();

  assert_eq!(last.output[0].script_pubkey, *signer.p2pkh().script_pubkey());
  assert_eq!(last.output[0].value, Limits::default().postage);
}

#[tokio::test]
async fn unlocking_scripts_reassemble_the_envelope() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2pkh(), body(4000));
  let coins = funding(&signer.p2pkh(), &[10_000_000]);

  let transactions = inscription
    .build(&signer, FeeRate::default(), &coins)
    .await
    .unwrap();

  let mut envelope = Vec::new();

  for transaction in &transactions[2..] {
    let mut chunks = Chunk::parse(transaction.input[0].script_sig.as_bytes()).unwrap();
    chunks.truncate(chunks.len() - 2);
    envelope.extend(chunks);
  }

  pretty_assert_eq!(envelope, inscription.envelope());
  assert_eq!(
    Inscription::decode_legacy(&envelope).unwrap(),
    inscription.inscription,
  );
}

#[tokio::test]
async fn fees_match_transaction_size() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2pkh(), body(2000));
  let coins = funding(&signer.p2pkh(), &[10_000_000]);

  let transactions = inscription
    .build(&signer, FeeRate::default(), &coins)
    .await
    .unwrap();

  let funding_tx = coins[0].transaction.clone();

  for (i, transaction) in transactions.iter().enumerate() {
    let previous = std::iter::once(&funding_tx)
      .chain(&transactions[..i])
      .collect::<Vec<&Transaction>>();

    let fee = input_value(transaction, &previous) - output_value(transaction);

    assert_fee_near(fee, transaction.total_size(), 4);
  }
}

#[tokio::test]
async fn segwit_source_funds_the_chain() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2wpkh(), body(600));
  let coins = funding(&signer.p2wpkh(), &[10_000_000]);

  let transactions = inscription
    .build(&signer, FeeRate::default(), &coins)
    .await
    .unwrap();

  assert_eq!(transactions.len(), 3);

  for transaction in &transactions {
    assert!(transaction.input.last().unwrap().witness.len() == 2);
  }

  assert!(
    signer
      .calls()
      .iter()
      .all(|options| !options.disable_key_tweak)
  );
}

#[tokio::test]
async fn insufficient_funds() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2pkh(), b"hello".to_vec());
  let coins = funding(&signer.p2pkh(), &[200_000]);

  assert!(matches!(
    inscription
      .build(&signer, FeeRate::default(), &coins)
      .await
      .unwrap_err(),
    SnafuError::InsufficientFunds { .. },
  ));
}

#[tokio::test]
async fn signer_errors_are_reported() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2pkh(), b"hello".to_vec());
  let coins = funding(&signer.p2pkh(), &[10_000_000]);

  let err = inscription
    .build(&FailingSigner, FeeRate::default(), &coins)
    .await
    .unwrap_err();

  assert!(matches!(err, SnafuError::Signer { .. }));
  assert_eq!(err.to_string(), "Signer failed: signer refused");
}

#[tokio::test]
async fn links_need_one_funding_coin_each() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2pkh(), b"hello".to_vec());

  let transactions = inscription
    .build_links(
      &signer,
      FeeRate::default(),
      funding(&signer.p2pkh(), &[1_000_000, 1_000_000]),
    )
    .await
    .unwrap();

  assert_eq!(transactions.len(), 2);

  assert!(matches!(
    inscription
      .build_links(
        &signer,
        FeeRate::default(),
        funding(&signer.p2pkh(), &[1_000_000]),
      )
      .await
      .unwrap_err(),
    SnafuError::ChainStarvation {
      needed: 2,
      available: 1,
    },
  ));
}

#[tokio::test]
async fn taproot_source_funds_the_chain() {
  let signer = TestSigner::new();
  let inscription = chained(&signer, signer.p2tr(), b"hello".to_vec());
  let coins = funding(&signer.p2tr(), &[10_000_000]);

  let transactions = inscription
    .build(&signer, FeeRate::default(), &coins)
    .await
    .unwrap();

  assert_eq!(transactions.len(), 3);

  for transaction in &transactions {
    assert_eq!(transaction.input.last().unwrap().witness.len(), 1);
  }
}
