//! End-to-end block execution scenarios against the in-memory state.

use ethereum_types::{Address, BigEndianHash, H256, U256};
use golembase_common::{
    Bytes,
    constants::STORAGE_PROCESSOR_ADDRESS,
    types::{
        Block, Create, GOLEM_BASE_STORAGE_ENTITY_CREATED, GOLEM_BASE_STORAGE_ENTITY_DELETED,
        GOLEM_BASE_STORAGE_ENTITY_UPDATED, NumericAnnotation, StorageTransaction,
        StringAnnotation, Transaction, Update,
    },
};
use golembase_processor::{block::execute_block, storage_tx::entity_key};
use golembase_storage::{
    InMemoryState, allentities, annotationindex, entitiesofowner, entity, entityexpiration, keyset,
};
use keccak_hash::keccak;

fn tx_hash(block_number: u64, index: u64) -> H256 {
    keccak([block_number.to_be_bytes(), index.to_be_bytes()].concat())
}

fn block_hash(number: u64) -> H256 {
    H256::from_low_u64_be(number + 0x1000)
}

/// A block carrying the given storage transactions plus the trailing
/// housekeeping transaction the host injects into every block.
fn block_with(number: u64, storage_txs: Vec<Transaction>) -> Block {
    let mut transactions = storage_txs;
    transactions.push(Transaction::housekeeping(tx_hash(number, u64::MAX)));
    Block {
        number,
        hash: block_hash(number),
        parent_hash: block_hash(number.wrapping_sub(1)),
        transactions,
    }
}

fn sample_create() -> Create {
    Create {
        payload: Bytes::from_static(b"test"),
        expires_at_block: 1000,
        btl: 0,
        string_annotations: vec![StringAnnotation {
            key: "stringTest".into(),
            value: "stringTest".into(),
        }],
        numeric_annotations: vec![NumericAnnotation {
            key: "numericTest".into(),
            value: 1234567890,
        }],
    }
}

#[test]
fn create_and_retrieve() {
    let mut db = InMemoryState::new();
    let sender = Address::repeat_byte(0xaa);
    let hash = tx_hash(1, 0);

    let stx = StorageTransaction {
        create: vec![sample_create()],
        ..Default::default()
    };
    let block = block_with(1, vec![Transaction::storage_update(hash, sender, &stx)]);
    let receipts = execute_block(&mut db, &block).unwrap();

    assert!(receipts.iter().all(|r| r.succeeded));
    assert_eq!(allentities::count(&db).unwrap(), 1);

    let key = entity_key(hash, 0);
    let ap = entity::get_entity(&db, key).unwrap();
    assert_eq!(ap.owner, sender);
    assert_eq!(ap.expires_at_block, 1000);
    assert_eq!(ap.payload, Bytes::from_static(b"test"));
    assert_eq!(ap.string_annotations, stx.create[0].string_annotations);
    assert_eq!(ap.numeric_annotations, stx.create[0].numeric_annotations);

    // one create log, keyed to the entity, carrying the expiry block
    let create_log = &receipts[0].logs[0];
    assert_eq!(
        create_log.topics,
        vec![*GOLEM_BASE_STORAGE_ENTITY_CREATED, key]
    );
    assert_eq!(
        create_log.data.as_ref(),
        H256::from_uint(&U256::from(1000u64)).as_bytes()
    );
}

#[test]
fn update_preserves_the_entity_key() {
    let mut db = InMemoryState::new();
    let sender = Address::repeat_byte(0xaa);
    let create_hash = tx_hash(1, 0);

    let stx = StorageTransaction {
        create: vec![sample_create()],
        ..Default::default()
    };
    let block1 = block_with(1, vec![Transaction::storage_update(create_hash, sender, &stx)]);
    execute_block(&mut db, &block1).unwrap();
    let key = entity_key(create_hash, 0);

    let update = StorageTransaction {
        update: vec![Update {
            entity_key: key,
            payload: Bytes::from_static(b"test2"),
            expires_at_block: 999,
            btl: 0,
            string_annotations: vec![StringAnnotation {
                key: "stringTest2".into(),
                value: "stringTest2".into(),
            }],
            numeric_annotations: vec![NumericAnnotation {
                key: "numericTest2".into(),
                value: 12345678901,
            }],
        }],
        ..Default::default()
    };
    let block2 = block_with(
        2,
        vec![Transaction::storage_update(tx_hash(2, 0), sender, &update)],
    );
    let receipts = execute_block(&mut db, &block2).unwrap();
    assert!(receipts.iter().all(|r| r.succeeded));

    let ap = entity::get_entity(&db, key).unwrap();
    assert_eq!(ap.payload, Bytes::from_static(b"test2"));
    assert_eq!(ap.expires_at_block, 999);
    assert_eq!(allentities::count(&db).unwrap(), 1);

    // old annotation index no longer holds the key, the new one does
    assert!(!keyset::contains_value(
        &db,
        annotationindex::string_annotation_index_key("stringTest", "stringTest"),
        key
    ));
    assert!(keyset::contains_value(
        &db,
        annotationindex::string_annotation_index_key("stringTest2", "stringTest2"),
        key
    ));

    // the key moved from the 1000-expiration set to the 999 one
    assert!(!entityexpiration::contains_entity(&db, 1000, key));
    assert!(entityexpiration::contains_entity(&db, 999, key));
}

#[test]
fn entity_expires_at_its_expiry_block() {
    let mut db = InMemoryState::new();
    let sender = Address::repeat_byte(0xaa);
    let hash = tx_hash(1, 0);

    let stx = StorageTransaction {
        create: vec![Create {
            expires_at_block: 5,
            ..sample_create()
        }],
        ..Default::default()
    };
    execute_block(
        &mut db,
        &block_with(1, vec![Transaction::storage_update(hash, sender, &stx)]),
    )
    .unwrap();
    let key = entity_key(hash, 0);

    // empty blocks up to just before the expiry leave the entity alone
    for number in 2..=4 {
        let receipts = execute_block(&mut db, &block_with(number, vec![])).unwrap();
        assert!(receipts.iter().all(|r| r.logs.is_empty()));
        assert!(entity::get_entity(&db, key).is_ok());
    }

    // block 5: housekeeping purges it
    let receipts = execute_block(&mut db, &block_with(5, vec![])).unwrap();
    let housekeeping_logs = &receipts.last().unwrap().logs;
    assert_eq!(housekeeping_logs.len(), 1);
    assert_eq!(
        housekeeping_logs[0].topics,
        vec![*GOLEM_BASE_STORAGE_ENTITY_DELETED, key]
    );

    assert!(entity::get_entity(&db, key).is_err());
    assert!(!allentities::contains_entity(&db, key));
    assert!(!entitiesofowner::contains_entity(&db, sender, key));
    assert!(!entityexpiration::contains_entity(&db, 5, key));
    assert_eq!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS), 0);
}

#[test]
fn btl_resolves_against_the_executing_block() {
    let mut db = InMemoryState::new();
    let sender = Address::repeat_byte(0xaa);
    let hash = tx_hash(3, 0);

    let stx = StorageTransaction {
        create: vec![Create {
            expires_at_block: 0,
            btl: 10,
            ..sample_create()
        }],
        ..Default::default()
    };
    let receipts = execute_block(
        &mut db,
        &block_with(3, vec![Transaction::storage_update(hash, sender, &stx)]),
    )
    .unwrap();

    let key = entity_key(hash, 0);
    assert_eq!(entity::get_entity(&db, key).unwrap().expires_at_block, 13);
    assert!(entityexpiration::contains_entity(&db, 13, key));
    assert_eq!(
        receipts[0].logs[0].data.as_ref(),
        H256::from_uint(&U256::from(13u64)).as_bytes()
    );
}

#[test]
fn failed_storage_transaction_is_reverted() {
    let mut db = InMemoryState::new();
    let sender = Address::repeat_byte(0xaa);

    // one valid create plus an update of an entity that does not exist:
    // the whole transaction must be rolled back
    let stx = StorageTransaction {
        create: vec![sample_create()],
        update: vec![Update {
            entity_key: H256::repeat_byte(0xdd),
            payload: Bytes::from_static(b"nope"),
            expires_at_block: 10,
            ..Default::default()
        }],
        ..Default::default()
    };
    let receipts = execute_block(
        &mut db,
        &block_with(
            1,
            vec![Transaction::storage_update(tx_hash(1, 0), sender, &stx)],
        ),
    )
    .unwrap();

    assert!(!receipts[0].succeeded);
    assert!(receipts[0].logs.is_empty());
    assert_eq!(allentities::count(&db).unwrap(), 0);
    assert_eq!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS), 0);
}

#[test]
fn undecodable_transaction_payload_is_reverted() {
    let mut db = InMemoryState::new();
    let garbage = Transaction {
        hash: tx_hash(1, 0),
        from: Address::repeat_byte(0xaa),
        tx_type: golembase_common::types::TxType::StorageUpdate,
        data: Bytes::from_static(&[0xff, 0x01, 0x02]),
    };
    let receipts = execute_block(&mut db, &block_with(1, vec![garbage])).unwrap();

    assert!(!receipts[0].succeeded);
    assert_eq!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS), 0);
}

#[test]
fn ops_execute_creates_then_updates_then_deletes() {
    let mut db = InMemoryState::new();
    let sender = Address::repeat_byte(0xaa);
    let setup_hash = tx_hash(1, 0);

    // set up an entity to update and one to delete
    let setup = StorageTransaction {
        create: vec![sample_create(), sample_create()],
        ..Default::default()
    };
    execute_block(
        &mut db,
        &block_with(1, vec![Transaction::storage_update(setup_hash, sender, &setup)]),
    )
    .unwrap();
    let update_target = entity_key(setup_hash, 0);
    let delete_target = entity_key(setup_hash, 1);

    let mixed_hash = tx_hash(2, 0);
    let mixed = StorageTransaction {
        create: vec![sample_create()],
        update: vec![Update {
            entity_key: update_target,
            payload: Bytes::from_static(b"updated"),
            expires_at_block: 500,
            ..Default::default()
        }],
        delete: vec![delete_target],
    };
    let receipts = execute_block(
        &mut db,
        &block_with(2, vec![Transaction::storage_update(mixed_hash, sender, &mixed)]),
    )
    .unwrap();

    let logs = &receipts[0].logs;
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].topics[0], *GOLEM_BASE_STORAGE_ENTITY_CREATED);
    assert_eq!(logs[0].topics[1], entity_key(mixed_hash, 0));
    assert_eq!(logs[1].topics[0], *GOLEM_BASE_STORAGE_ENTITY_UPDATED);
    assert_eq!(logs[1].topics[1], update_target);
    assert_eq!(logs[2].topics[0], *GOLEM_BASE_STORAGE_ENTITY_DELETED);
    assert_eq!(logs[2].topics[1], delete_target);

    assert_eq!(allentities::count(&db).unwrap(), 2);
    assert!(entity::get_entity(&db, delete_target).is_err());
}
