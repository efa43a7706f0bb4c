//! Entity lifecycle: the two operations that keep the blob and every
//! secondary index consistent. Both run inside the host's transaction
//! boundary; on error the caller is expected to revert the state.

use ethereum_types::{Address, H256};
use golembase_common::types::ActivePayload;
use golembase_rlp::{decode::RLPDecode, encode::RLPEncode};

use crate::{
    allentities, annotationindex,
    api::StateAccess,
    entitiesofowner, entityexpiration,
    error::StoreError,
    keyset, stateblob,
};

/// Inserts the entity under `key`: registers it in the global and per-owner
/// indices, writes its blob, and indexes its expiry block and annotations.
pub fn store_entity<S: StateAccess>(
    db: &mut S,
    key: H256,
    sender: Address,
    ap: &ActivePayload,
) -> Result<(), StoreError> {
    allentities::add_entity(db, key)?;
    entitiesofowner::add_entity(db, sender, key)?;

    stateblob::set_blob(db, key, &ap.encode_to_vec());

    entityexpiration::add_to_entities_to_expire_at_block(db, ap.expires_at_block, key)?;

    for annotation in &ap.string_annotations {
        keyset::add_value(
            db,
            annotationindex::string_annotation_index_key(&annotation.key, &annotation.value),
            key,
        )?;
    }
    for annotation in &ap.numeric_annotations {
        keyset::add_value(
            db,
            annotationindex::numeric_annotation_index_key(&annotation.key, annotation.value),
            key,
        )?;
    }

    Ok(())
}

/// Reads back the entity stored under `key`.
pub fn get_entity<S: StateAccess + ?Sized>(db: &S, key: H256) -> Result<ActivePayload, StoreError> {
    let blob = stateblob::get_blob(db, key);
    if blob.is_empty() {
        return Err(StoreError::EntityNotFound(key));
    }
    ActivePayload::decode(&blob).map_err(|source| StoreError::PayloadDecode { key, source })
}

/// Removes the entity under `key` from the blob store and every index. The
/// blob is decoded first so that a corrupt record surfaces as a decode
/// error naming the entity rather than as dangling index entries.
pub fn delete_entity<S: StateAccess>(db: &mut S, to_delete: H256) -> Result<(), StoreError> {
    let ap = get_entity(db, to_delete)?;

    allentities::remove_entity(db, to_delete)?;

    for annotation in &ap.string_annotations {
        keyset::remove_value(
            db,
            annotationindex::string_annotation_index_key(&annotation.key, &annotation.value),
            to_delete,
        )?;
    }
    for annotation in &ap.numeric_annotations {
        keyset::remove_value(
            db,
            annotationindex::numeric_annotation_index_key(&annotation.key, annotation.value),
            to_delete,
        )?;
    }

    entityexpiration::remove_from_entities_to_expire(db, ap.expires_at_block, to_delete)?;
    entitiesofowner::remove_entity(db, ap.owner, to_delete)?;

    stateblob::delete_blob(db, to_delete);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryState;
    use golembase_common::{
        Bytes,
        constants::STORAGE_PROCESSOR_ADDRESS,
        types::{NumericAnnotation, StringAnnotation},
    };

    fn sample_payload(owner: Address) -> ActivePayload {
        ActivePayload {
            owner,
            expires_at_block: 1000,
            payload: Bytes::from_static(b"test"),
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
    fn stored_entity_is_fully_indexed() {
        let mut db = InMemoryState::new();
        let owner = Address::repeat_byte(0xaa);
        let key = H256::repeat_byte(1);
        let ap = sample_payload(owner);

        store_entity(&mut db, key, owner, &ap).unwrap();

        assert_eq!(get_entity(&db, key).unwrap(), ap);
        assert!(allentities::contains_entity(&db, key));
        assert!(entitiesofowner::contains_entity(&db, owner, key));
        assert!(entityexpiration::contains_entity(&db, 1000, key));
        assert!(keyset::contains_value(
            &db,
            annotationindex::string_annotation_index_key("stringTest", "stringTest"),
            key
        ));
        assert!(keyset::contains_value(
            &db,
            annotationindex::numeric_annotation_index_key("numericTest", 1234567890),
            key
        ));
    }

    #[test]
    fn delete_after_store_is_identity_on_state() {
        let mut db = InMemoryState::new();
        let owner = Address::repeat_byte(0xaa);
        let key = H256::repeat_byte(1);

        store_entity(&mut db, key, owner, &sample_payload(owner)).unwrap();
        delete_entity(&mut db, key).unwrap();

        assert!(matches!(
            get_entity(&db, key),
            Err(StoreError::EntityNotFound(_))
        ));
        assert!(!allentities::contains_entity(&db, key));
        assert!(!entitiesofowner::contains_entity(&db, owner, key));
        assert!(!entityexpiration::contains_entity(&db, 1000, key));
        assert_eq!(db.entry_count(*STORAGE_PROCESSOR_ADDRESS), 0);
    }

    #[test]
    fn delete_of_unknown_entity_fails() {
        let mut db = InMemoryState::new();
        assert!(matches!(
            delete_entity(&mut db, H256::repeat_byte(9)),
            Err(StoreError::EntityNotFound(_))
        ));
    }

    #[test]
    fn delete_of_corrupt_blob_names_the_entity() {
        let mut db = InMemoryState::new();
        let key = H256::repeat_byte(1);
        stateblob::set_blob(&mut db, key, &[0xff, 0x00, 0x01]);

        match delete_entity(&mut db, key) {
            Err(StoreError::PayloadDecode { key: k, .. }) => assert_eq!(k, key),
            other => panic!("expected a payload decode error, got {other:?}"),
        }
    }

    #[test]
    fn two_entities_share_an_annotation_index() {
        let mut db = InMemoryState::new();
        let owner = Address::repeat_byte(0xaa);
        let (k1, k2) = (H256::repeat_byte(1), H256::repeat_byte(2));
        let ap = sample_payload(owner);

        store_entity(&mut db, k1, owner, &ap).unwrap();
        store_entity(&mut db, k2, owner, &ap).unwrap();

        let index = annotationindex::string_annotation_index_key("stringTest", "stringTest");
        assert_eq!(keyset::size(&db, index).unwrap(), 2);

        delete_entity(&mut db, k1).unwrap();
        assert!(!keyset::contains_value(&db, index, k1));
        assert!(keyset::contains_value(&db, index, k2));
    }
}
