//! The records a WAL file is made of, one JSON object per line.

use ethereum_types::H256;
use golembase_common::{
    Bytes, serde_utils,
    types::{NumericAnnotation, StringAnnotation},
};
use serde::{Deserialize, Serialize};

/// First record of every WAL file: the identity and chain linkage of the
/// block the following operations belong to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub number: u64,
    pub hash: H256,
    pub parent_hash: H256,
}

/// One logical operation applied by the block. Exactly one of the variants
/// appears per record, keyed `create`, `update` or `delete`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create(Create),
    Update(Update),
    Delete(H256),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    pub entity_key: H256,
    pub expires_at_block: u64,
    #[serde(with = "serde_utils::bytes_base64")]
    pub payload: Bytes,
    pub string_annotations: Vec<StringAnnotation>,
    pub numeric_annotations: Vec<NumericAnnotation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub entity_key: H256,
    pub expires_at_block: u64,
    #[serde(with = "serde_utils::bytes_base64")]
    pub payload: Bytes,
    pub string_annotations: Vec<StringAnnotation>,
    pub numeric_annotations: Vec<NumericAnnotation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_info_wire_format() {
        let info = BlockInfo {
            number: 7,
            hash: H256::repeat_byte(1),
            parent_hash: H256::repeat_byte(2),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(
            json,
            format!(
                r#"{{"number":7,"hash":"0x{}","parentHash":"0x{}"}}"#,
                "01".repeat(32),
                "02".repeat(32)
            )
        );
        assert_eq!(serde_json::from_str::<BlockInfo>(&json).unwrap(), info);
    }

    #[test]
    fn operation_wire_format() {
        let delete = Operation::Delete(H256::repeat_byte(3));
        let json = serde_json::to_string(&delete).unwrap();
        assert_eq!(json, format!(r#"{{"delete":"0x{}"}}"#, "03".repeat(32)));

        let create = Operation::Create(Create {
            entity_key: H256::repeat_byte(4),
            expires_at_block: 1000,
            payload: Bytes::from_static(b"test"),
            string_annotations: vec![StringAnnotation {
                key: "k".into(),
                value: "v".into(),
            }],
            numeric_annotations: vec![],
        });
        let json = serde_json::to_string(&create).unwrap();
        assert_eq!(
            json,
            format!(
                concat!(
                    r#"{{"create":{{"entityKey":"0x{}","expiresAtBlock":1000,"#,
                    r#""payload":"dGVzdA==","stringAnnotations":[{{"key":"k","value":"v"}}],"#,
                    r#""numericAnnotations":[]}}}}"#
                ),
                "04".repeat(32)
            )
        );
        assert_eq!(serde_json::from_str::<Operation>(&json).unwrap(), create);
    }
}
