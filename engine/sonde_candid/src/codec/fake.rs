//! A stand-in codec for unit tests.
//!
//! Encodes the JSON form of a value and applies the handful of checks the
//! validator relies on the real codec for.

use num_traits::Signed;

use crate::{Idx, Pool, Tag, Value, WireCodec};

pub(crate) struct JsonCodec;

impl WireCodec for JsonCodec {
    fn encode(&self, pool: &Pool, ty: Idx, value: &Value) -> Result<Vec<u8>, String> {
        match (pool.resolved_tag(ty), value) {
            (Tag::Empty, _) => Err("cannot encode a value of type empty".to_owned()),
            (Tag::Nat, Value::Number(n)) if n.is_negative() => {
                Err(format!("Invalid nat argument: {n}"))
            }
            _ => Ok(value.to_json().to_string().into_bytes()),
        }
    }

    fn encode_args(&self, pool: &Pool, tys: &[Idx], values: &[Value]) -> Result<Vec<u8>, String> {
        if tys.len() != values.len() {
            return Err(format!(
                "wrong number of arguments: expected {}, got {}",
                tys.len(),
                values.len()
            ));
        }
        let mut out = b"DIDL".to_vec();
        for (&ty, value) in tys.iter().zip(values) {
            out.extend(self.encode(pool, ty, value)?);
        }
        Ok(out)
    }
}
