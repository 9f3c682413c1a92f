//! Refuse NaN and infinities.
//!
//! `serde_json` quietly writes a non-finite float as `null`. For a response
//! body that is data loss with a `200` on top, so every payload is serialized
//! through [`Finite`], which turns those floats into a serialization error.
//! Everything else is forwarded untouched to the wrapped serializer, nested
//! values included.

use std::fmt::Display;

use serde::ser::{
    self, Serialize, SerializeMap, SerializeSeq, SerializeStruct,
    SerializeStructVariant, SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
    Serializer,
};

/// `T`, serialized with non-finite floats rejected.
pub(crate) struct Finite<'a, T: ?Sized>(pub(crate) &'a T);

impl<T> Serialize for Finite<'_, T>
where
    T: Serialize + ?Sized,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(FiniteSerializer(serializer))
    }
}

fn unsupported<E: ser::Error>(v: impl Display) -> E {
    E::custom(format_args!("unsupported value: {v}"))
}

struct FiniteSerializer<S>(S);

/// Wraps a compound serializer so its elements go through [`Finite`] too.
struct Compound<C>(C);

impl<S: Serializer> Serializer for FiniteSerializer<S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = Compound<S::SerializeSeq>;
    type SerializeTuple = Compound<S::SerializeTuple>;
    type SerializeTupleStruct = Compound<S::SerializeTupleStruct>;
    type SerializeTupleVariant = Compound<S::SerializeTupleVariant>;
    type SerializeMap = Compound<S::SerializeMap>;
    type SerializeStruct = Compound<S::SerializeStruct>;
    type SerializeStructVariant = Compound<S::SerializeStructVariant>;

    fn serialize_f32(self, v: f32) -> Result<S::Ok, S::Error> {
        if !v.is_finite() {
            return Err(unsupported(v));
        }
        self.0.serialize_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<S::Ok, S::Error> {
        if !v.is_finite() {
            return Err(unsupported(v));
        }
        self.0.serialize_f64(v)
    }

    fn serialize_bool(self, v: bool) -> Result<S::Ok, S::Error> { self.0.serialize_bool(v) }
    fn serialize_i8(self, v: i8) -> Result<S::Ok, S::Error> { self.0.serialize_i8(v) }
    fn serialize_i16(self, v: i16) -> Result<S::Ok, S::Error> { self.0.serialize_i16(v) }
    fn serialize_i32(self, v: i32) -> Result<S::Ok, S::Error> { self.0.serialize_i32(v) }
    fn serialize_i64(self, v: i64) -> Result<S::Ok, S::Error> { self.0.serialize_i64(v) }
    fn serialize_i128(self, v: i128) -> Result<S::Ok, S::Error> { self.0.serialize_i128(v) }
    fn serialize_u8(self, v: u8) -> Result<S::Ok, S::Error> { self.0.serialize_u8(v) }
    fn serialize_u16(self, v: u16) -> Result<S::Ok, S::Error> { self.0.serialize_u16(v) }
    fn serialize_u32(self, v: u32) -> Result<S::Ok, S::Error> { self.0.serialize_u32(v) }
    fn serialize_u64(self, v: u64) -> Result<S::Ok, S::Error> { self.0.serialize_u64(v) }
    fn serialize_u128(self, v: u128) -> Result<S::Ok, S::Error> { self.0.serialize_u128(v) }
    fn serialize_char(self, v: char) -> Result<S::Ok, S::Error> { self.0.serialize_char(v) }
    fn serialize_str(self, v: &str) -> Result<S::Ok, S::Error> { self.0.serialize_str(v) }
    fn serialize_bytes(self, v: &[u8]) -> Result<S::Ok, S::Error> { self.0.serialize_bytes(v) }
    fn serialize_none(self) -> Result<S::Ok, S::Error> { self.0.serialize_none() }
    fn serialize_unit(self) -> Result<S::Ok, S::Error> { self.0.serialize_unit() }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<S::Ok, S::Error> {
        self.0.serialize_some(&Finite(value))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<S::Ok, S::Error> {
        self.0.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<S::Ok, S::Error> {
        self.0.serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        self.0.serialize_newtype_struct(name, &Finite(value))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        self.0.serialize_newtype_variant(name, variant_index, variant, &Finite(value))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, S::Error> {
        self.0.serialize_seq(len).map(Compound)
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, S::Error> {
        self.0.serialize_tuple(len).map(Compound)
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, S::Error> {
        self.0.serialize_tuple_struct(name, len).map(Compound)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, S::Error> {
        self.0.serialize_tuple_variant(name, variant_index, variant, len).map(Compound)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, S::Error> {
        self.0.serialize_map(len).map(Compound)
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, S::Error> {
        self.0.serialize_struct(name, len).map(Compound)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, S::Error> {
        self.0.serialize_struct_variant(name, variant_index, variant, len).map(Compound)
    }

    fn is_human_readable(&self) -> bool {
        self.0.is_human_readable()
    }
}

// ── Compound forwarding ───────────────────────────────────────────────────────

impl<C: SerializeSeq> SerializeSeq for Compound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.0.serialize_element(&Finite(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> { self.0.end() }
}

impl<C: SerializeTuple> SerializeTuple for Compound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.0.serialize_element(&Finite(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> { self.0.end() }
}

impl<C: SerializeTupleStruct> SerializeTupleStruct for Compound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.0.serialize_field(&Finite(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> { self.0.end() }
}

impl<C: SerializeTupleVariant> SerializeTupleVariant for Compound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.0.serialize_field(&Finite(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> { self.0.end() }
}

impl<C: SerializeMap> SerializeMap for Compound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), C::Error> {
        self.0.serialize_key(&Finite(key))
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.0.serialize_value(&Finite(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> { self.0.end() }
}

impl<C: SerializeStruct> SerializeStruct for Compound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        self.0.serialize_field(key, &Finite(value))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.0.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> { self.0.end() }
}

impl<C: SerializeStructVariant> SerializeStructVariant for Compound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        self.0.serialize_field(key, &Finite(value))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.0.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> { self.0.end() }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use super::Finite;

    #[derive(Serialize)]
    enum Reading {
        Celsius(f64),
        Range { low: f32, high: f32 },
    }

    fn compact<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
        serde_json::to_string(&Finite(value)).map_err(|e| e.to_string())
    }

    #[test]
    fn finite_values_pass_through_unchanged() {
        let value = (1.5_f64, vec![Some(2.25_f32)], BTreeMap::from([("k", -0.5)]));
        assert_eq!(compact(&value), Ok(serde_json::to_string(&value).unwrap()));
        assert_eq!(compact(&Reading::Celsius(21.0)), Ok(r#"{"Celsius":21.0}"#.into()));
    }

    #[test]
    fn nan_and_infinities_are_errors() {
        assert_eq!(compact(&f64::NAN), Err("unsupported value: NaN".into()));
        assert_eq!(compact(&f64::INFINITY), Err("unsupported value: inf".into()));
        assert_eq!(compact(&f32::NEG_INFINITY), Err("unsupported value: -inf".into()));
    }

    #[test]
    fn nested_non_finite_values_are_caught() {
        assert!(compact(&vec![vec![1.0, f64::NAN]]).is_err());
        assert!(compact(&Some(f32::NAN)).is_err());
        assert!(compact(&BTreeMap::from([("t", f64::INFINITY)])).is_err());
        assert!(compact(&Reading::Celsius(f64::NAN)).is_err());
        assert!(compact(&Reading::Range { low: 0.0, high: f32::INFINITY }).is_err());
    }
}
