use super::{ConversionError, ConversionErrorKind, Convert, FieldPath, Nullable, Value};

/// A DTO field that can receive a state value.
///
/// `Unknown` leaves the field untouched, `Null` writes the field's cleared
/// representation, `Known` converts and assigns.
pub trait WriteSlot<S> {
    fn write_slot(&mut self, value: &Value<S>, path: &FieldPath) -> Result<(), ConversionError>;
}

/// A DTO field that can be read back into a state value.
pub trait ReadSlot<S> {
    fn read_slot(&self, path: &FieldPath) -> Result<Value<S>, ConversionError>;
}

impl<S: Convert<D>, D> WriteSlot<S> for Option<D> {
    fn write_slot(&mut self, value: &Value<S>, path: &FieldPath) -> Result<(), ConversionError> {
        match value {
            Value::Unknown => {}
            Value::Null => *self = None,
            Value::Known(value) => *self = Some(value.convert(path)?),
        }
        Ok(())
    }
}

impl<S: Convert<D>, D> WriteSlot<S> for Nullable<D> {
    fn write_slot(&mut self, value: &Value<S>, path: &FieldPath) -> Result<(), ConversionError> {
        match value {
            Value::Unknown => {}
            Value::Null => *self = Nullable::Null,
            Value::Known(value) => *self = Nullable::Present(value.convert(path)?),
        }
        Ok(())
    }
}

impl<S, D: Convert<S>> ReadSlot<S> for Option<D> {
    fn read_slot(&self, path: &FieldPath) -> Result<Value<S>, ConversionError> {
        match self {
            Some(value) => Ok(Value::Known(value.convert(path)?)),
            None => Ok(Value::Null),
        }
    }
}

impl<S, D: Convert<S>> ReadSlot<S> for Nullable<D> {
    fn read_slot(&self, path: &FieldPath) -> Result<Value<S>, ConversionError> {
        match self {
            Nullable::Present(value) => Ok(Value::Known(value.convert(path)?)),
            Nullable::Null | Nullable::Absent => Ok(Value::Null),
        }
    }
}

/// Writes into a plain (always present) DTO field. A null state value has no
/// representation there and fails.
pub fn write_required<S: Convert<D>, D>(
    slot: &mut D,
    value: &Value<S>,
    path: &FieldPath,
) -> Result<(), ConversionError> {
    match value {
        Value::Unknown => Ok(()),
        Value::Null => Err(ConversionError::new(path, ConversionErrorKind::NullRequired)),
        Value::Known(value) => {
            *slot = value.convert(path)?;
            Ok(())
        }
    }
}

pub fn read_required<S, D: Convert<S>>(
    slot: &D,
    path: &FieldPath,
) -> Result<Value<S>, ConversionError> {
    Ok(Value::Known(slot.convert(path)?))
}
