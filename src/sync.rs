//! State/DTO field synchronization.
//!
//! Each (state type, DTO type) pair gets an explicit mapping table declared with
//! [`sync_fields!`](crate::sync_fields). Copying walks the table field by field,
//! applies the unknown/null/known rule, and stops at the first field that fails
//! to convert.

mod convert;
mod error;
mod slot;
mod value;

pub use convert::Convert;
pub use error::{ConversionError, ConversionErrorKind, FieldPath};
pub use slot::{ReadSlot, WriteSlot, read_required, write_required};
pub use value::{Nullable, Value};

/// Field mapping between a state type and one DTO type.
///
/// Usually generated by [`sync_fields!`](crate::sync_fields).
pub trait Synchronize<D> {
    fn write_dto(&self, dest: &mut D, path: &FieldPath) -> Result<(), ConversionError>;
    fn read_dto(&mut self, source: &D, path: &FieldPath) -> Result<(), ConversionError>;
}

/// Copies a plan or state into a DTO. `dest` may be partially written on error.
pub fn copy_to_dto<S: Synchronize<D>, D>(source: &S, dest: &mut D) -> Result<(), ConversionError> {
    source.write_dto(dest, &FieldPath::root())
}

/// Copies an API record into state. `dest` may be partially written on error.
pub fn copy_to_state<S: Synchronize<D>, D>(source: &D, dest: &mut S) -> Result<(), ConversionError> {
    dest.read_dto(source, &FieldPath::root())
}

pub fn to_dto<S: Synchronize<D>, D: Default>(source: &S) -> Result<D, ConversionError> {
    let mut dest = D::default();
    copy_to_dto(source, &mut dest)?;
    Ok(dest)
}

pub fn to_state<S: Synchronize<D> + Default, D>(source: &D) -> Result<S, ConversionError> {
    let mut dest = S::default();
    copy_to_state(source, &mut dest)?;
    Ok(dest)
}

/// Declares the field mapping between a state type and a DTO type.
///
/// Generates [`Synchronize`] plus the [`Convert`] pair that lets the two types
/// appear as nested objects (or list elements) inside other mapped types.
/// Both types must implement `Default`.
///
/// Each entry is `state_field => dto_field`, optionally followed by a mode:
///
/// - `[required]`: the DTO field is a plain value rather than an `Option`;
/// - `[write_only]`: sent to the API, never read back (secrets);
/// - `[read_only]`: read into state, never sent (computed attributes);
/// - `[default = expr]`: an absent DTO value reads back as `Known(expr)`.
///
/// ```ignore
/// sync_fields! {
///     SnapshotState => Snapshot {
///         id => id [required],
///         name => name [required],
///         expires => expires,
///     }
/// }
/// ```
#[macro_export]
macro_rules! sync_fields {
    (
        $state:ty => $dto:ty {
            $($sf:ident => $df:ident $([$($mode:tt)+])?),* $(,)?
        }
    ) => {
        impl $crate::sync::Synchronize<$dto> for $state {
            fn write_dto(
                &self,
                dest: &mut $dto,
                path: &$crate::sync::FieldPath,
            ) -> ::std::result::Result<(), $crate::sync::ConversionError> {
                $(
                    $crate::__sync_write!(
                        self.$sf, dest.$df, path.child(stringify!($sf)) $(, $($mode)+)?
                    );
                )*
                let _ = (dest, path);
                Ok(())
            }

            fn read_dto(
                &mut self,
                source: &$dto,
                path: &$crate::sync::FieldPath,
            ) -> ::std::result::Result<(), $crate::sync::ConversionError> {
                $(
                    $crate::__sync_read!(
                        self.$sf, source.$df, path.child(stringify!($sf)) $(, $($mode)+)?
                    );
                )*
                let _ = (source, path);
                Ok(())
            }
        }

        impl $crate::sync::Convert<$dto> for $state {
            fn convert(
                &self,
                path: &$crate::sync::FieldPath,
            ) -> ::std::result::Result<$dto, $crate::sync::ConversionError> {
                let mut dest = <$dto as ::std::default::Default>::default();
                $crate::sync::Synchronize::<$dto>::write_dto(self, &mut dest, path)?;
                Ok(dest)
            }
        }

        impl $crate::sync::Convert<$state> for $dto {
            fn convert(
                &self,
                path: &$crate::sync::FieldPath,
            ) -> ::std::result::Result<$state, $crate::sync::ConversionError> {
                let mut dest = <$state as ::std::default::Default>::default();
                $crate::sync::Synchronize::<$dto>::read_dto(&mut dest, self, path)?;
                Ok(dest)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sync_write {
    ($src:expr, $dst:expr, $path:expr) => {
        $crate::sync::WriteSlot::write_slot(&mut $dst, &$src, &$path)?;
    };
    ($src:expr, $dst:expr, $path:expr, required) => {
        $crate::sync::write_required(&mut $dst, &$src, &$path)?;
    };
    ($src:expr, $dst:expr, $path:expr, write_only) => {
        $crate::__sync_write!($src, $dst, $path);
    };
    ($src:expr, $dst:expr, $path:expr, read_only) => {};
    ($src:expr, $dst:expr, $path:expr, default = $default:expr) => {
        $crate::__sync_write!($src, $dst, $path);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sync_read {
    ($dst:expr, $src:expr, $path:expr) => {
        $dst = $crate::sync::ReadSlot::read_slot(&$src, &$path)?;
    };
    ($dst:expr, $src:expr, $path:expr, required) => {
        $dst = $crate::sync::read_required(&$src, &$path)?;
    };
    ($dst:expr, $src:expr, $path:expr, write_only) => {};
    ($dst:expr, $src:expr, $path:expr, read_only) => {
        $crate::__sync_read!($dst, $src, $path);
    };
    ($dst:expr, $src:expr, $path:expr, default = $default:expr) => {
        $dst = match $crate::sync::ReadSlot::read_slot(&$src, &$path)? {
            $crate::sync::Value::Null => $crate::sync::Value::Known($default),
            other => other,
        };
    };
}
