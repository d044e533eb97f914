use std::collections::BTreeMap;

use super::{ConversionError, ConversionErrorKind, FieldPath};

/// Conversion between the inner type of a state attribute and the type of the
/// matching API field.
///
/// Implemented in both directions for every supported pair; nested objects get
/// their implementations from [`sync_fields!`](crate::sync_fields).
pub trait Convert<T> {
    fn convert(&self, path: &FieldPath) -> Result<T, ConversionError>;
}

macro_rules! identity {
    ($($ty:ty),*) => {
        $(
            impl Convert<$ty> for $ty {
                fn convert(&self, _path: &FieldPath) -> Result<$ty, ConversionError> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

identity!(String, bool, i64, f64);

// State integers are always i64; the API uses narrower or unsigned widths.
macro_rules! integer {
    ($($ty:ty),*) => {
        $(
            impl Convert<$ty> for i64 {
                fn convert(&self, path: &FieldPath) -> Result<$ty, ConversionError> {
                    <$ty>::try_from(*self).map_err(|_| {
                        ConversionError::new(
                            path,
                            ConversionErrorKind::OutOfRange {
                                value: self.to_string(),
                                target: stringify!($ty),
                            },
                        )
                    })
                }
            }

            impl Convert<i64> for $ty {
                fn convert(&self, path: &FieldPath) -> Result<i64, ConversionError> {
                    i64::try_from(*self).map_err(|_| {
                        ConversionError::new(
                            path,
                            ConversionErrorKind::OutOfRange {
                                value: self.to_string(),
                                target: "i64",
                            },
                        )
                    })
                }
            }

            impl Convert<$ty> for String {
                fn convert(&self, path: &FieldPath) -> Result<$ty, ConversionError> {
                    parse_number(self, path, concat!("a string-encoded ", stringify!($ty)))
                }
            }

            impl Convert<String> for $ty {
                fn convert(&self, _path: &FieldPath) -> Result<String, ConversionError> {
                    Ok(self.to_string())
                }
            }
        )*
    };
}

integer!(i32, u32, u64);

impl Convert<i64> for String {
    fn convert(&self, path: &FieldPath) -> Result<i64, ConversionError> {
        parse_number(self, path, "a string-encoded i64")
    }
}

impl Convert<String> for i64 {
    fn convert(&self, _path: &FieldPath) -> Result<String, ConversionError> {
        Ok(self.to_string())
    }
}

fn parse_number<N: std::str::FromStr>(
    value: &str,
    path: &FieldPath,
    expected: &'static str,
) -> Result<N, ConversionError> {
    value.parse().map_err(|_| {
        ConversionError::new(
            path,
            ConversionErrorKind::Incompatible {
                expected,
                value: value.to_string(),
            },
        )
    })
}

impl<S: Convert<D>, D> Convert<Vec<D>> for Vec<S> {
    fn convert(&self, path: &FieldPath) -> Result<Vec<D>, ConversionError> {
        self.iter()
            .enumerate()
            .map(|(i, item)| item.convert(&path.index(i)))
            .collect()
    }
}

impl<S: Convert<D>, D> Convert<BTreeMap<String, D>> for BTreeMap<String, S> {
    fn convert(&self, path: &FieldPath) -> Result<BTreeMap<String, D>, ConversionError> {
        self.iter()
            .map(|(key, item)| Ok((key.clone(), item.convert(&path.key(key))?)))
            .collect()
    }
}

/// Declares an enum of API string constants together with its conversions
/// to and from the `String` state representation.
///
/// ```ignore
/// api_enum! {
///     pub enum SecurityFlavor {
///         Unix => "unix",
///         Krb5 => "krb5",
///     }
/// }
/// ```
#[macro_export]
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::sync::Convert<$name> for String {
            fn convert(
                &self,
                path: &$crate::sync::FieldPath,
            ) -> ::std::result::Result<$name, $crate::sync::ConversionError> {
                match self.as_str() {
                    $($wire => Ok($name::$variant),)+
                    other => Err($crate::sync::ConversionError::new(
                        path,
                        $crate::sync::ConversionErrorKind::UnknownVariant {
                            value: other.to_string(),
                            allowed: $name::ALL,
                        },
                    )),
                }
            }
        }

        impl $crate::sync::Convert<String> for $name {
            fn convert(
                &self,
                _path: &$crate::sync::FieldPath,
            ) -> ::std::result::Result<String, $crate::sync::ConversionError> {
                Ok(self.as_str().to_string())
            }
        }
    };
}
