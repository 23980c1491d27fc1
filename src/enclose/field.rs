//! Field values accepted by [`CsvWriter::write_record`](crate::CsvWriter::write_record).

use std::borrow::Cow;

/// A single, possibly absent, field value.
///
/// Strings and byte buffers are written as-is. `None` is written as an empty
/// field, which under forced enclosure becomes `""`.
///
/// # Example
///
/// ```
/// use csv_enclose::Field;
///
/// assert_eq!(Some("Chevy").as_field(), Some(&b"Chevy"[..]));
/// assert_eq!(None::<&str>.as_field(), None);
/// ```
pub trait Field {
    /// The bytes of the value, or `None` when the value is absent.
    fn as_field(&self) -> Option<&[u8]>;
}

impl Field for str {
    fn as_field(&self) -> Option<&[u8]> {
        Some(self.as_bytes())
    }
}

impl Field for String {
    fn as_field(&self) -> Option<&[u8]> {
        Some(self.as_bytes())
    }
}

impl Field for [u8] {
    fn as_field(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl<const N: usize> Field for [u8; N] {
    fn as_field(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl Field for Vec<u8> {
    fn as_field(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl Field for Cow<'_, str> {
    fn as_field(&self) -> Option<&[u8]> {
        Some(self.as_bytes())
    }
}

impl<T: Field + ?Sized> Field for &T {
    fn as_field(&self) -> Option<&[u8]> {
        (**self).as_field()
    }
}

impl<T: Field> Field for Option<T> {
    fn as_field(&self) -> Option<&[u8]> {
        self.as_ref().and_then(Field::as_field)
    }
}

/// The bytes of `field`, with an absent value rendered as empty.
pub(crate) fn field_bytes<F: Field + ?Sized>(field: &F) -> &[u8] {
    field.as_field().unwrap_or_default()
}
