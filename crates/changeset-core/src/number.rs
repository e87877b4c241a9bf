use serde::{Deserialize, Serialize, Serializer};
use serde_json::Number as JsonNumber;

use crate::{hash::hash_bytes, DocumentError};

/// A scalar number stored as IEEE-754 double precision.
///
/// Mirrors the host document model of the wire format, where every number
/// is a double. Non-finite values cannot be represented in a document and
/// are rejected at construction. Serialization uses the minimal integer
/// form when the value is integral, so integral numbers round-trip as
/// JSON integers.
#[derive(Clone, Copy, Debug, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct Number(f64);

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_number().serialize(serializer)
    }
}

impl Number {
    /// Creates a new [`Number`] after validating finiteness.
    ///
    /// ```
    /// # use changeset_core::Number;
    /// let num = Number::new(42.0)?;
    /// assert_eq!(num.get(), 42.0);
    /// # Ok::<(), changeset_core::DocumentError>(())
    /// ```
    pub fn new(value: f64) -> Result<Self, DocumentError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(DocumentError::NotFinite { value })
        }
    }

    /// Returns the raw floating-point value.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Computes the content hash of this number.
    #[must_use]
    pub fn hash_code(self) -> crate::hash::HashCode {
        hash_bytes(&self.0.to_le_bytes())
    }

    /// Converts into a `serde_json::Number`, preferring the minimal integer
    /// representation when the value is integral.
    pub fn to_json_number(self) -> JsonNumber {
        if self.0.fract() == 0.0 && !(self.0 == 0.0 && self.0.is_sign_negative()) {
            // Exclusive upper bounds: i64::MAX and u64::MAX round up to
            // 2^63 and 2^64 as doubles, which are not representable.
            if (i64::MIN as f64) <= self.0 && self.0 < (i64::MAX as f64) {
                return JsonNumber::from(self.0 as i64);
            }
            if self.0 >= 0.0 && self.0 < (u64::MAX as f64) {
                return JsonNumber::from(self.0 as u64);
            }
        }
        JsonNumber::from_f64(self.0).expect("finite number")
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl From<Number> for f64 {
    fn from(value: Number) -> Self {
        value.0
    }
}
