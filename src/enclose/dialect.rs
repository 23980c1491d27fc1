//! CSV dialect: the delimiter, enclosure and escape characters a writer uses.

use crate::error::ConfigurationError;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';
/// Default enclosure (quote) character.
pub const DEFAULT_ENCLOSURE: u8 = b'"';
/// Default escape character.
pub const DEFAULT_ESCAPE: u8 = b'\\';

/// The set of single-byte CSV syntax characters governing how records are
/// serialized.
///
/// All three characters are distinct and none of them is a line break; a
/// `Dialect` can only be built through [`Dialect::new`] (or
/// [`Dialect::from_chars`]), which enforces this.
///
/// # Example
///
/// ```
/// use csv_enclose::Dialect;
///
/// let dialect = Dialect::new(b'|', b'"', b'\\').unwrap();
/// assert_eq!(dialect.delimiter(), b'|');
///
/// // Delimiter and enclosure must differ
/// assert!(Dialect::new(b'"', b'"', b'\\').is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    delimiter: u8,
    enclosure: u8,
    escape: u8,
}

impl Dialect {
    /// Creates a dialect, rejecting non-distinct or line-break characters.
    pub fn new(delimiter: u8, enclosure: u8, escape: u8) -> Result<Self, ConfigurationError> {
        let dialect = Self {
            delimiter,
            enclosure,
            escape,
        };
        dialect.validate()?;
        Ok(dialect)
    }

    /// Creates a dialect from characters, which must each be a single byte.
    pub fn from_chars(
        delimiter: char,
        enclosure: char,
        escape: char,
    ) -> Result<Self, ConfigurationError> {
        Self::new(
            single_byte(delimiter, "delimiter")?,
            single_byte(enclosure, "enclosure")?,
            single_byte(escape, "escape")?,
        )
    }

    /// The field delimiter.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// The enclosure (quote) character.
    pub fn enclosure(&self) -> u8 {
        self.enclosure
    }

    /// The escape character.
    pub fn escape(&self) -> u8 {
        self.escape
    }

    /// Returns a copy of this dialect with another delimiter.
    pub fn with_delimiter(self, delimiter: u8) -> Result<Self, ConfigurationError> {
        Self::new(delimiter, self.enclosure, self.escape)
    }

    /// Returns a copy of this dialect with another enclosure character.
    pub fn with_enclosure(self, enclosure: u8) -> Result<Self, ConfigurationError> {
        Self::new(self.delimiter, enclosure, self.escape)
    }

    /// Returns a copy of this dialect with another escape character.
    pub fn with_escape(self, escape: u8) -> Result<Self, ConfigurationError> {
        Self::new(self.delimiter, self.enclosure, escape)
    }

    /// Checks that the three characters are distinct and not line breaks.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (byte, role) in self.roles() {
            if byte == b'\n' || byte == b'\r' {
                return Err(ConfigurationError::InvalidDialect(format!(
                    "{} cannot be a line break",
                    role
                )));
            }
        }
        if self.delimiter == self.enclosure
            || self.delimiter == self.escape
            || self.enclosure == self.escape
        {
            return Err(ConfigurationError::InvalidDialect(format!(
                "delimiter {:?}, enclosure {:?} and escape {:?} must be distinct",
                char::from(self.delimiter),
                char::from(self.enclosure),
                char::from(self.escape)
            )));
        }
        Ok(())
    }

    /// Each dialect byte paired with the name of its role.
    pub(crate) fn roles(&self) -> [(u8, &'static str); 3] {
        [
            (self.delimiter, "delimiter"),
            (self.enclosure, "enclosure"),
            (self.escape, "escape"),
        ]
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            enclosure: DEFAULT_ENCLOSURE,
            escape: DEFAULT_ESCAPE,
        }
    }
}

fn single_byte(c: char, role: &str) -> Result<u8, ConfigurationError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(ConfigurationError::InvalidDialect(format!(
            "{} {:?} is not a single-byte character",
            role, c
        )))
    }
}
