use core::fmt;
use core::str::FromStr;

/// Bit set on a path element to request hardened derivation.
pub const HARDENED: u32 = 0x8000_0000;

/// Maximum BIP 32 depth, the element count is serialized in a single byte.
pub const MAX_PATH_DEPTH: usize = u8::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Empty segment at position {0}")]
    EmptySegment(usize),

    #[error("Invalid segment '{segment}' at position {position}")]
    InvalidSegment { position: usize, segment: String },

    #[error("Index {index} at position {position} does not fit in 31 bits")]
    IndexOutOfRange { position: usize, index: u32 },

    #[error("Path has {0} elements, at most {} are supported", MAX_PATH_DEPTH)]
    TooDeep(usize),
}

/// A parsed BIP 32 derivation path, hardened flags folded into the high bit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    pub fn elements(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in bytes of [`DerivationPath::serialize`]
    pub fn serialized_len(&self) -> usize {
        1 + 4 * self.0.len()
    }

    /// Serialize in the format expected by the app: element count followed by each
    /// element as big endian u32
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.serialized_len());
        self.serialize_into(&mut data);
        data
    }

    pub(crate) fn serialize_into(&self, data: &mut Vec<u8>) {
        // fits: construction rejects more than MAX_PATH_DEPTH elements
        data.push(self.0.len() as u8);
        for element in self.0.iter() {
            data.extend_from_slice(&element.to_be_bytes());
        }
    }
}

impl TryFrom<Vec<u32>> for DerivationPath {
    type Error = PathError;

    fn try_from(elements: Vec<u32>) -> Result<Self, Self::Error> {
        if elements.len() > MAX_PATH_DEPTH {
            return Err(PathError::TooDeep(elements.len()));
        }
        Ok(Self(elements))
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    /// Parse paths like `44'/1397'/0'/0'/0`, an optional `m/` prefix is allowed and `h` or
    /// `H` can be used in place of `'`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("m/").unwrap_or(s);
        if s.is_empty() || s == "m" {
            return Ok(Self::default());
        }

        let elements = s
            .split('/')
            .enumerate()
            .map(|(position, segment)| parse_segment(position, segment))
            .collect::<Result<Vec<_>, _>>()?;

        Self::try_from(elements)
    }
}

fn parse_segment(position: usize, segment: &str) -> Result<u32, PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment(position));
    }
    let (digits, hardened) = match segment.strip_suffix(&['\'', 'h', 'H'][..]) {
        Some(digits) => (digits, true),
        None => (segment, false),
    };
    let invalid = || PathError::InvalidSegment {
        position,
        segment: segment.to_string(),
    };
    // u32::from_str accepts a leading '+'
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let index: u32 = digits.parse().map_err(|_| invalid())?;
    if index & HARDENED != 0 {
        return Err(PathError::IndexOutOfRange { position, index });
    }
    Ok(if hardened { index | HARDENED } else { index })
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for element in self.0.iter() {
            if element & HARDENED != 0 {
                write!(f, "/{}'", element & !HARDENED)?;
            } else {
                write!(f, "/{element}")?;
            }
        }
        Ok(())
    }
}
