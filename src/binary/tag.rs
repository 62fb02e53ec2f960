/// The type tag byte that prefixes every entry of a binary document
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TypeTag(pub u8);

impl TypeTag {
    pub const OBJECT: TypeTag = TypeTag::new(0x00);
    pub const STRING: TypeTag = TypeTag::new(0x01);
    pub const INT32: TypeTag = TypeTag::new(0x02);
    pub const FLOAT32: TypeTag = TypeTag::new(0x03);
    pub const POINTER: TypeTag = TypeTag::new(0x04);
    pub const WIDE_STRING: TypeTag = TypeTag::new(0x05);
    pub const COLOR: TypeTag = TypeTag::new(0x06);
    pub const UINT64: TypeTag = TypeTag::new(0x07);
    pub const END: TypeTag = TypeTag::new(0x08);
    pub const INT64: TypeTag = TypeTag::new(0x0a);
    pub const END_ALT: TypeTag = TypeTag::new(0x0b);

    #[inline]
    pub const fn new(x: u8) -> Self {
        TypeTag(x)
    }

    /// Returns true if the tag introduces a key and a payload (ie: it is not
    /// an end of object marker)
    #[inline]
    pub const fn is_entry(&self) -> bool {
        matches!(
            *self,
            TypeTag::OBJECT
                | TypeTag::STRING
                | TypeTag::INT32
                | TypeTag::FLOAT32
                | TypeTag::POINTER
                | TypeTag::WIDE_STRING
                | TypeTag::COLOR
                | TypeTag::UINT64
                | TypeTag::INT64
        )
    }
}

/// Which byte closes an object
///
/// Most documents close objects with `0x08`, but some variants of the format
/// use `0x0b` instead.
///
/// ```
/// use appvdf::binary::{Terminator, TypeTag};
/// assert_eq!(Terminator::default().tag(), TypeTag::END);
/// assert_eq!(Terminator::Alternate.tag(), TypeTag::END_ALT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terminator {
    /// Objects end with `0x08`
    #[default]
    Standard,

    /// Objects end with `0x0b`
    Alternate,
}

impl Terminator {
    /// The tag that closes an object
    #[inline]
    pub const fn tag(self) -> TypeTag {
        match self {
            Terminator::Standard => TypeTag::END,
            Terminator::Alternate => TypeTag::END_ALT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_tags() {
        let entries = (0u8..=0xff)
            .map(TypeTag::new)
            .filter(|x| x.is_entry())
            .count();
        assert_eq!(entries, 9);
        assert!(!TypeTag::END.is_entry());
        assert!(!TypeTag::END_ALT.is_entry());
        assert!(!TypeTag::new(0x09).is_entry());
    }
}
