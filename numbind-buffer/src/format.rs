use bytemuck::Pod;
use std::fmt;

/// Identifier of the scalar type stored in a buffer.
///
/// The string form follows the buffer protocol codes,
/// e.g. `i` for 32-bit signed integer and `d` for 64-bit float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl FormatTag {
    /// Returns format tag of given scalar type.
    #[inline]
    pub fn of<T: Scalar>() -> Self {
        T::FORMAT
    }

    /// Returns byte width of single item.
    #[inline]
    pub const fn item_size(self) -> usize {
        match self {
            FormatTag::I8 | FormatTag::U8 => 1,
            FormatTag::I16 | FormatTag::U16 => 2,
            FormatTag::I32 | FormatTag::U32 | FormatTag::F32 => 4,
            FormatTag::I64 | FormatTag::U64 | FormatTag::F64 => 8,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            FormatTag::I8 => "b",
            FormatTag::I16 => "h",
            FormatTag::I32 => "i",
            FormatTag::I64 => "q",
            FormatTag::U8 => "B",
            FormatTag::U16 => "H",
            FormatTag::U32 => "I",
            FormatTag::U64 => "Q",
            FormatTag::F32 => "f",
            FormatTag::F64 => "d",
        }
    }
}

impl fmt::Display for FormatTag {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar is a plain numeric type that can be stored in a buffer.
///
/// `Pod` guarantees any bit pattern is a valid value, so freshly
/// allocated storage can be read without initialization.
pub trait Scalar: Pod + Default + PartialEq + fmt::Debug {
    const FORMAT: FormatTag;
}

macro_rules! impl_scalar {
    ($ty:ty, $tag:ident) => {
        impl Scalar for $ty {
            const FORMAT: FormatTag = FormatTag::$tag;
        }
    };
}

impl_scalar!(i8, I8);
impl_scalar!(i16, I16);
impl_scalar!(i32, I32);
impl_scalar!(i64, I64);
impl_scalar!(u8, U8);
impl_scalar!(u16, U16);
impl_scalar!(u32, U32);
impl_scalar!(u64, U64);
impl_scalar!(f32, F32);
impl_scalar!(f64, F64);
