//! Shape categories and the generation trait

use crate::constants::{BYTE_ELEMENT_CAP, DEFAULT_ELEMENT_CAP};
use crate::generator::Traversal;
use crate::Result;

/// Scalar subkinds and the cursor primitive each one draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `u8`: one byte
    Byte,
    /// `u16`: two bytes plus endianness control
    U16,
    /// `u32`: one seed byte
    U32,
    /// `u64`, `u128`, `usize`: one seed byte
    WideUnsigned,
    /// All signed integers: one seed byte, truncated to width
    Signed,
    /// `f32`: four bytes plus endianness control
    F32,
    /// `f64`: eight bytes plus endianness control
    F64,
    /// `bool`: byte parity
    Bool,
    /// `char`: one byte, Latin-1
    Char,
}

/// Structural category of a generated type
///
/// Selects the sequence element cap and labels traversal traces; the
/// routine that populates a value is chosen by its [`Generate`] impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Named fields populated in declaration order
    Aggregate,
    /// Fixed number of elements, no length byte
    FixedArray(usize),
    /// Length-framed text
    Text,
    /// Variable-length sequence behind the nil gate
    Sequence,
    /// Associative collection behind the nil gate
    Map,
    /// Optional value behind the nil gate
    Optional,
    /// Primitive drawn straight from the cursor
    Scalar(ScalarKind),
    /// No structural generation
    Unknown,
}

impl Shape {
    /// Element cap for a sequence whose elements have this shape
    ///
    /// Byte buffers are cheap to materialize and get the byte cap; every
    /// other element shape gets the default.
    pub const fn element_cap(self) -> u32 {
        match self {
            Shape::Scalar(ScalarKind::Byte) => BYTE_ELEMENT_CAP,
            _ => DEFAULT_ELEMENT_CAP,
        }
    }
}

/// Visibility of an aggregate field, declared when the shape is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    /// Always populated
    Public,
    /// Populated according to [`crate::FieldStrategy`]
    Private,
}

/// Types that can be populated from a fuzz input
///
/// Implementations route to the [`Traversal`] routine for their shape and
/// call [`Traversal::fill`] for every child, so depth accounting and overrides
/// apply uniformly. A type implementing only the defaults is an unknown shape:
///
/// ```
/// use shapefuzz_core::{Generate, Generator, Shape};
///
/// #[derive(Default)]
/// struct Handle(u32);
///
/// impl Generate for Handle {}
///
/// assert_eq!(Handle::SHAPE, Shape::Unknown);
/// let mut handle = Handle::default();
/// Generator::new(vec![0xffu8]).generate_struct(&mut handle).unwrap();
/// assert_eq!(handle.0, 0);
/// ```
pub trait Generate: Sized + 'static {
    /// Structural category of this type
    const SHAPE: Shape = Shape::Unknown;

    /// Element cap applied when this type is the element of a sequence
    const ELEMENT_CAP: u32 = Self::SHAPE.element_cap();

    /// Prepare `self` for an override registered for this type
    ///
    /// Runs just before the override. Optional values allocate their
    /// contents here so the override never receives an empty slot.
    fn allocate(&mut self) {}

    /// Populate `self` from the traversal's cursor
    fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
        traversal.unknown::<Self>()
    }
}
