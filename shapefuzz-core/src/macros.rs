//! Declarative registration of aggregate shapes

/// Implement [`Generate`](crate::Generate) for a struct with named fields
///
/// Fields are populated in the order listed. A field marked `#[private]` is
/// handled by the configured [`FieldStrategy`](crate::FieldStrategy); all
/// others are always populated. Unlisted fields keep their current value.
///
/// ```
/// use shapefuzz_core::{aggregate, Generator};
///
/// #[derive(Debug, Default)]
/// struct Account {
///     name: String,
///     balance: u64,
///     pin: u16,
/// }
///
/// aggregate!(Account {
///     name,
///     balance,
///     #[private]
///     pin,
/// });
///
/// let mut generator = Generator::new(&b"\x03bob\x2a"[..]);
/// let account: Account = generator.generate().unwrap();
/// assert_eq!(account.name, "bob");
/// assert_eq!(account.balance, 42);
/// assert_eq!(account.pin, 0);
/// ```
#[macro_export]
macro_rules! aggregate {
    ($ty:ty { $( $(#[$marker:ident])? $field:ident ),* $(,)? }) => {
        impl $crate::Generate for $ty {
            const SHAPE: $crate::Shape = $crate::Shape::Aggregate;

            fn populate(
                &mut self,
                traversal: &mut $crate::Traversal<'_>,
            ) -> $crate::Result<()> {
                $(
                    traversal.field(
                        stringify!($ty),
                        stringify!($field),
                        $crate::__field_access!($($marker)?),
                        &mut self.$field,
                    )?;
                )*
                Ok(())
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_access {
    () => {
        $crate::FieldAccess::Public
    };
    (private) => {
        $crate::FieldAccess::Private
    };
}
