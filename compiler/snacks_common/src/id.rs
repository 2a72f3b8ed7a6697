/// Declares a plain index type backed by an integer.
///
/// Ids are cheap to copy and compare; the `INVALID` constant marks a
/// sentinel that never indexes a real entry.
#[macro_export]
macro_rules! declare_id {
    ($name:ident) => {
        $crate::declare_id!($name, usize);
    };
    ($name:ident, $id_ty:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            pub raw: $id_ty,
        }

        impl $name {
            pub const INVALID: Self = Self { raw: <$id_ty>::MAX };

            pub fn new(raw: $id_ty) -> Self {
                Self { raw }
            }

            pub fn is_invalid(&self) -> bool {
                self.raw == <$id_ty>::MAX
            }

            pub fn index(&self) -> usize {
                self.raw as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.raw.fmt(f)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    declare_id!(TestId);
    declare_id!(SmallId, u32);

    #[test]
    fn invalid_sentinel() {
        assert!(TestId::INVALID.is_invalid());
        assert!(!TestId::new(3).is_invalid());
        assert_eq!(SmallId::new(7).index(), 7);
        assert_eq!(TestId::new(12).to_string(), "12");
    }
}
