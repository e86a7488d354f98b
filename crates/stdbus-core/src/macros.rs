/// Declare a transparent wrapper over a wire byte with named constants.
///
/// Unlike a plain Rust enum this remains able to represent bytes a peer sends
/// which we do not know about, which keeps header parsing total.
macro_rules! wire_byte {
    (
        $(#[doc = $doc:literal])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($variant_meta:meta)*])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        $vis struct $name(u8);

        impl $name {
            $(
                $(#[$($variant_meta)*])*
                $vis const $variant: Self = Self($value);
            )*

            /// Wrap a raw wire byte.
            #[inline]
            pub const fn new(value: u8) -> Self {
                Self(value)
            }

            /// The raw wire byte.
            #[inline]
            pub const fn get(self) -> u8 {
                self.0
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match *self {
                    $(Self::$variant => f.write_str(stringify!($variant)),)*
                    other => write!(f, "UNKNOWN({:#04x})", other.0),
                }
            }
        }
    }
}

/// Declare a transparent bit set over a wire byte.
macro_rules! wire_bits {
    (
        $(#[doc = $doc:literal])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($variant_meta:meta)*])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        $vis struct $name(u8);

        impl $name {
            /// The empty set.
            $vis const EMPTY: Self = Self(0);

            $(
                $(#[$($variant_meta)*])*
                $vis const $variant: Self = Self($value);
            )*

            /// Wrap a raw wire byte.
            #[inline]
            pub const fn new(value: u8) -> Self {
                Self(value)
            }

            /// The raw wire byte.
            #[inline]
            pub const fn get(self) -> u8 {
                self.0
            }

            /// Test if all bits in `other` are set in `self`.
            #[inline]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl ::core::ops::BitOr for $name {
            type Output = Self;

            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl ::core::ops::BitOrAssign for $name {
            #[inline]
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let mut f = f.debug_set();
                let mut rest = self.0;

                $(
                    if rest & $value != 0 {
                        f.entry(&format_args!("{}", stringify!($variant)));
                        rest &= !$value;
                    }
                )*

                if rest != 0 {
                    f.entry(&format_args!("{rest:#04x}"));
                }

                f.finish()
            }
        }
    }
}
