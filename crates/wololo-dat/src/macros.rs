/// Define a numeric ID newtype with conversions to and from its representation.
macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident($repr:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Hash,
            Default,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($repr);

        impl From<$repr> for $name {
            fn from(n: $repr) -> Self {
                $name(n)
            }
        }

        impl From<$name> for $repr {
            fn from(n: $name) -> Self {
                n.0
            }
        }

        impl From<$name> for u32 {
            fn from(n: $name) -> Self {
                n.0.into()
            }
        }

        impl From<$name> for usize {
            fn from(n: $name) -> Self {
                n.0.into()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

macro_rules! fallible_try_into {
    ($from:ident, $to:ty) => {
        impl std::convert::TryFrom<$from> for $to {
            type Error = std::num::TryFromIntError;
            fn try_from(n: $from) -> std::result::Result<Self, Self::Error> {
                n.0.try_into()
            }
        }
    };
}

macro_rules! fallible_try_from {
    ($to:ty, $from:ident) => {
        impl std::convert::TryFrom<$from> for $to {
            type Error = std::num::TryFromIntError;
            fn try_from(n: $from) -> std::result::Result<Self, Self::Error> {
                n.try_into().map(Self)
            }
        }
    };
}
