use alloy::primitives::{Address, B256, FixedBytes, U256};

/// Value that fits in a single storage word.
pub trait StorableValue: Sized {
    fn to_word(&self) -> U256;
    fn from_word(word: U256) -> Self;
}

impl StorableValue for U256 {
    fn to_word(&self) -> U256 {
        *self
    }

    fn from_word(word: U256) -> Self {
        word
    }
}

impl StorableValue for B256 {
    fn to_word(&self) -> U256 {
        U256::from_be_bytes(self.0)
    }

    fn from_word(word: U256) -> Self {
        Self::from(word.to_be_bytes::<32>())
    }
}

impl StorableValue for Address {
    fn to_word(&self) -> U256 {
        U256::from_be_bytes(self.into_word().0)
    }

    fn from_word(word: U256) -> Self {
        Self::from_word(B256::from(word.to_be_bytes::<32>()))
    }
}

impl StorableValue for bool {
    fn to_word(&self) -> U256 {
        U256::from(*self as u8)
    }

    fn from_word(word: U256) -> Self {
        !word.is_zero()
    }
}

macro_rules! storable_uint {
    ($($ty:ty),*) => {
        $(
            impl StorableValue for $ty {
                fn to_word(&self) -> U256 {
                    U256::from(*self)
                }

                /// Truncates to the low bits, like a Solidity slot holding a narrow integer.
                fn from_word(word: U256) -> Self {
                    word.wrapping_to::<$ty>()
                }
            }
        )*
    };
}

storable_uint!(u8, u16, u64);

/// Key of a storage mapping, encoded the way Solidity pads it before hashing.
pub trait StorageKey {
    fn to_key_word(&self) -> B256;
}

impl StorageKey for Address {
    fn to_key_word(&self) -> B256 {
        self.into_word()
    }
}

impl StorageKey for U256 {
    fn to_key_word(&self) -> B256 {
        B256::from(self.to_be_bytes::<32>())
    }
}

impl StorageKey for B256 {
    fn to_key_word(&self) -> B256 {
        *self
    }
}

impl StorageKey for u16 {
    fn to_key_word(&self) -> B256 {
        U256::from(*self).to_key_word()
    }
}

/// Fixed-size byte strings are left-aligned, e.g. a `bytes4` function selector.
impl StorageKey for FixedBytes<4> {
    fn to_key_word(&self) -> B256 {
        B256::right_padding_from(self.as_slice())
    }
}
