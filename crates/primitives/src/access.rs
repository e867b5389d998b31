/// Access mode of a contract guarded by the allow list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum AccessMode {
    /// Nobody can call the contract.
    #[default]
    Closed = 0,
    /// Only callers with an explicit permission for the called selector.
    SpecialAccessOnly = 1,
    /// Everyone can call the contract.
    Public = 2,
}

/// Raw access mode value outside of `0..=2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid access mode {0}")]
pub struct InvalidAccessMode(pub u8);

impl TryFrom<u8> for AccessMode {
    type Error = InvalidAccessMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Closed),
            1 => Ok(Self::SpecialAccessOnly),
            2 => Ok(Self::Public),
            other => Err(InvalidAccessMode(other)),
        }
    }
}

impl From<AccessMode> for u8 {
    fn from(mode: AccessMode) -> Self {
        mode as Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, AccessMode::Closed)]
    #[test_case(1, AccessMode::SpecialAccessOnly)]
    #[test_case(2, AccessMode::Public)]
    fn decodes_known_modes(raw: u8, mode: AccessMode) {
        assert_eq!(AccessMode::try_from(raw), Ok(mode));
        assert_eq!(u8::from(mode), raw);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert_eq!(AccessMode::try_from(3), Err(InvalidAccessMode(3)));
    }

    #[test]
    fn defaults_to_closed() {
        assert_eq!(AccessMode::default(), AccessMode::Closed);
    }
}
