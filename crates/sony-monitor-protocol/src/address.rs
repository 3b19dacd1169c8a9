//! Monitor addressing.

use core::fmt;

use openrouting_errors::ProtocolError;

/// Bits of the address byte holding the kind.
const KIND_MASK: u8 = 0xC0;

/// Bits of the address byte holding the number.
const NUMBER_MASK: u8 = 0x0F;

/// Largest address number.
pub const MAX_ADDRESS_NUMBER: u8 = 15;

/// Who an address refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Every monitor on the bus
    All,
    /// A numbered group of monitors
    Group,
    /// A single monitor
    Monitor,
}

impl AddressKind {
    pub const fn bits(self) -> u8 {
        match self {
            Self::All => 0xC0,
            Self::Group => 0x80,
            Self::Monitor => 0x00,
        }
    }

    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & KIND_MASK {
            0xC0 => Some(Self::All),
            0x80 => Some(Self::Group),
            0x00 => Some(Self::Monitor),
            _ => None,
        }
    }
}

/// One-byte address: kind | number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    kind: AddressKind,
    number: u8,
}

impl Address {
    /// Broadcast to every monitor; the form the routing drivers use.
    pub const BROADCAST: Self = Self {
        kind: AddressKind::All,
        number: 0,
    };

    /// # Errors
    ///
    /// Returns [`ProtocolError::CommandBlock`] when `number` exceeds
    /// [`MAX_ADDRESS_NUMBER`].
    pub fn new(kind: AddressKind, number: u8) -> Result<Self, ProtocolError> {
        if number > MAX_ADDRESS_NUMBER {
            return Err(ProtocolError::command_block(format!(
                "address number {number} out of range 0..={MAX_ADDRESS_NUMBER}"
            )));
        }
        Ok(Self { kind, number })
    }

    pub fn all(number: u8) -> Result<Self, ProtocolError> {
        Self::new(AddressKind::All, number)
    }

    pub fn group(number: u8) -> Result<Self, ProtocolError> {
        Self::new(AddressKind::Group, number)
    }

    pub fn monitor(number: u8) -> Result<Self, ProtocolError> {
        Self::new(AddressKind::Monitor, number)
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn to_byte(self) -> u8 {
        self.kind.bits() | self.number
    }

    /// Decode an address byte.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::CommandBlock`] for the reserved kind `0x40`
    /// or when bits 4-5 are set.
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        let kind = AddressKind::from_bits(byte).ok_or_else(|| {
            ProtocolError::command_block(format!("reserved address kind in {byte:#04x}"))
        })?;
        if byte & !(KIND_MASK | NUMBER_MASK) != 0 {
            return Err(ProtocolError::command_block(format!(
                "address byte {byte:#04x} has reserved bits set"
            )));
        }
        Ok(Self {
            kind,
            number: byte & NUMBER_MASK,
        })
    }
}

impl From<Address> for u8 {
    fn from(address: Address) -> Self {
        address.to_byte()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AddressKind::All => "ALL",
            AddressKind::Group => "GROUP",
            AddressKind::Monitor => "MONITOR",
        };
        write!(f, "{kind}|{}", self.number)
    }
}
