//! Legacy advertising data: a flags field plus the complete local name.
//!
//! Layout is a sequence of AD structures, each `[len][type][value...]`
//! where `len` counts the type byte and the value.

use crate::error::Error;
use heapless::Vec;

/// Maximum advertising data length in a legacy advertising PDU.
pub const MAX_ADV_DATA_LEN: usize = 31;

/// AD type: Flags.
pub const AD_TYPE_FLAGS: u8 = 0x01;
/// AD type: Shortened Local Name.
pub const AD_TYPE_SHORT_NAME: u8 = 0x08;
/// AD type: Complete Local Name.
pub const AD_TYPE_COMPLETE_NAME: u8 = 0x09;

/// Flags bit: LE General Discoverable Mode.
pub const FLAG_LE_GENERAL_DISCOVERABLE: u8 = 0x02;
/// Flags bit: BR/EDR Not Supported.
pub const FLAG_BR_EDR_NOT_SUPPORTED: u8 = 0x04;

/// Immutable advertising data, built once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvPayload {
    data: Vec<u8, MAX_ADV_DATA_LEN>,
}

impl AdvPayload {
    /// General-discoverable, LE-only advertising data carrying `name`
    /// as the complete local name.
    pub fn new(name: &str) -> Result<Self, Error> {
        let mut payload = Self { data: Vec::new() };
        payload.push_field(
            AD_TYPE_FLAGS,
            &[FLAG_LE_GENERAL_DISCOVERABLE | FLAG_BR_EDR_NOT_SUPPORTED],
        )?;
        payload.push_field(AD_TYPE_COMPLETE_NAME, name.as_bytes())?;
        Ok(payload)
    }

    fn push_field(&mut self, ad_type: u8, value: &[u8]) -> Result<(), Error> {
        // Length byte covers the type byte plus the value.
        let len = u8::try_from(value.len() + 1).map_err(|_| Error::AdvDataOverflow)?;
        self.data
            .extend_from_slice(&[len, ad_type])
            .and_then(|()| self.data.extend_from_slice(value))
            .map_err(|()| Error::AdvDataOverflow)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Value of the first AD structure with the given type.
    pub fn field(&self, ad_type: u8) -> Option<&[u8]> {
        let data = self.as_bytes();
        let mut i = 0;
        while i < data.len() {
            let len = data[i] as usize;
            if len == 0 || i + len >= data.len() {
                break;
            }
            if data[i + 1] == ad_type {
                return Some(&data[i + 2..i + 1 + len]);
            }
            i += len + 1;
        }
        None
    }

    /// The advertised flags byte.
    pub fn flags(&self) -> Option<u8> {
        self.field(AD_TYPE_FLAGS).and_then(|v| v.first().copied())
    }

    /// Complete (or, failing that, shortened) local name.
    pub fn local_name(&self) -> Option<&str> {
        self.field(AD_TYPE_COMPLETE_NAME)
            .or_else(|| self.field(AD_TYPE_SHORT_NAME))
            .and_then(|v| core::str::from_utf8(v).ok())
    }
}
