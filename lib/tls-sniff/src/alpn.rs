/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

/// Classification of a single ALPN protocol name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlpnProtocol {
    Http11,
    Http2,
    Other,
}

impl AlpnProtocol {
    pub fn from_wire_name(name: &[u8]) -> AlpnProtocol {
        match name {
            b"h2" => AlpnProtocol::Http2,
            b"http/1.1" => AlpnProtocol::Http11,
            _ => AlpnProtocol::Other,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AlpnProtocol::Http11 => "http/1.1",
            AlpnProtocol::Http2 => "h2",
            AlpnProtocol::Other => "other",
        }
    }
}

impl fmt::Display for AlpnProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Accumulated classification of every protocol name in an ALPN list.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct AlpnProtocolSet: u8 {
        const HTTP1_1 = 0x01;
        const HTTP2 = 0x02;
        const OTHER = 0x04;
    }
}

impl From<AlpnProtocol> for AlpnProtocolSet {
    fn from(p: AlpnProtocol) -> Self {
        match p {
            AlpnProtocol::Http11 => AlpnProtocolSet::HTTP1_1,
            AlpnProtocol::Http2 => AlpnProtocolSet::HTTP2,
            AlpnProtocol::Other => AlpnProtocolSet::OTHER,
        }
    }
}

#[derive(Debug, Error)]
pub enum TlsAlpnError {
    #[error("not enough data: {0}")]
    NotEnoughData(usize),
    #[error("invalid list length {0}")]
    InvalidListLength(u16),
    #[error("empty protocol name")]
    EmptyProtocolName,
    #[error("truncated protocol name")]
    TruncatedProtocolName,
}

impl AlpnProtocolSet {
    /// Walk the extension value of an ALPN extension and classify every
    /// protocol name in it.
    pub fn from_extension_value(buf: &[u8]) -> Result<AlpnProtocolSet, TlsAlpnError> {
        let buf_len = buf.len();
        if buf_len < 2 {
            return Err(TlsAlpnError::NotEnoughData(buf_len));
        }

        let list_len = u16::from_be_bytes([buf[0], buf[1]]);
        if list_len as usize + 2 != buf_len {
            return Err(TlsAlpnError::InvalidListLength(list_len));
        }

        let mut set = AlpnProtocolSet::empty();
        let mut offset = 2usize;
        while offset < buf_len {
            let name_len = buf[offset] as usize;
            if name_len == 0 {
                return Err(TlsAlpnError::EmptyProtocolName);
            }
            let start = offset + 1;
            let end = start + name_len;
            if end > buf_len {
                return Err(TlsAlpnError::TruncatedProtocolName);
            }
            set |= AlpnProtocol::from_wire_name(&buf[start..end]).into();
            offset = end;
        }

        Ok(set)
    }
}
