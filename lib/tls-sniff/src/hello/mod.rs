/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use crate::cursor::{Cursor, TooShort};
use crate::extension::ExtensionParseError;
use crate::frame::{FrameInfo, ParsingStatus, ProcessOptions};
use crate::handshake::{HandshakeHeader, HandshakeType};
use crate::version::TlsVersionSet;

mod client;
mod server;

// version 2 + random 32 + session id length 1 + cipher suites length 2 +
// one cipher pair 2 + compression length 1 + one method 1, roughly the
// smallest hello body a real client or server can emit
const MIN_HELLO_LENGTH: usize = 44;

#[derive(Debug, Error)]
pub enum HelloParseError {
    #[error("need more data")]
    NeedMoreData,
    #[error("unsupported message type {0}")]
    UnsupportedMessageType(u8),
    #[error("invalid message length")]
    InvalidMessageLength,
    #[error("invalid extension: {0}")]
    InvalidExtension(#[from] ExtensionParseError),
}

impl HelloParseError {
    pub(crate) fn status(&self) -> ParsingStatus {
        match self {
            HelloParseError::NeedMoreData => ParsingStatus::IncompleteFrame,
            HelloParseError::UnsupportedMessageType(_) => ParsingStatus::UnsupportedFrame,
            HelloParseError::InvalidMessageLength | HelloParseError::InvalidExtension(_) => {
                ParsingStatus::InvalidFrame
            }
        }
    }
}

// A short read inside a fully covered hello body can only mean the length
// fields contradict each other.
impl From<TooShort> for HelloParseError {
    fn from(_: TooShort) -> Self {
        HelloParseError::InvalidMessageLength
    }
}

/// Parse the handshake slice of a record known to be at TLS 1.0 or newer.
///
/// `data` is the record payload trimmed to `record_len`, `record_len` the
/// length field of the record header. Returns `Ok(false)` when the walk
/// finished early but everything decoded so far stays valid.
pub(crate) fn parse_handshake<F>(
    data: &[u8],
    record_len: usize,
    options: ProcessOptions,
    info: &mut FrameInfo,
    observe: &mut F,
) -> Result<bool, HelloParseError>
where
    F: FnMut(&FrameInfo, u16, &[u8]),
{
    let mut cur = Cursor::new(data);
    if cur.len() < HandshakeHeader::SIZE + 3 {
        return Err(HelloParseError::NeedMoreData);
    }
    let hdr = HandshakeHeader::read(&mut cur).map_err(|_| HelloParseError::NeedMoreData)?;

    if hdr.msg_type != HandshakeType::ClientHello as u8
        && hdr.msg_type != HandshakeType::ServerHello as u8
    {
        return Err(HelloParseError::UnsupportedMessageType(hdr.msg_type));
    }

    if record_len < HandshakeHeader::SIZE + MIN_HELLO_LENGTH {
        return Err(HelloParseError::InvalidMessageLength);
    }

    let hello_len = hdr.msg_length as usize;
    if hello_len < MIN_HELLO_LENGTH || hello_len > record_len - HandshakeHeader::SIZE {
        return Err(HelloParseError::InvalidMessageLength);
    }
    if data.len() < hdr.encoded_cap() {
        return Err(HelloParseError::NeedMoreData);
    }

    let mut body = Cursor::new(cur.take(hello_len)?);
    let major = body.read_u8()?;
    let minor = body.read_u8()?;
    if major == 3 {
        info.supported_versions |= TlsVersionSet::from_minor(minor);
    }

    if hdr.msg_type == HandshakeType::ClientHello as u8 {
        client::parse_body(body, options, info, observe)
    } else {
        server::parse_body(body, options, info, observe)
    }
}
