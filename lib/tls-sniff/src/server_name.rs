/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::{fmt, str};

use thiserror::Error;

const MAX_HOST_NAME_LENGTH: usize = 255;

#[derive(Debug, Error)]
pub enum TlsServerNameError {
    #[error("not enough data: {0}")]
    NotEnoughData(usize),
    #[error("invalid list length {0}")]
    InvalidListLength(u16),
    #[error("invalid name type {0}")]
    InvalidNameType(u8),
    #[error("invalid name length {0}")]
    InvalidNameLength(usize),
}

/// Host name announced in the server_name extension, already mapped to
/// Unicode where the client sent an IDN A-label form.
#[derive(Clone, Debug)]
pub struct TlsServerName {
    host_name: Arc<str>,
}

impl TlsServerName {
    /// Decode the extension value of a server_name extension.
    ///
    /// Only the first list entry is examined and only the host_name type is
    /// accepted. Returns `Ok(None)` when the name bytes are not valid UTF-8,
    /// which callers treat as "no name seen" rather than a broken frame.
    pub fn from_extension_value(buf: &[u8]) -> Result<Option<TlsServerName>, TlsServerNameError> {
        let buf_len = buf.len();
        if buf_len < 5 {
            return Err(TlsServerNameError::NotEnoughData(buf_len));
        }

        let list_len = u16::from_be_bytes([buf[0], buf[1]]);
        if list_len as usize + 2 != buf_len {
            return Err(TlsServerNameError::InvalidListLength(list_len));
        }

        let name_type = buf[2];
        if name_type != 0x00 {
            return Err(TlsServerNameError::InvalidNameType(name_type));
        }

        let name_len = u16::from_be_bytes([buf[3], buf[4]]) as usize;
        if name_len > MAX_HOST_NAME_LENGTH || name_len + 5 > buf_len {
            return Err(TlsServerNameError::InvalidNameLength(name_len));
        }

        let name = &buf[5..5 + name_len];
        let Ok(host_name) = str::from_utf8(name) else {
            return Ok(None);
        };

        Ok(Some(TlsServerName {
            host_name: idn_to_unicode(host_name),
        }))
    }
}

/// Map A-label (`xn--`) host names to their Unicode form. A name the IDN
/// tables reject is kept as read off the wire, since the client may not have
/// IDN-encoded it in the first place.
fn idn_to_unicode(raw: &str) -> Arc<str> {
    let (decoded, result) = idna::domain_to_unicode(raw);
    match result {
        Ok(()) => Arc::from(decoded),
        Err(_) => Arc::from(raw),
    }
}

impl AsRef<str> for TlsServerName {
    fn as_ref(&self) -> &str {
        self.host_name.as_ref()
    }
}

impl fmt::Display for TlsServerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host_name)
    }
}
