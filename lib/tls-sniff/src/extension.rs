/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use crate::alpn::{AlpnProtocolSet, TlsAlpnError};
use crate::cursor::{Cursor, TooShort};
use crate::frame::{FrameInfo, ProcessOptions};
use crate::server_name::{TlsServerName, TlsServerNameError};
use crate::version::TlsVersionSet;

#[derive(Clone, Copy)]
#[repr(u16)]
pub enum ExtensionType {
    ServerName = 0,                           // rfc6066
    MaxFragmentLength = 1,                    // rfc6066
    StatusRequest = 5,                        // rfc6066
    SupportedGroups = 10,                     // rfc8422, rfc7919
    SignatureAlgorithms = 13,                 // rfc8446
    UseSrtp = 14,                             // rfc5764
    Heartbeat = 15,                           // rfc6520
    ApplicationLayerProtocolNegotiation = 16, // rfc7301
    SignedCertificateTimestamp = 18,          // rfc6962
    ClientCertificateType = 19,               // rfc7250
    ServerCertificateType = 20,               // rfc7250
    Padding = 21,                             // rfc7685
    PreSharedKey = 41,                        // rfc8446(TLS1.3)
    EarlyData = 42,                           // rfc8446(TLS1.3)
    SupportedVersions = 43,                   // rfc8446(TLS1.3)
    Cookie = 44,                              // rfc8446(TLS1.3)
    PskKeyExchangeModes = 45,                 // rfc8446(TLS1.3)
    CertificateAuthorities = 47,              // rfc8446(TLS1.3)
    OidFilters = 48,                          // rfc8446(TLS1.3)
    PostHandshakeAuth = 49,                   // rfc8446(TLS1.3)
    SignatureAlgorithmsCert = 50,             // rfc8446(TLS1.3)
    KeyShare = 51,                            // rfc8446(TLS1.3)
}

#[derive(Debug, Error)]
pub enum ExtensionParseError {
    #[error("not enough data")]
    NotEnoughData,
    #[error("invalid server name: {0}")]
    InvalidServerName(#[from] TlsServerNameError),
    #[error("invalid alpn list: {0}")]
    InvalidAlpn(#[from] TlsAlpnError),
    #[error("invalid supported versions list")]
    InvalidSupportedVersions,
}

impl From<TooShort> for ExtensionParseError {
    fn from(_: TooShort) -> Self {
        ExtensionParseError::NotEnoughData
    }
}

const EXT_HEADER_LEN: usize = 4;

/// Walk every `{ u16 type; u16 length; body }` entry of an extension block.
///
/// `observe` sees each extension exactly once, in wire order, with the exact
/// body bytes; the known extensions are additionally decoded into `info` when
/// the matching bit of `options` is set.
///
/// Returns `Ok(false)` when a declared extension length runs past the block:
/// whatever was decoded up to that point stays valid.
pub(crate) fn walk_extensions<F>(
    data: &[u8],
    options: ProcessOptions,
    info: &mut FrameInfo,
    observe: &mut F,
) -> Result<bool, ExtensionParseError>
where
    F: FnMut(&FrameInfo, u16, &[u8]),
{
    let mut cur = Cursor::new(data);
    while cur.len() >= EXT_HEADER_LEN {
        let ext_type = cur.read_u16()?;
        let ext_len = cur.read_u16()? as usize;
        let Ok(body) = cur.take(ext_len) else {
            return Ok(false);
        };

        observe(info, ext_type, body);

        if ext_type == ExtensionType::ServerName as u16 {
            if options.contains(ProcessOptions::SERVER_NAME) {
                if let Some(name) = TlsServerName::from_extension_value(body)? {
                    info.server_name = Some(name);
                }
            }
        } else if ext_type == ExtensionType::SupportedVersions as u16 {
            if options.contains(ProcessOptions::VERSIONS) {
                info.supported_versions |= decode_supported_versions(body)?;
            }
        } else if ext_type == ExtensionType::ApplicationLayerProtocolNegotiation as u16
            && options.contains(ProcessOptions::APPLICATION_PROTOCOL)
        {
            info.alpn_protocols |= AlpnProtocolSet::from_extension_value(body)?;
        }
    }
    Ok(true)
}

/// Decode a supported_versions extension value: a 1-byte list length
/// followed by 2-byte version pairs. Only `3.x` pairs contribute.
fn decode_supported_versions(body: &[u8]) -> Result<TlsVersionSet, ExtensionParseError> {
    let Some((list_len, versions)) = body.split_first() else {
        return Err(ExtensionParseError::InvalidSupportedVersions);
    };
    if *list_len as usize != versions.len() {
        return Err(ExtensionParseError::InvalidSupportedVersions);
    }

    let mut set = TlsVersionSet::empty();
    for pair in versions.chunks_exact(2) {
        if pair[0] == 3 {
            set |= TlsVersionSet::from_minor(pair[1]);
        }
    }
    Ok(set)
}
