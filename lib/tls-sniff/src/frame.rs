/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use bitflags::bitflags;
use log::trace;

use crate::alert::TlsAlert;
use crate::alpn::AlpnProtocolSet;
use crate::handshake::HandshakeType;
use crate::hello;
use crate::record::{ContentType, RecordHeader};
use crate::server_name::TlsServerName;
use crate::version::TlsVersionSet;

bitflags! {
    /// Selects which optional hello fields get decoded.
    ///
    /// The record header, handshake type and version accumulation are always
    /// produced; bits outside the defined set are ignored.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ProcessOptions: u32 {
        const SERVER_NAME = 0x1;
        const APPLICATION_PROTOCOL = 0x2;
        const VERSIONS = 0x4;
        const CIPHER_SUITES = 0x8;
        const ALL = 0x7fff_ffff;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParsingStatus {
    Ok,
    IncompleteFrame,
    UnsupportedFrame,
    InvalidFrame,
}

impl ParsingStatus {
    // Severity only ever goes up; a deep failure is never masked by a later
    // shallow success.
    fn escalate(&mut self, new: ParsingStatus) {
        if new > *self {
            *self = new;
        }
    }
}

/// Everything learned about one record, filled in as far as the input
/// allowed. On [`ParsingStatus::IncompleteFrame`] the filled fields are
/// final: feeding a longer buffer reproduces them identically.
#[derive(Clone, Debug)]
pub struct FrameInfo {
    pub header: RecordHeader,
    pub handshake_type: Option<HandshakeType>,
    pub supported_versions: TlsVersionSet,
    pub server_name: Option<TlsServerName>,
    pub alpn_protocols: AlpnProtocolSet,
    pub alert: Option<TlsAlert>,
    pub cipher_suites: Vec<u16>,
    pub status: ParsingStatus,
}

impl Default for FrameInfo {
    fn default() -> Self {
        FrameInfo {
            header: RecordHeader {
                content_type: None,
                version: TlsVersionSet::empty(),
                length: -1,
            },
            handshake_type: None,
            supported_versions: TlsVersionSet::empty(),
            server_name: None,
            alpn_protocols: AlpnProtocolSet::empty(),
            alert: None,
            cipher_suites: Vec::new(),
            status: ParsingStatus::Ok,
        }
    }
}

impl FrameInfo {
    /// Sniff the record starting at `frame`.
    ///
    /// The returned bool is true only when the record is complete in the
    /// buffer and everything requested parsed cleanly; with a partial buffer
    /// the caller can read `status`, buffer more bytes and call again.
    pub fn try_parse(frame: &[u8], options: ProcessOptions) -> (FrameInfo, bool) {
        Self::try_parse_with(frame, options, |_, _, _| {})
    }

    /// Like [`FrameInfo::try_parse`], invoking `observe` once per hello
    /// extension in wire order with the extension type and raw body. The
    /// body borrow ends with the call.
    pub fn try_parse_with<F>(frame: &[u8], options: ProcessOptions, mut observe: F) -> (FrameInfo, bool)
    where
        F: FnMut(&FrameInfo, u16, &[u8]),
    {
        let mut info = FrameInfo {
            header: RecordHeader::try_parse(frame),
            ..Default::default()
        };
        if frame.len() < RecordHeader::SIZE {
            info.status = ParsingStatus::IncompleteFrame;
            return (info, false);
        }
        info.supported_versions = info.header.version;

        if info.header.version == TlsVersionSet::SSL2 {
            // unified hello: the inner version pair sits right behind the
            // length and message type, nothing further is walked
            info.handshake_type = Some(HandshakeType::ClientHello);
            info.supported_versions |= TlsVersionSet::from_minor(frame[4]);
            return (info, true);
        }

        if info.header.content_type == Some(ContentType::Alert) {
            return match TlsAlert::try_parse(frame) {
                Some(alert) => {
                    info.alert = Some(alert);
                    (info, true)
                }
                None => {
                    info.status = ParsingStatus::IncompleteFrame;
                    (info, false)
                }
            };
        }

        if info.header.content_type != Some(ContentType::Handshake) {
            trace!("record content type {} is not inspected", frame[0]);
            info.status = ParsingStatus::UnsupportedFrame;
            return (info, false);
        }

        if frame.len() <= RecordHeader::SIZE {
            info.status = ParsingStatus::IncompleteFrame;
            return (info, false);
        }

        info.handshake_type = HandshakeType::try_from(frame[RecordHeader::SIZE]).ok();
        let mut complete =
            frame.len() as i64 >= RecordHeader::SIZE as i64 + i64::from(info.header.length);
        info.status = if complete {
            ParsingStatus::Ok
        } else {
            ParsingStatus::IncompleteFrame
        };

        if info.header.version.is_tls() {
            let record_len = info.header.length as usize;
            let end = (RecordHeader::SIZE + record_len).min(frame.len());
            match hello::parse_handshake(
                &frame[RecordHeader::SIZE..end],
                record_len,
                options,
                &mut info,
                &mut observe,
            ) {
                Ok(true) => {}
                Ok(false) => complete = false,
                Err(e) => {
                    trace!("hello parsing stopped: {e}");
                    info.status.escalate(e.status());
                    complete = false;
                }
            }
        }

        let ok = complete && info.status == ParsingStatus::Ok;
        (info, ok)
    }
}

/// Sniff only the server name out of an initial ClientHello record.
pub fn sniff_server_name(frame: &[u8]) -> Option<TlsServerName> {
    let (info, _) = FrameInfo::try_parse(frame, ProcessOptions::SERVER_NAME);
    info.server_name
}

#[cfg(test)]
mod tests {
    use super::*;

    // TLS 1.2 ClientHello with SNI example.com and ALPN h2 + http/1.1
    const CLIENT_HELLO: &[u8] = &[
        0x16, //
        0x03, 0x03, // TLS 1.2
        0x00, 0x57, // Fragment Length, 87
        0x01, // Handshake Type - ClientHello
        0x00, 0x00, 0x53, // Message Length, 83
        0x03, 0x03, // TLS 1.2
        0x74, 0x90, 0x65, 0xea, 0xbb, 0x00, 0x5d, 0xf8, 0xdf, 0xd6, 0xde, 0x04, 0xf8, 0xd3, 0x69,
        0x02, 0xf5, 0x8c, 0x82, 0x50, 0x7a, 0x40, 0xf6, 0xf3, 0xbb, 0x18, 0xc0, 0xac, 0x4f, 0x55,
        0x9a, 0xda, // Random data, 32 bytes
        0x00, // Session ID Length
        0x00, 0x04, // Cipher Suites Length
        0x13, 0x02, 0x13, 0x01, // Cipher Suites
        0x01, // Compression Methods Length
        0x00, // Compression Methods
        0x00, 0x26, // Extensions Length, 38
        0x00, 0x00, // Extension Type - Server Name
        0x00, 0x10, // Extension Length, 16
        0x00, 0x0e, // Server Name List Length, 14
        0x00, // Server Name Type - Domain
        0x00, 0x0b, // Server Name Length, 11
        b'e', b'x', b'a', b'm', b'p', b'l', b'e', b'.', b'c', b'o', b'm', //
        0x00, 0x10, // Extension Type - ALPN
        0x00, 0x0e, // Extension Length, 14
        0x00, 0x0c, // Protocol List Length, 12
        0x02, b'h', b'2', //
        0x08, b'h', b't', b't', b'p', b'/', b'1', b'.', b'1', //
    ];

    // ClientHello advertising TLS 1.3 through the supported_versions
    // extension while the record stays at TLS 1.0
    const CLIENT_HELLO_13: &[u8] = &[
        0x16, //
        0x03, 0x01, // TLS 1.0
        0x00, 0x4e, // Fragment Length, 78
        0x01, // Handshake Type - ClientHello
        0x00, 0x00, 0x4a, // Message Length, 74
        0x03, 0x03, // TLS 1.2
        0x74, 0x90, 0x65, 0xea, 0xbb, 0x00, 0x5d, 0xf8, 0xdf, 0xd6, 0xde, 0x04, 0xf8, 0xd3, 0x69,
        0x02, 0xf5, 0x8c, 0x82, 0x50, 0x7a, 0x40, 0xf6, 0xf3, 0xbb, 0x18, 0xc0, 0xac, 0x4f, 0x55,
        0x9a, 0xda, // Random data, 32 bytes
        0x00, // Session ID Length
        0x00, 0x04, // Cipher Suites Length
        0x13, 0x02, 0x13, 0x01, // Cipher Suites
        0x01, // Compression Methods Length
        0x00, // Compression Methods
        0x00, 0x1d, // Extensions Length, 29
        0x00, 0x00, // Extension Type - Server Name
        0x00, 0x10, // Extension Length, 16
        0x00, 0x0e, // Server Name List Length, 14
        0x00, // Server Name Type - Domain
        0x00, 0x0b, // Server Name Length, 11
        b'e', b'x', b'a', b'm', b'p', b'l', b'e', b'.', b'c', b'o', b'm', //
        0x00, 0x2b, // Extension Type - Supported Versions
        0x00, 0x05, // Extension Length, 5
        0x04, // Version List Length, 4
        0x03, 0x04, // TLS 1.3
        0x03, 0x03, // TLS 1.2
    ];

    // ServerHello selecting h2
    const SERVER_HELLO: &[u8] = &[
        0x16, //
        0x03, 0x03, // TLS 1.2
        0x00, 0x35, // Fragment Length, 53
        0x02, // Handshake Type - ServerHello
        0x00, 0x00, 0x31, // Message Length, 49
        0x03, 0x03, // TLS 1.2
        0x74, 0x90, 0x65, 0xea, 0xbb, 0x00, 0x5d, 0xf8, 0xdf, 0xd6, 0xde, 0x04, 0xf8, 0xd3, 0x69,
        0x02, 0xf5, 0x8c, 0x82, 0x50, 0x7a, 0x40, 0xf6, 0xf3, 0xbb, 0x18, 0xc0, 0xac, 0x4f, 0x55,
        0x9a, 0xda, // Random data, 32 bytes
        0x00, // Session ID Length
        0x13, 0x01, // Cipher Suite
        0x00, // Compression Method
        0x00, 0x09, // Extensions Length, 9
        0x00, 0x10, // Extension Type - ALPN
        0x00, 0x05, // Extension Length, 5
        0x00, 0x03, // Protocol List Length, 3
        0x02, b'h', b'2', //
    ];

    // ServerHello that ends right after the compression method
    const SERVER_HELLO_NO_EXT: &[u8] = &[
        0x16, //
        0x03, 0x03, // TLS 1.2
        0x00, 0x4a, // Fragment Length, 74
        0x02, // Handshake Type - ServerHello
        0x00, 0x00, 0x46, // Message Length, 70
        0x03, 0x03, // TLS 1.2
        0x74, 0x90, 0x65, 0xea, 0xbb, 0x00, 0x5d, 0xf8, 0xdf, 0xd6, 0xde, 0x04, 0xf8, 0xd3, 0x69,
        0x02, 0xf5, 0x8c, 0x82, 0x50, 0x7a, 0x40, 0xf6, 0xf3, 0xbb, 0x18, 0xc0, 0xac, 0x4f, 0x55,
        0x9a, 0xda, // Random data, 32 bytes
        0x20, // Session ID Length
        0x57, 0x5a, 0x8d, 0x9c, 0xa3, 0x8e, 0x16, 0xbd, 0xb6, 0x6c, 0xe7, 0x35, 0x62, 0x63, 0x7f,
        0x51, 0x5f, 0x6e, 0x97, 0xf7, 0xf9, 0x85, 0xad, 0xf0, 0x2d, 0x3a, 0x72, 0x9d, 0x71, 0x0b,
        0xe1, 0x32, // Session ID, 32 bytes
        0x13, 0x01, // Cipher Suite
        0x00, // Compression Method
    ];

    #[test]
    fn client_hello_full() {
        let (info, ok) = FrameInfo::try_parse(CLIENT_HELLO, ProcessOptions::ALL);
        assert!(ok);
        assert_eq!(info.status, ParsingStatus::Ok);
        assert_eq!(info.handshake_type, Some(HandshakeType::ClientHello));
        assert_eq!(info.supported_versions, TlsVersionSet::TLS1_2);
        assert_eq!(info.server_name.as_ref().map(|n| n.as_ref()), Some("example.com"));
        assert_eq!(
            info.alpn_protocols,
            AlpnProtocolSet::HTTP2 | AlpnProtocolSet::HTTP1_1
        );
        assert_eq!(info.cipher_suites, vec![0x1302, 0x1301]);
    }

    #[test]
    fn client_hello_13_versions() {
        let (info, ok) = FrameInfo::try_parse(CLIENT_HELLO_13, ProcessOptions::ALL);
        assert!(ok);
        assert_eq!(
            info.supported_versions,
            TlsVersionSet::TLS1_0 | TlsVersionSet::TLS1_2 | TlsVersionSet::TLS1_3
        );
    }

    #[test]
    fn options_gate_optional_fields() {
        let (info, ok) = FrameInfo::try_parse(CLIENT_HELLO, ProcessOptions::empty());
        assert!(ok);
        assert!(info.server_name.is_none());
        assert!(info.alpn_protocols.is_empty());
        assert!(info.cipher_suites.is_empty());
        // record and hello versions are not optional
        assert_eq!(info.supported_versions, TlsVersionSet::TLS1_2);

        let (info, ok) = FrameInfo::try_parse(CLIENT_HELLO, ProcessOptions::SERVER_NAME);
        assert!(ok);
        assert!(info.server_name.is_some());
        assert!(info.cipher_suites.is_empty());
    }

    #[test]
    fn unknown_option_bits_ignored() {
        let options = ProcessOptions::from_bits_retain(0x4000_1000) | ProcessOptions::SERVER_NAME;
        let (info, ok) = FrameInfo::try_parse(CLIENT_HELLO, options);
        assert!(ok);
        assert!(info.server_name.is_some());
    }

    #[test]
    fn truncated_record_body() {
        // header claims five payload bytes but the hello cannot fit
        let data: &[u8] = &[0x16, 0x03, 0x01, 0x00, 0x05, 0x01, 0x00, 0x00, 0x01, 0x03];
        let (info, ok) = FrameInfo::try_parse(data, ProcessOptions::ALL);
        assert!(!ok);
        assert_eq!(info.status, ParsingStatus::IncompleteFrame);
        assert_eq!(info.handshake_type, Some(HandshakeType::ClientHello));
        assert_eq!(info.header.length, 5);
        assert_eq!(info.supported_versions, TlsVersionSet::TLS1_0);
    }

    #[test]
    fn ssl2_unified_hello() {
        let data: &[u8] = &[0x80, 0x2e, 0x01, 0x03, 0x01];
        let (info, ok) = FrameInfo::try_parse(data, ProcessOptions::ALL);
        assert!(ok);
        assert_eq!(info.status, ParsingStatus::Ok);
        assert_eq!(info.handshake_type, Some(HandshakeType::ClientHello));
        assert_eq!(
            info.supported_versions,
            TlsVersionSet::SSL2 | TlsVersionSet::TLS1_0
        );
        assert_eq!(info.header.content_type, Some(ContentType::Handshake));
    }

    #[test]
    fn alert_record() {
        let data: &[u8] = &[0x15, 0x03, 0x03, 0x00, 0x02, 0x02, 0x46];
        let (info, ok) = FrameInfo::try_parse(data, ProcessOptions::ALL);
        assert!(ok);
        assert_eq!(info.status, ParsingStatus::Ok);
        let alert = info.alert.unwrap();
        assert_eq!(alert.level, Some(crate::alert::AlertLevel::Fatal));
        assert_eq!(
            alert.description,
            crate::alert::AlertDescription::PROTOCOL_VERSION
        );
    }

    #[test]
    fn alert_record_truncated() {
        let data: &[u8] = &[0x15, 0x03, 0x03, 0x00, 0x02, 0x02];
        let (info, ok) = FrameInfo::try_parse(data, ProcessOptions::ALL);
        assert!(!ok);
        assert_eq!(info.status, ParsingStatus::IncompleteFrame);
    }

    #[test]
    fn app_data_unsupported() {
        let data: &[u8] = &[0x17, 0x03, 0x03, 0x00, 0x10, 0xaa, 0xbb];
        let (info, ok) = FrameInfo::try_parse(data, ProcessOptions::ALL);
        assert!(!ok);
        assert_eq!(info.status, ParsingStatus::UnsupportedFrame);
    }

    #[test]
    fn non_hello_handshake_unsupported() {
        // a complete Certificate message
        let mut data = vec![0x16, 0x03, 0x03, 0x00, 0x08];
        data.extend_from_slice(&[0x0b, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]);
        let (info, ok) = FrameInfo::try_parse(&data, ProcessOptions::ALL);
        assert!(!ok);
        assert_eq!(info.status, ParsingStatus::UnsupportedFrame);
        assert_eq!(info.handshake_type, Some(HandshakeType::Certificate));
    }

    #[test]
    fn ssl3_hello_not_walked() {
        // SSL 3.0 record: the handshake type is noted but the body is left
        // alone
        let mut data = vec![0x16, 0x03, 0x00, 0x00, 0x08];
        data.extend_from_slice(&[0x01, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]);
        let (info, ok) = FrameInfo::try_parse(&data, ProcessOptions::ALL);
        assert!(ok);
        assert_eq!(info.status, ParsingStatus::Ok);
        assert_eq!(info.handshake_type, Some(HandshakeType::ClientHello));
        assert_eq!(info.supported_versions, TlsVersionSet::SSL3);
        assert!(info.server_name.is_none());
    }

    #[test]
    fn server_hello_alpn() {
        let (info, ok) = FrameInfo::try_parse(SERVER_HELLO, ProcessOptions::ALL);
        assert!(ok);
        assert_eq!(info.status, ParsingStatus::Ok);
        assert_eq!(info.handshake_type, Some(HandshakeType::ServerHello));
        assert_eq!(info.alpn_protocols, AlpnProtocolSet::HTTP2);
        // cipher suites are only captured from ClientHello
        assert!(info.cipher_suites.is_empty());
    }

    #[test]
    fn server_hello_without_extensions_rejected() {
        let (info, ok) = FrameInfo::try_parse(SERVER_HELLO_NO_EXT, ProcessOptions::ALL);
        assert!(!ok);
        assert_eq!(info.status, ParsingStatus::Ok);
        assert_eq!(info.handshake_type, Some(HandshakeType::ServerHello));
    }

    #[test]
    fn exact_extension_length_required() {
        let mut data = CLIENT_HELLO.to_vec();
        // extensions length off by one
        data[53] = 0x27;
        let (info, ok) = FrameInfo::try_parse(&data, ProcessOptions::ALL);
        assert!(!ok);
        assert_eq!(info.status, ParsingStatus::InvalidFrame);
    }

    #[test]
    fn bad_sni_fails_parse() {
        let mut data = CLIENT_HELLO.to_vec();
        // server name list length no longer matches the extension length
        data[58] = 0x01;
        let (info, ok) = FrameInfo::try_parse(&data, ProcessOptions::ALL);
        assert!(!ok);
        assert_eq!(info.status, ParsingStatus::InvalidFrame);
    }

    #[test]
    fn odd_cipher_suite_list_not_captured() {
        // minimal hello with a 3-byte cipher list and no extensions
        let mut body = vec![0x03, 0x03];
        body.extend_from_slice(&[0u8; 32]); // random
        body.push(0x00); // session id length
        body.extend_from_slice(&[0x00, 0x03, 0x13, 0x02, 0x13]); // odd cipher list
        body.extend_from_slice(&[0x01, 0x00]); // compression methods
        body.extend_from_slice(&[0x00, 0x00]); // empty extension block
        let mut data = vec![0x16, 0x03, 0x03, 0x00, (body.len() + 4) as u8];
        data.extend_from_slice(&[0x01, 0x00, 0x00, body.len() as u8]);
        data.extend_from_slice(&body);
        let (info, ok) = FrameInfo::try_parse(&data, ProcessOptions::ALL);
        assert!(ok);
        assert!(info.cipher_suites.is_empty());
    }

    #[test]
    fn sniff_server_name_wrapper() {
        let name = sniff_server_name(CLIENT_HELLO).unwrap();
        assert_eq!(name.as_ref(), "example.com");

        assert!(sniff_server_name(SERVER_HELLO).is_none());
        assert!(sniff_server_name(&[0x17, 0x03, 0x03, 0x00, 0x02, 0x00, 0x00]).is_none());
    }
}
