/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use crate::handshake::HandshakeType;
use crate::version::TlsVersionSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22, // 0x16
    ApplicationData = 23,
}

impl TryFrom<u8> for ContentType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            20 => Ok(ContentType::ChangeCipherSpec),
            21 => Ok(ContentType::Alert),
            22 => Ok(ContentType::Handshake),
            23 => Ok(ContentType::ApplicationData),
            _ => Err(()),
        }
    }
}

/// Outer framing of a single record.
///
/// `length` is the fragment length from the wire, or -1 when the header
/// could not be determined from the bytes seen so far.
#[derive(Clone, Copy, Debug)]
pub struct RecordHeader {
    pub content_type: Option<ContentType>,
    pub version: TlsVersionSet,
    pub length: i32,
}

impl RecordHeader {
    pub const SIZE: usize = 5;

    // An initial SSL 2.0 hello shorter than this cannot carry a cipher list,
    // and one longer is not a hello any real client sends.
    const SSL2_MIN_LENGTH: i32 = 20;
    const SSL2_MAX_LENGTH: i32 = 1000;

    fn undetermined(frame: &[u8]) -> Self {
        RecordHeader {
            content_type: frame.first().and_then(|b| ContentType::try_from(*b).ok()),
            version: TlsVersionSet::empty(),
            length: -1,
        }
    }

    /// Parse the 5-byte record header, recognizing the SSL 2.0 unified
    /// ClientHello form as well.
    ///
    /// With fewer than [`RecordHeader::SIZE`] bytes only `content_type` may
    /// be filled and `length` stays -1.
    pub fn try_parse(frame: &[u8]) -> RecordHeader {
        if frame.len() < Self::SIZE {
            return Self::undetermined(frame);
        }

        if frame[1] == 3 {
            return RecordHeader {
                content_type: ContentType::try_from(frame[0]).ok(),
                version: TlsVersionSet::from_minor(frame[2]),
                length: (i32::from(frame[3]) << 8) | i32::from(frame[4]),
            };
        }

        // SSL 2.0 unified ClientHello: no record header proper, the first
        // two bytes are a 15- or 14-bit message length and the handshake
        // type plus inner version follow immediately.
        if frame[2] == HandshakeType::ClientHello as u8 && frame[3] == 3 {
            let length = if frame[0] & 0x80 != 0 {
                ((i32::from(frame[0] & 0x7f) << 8) | i32::from(frame[1])) + 2
            } else {
                ((i32::from(frame[0] & 0x3f) << 8) | i32::from(frame[1])) + 3
            };
            if length > Self::SSL2_MIN_LENGTH && length < Self::SSL2_MAX_LENGTH {
                return RecordHeader {
                    content_type: Some(ContentType::Handshake),
                    version: TlsVersionSet::SSL2,
                    length,
                };
            }
        }

        Self::undetermined(frame)
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        self.length >= 0
    }
}

/// Total on-wire size of the record starting at `frame`, or -1 when the
/// header is unreadable or the record is not from the SSL 3.0+ family.
pub fn frame_size(frame: &[u8]) -> i32 {
    if frame.len() < RecordHeader::SIZE || frame[1] != 3 {
        return -1;
    }
    RecordHeader::SIZE as i32 + ((i32::from(frame[3]) << 8) | i32::from(frame[4]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_header() {
        let data: &[u8] = &[
            0x16, // Handshake
            0x03, 0x03, // TLS 1.2
            0x00, 0x65, // Fragment Length, 101
        ];
        let header = RecordHeader::try_parse(data);
        assert!(header.is_known());
        assert_eq!(header.content_type, Some(ContentType::Handshake));
        assert_eq!(header.version, TlsVersionSet::TLS1_2);
        assert_eq!(header.length, 101);
        assert_eq!(frame_size(data), 106);
    }

    #[test]
    fn short_header() {
        let header = RecordHeader::try_parse(&[0x16, 0x03]);
        assert!(!header.is_known());
        assert_eq!(header.content_type, Some(ContentType::Handshake));
        assert_eq!(header.version, TlsVersionSet::empty());
        assert_eq!(frame_size(&[0x16, 0x03]), -1);

        let header = RecordHeader::try_parse(&[]);
        assert!(!header.is_known());
        assert_eq!(header.content_type, None);
    }

    #[test]
    fn unknown_minor_version() {
        let header = RecordHeader::try_parse(&[0x16, 0x03, 0x09, 0x00, 0x10]);
        assert!(header.is_known());
        assert_eq!(header.version, TlsVersionSet::empty());
        assert_eq!(header.length, 16);
    }

    #[test]
    fn ssl2_unified_hello() {
        // two-byte length prefix, 0x2e + 2 = 48 bytes
        let data: &[u8] = &[0x80, 0x2e, 0x01, 0x03, 0x01];
        let header = RecordHeader::try_parse(data);
        assert!(header.is_known());
        assert_eq!(header.content_type, Some(ContentType::Handshake));
        assert_eq!(header.version, TlsVersionSet::SSL2);
        assert_eq!(header.length, 48);
        // not a 3.x record
        assert_eq!(frame_size(data), -1);

        // three-byte length prefix, 0x2e + 3 = 49 bytes
        let header = RecordHeader::try_parse(&[0x00, 0x2e, 0x01, 0x03, 0x00]);
        assert_eq!(header.version, TlsVersionSet::SSL2);
        assert_eq!(header.length, 49);
    }

    #[test]
    fn ssl2_length_window() {
        // 0x10 + 2 = 18, below the plausible minimum
        let header = RecordHeader::try_parse(&[0x80, 0x10, 0x01, 0x03, 0x01]);
        assert!(!header.is_known());

        // 0x7fff + 2, way above the plausible maximum
        let header = RecordHeader::try_parse(&[0xff, 0xff, 0x01, 0x03, 0x01]);
        assert!(!header.is_known());
    }

    #[test]
    fn ssl2_shape_mismatch() {
        // not a ClientHello type byte
        let header = RecordHeader::try_parse(&[0x80, 0x2e, 0x02, 0x03, 0x01]);
        assert!(!header.is_known());

        // inner major version is not 3
        let header = RecordHeader::try_parse(&[0x80, 0x2e, 0x01, 0x02, 0x00]);
        assert!(!header.is_known());
    }
}
