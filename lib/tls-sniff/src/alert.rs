/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use bytes::Bytes;

use crate::record::{ContentType, RecordHeader};
use crate::version::TlsVersion;

pub enum AlertType {
    Closure,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertLevel {
    Warning = 1,
    Fatal = 2,
}

impl TryFrom<u8> for AlertLevel {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            1 => Ok(AlertLevel::Warning),
            2 => Ok(AlertLevel::Fatal),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlertDescription(u8);

macro_rules! def_const {
    ($name:ident, $value:literal) => {
        pub const $name: AlertDescription = AlertDescription($value);
    };
}

impl AlertDescription {
    // https://www.iana.org/assignments/tls-parameters/tls-parameters.xhtml#tls-parameters-6
    def_const!(CLOSE_NOTIFY, 0);
    def_const!(UNEXPECTED_MESSAGE, 10);
    def_const!(BAD_RECORD_MAC, 20);
    def_const!(DECRYPTION_FAILED, 21);
    def_const!(RECORD_OVERFLOW, 22);
    def_const!(DECOMPRESSION_FAILURE, 30);
    def_const!(HANDSHAKE_FAILURE, 40);
    def_const!(NO_CERTIFICATE, 41);
    def_const!(BAD_CERTIFICATE, 42);
    def_const!(UNSUPPORTED_CERTIFICATE, 43);
    def_const!(CERTIFICATE_REVOKED, 44);
    def_const!(CERTIFICATE_EXPIRED, 45);
    def_const!(CERTIFICATE_UNKNOWN, 46);
    def_const!(ILLEGAL_PARAMETER, 47);
    def_const!(UNKNOWN_CA, 48);
    def_const!(ACCESS_DENIED, 49);
    def_const!(DECODE_ERROR, 50);
    def_const!(DECRYPT_ERROR, 51);
    def_const!(TOO_MANY_CIDS_REQUESTED, 52);
    def_const!(EXPORT_RESTRICTION, 60);
    def_const!(PROTOCOL_VERSION, 70);
    def_const!(INSUFFICIENT_SECURITY, 71);
    def_const!(INTERNAL_ERROR, 80);
    def_const!(INAPPROPRIATE_FALLBACK, 86);
    def_const!(USER_CANCELED, 90);
    def_const!(NO_RENEGOTIATION, 100);
    def_const!(MISSING_EXTENSION, 109);
    def_const!(UNSUPPORTED_EXTENSION, 110);
    def_const!(CERTIFICATE_UNOBTAINABLE, 111);
    def_const!(UNRECOGNIZED_NAME, 112);
    def_const!(BAD_CERTIFICATE_STATUS_RESPONSE, 113);
    def_const!(BAD_CERTIFICATE_HASH_VALUE, 114);
    def_const!(UNKNOWN_PSK_IDENTITY, 115);
    def_const!(CERTIFICATE_REQUIRED, 116);
    def_const!(NO_APPLICATION_PROTOCOL, 120);
    def_const!(ECH_REQUIRED, 121);

    pub fn new(value: u8) -> Self {
        AlertDescription(value)
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn r#type(&self) -> AlertType {
        if matches!(*self, Self::CLOSE_NOTIFY | Self::USER_CANCELED) {
            AlertType::Closure
        } else {
            AlertType::Error
        }
    }
}

/// Level and description of an Alert record.
///
/// `level` is None when the level byte is outside the registry; the record
/// still counts as parsed.
#[derive(Clone, Copy, Debug)]
pub struct TlsAlert {
    pub level: Option<AlertLevel>,
    pub description: AlertDescription,
}

impl TlsAlert {
    /// Read the alert payload of the record starting at `frame`.
    ///
    /// Returns None when the record is not an Alert or the first two payload
    /// bytes are not available yet.
    pub fn try_parse(frame: &[u8]) -> Option<TlsAlert> {
        if frame.len() < RecordHeader::SIZE + 2 {
            return None;
        }
        if frame[0] != ContentType::Alert as u8 {
            return None;
        }
        Some(TlsAlert {
            level: AlertLevel::try_from(frame[RecordHeader::SIZE]).ok(),
            description: AlertDescription::new(frame[RecordHeader::SIZE + 1]),
        })
    }
}

const PROTOCOL_VERSION_ALERT_TLS13: [u8; 7] = [0x15, 0x03, 0x04, 0x00, 0x02, 0x02, 0x46];
const PROTOCOL_VERSION_ALERT_TLS12: [u8; 7] = [0x15, 0x03, 0x03, 0x00, 0x02, 0x02, 0x46];
const PROTOCOL_VERSION_ALERT_TLS11: [u8; 7] = [0x15, 0x03, 0x02, 0x00, 0x02, 0x02, 0x46];
const PROTOCOL_VERSION_ALERT_TLS10: [u8; 7] = [0x15, 0x03, 0x01, 0x00, 0x02, 0x02, 0x46];
// SSL 3.0 predates the protocol_version description, handshake_failure is
// the closest it can express
const PROTOCOL_VERSION_ALERT_SSL3: [u8; 7] = [0x15, 0x03, 0x00, 0x00, 0x02, 0x02, 0x28];

/// Build a fatal Alert record for `version`.
///
/// protocol_version alerts come from a canned table; any other description
/// is encoded for TLS 1.0+ only. Versions that cannot carry the alert yield
/// an empty buffer.
pub fn create_alert_frame(version: TlsVersion, description: AlertDescription) -> Bytes {
    if description == AlertDescription::PROTOCOL_VERSION {
        match version {
            TlsVersion::Tls13 => Bytes::from_static(&PROTOCOL_VERSION_ALERT_TLS13),
            TlsVersion::Tls12 => Bytes::from_static(&PROTOCOL_VERSION_ALERT_TLS12),
            TlsVersion::Tls11 => Bytes::from_static(&PROTOCOL_VERSION_ALERT_TLS11),
            TlsVersion::Tls10 => Bytes::from_static(&PROTOCOL_VERSION_ALERT_TLS10),
            TlsVersion::Ssl3 => Bytes::from_static(&PROTOCOL_VERSION_ALERT_SSL3),
            TlsVersion::Ssl2 => Bytes::new(),
        }
    } else {
        let minor = match version {
            TlsVersion::Tls10 => 1,
            TlsVersion::Tls11 => 2,
            TlsVersion::Tls12 => 3,
            TlsVersion::Tls13 => 4,
            TlsVersion::Ssl2 | TlsVersion::Ssl3 => return Bytes::new(),
        };
        Bytes::from(vec![
            ContentType::Alert as u8,
            3,
            minor,
            0,
            2,
            AlertLevel::Fatal as u8,
            description.value(),
        ])
    }
}
