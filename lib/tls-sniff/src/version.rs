/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use bitflags::bitflags;

/// A single protocol version, ordered oldest to newest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    Ssl2,
    Ssl3,
    Tls10,
    Tls11,
    Tls12,
    Tls13,
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TlsVersion::Ssl2 => "SSL 2.0",
            TlsVersion::Ssl3 => "SSL 3.0",
            TlsVersion::Tls10 => "TLS 1.0",
            TlsVersion::Tls11 => "TLS 1.1",
            TlsVersion::Tls12 => "TLS 1.2",
            TlsVersion::Tls13 => "TLS 1.3",
        };
        f.write_str(s)
    }
}

bitflags! {
    /// Set of protocol versions observed while walking a frame.
    ///
    /// The empty set means no version has been determined. Bits are only
    /// ever added as the record header, the hello body and the
    /// supported_versions extension are visited.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TlsVersionSet: u16 {
        const SSL2 = 0x0001;
        const SSL3 = 0x0002;
        const TLS1_0 = 0x0004;
        const TLS1_1 = 0x0008;
        const TLS1_2 = 0x0010;
        const TLS1_3 = 0x0020;
    }
}

impl TlsVersionSet {
    /// Map the minor byte of a `3.x` version pair to its tag.
    ///
    /// Unknown minor values map to the empty set.
    pub fn from_minor(minor: u8) -> TlsVersionSet {
        match minor {
            4 => TlsVersionSet::TLS1_3,
            3 => TlsVersionSet::TLS1_2,
            2 => TlsVersionSet::TLS1_1,
            1 => TlsVersionSet::TLS1_0,
            0 => TlsVersionSet::SSL3,
            _ => TlsVersionSet::empty(),
        }
    }

    /// True if the (single-tag) set is TLS 1.0 or newer.
    pub fn is_tls(&self) -> bool {
        self.bits() >= TlsVersionSet::TLS1_0.bits()
    }
}

impl From<TlsVersion> for TlsVersionSet {
    fn from(v: TlsVersion) -> Self {
        match v {
            TlsVersion::Ssl2 => TlsVersionSet::SSL2,
            TlsVersion::Ssl3 => TlsVersionSet::SSL3,
            TlsVersion::Tls10 => TlsVersionSet::TLS1_0,
            TlsVersion::Tls11 => TlsVersionSet::TLS1_1,
            TlsVersion::Tls12 => TlsVersionSet::TLS1_2,
            TlsVersion::Tls13 => TlsVersionSet::TLS1_3,
        }
    }
}
