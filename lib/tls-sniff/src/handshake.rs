/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use crate::cursor::{Cursor, TooShort};

// https://datatracker.ietf.org/doc/html/rfc8446#appendix-B.3
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum HandshakeType {
    HelloRequest = 0,
    ClientHello = 1,
    ServerHello = 2,
    HelloVerifyRequest = 3,
    NewSessionTicket = 4,
    EndOfEarlyData = 5,
    EncryptedExtensions = 8,
    Certificate = 11,
    ServerKeyExchange = 12,
    CertificateRequest = 13,
    ServerHelloDone = 14,
    CertificateVerify = 15,
    ClientKeyExchange = 16,
    Finished = 20,
    CertificateUrl = 21,
    CertificateStatus = 22,
    KeyUpdate = 24,
    MessageHash = 254,
}

impl TryFrom<u8> for HandshakeType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HandshakeType::HelloRequest),
            1 => Ok(HandshakeType::ClientHello),
            2 => Ok(HandshakeType::ServerHello),
            3 => Ok(HandshakeType::HelloVerifyRequest),
            4 => Ok(HandshakeType::NewSessionTicket),
            5 => Ok(HandshakeType::EndOfEarlyData),
            8 => Ok(HandshakeType::EncryptedExtensions),
            11 => Ok(HandshakeType::Certificate),
            12 => Ok(HandshakeType::ServerKeyExchange),
            13 => Ok(HandshakeType::CertificateRequest),
            14 => Ok(HandshakeType::ServerHelloDone),
            15 => Ok(HandshakeType::CertificateVerify),
            16 => Ok(HandshakeType::ClientKeyExchange),
            20 => Ok(HandshakeType::Finished),
            21 => Ok(HandshakeType::CertificateUrl),
            22 => Ok(HandshakeType::CertificateStatus),
            24 => Ok(HandshakeType::KeyUpdate),
            254 => Ok(HandshakeType::MessageHash),
            _ => Err(()),
        }
    }
}

/// `{ u8 msg_type; u24 length; }` prefix of every handshake message.
pub(crate) struct HandshakeHeader {
    pub(crate) msg_type: u8,
    pub(crate) msg_length: u32,
}

impl HandshakeHeader {
    pub(crate) const SIZE: usize = 4;

    pub(crate) fn read(cur: &mut Cursor<'_>) -> Result<Self, TooShort> {
        let msg_type = cur.read_u8()?;
        let msg_length = cur.read_u24()?;
        Ok(HandshakeHeader {
            msg_type,
            msg_length,
        })
    }

    /// Size of the encoded message including this header.
    pub(crate) fn encoded_cap(&self) -> usize {
        Self::SIZE + self.msg_length as usize
    }
}
