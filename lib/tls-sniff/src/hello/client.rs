/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use super::HelloParseError;
use crate::cursor::Cursor;
use crate::extension::walk_extensions;
use crate::frame::{FrameInfo, ProcessOptions};

/// Walk a ClientHello body positioned after the legacy version pair.
pub(super) fn parse_body<F>(
    mut cur: Cursor<'_>,
    options: ProcessOptions,
    info: &mut FrameInfo,
    observe: &mut F,
) -> Result<bool, HelloParseError>
where
    F: FnMut(&FrameInfo, u16, &[u8]),
{
    cur.skip(32); // random

    cur.take_opaque1()?; // session id

    let cipher_suites = cur.take_opaque2()?;
    if options.contains(ProcessOptions::CIPHER_SUITES) && cipher_suites.len() & 0x01 == 0 {
        info.cipher_suites = cipher_suites
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
    }

    cur.take_opaque1()?; // compression methods

    if cur.is_empty() {
        // No extensions
        return Ok(true);
    }

    let ext_len = cur.read_u16()? as usize;
    if ext_len != cur.len() {
        return Err(HelloParseError::InvalidMessageLength);
    }
    Ok(walk_extensions(cur.remaining(), options, info, observe)?)
}
