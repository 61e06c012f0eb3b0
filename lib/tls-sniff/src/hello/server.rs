/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use super::HelloParseError;
use crate::cursor::Cursor;
use crate::extension::walk_extensions;
use crate::frame::{FrameInfo, ProcessOptions};

/// Walk a ServerHello body positioned after the legacy version pair.
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
    cur.read_u16()?; // selected cipher suite
    cur.read_u8()?; // compression method

    if cur.is_empty() {
        // A ServerHello that stops before the extension block is not
        // accepted, even though the wire format allows it.
        return Ok(false);
    }

    let ext_len = cur.read_u16()? as usize;
    if ext_len != cur.len() {
        return Err(HelloParseError::InvalidMessageLength);
    }
    Ok(walk_extensions(cur.remaining(), options, info, observe)?)
}
