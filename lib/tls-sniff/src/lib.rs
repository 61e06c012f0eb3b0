/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Streaming sniffing of SSL/TLS record framing and of the
//! ClientHello/ServerHello messages carried inside, for use in front of a
//! byte stream whose first record has been peeked but not consumed.
//!
//! Everything works on a borrowed byte slice and reports through the
//! returned structs: a short buffer is `IncompleteFrame` and can simply be
//! retried once more bytes arrived.

mod cursor;

mod version;
pub use version::{TlsVersion, TlsVersionSet};

mod record;
pub use record::{frame_size, ContentType, RecordHeader};

mod handshake;
pub use handshake::HandshakeType;

mod alert;
pub use alert::{create_alert_frame, AlertDescription, AlertLevel, AlertType, TlsAlert};

mod server_name;
pub use server_name::{TlsServerName, TlsServerNameError};

mod alpn;
pub use alpn::{AlpnProtocol, AlpnProtocolSet, TlsAlpnError};

mod extension;
pub use extension::{ExtensionParseError, ExtensionType};

mod hello;
pub use hello::HelloParseError;

mod frame;
pub use frame::{sniff_server_name, FrameInfo, ParsingStatus, ProcessOptions};
