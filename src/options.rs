//! Transport option mapping.
//!
//! Translates an abstract [`Request`] into the [`TransferOptions`] consumed
//! by the transport primitive. Pure function of the request; the engine
//! calls it once per transfer.

use crate::message::Request;
use crate::transport::TransferOptions;

/// Build the transfer configuration for one request.
///
/// - Method and target URI are copied verbatim.
/// - Each `(name, value)` header pair becomes one wire-format line, in
///   insertion order with duplicates preserved.
/// - Bodyless methods (`GET`, `HEAD`) never attach a body; every other
///   method attaches the full body content, even when empty.
/// - The primitive is always asked to buffer the result and prepend the
///   header block, so the raw buffer is the sole input to reassembly.
#[must_use]
pub fn transfer_options(request: &Request, overrides: &[(String, String)]) -> TransferOptions {
    let header_lines = request
        .headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect();

    let body = if request.method.is_bodyless() {
        None
    } else {
        Some(request.body.clone())
    };

    TransferOptions {
        method: request.method.as_str().to_owned(),
        url: request.uri.clone(),
        header_lines,
        body,
        buffer_response: true,
        include_header_block: true,
        overrides: overrides.to_vec(),
    }
}
