//! Response reassembly from raw wire bytes.
//!
//! A completed transfer hands back its status code, elapsed time, and one
//! buffer holding the header block and body concatenated. [`reassemble`]
//! turns that raw material back into a structured [`Response`], handling
//! HTTP/1.x status lines, HTTP/2 pseudo-headers, and end-of-header
//! detection. Pure transformation; no I/O.

use crate::error::ClientError;
use crate::message::Response;
use crate::transport::TransferReport;

/// Separator between header fields on the wire.
const FIELD_SEPARATOR: &str = "\r\n";

/// Synthetic header recording the elapsed transfer time.
pub const REQUEST_TIME_HEADER: &str = "X-Request-Time";

/// Rebuild a structured response from a raw transfer report.
///
/// # Errors
///
/// Returns [`ClientError::MissingStatusCode`] when the report carries the
/// zero status sentinel: the network was reachable but the primitive could
/// not extract transfer metadata.
pub fn reassemble(report: TransferReport) -> Result<Response, ClientError> {
    if report.status_code == 0 {
        return Err(ClientError::MissingStatusCode);
    }

    let mut response = Response::new(report.status_code);

    // The header length is primitive-reported; tolerate one that overruns
    // the buffer the same way a lenient substring would.
    let split = report.header_len.min(report.buffer.len());
    let (header_block, body) = report.buffer.split_at(split);

    populate_headers(&mut response, header_block);

    let elapsed_ms = report.elapsed.as_secs_f64() * 1e3;
    response.push_header(REQUEST_TIME_HEADER, format!("{elapsed_ms:.3} ms"));

    response.body = body.to_vec();
    Ok(response)
}

/// Walk the header block and append each well-formed field to the response.
///
/// Field handling, in priority order: index 0 is the status line and is
/// always skipped; an empty field marks the end of the header section; a
/// leading `:` marks an HTTP/2 pseudo-header; a field with no `:` separator
/// is malformed or a folded continuation. Duplicate names are kept as
/// multiple values in encounter order.
fn populate_headers(response: &mut Response, header_block: &[u8]) {
    let header_block = String::from_utf8_lossy(header_block);

    for (index, field) in header_block.split(FIELD_SEPARATOR).enumerate() {
        if index == 0 {
            continue;
        }
        if field.is_empty() {
            break;
        }
        if field.starts_with(':') {
            continue;
        }
        let Some((name, value)) = field.split_once(':') else {
            continue;
        };
        // RFC 7230 header folding: exactly one optional space after the colon.
        let value = value.strip_prefix(' ').unwrap_or(value);
        response.push_header(name, value);
    }
}
