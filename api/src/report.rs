use async_trait::async_trait;
use futures::StreamExt;
use urlencoding::encode;
use valdeck_shared::{
    errors::{ApiError, ApiResponse},
    traits::{ReportApi, ReportStream},
};

use crate::client::DashboardApiClient;

/// Reassembles UTF-8 text from a byte stream whose chunk boundaries may fall
/// inside a multi-byte code point. The partial tail of a chunk is carried
/// over and prepended to the next one.
#[derive(Debug, Default)]
struct Utf8ChunkDecoder {
    carry: Vec<u8>,
}

impl Utf8ChunkDecoder {
    fn push(&mut self, chunk: &[u8]) -> ApiResponse<String> {
        let mut buf = std::mem::take(&mut self.carry);
        buf.extend_from_slice(chunk);

        let valid_up_to = match std::str::from_utf8(&buf) {
            Ok(_) => buf.len(),
            // An incomplete trailing code point waits for the next chunk.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(ApiError::Stream(format!(
                    "invalid UTF-8 in report stream: {e}"
                )));
            }
        };

        self.carry = buf.split_off(valid_up_to);
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait]
impl ReportApi for DashboardApiClient {
    async fn report_stream(&self, puuid: String) -> ApiResponse<ReportStream> {
        tracing::trace!("[API] report_stream {}", puuid);
        let path = format!("/api/v1/ai/report/{}", encode(&puuid));

        let res = self.get_raw(&path).await?;
        let mut decoder = Utf8ChunkDecoder::default();
        let stream = res
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => decoder.push(&bytes),
                Err(e) => Err(ApiError::Http(e)),
            })
            // A chunk made only of a partial code point decodes to nothing.
            .filter(|piece| futures::future::ready(!matches!(piece, Ok(p) if p.is_empty())));

        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_passes_plain_ascii_through() {
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.push(b"Hel").unwrap(), "Hel");
        assert_eq!(decoder.push(b"lo w").unwrap(), "lo w");
        assert_eq!(decoder.push(b"orld").unwrap(), "orld");
    }

    #[test]
    fn decoder_carries_split_code_points() {
        // "é" is 0xC3 0xA9; split it across two chunks.
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.push(&[b'c', b'a', b'f', 0xC3]).unwrap(), "caf");
        assert_eq!(decoder.push(&[0xA9, b'!']).unwrap(), "é!");
    }

    #[test]
    fn decoder_rejects_invalid_bytes() {
        let mut decoder = Utf8ChunkDecoder::default();
        let res = decoder.push(&[b'o', b'k', 0xFF, b'x']);
        assert!(matches!(res, Err(ApiError::Stream(_))));
    }
}
