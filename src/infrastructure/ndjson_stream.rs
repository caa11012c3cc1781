// Chunked NDJSON streaming utilities
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use serde::Serialize;

/// Create a chunked response emitting one JSON document per line.
///
/// Each line is compressed on its own when `compress` is set, so the
/// response carries no `Content-Encoding` and every chunk is length-prefixed
/// (4 bytes, big-endian) instead of newline-terminated.
pub fn ndjson_stream<S, T>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let byte_stream = stream.then(move |item| async move { serialize_line(&item, compress).await });

    let content_type = if compress {
        "application/x-ndjson-br"
    } else {
        "application/x-ndjson"
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Stream response build error");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Serialize a single item to a chunk
async fn serialize_line<T: Serialize>(item: &T, compress: bool) -> Result<Bytes, std::io::Error> {
    let mut line = serde_json::to_vec(item).map_err(std::io::Error::other)?;

    if !compress {
        line.push(b'\n');
        return Ok(Bytes::from(line));
    }

    let payload = brotli_compress(&line).await?;
    let length = u32::try_from(payload.len()).map_err(std::io::Error::other)?;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_plain_lines_are_newline_delimited() {
        let items = futures::stream::iter(vec![json!({"n": 1}), json!({"n": 2})]);
        let response = ndjson_stream(items, false).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/x-ndjson");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{\"n\":1}\n{\"n\":2}\n");
    }

    #[tokio::test]
    async fn test_compressed_chunk_is_length_prefixed() {
        let chunk = serialize_line(&json!({"facility": "Bayview Bistro"}), true).await.unwrap();
        let declared = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        assert_eq!(declared, chunk.len() - 4);
    }
}
