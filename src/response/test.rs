use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::AsyncWrite;

use crate::headers::Headers;
use crate::response::{ResponseWriter, StatusCode, WriteError, WriterState, default_headers};

/// Decode a chunked body, returning the data and the bytes after the last chunk.
fn decode_chunked(mut bytes: &[u8]) -> (Vec<u8>, &[u8]) {
    let mut data = Vec::new();
    loop {
        let end = bytes.windows(2).position(|w| w == b"\r\n").expect("chunk size line");
        let size = std::str::from_utf8(&bytes[..end]).unwrap();
        let size = usize::from_str_radix(size, 16).unwrap();
        bytes = &bytes[end + 2..];

        if size == 0 {
            return (data, bytes);
        }

        data.extend_from_slice(&bytes[..size]);
        assert_eq!(&bytes[size..size + 2], b"\r\n", "chunk trail");
        bytes = &bytes[size + 2..];
    }
}

fn state_error(result: Result<(), WriteError>) -> WriterState {
    match result {
        Err(WriteError::State { state, .. }) => state,
        other => panic!("expected state violation, got {other:?}"),
    }
}

fn framing_error(result: Result<(), WriteError>) {
    match result {
        Err(WriteError::Framing { .. }) => { }
        other => panic!("expected framing violation, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_response() {
    let mut res = ResponseWriter::new(Vec::new());
    let body = b"<h1>Success!</h1>";

    res.write_status_line(StatusCode::OK).await.unwrap();
    assert_eq!(res.state(), WriterState::Headers);

    res.write_headers(&default_headers(body.len(), "text/html", false)).await.unwrap();
    assert_eq!(res.state(), WriterState::Body);

    res.write_blank_line().await.unwrap();
    res.write_body(body).await.unwrap();
    res.write_body(b"").await.unwrap();
    res.finish().await.unwrap();
    assert_eq!(res.state(), WriterState::Done);

    assert_eq!(
        res.into_inner(),
        b"HTTP/1.1 200 OK\r\n\
        content-length: 17\r\n\
        connection: close\r\n\
        content-type: text/html\r\n\
        \r\n\
        <h1>Success!</h1>\r\n"
    );
}

#[tokio::test]
async fn respond_helper() {
    let mut res = ResponseWriter::new(Vec::new());
    res.respond(StatusCode::BAD_REQUEST, "text/plain", b"nope").await.unwrap();
    assert_eq!(res.state(), WriterState::Body);
    assert_eq!(
        res.into_inner(),
        b"HTTP/1.1 400 Bad Request\r\n\
        content-length: 4\r\n\
        connection: close\r\n\
        content-type: text/plain\r\n\
        \r\n\
        nope"
    );
}

#[tokio::test]
async fn ordering_violations() {
    let mut res = ResponseWriter::new(Vec::new());
    let headers = Headers::new();

    assert_eq!(state_error(res.write_headers(&headers).await), WriterState::StatusLine);
    assert_eq!(state_error(res.write_body(b"x").await), WriterState::StatusLine);
    assert_eq!(state_error(res.write_chunked_chunk(b"x").await), WriterState::StatusLine);
    assert_eq!(state_error(res.write_blank_line().await), WriterState::StatusLine);
    assert_eq!(state_error(res.finish().await), WriterState::StatusLine);
    assert!(res.get_ref().is_empty(), "nothing is written on violation");

    res.write_status_line(StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(state_error(res.write_status_line(StatusCode::OK).await), WriterState::Headers);
    assert_eq!(state_error(res.write_body(b"x").await), WriterState::Headers);
    assert_eq!(state_error(res.write_chunked_done().await), WriterState::Headers);
    assert_eq!(state_error(res.write_trailers(&headers).await), WriterState::Headers);
    assert_eq!(res.get_ref().as_slice(), b"HTTP/1.1 404 Not Found\r\n");

    res.write_headers(&headers).await.unwrap();
    assert_eq!(state_error(res.write_headers(&headers).await), WriterState::Body);
    res.write_blank_line().await.unwrap();
    res.finish().await.unwrap();

    assert_eq!(state_error(res.write_body(b"x").await), WriterState::Done);
    assert_eq!(state_error(res.write_blank_line().await), WriterState::Done);
    assert_eq!(state_error(res.finish().await), WriterState::Done);
    assert_eq!(res.get_ref().as_slice(), b"HTTP/1.1 404 Not Found\r\n\r\n\r\n");
}

#[tokio::test]
async fn chunked_response() {
    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();

    let mut headers = default_headers(0, "text/plain", true);
    headers.insert("trailer", "X-Content-Length");
    res.write_headers(&headers).await.unwrap();
    res.write_blank_line().await.unwrap();

    res.write_chunked_chunk(b"abc").await.unwrap();
    res.write_chunked_chunk(b"").await.unwrap();
    res.write_chunked_chunk(&[b'x'; 26]).await.unwrap();
    res.write_chunked_done().await.unwrap();

    let mut trailers = Headers::new();
    trailers.insert("X-Content-Length", "29");
    res.write_trailers(&trailers).await.unwrap();
    res.write_blank_line().await.unwrap();

    let out = res.into_inner();
    let head_end = out.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
    assert_eq!(
        &out[..head_end],
        b"HTTP/1.1 200 OK\r\n\
        transfer-encoding: chunked\r\n\
        connection: close\r\n\
        content-type: text/plain\r\n\
        trailer: X-Content-Length\r\n\
        \r\n"
    );
    assert_eq!(&out[head_end..head_end + 8], b"3\r\nabc\r\n");
    assert_eq!(&out[head_end + 8..head_end + 12], b"1a\r\n");

    let (data, rest) = decode_chunked(&out[head_end..]);
    let mut expected = b"abc".to_vec();
    expected.extend_from_slice(&[b'x'; 26]);
    assert_eq!(data, expected);
    assert_eq!(rest, b"x-content-length: 29\r\n\r\n");
}

#[tokio::test]
async fn chunked_round_trip() {
    let chunks: [&[u8]; 5] = [b"", b"a", b"abc", b"hello\r\nworld", &[0u8; 300]];
    for chunk in chunks {
        let mut res = ResponseWriter::new(Vec::new());
        res.write_status_line(StatusCode::OK).await.unwrap();
        res.write_headers(&Headers::new()).await.unwrap();

        res.write_chunked_chunk(chunk).await.unwrap();
        res.write_chunked_done().await.unwrap();

        let out = res.into_inner();
        let body = &out[b"HTTP/1.1 200 OK\r\n".len()..];

        if chunk.is_empty() {
            assert_eq!(body, b"0\r\n");
        }

        let (data, rest) = decode_chunked(body);
        assert_eq!(data, chunk);
        assert_eq!(rest, b"");
    }
}

#[tokio::test]
async fn framing_violations() {
    async fn at_body() -> ResponseWriter<Vec<u8>> {
        let mut res = ResponseWriter::new(Vec::new());
        res.write_status_line(StatusCode::OK).await.unwrap();
        res.write_headers(&Headers::new()).await.unwrap();
        res
    }

    let trailers = Headers::new();

    let mut res = at_body().await;
    res.write_body(b"plain").await.unwrap();
    framing_error(res.write_blank_line().await);
    framing_error(res.write_chunked_chunk(b"x").await);
    framing_error(res.write_chunked_done().await);
    framing_error(res.write_trailers(&trailers).await);

    let mut res = at_body().await;
    res.write_chunked_chunk(b"x").await.unwrap();
    framing_error(res.write_body(b"plain").await);
    framing_error(res.write_trailers(&trailers).await);
    framing_error(res.write_blank_line().await);

    res.write_chunked_done().await.unwrap();
    framing_error(res.write_chunked_chunk(b"x").await);
    framing_error(res.write_chunked_done().await);
    framing_error(res.write_body(b"plain").await);
    res.write_trailers(&trailers).await.unwrap();
    res.write_blank_line().await.unwrap();
    res.finish().await.unwrap();

    assert_eq!(
        res.into_inner(),
        b"HTTP/1.1 200 OK\r\n1\r\nx\r\n0\r\n\r\n\r\n"
    );
}

#[test]
fn default_headers_framing() {
    let headers = default_headers(42, "text/html", false);
    assert_eq!(headers.get("Content-Length"), Some("42"));
    assert_eq!(headers.get("Transfer-Encoding"), None);
    assert_eq!(headers.get("Connection"), Some("close"));
    assert_eq!(headers.get("Content-Type"), Some("text/html"));

    let headers = default_headers(42, "video/mp4", true);
    assert_eq!(headers.get("content-length"), None);
    assert_eq!(headers.get("transfer-encoding"), Some("chunked"));
    assert_eq!(headers.get("content-type"), Some("video/mp4"));
    assert_eq!(headers.len(), 3);
}

/// Sink that fails every write.
struct BrokenPipe;

impl AsyncWrite for BrokenPipe {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn transport_fault() {
    let mut res = ResponseWriter::new(BrokenPipe);
    match res.write_status_line(StatusCode::OK).await {
        Err(err @ WriteError::Io(_)) => assert!(!err.is_state_violation()),
        other => panic!("expected io error, got {other:?}"),
    }
    assert_eq!(res.state(), WriterState::StatusLine);
}
