use crate::headers::{HeaderError, Headers};

const fn is_send_sync<T: Send + Sync>() { }
const _: () = {
    is_send_sync::<Headers>();
};

/// Feed `input` to a fresh container line by line until the end of the header section.
fn parse_all(input: &[u8]) -> Result<(Headers, usize), HeaderError> {
    let mut headers = Headers::new();
    let mut read = 0;
    loop {
        let (n, done) = headers.parse(&input[read..])?;
        read += n;
        if done {
            return Ok((headers, read));
        }
        assert_ne!(n, 0, "unexpected pending on complete input");
    }
}

#[test]
fn parse_single() {
    let mut headers = Headers::new();
    let data = b"Host: localhost:42069\r\n\r\n";

    let (n, done) = headers.parse(data).unwrap();
    assert_eq!(n, 23);
    assert!(!done);
    assert_eq!(headers.get("host"), Some("localhost:42069"));

    let (n, done) = headers.parse(&data[n..]).unwrap();
    assert_eq!(n, 2);
    assert!(done);
    assert_eq!(headers.len(), 1);
}

#[test]
fn parse_pending() {
    let mut headers = Headers::new();
    assert_eq!(headers.parse(b"Host: local").unwrap(), (0, false));
    assert_eq!(headers.parse(b"Host: localhost\r").unwrap(), (0, false));
    assert_eq!(headers.parse(b"").unwrap(), (0, false));
    assert!(headers.is_empty());
}

#[test]
fn parse_surrounding_whitespace() {
    let mut headers = Headers::new();
    let (n, done) = headers.parse(b"       Host:    localhost:42069      \r\n\r\n").unwrap();
    assert_eq!(n, 39);
    assert!(!done);
    assert_eq!(headers.get("Host"), Some("localhost:42069"));
}

#[test]
fn parse_multiple() {
    let (headers, read) = parse_all(
        b"Host: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\nbody",
    )
    .unwrap();

    assert_eq!(read, 63);
    assert_eq!(headers.len(), 3);
    assert_eq!(headers.get("host"), Some("localhost:42069"));
    assert_eq!(headers.get("user-agent"), Some("curl/7.81.0"));
    assert_eq!(headers.get("accept"), Some("*/*"));

    let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["host", "user-agent", "accept"]);
}

#[test]
fn parse_duplicate_merge() {
    let (headers, _) = parse_all(b"A: 1\r\nA: 2\r\n\r\n").unwrap();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get("a"), Some("1, 2"));

    let (headers, _) = parse_all(
        b"Set-Person: lane-loves-go\r\nSet-Person: prime-loves-zig\r\nset-person: tj-loves-ocaml\r\n\r\n",
    )
    .unwrap();
    assert_eq!(
        headers.get("set-person"),
        Some("lane-loves-go, prime-loves-zig, tj-loves-ocaml")
    );
}

#[test]
fn parse_errors() {
    macro_rules! test {
        ($input:literal, $err:ident) => {
            let mut headers = Headers::new();
            assert_eq!(headers.parse($input), Err(HeaderError::$err), "{:?}", $input);
            assert!(headers.is_empty(), "mutated on error: {:?}", $input);
        };
    }

    test!(b"       Host : localhost:42069       \r\n\r\n", InvalidName);
    test!(b"H\xc2\xa9st: localhost:42069\r\n\r\n", InvalidName);
    test!(b"Ho st: localhost\r\n\r\n", InvalidName);
    test!(b"Host(a): localhost\r\n\r\n", InvalidName);
    test!(b": localhost\r\n\r\n", InvalidName);
    test!(b"Host localhost\r\n\r\n", MissingColon);
    test!(b"Host: local\rhost\r\n\r\n", InvalidValue);
    test!(b"Host: local\0host\r\n\r\n", InvalidValue);
}

#[test]
fn parse_obs_text() {
    let mut headers = Headers::new();

    let (n, done) = headers.parse(b"X-Name: caf\xe9 au lait\r\n\r\n").unwrap();
    assert_eq!(n, 22);
    assert!(!done);
    assert_eq!(headers.get("x-name"), Some("caf\u{fffd} au lait"));

    // valid UTF-8 is stored as is
    headers.parse("X-Name: caf\u{e9}\r\n".as_bytes()).unwrap();
    assert_eq!(headers.get("x-name"), Some("caf\u{fffd} au lait, caf\u{e9}"));
}

#[test]
fn fragmentation_independent() {
    const INPUT: &[u8] =
        b"Host: example.com\r\nX-Token: a\r\nAccept: text/html\r\nx-token: b\r\nContent-Length: 0\r\n\r\n";

    let (expected, _) = parse_all(INPUT).unwrap();

    for chunk_size in 1..=INPUT.len() {
        let mut headers = Headers::new();
        let mut buffer = Vec::new();
        let mut done = false;

        for chunk in INPUT.chunks(chunk_size) {
            buffer.extend_from_slice(chunk);
            loop {
                let (n, end) = headers.parse(&buffer).unwrap();
                buffer.drain(..n);
                if end {
                    done = true;
                    break;
                }
                if n == 0 {
                    break;
                }
            }
            if done {
                break;
            }
        }

        assert!(done, "chunk size {chunk_size}");
        assert_eq!(headers, expected, "chunk size {chunk_size}");
    }
}

#[test]
fn header_map() {
    let mut map = Headers::new();

    assert!(map.insert("Content-Type", "text/plain").is_none());
    assert!(map.contains_key("content-type"));
    assert_eq!(
        map.insert("content-type", "text/html").as_deref(),
        Some("text/plain")
    );
    assert_eq!(map.get("CONTENT-TYPE"), Some("text/html"));

    map.append("Accept", "text/html");
    map.append("accept", "*/*");
    assert_eq!(map.get("accept"), Some("text/html, */*"));
    assert_eq!(map.len(), 2);

    assert_eq!(map.remove("ACCEPT").as_deref(), Some("text/html, */*"));
    assert!(!map.contains_key("accept"));
    assert_eq!(map.remove("accept"), None);

    assert_eq!(map.try_insert("bad name", "x"), Err(HeaderError::InvalidName));
    assert_eq!(map.try_insert("x-ok", "a\r\nb: c"), Err(HeaderError::InvalidValue));
    assert_eq!(map.try_append("", "x"), Err(HeaderError::InvalidName));

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.get("content-type"), None);
}

#[test]
#[should_panic]
fn insert_invalid_name_panics() {
    Headers::new().insert("x y", "z");
}
