//! Print every request received on port 42069 without responding.
use std::io;
use tokio::net::TcpListener;

use httpfromtcp::{request::Request, server::DEFAULT_PORT};

#[tokio::main]
async fn main() -> io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", DEFAULT_PORT)).await?;
    println!("Listening for TCP traffic on {}", listener.local_addr()?);

    loop {
        let (io, addr) = listener.accept().await?;
        println!("Accepted connection from {addr}");

        let req = match Request::from_reader(io).await {
            Ok(ok) => ok,
            Err(err) => {
                eprintln!("error parsing request: {err}");
                continue;
            }
        };

        println!("Request line:");
        println!("- Method: {}", req.method());
        println!("- Target: {}", req.target());
        println!("- Version: {}", req.version());
        println!("Headers:");
        for (name, value) in req.headers() {
            println!("- {name}: {value}");
        }
        println!("Body:");
        println!("{}", String::from_utf8_lossy(req.body()));
    }
}
