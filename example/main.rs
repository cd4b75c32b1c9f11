use std::{env, io, path::PathBuf};
use tokio::io::AsyncWrite;

use httpfromtcp::{
    Config, Handler, HandlerError, Server,
    headers::Headers,
    request::Request,
    response::{ResponseWriter, StatusCode, default_headers},
};

const BAD_REQUEST_HTML: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>
";

const INTERNAL_ERROR_HTML: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>
";

const SUCCESS_HTML: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>
";

const DEFAULT_VIDEO: &str = "assets/vim.mp4";

struct App {
    video: PathBuf,
}

impl Handler for App {
    async fn call<W>(&self, res: &mut ResponseWriter<W>, req: &Request) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        log::info!("> {} {} HTTP/{}", req.method(), req.target(), req.version());

        let target = req.target();

        if let Some(count) = target.strip_prefix("/chunked/") {
            let Ok(count) = count.parse::<usize>() else {
                return Err(HandlerError::new(StatusCode::BAD_REQUEST, "chunk count is not a number"));
            };
            return chunked(res, count).await;
        }

        match target {
            "/yourproblem" => html(res, StatusCode::BAD_REQUEST, BAD_REQUEST_HTML).await,
            "/myproblem" => html(res, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_HTML).await,
            "/video" => {
                let video = tokio::fs::read(&self.video).await.map_err(|err| {
                    HandlerError::new(StatusCode::NOT_FOUND, format!("{}: {err}", self.video.display()))
                })?;
                res.respond(StatusCode::OK, "video/mp4", &video).await?;
                Ok(())
            }
            _ => html(res, StatusCode::OK, SUCCESS_HTML).await,
        }
    }
}

async fn html<W>(res: &mut ResponseWriter<W>, status: StatusCode, body: &str) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    res.respond(status, "text/html", body.as_bytes()).await?;
    Ok(())
}

async fn chunked<W>(res: &mut ResponseWriter<W>, count: usize) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(0, "text/plain", true);
    headers.insert("trailer", "X-Content-Length");

    res.write_status_line(StatusCode::OK).await?;
    res.write_headers(&headers).await?;
    res.write_blank_line().await?;

    let mut written = 0;
    for i in 0..count {
        let chunk = format!("chunk {i}\n");
        res.write_chunked_chunk(chunk.as_bytes()).await?;
        written += chunk.len();
    }
    res.write_chunked_done().await?;

    let mut trailers = Headers::with_capacity(1);
    trailers.insert("X-Content-Length", written.to_string());
    res.write_trailers(&trailers).await?;
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();

    let port = match env::var("PORT") {
        Ok(port) => port
            .parse()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, format!("PORT: {err}")))?,
        Err(_) => httpfromtcp::server::DEFAULT_PORT,
    };
    let video = env::var_os("VIDEO_PATH").map_or_else(|| PathBuf::from(DEFAULT_VIDEO), PathBuf::from);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let server = Server::bind(Config::new(port), App { video }).await?;
            log::info!("server started on {}", server.local_addr());

            tokio::signal::ctrl_c().await?;

            server.close();
            server.join().await;
            log::info!("server gracefully stopped");
            Ok(())
        })
}
