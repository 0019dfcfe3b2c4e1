//! TCP connection and greeting handshake

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::ops::Deref;

use dict_protocol::{ReplyCode, StatusLine};
use tracing::{debug, info, warn};

use crate::client::DictClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::line::LineReader;

/// Port assigned to DICT by IANA
pub const DEFAULT_PORT: u16 = 2628;

/// Client over a plain TCP stream.
///
/// Dereferences to [`DictClient`] for the lookup operations.
pub struct TcpDictClient {
    inner: DictClient<BufReader<TcpStream>, TcpStream>,
    stream: TcpStream,
}

impl TcpDictClient {
    /// Shut the socket down without waiting for the exchange lock.
    ///
    /// An exchange blocked on another thread fails with a transport error
    /// and the connection is dropped.
    pub fn shutdown(&self) -> ClientResult<()> {
        self.stream.shutdown(Shutdown::Both)?;
        info!("Connection shut down");
        Ok(())
    }
}

impl Deref for TcpDictClient {
    type Target = DictClient<BufReader<TcpStream>, TcpStream>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Connect to `host:port` and run the greeting handshake
pub fn connect(host: &str, port: u16) -> ClientResult<TcpDictClient> {
    connect_with(&ClientConfig::new(host, port))
}

/// Connect using `config` and run the greeting handshake
pub fn connect_with(config: &ClientConfig) -> ClientResult<TcpDictClient> {
    let stream = open_stream(config)?;
    stream.set_nodelay(true)?;

    let reader = BufReader::new(stream.try_clone()?);
    let control = stream.try_clone()?;
    let inner = handshake(reader, stream)?;
    info!(addr = %config.address(), "Connected to DICT server");

    Ok(TcpDictClient {
        inner,
        stream: control,
    })
}

fn open_stream(config: &ClientConfig) -> ClientResult<TcpStream> {
    let Some(timeout) = config.connect_timeout() else {
        return Ok(TcpStream::connect((config.host.as_str(), config.port))?);
    };

    let addrs: Vec<SocketAddr> = (config.host.as_str(), config.port).to_socket_addrs()?.collect();
    let mut last_error = None;

    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!(%addr, error = %e, "Connect attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses")
        })
        .into())
}

/// Read the server banner and hand the stream over to a [`DictClient`].
///
/// Codes 420, 421 and any class 5 code are refusals, as is anything other
/// than `220` or a banner that never arrives.
pub fn handshake<R: BufRead, W: Write>(reader: R, writer: W) -> ClientResult<DictClient<R, W>> {
    let mut reader = LineReader::new(reader);

    let line = reader
        .read_line()?
        .ok_or_else(|| ClientError::ConnectionRefused("connection closed before greeting".into()))?;

    let greeting = StatusLine::parse(&line)
        .map_err(|_| ClientError::ConnectionRefused(format!("malformed greeting {line:?}")))?;

    let refused = matches!(
        greeting.reply_code(),
        Some(ReplyCode::ServerTemporarilyUnavailable | ReplyCode::ShuttingDown)
    ) || greeting.class() == 5;

    if refused || greeting.reply_code() != Some(ReplyCode::ConnectionEstablished) {
        warn!(code = greeting.code(), text = greeting.text(), "Server refused connection");
        return Err(ClientError::ConnectionRefused(greeting.to_string()));
    }

    debug!(banner = greeting.text(), "Greeting accepted");
    Ok(DictClient::with_greeting(reader, writer, greeting))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dict_core::Database;
    use std::io::{Cursor, Read};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn greet(banner: &str) -> ClientResult<DictClient<Cursor<Vec<u8>>, Vec<u8>>> {
        handshake(Cursor::new(banner.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_greeting_accepted() {
        let client = greet("220 dict.example.org dictd 1.13 <auth.mime> <42@dict>\r\n").unwrap();
        let banner = client.greeting().unwrap();
        assert_eq!(banner.code(), 220);
        assert!(banner.text().starts_with("dict.example.org"));
    }

    #[test]
    fn test_greeting_refused() {
        for banner in [
            "420 Server temporarily unavailable\r\n",
            "421 Server shutting down at operator request\r\n",
            "530 Access denied\r\n",
            "599 something else\r\n",
            "250 ok\r\n",
            "not a status\r\n",
            "",
        ] {
            assert!(
                matches!(greet(banner), Err(ClientError::ConnectionRefused(_))),
                "accepted {banner:?}"
            );
        }
    }

    /// Serve one scripted session: banner, then one reply per command line
    fn serve(listener: TcpListener, replies: Vec<&'static str>) -> thread::JoinHandle<Vec<String>> {
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);

            writer.write_all(b"220 test server <mime> <1@test>\r\n").unwrap();

            let mut received = Vec::new();
            for reply in replies {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    break;
                }
                received.push(line.trim_end().to_string());
                writer.write_all(reply.as_bytes()).unwrap();
            }

            // Wait for the client to hang up
            let mut rest = Vec::new();
            let _ = reader.read_to_end(&mut rest);
            received
        })
    }

    #[test]
    fn test_tcp_session() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = serve(
            listener,
            vec![
                "150 1 definitions retrieved\r\n\
                 151 \"rust\" wn \"WordNet\"\r\n\
                 rust\r\n\
                 \x20   n 1: a reddish-brown oxide\r\n\
                 .\r\n\
                 250 ok\r\n",
                "221 bye\r\n",
            ],
        );

        let client = connect("127.0.0.1", port).unwrap();
        assert_eq!(client.greeting().map(StatusLine::code), Some(220));

        let defs = client.define("rust", &Database::new("wn", "").unwrap()).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].body(), "rust\n    n 1: a reddish-brown oxide");

        client.close();
        assert!(!client.is_open());

        let received = server.join().unwrap();
        assert_eq!(received, vec!["DEFINE wn \"rust\"", "QUIT"]);
    }

    #[test]
    fn test_connect_with_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = serve(listener, vec!["221 bye\r\n"]);

        let config = ClientConfig {
            connect_timeout_ms: Some(2000),
            ..ClientConfig::new("127.0.0.1", port)
        };
        let client = connect_with(&config).unwrap();
        client.close();

        assert_eq!(server.join().unwrap(), vec!["QUIT"]);
    }

    #[test]
    fn test_shutdown_unblocks_pending_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        // Never answers, so the lookup blocks until the socket goes away
        let server = serve(listener, vec![]);

        let client = Arc::new(connect("127.0.0.1", port).unwrap());
        let lookup = {
            let client = Arc::clone(&client);
            thread::spawn(move || client.define("rust", &Database::all()))
        };

        thread::sleep(Duration::from_millis(100));
        client.shutdown().unwrap();

        assert!(lookup.join().unwrap().is_err());
        assert!(!client.is_open());
        server.join().unwrap();
    }

    #[test]
    fn test_connect_refused_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(matches!(
            connect("127.0.0.1", port),
            Err(ClientError::Transport(_))
        ));
    }
}
