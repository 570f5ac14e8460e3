//! ## TCP transport between the dispatcher and car services
//!
//! Frames are sent as `(payload length) as u16` in big-endian, followed by the
//! payload. A connection carries any number of request/reply pairs; the
//! dispatcher opens one connection per request.

use std::io::ErrorKind;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::elevator_logic::Envelope;
use crate::error::{FleetError, FleetResult};
use crate::print;
use crate::world_view::CarStatus;

use super::message::{self, Request};

/// Writes `payload` as one frame and flushes.
pub async fn write_frame<W>(stream: &mut W, payload: &[u8]) -> FleetResult<()>
where
    W: AsyncWrite + Unpin,
{
    let len = u16::try_from(payload.len())
        .map_err(|_| FleetError::Transport(format!("frame of {} bytes does not fit a u16 length", payload.len())))?;

    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(payload).await?;
    stream.flush().await?;
    Ok(())
}

/// Reads one frame.
///
/// Returns `Ok(None)` if the peer closed the connection cleanly between frames.
/// A close after the first length byte is a [FleetError::Transport] error.
pub async fn read_frame<R>(stream: &mut R) -> FleetResult<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 2];
    match stream.read_exact(&mut len_buf[..1]).await {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    match stream.read_exact(&mut len_buf[1..]).await {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(FleetError::Transport("connection closed inside a frame header".into()));
        }
        Err(e) => return Err(e.into()),
    }

    let len = u16::from_be_bytes(len_buf) as usize;
    let mut buffer = vec![0u8; len];
    stream.read_exact(&mut buffer).await?;
    Ok(Some(buffer))
}

/// Binds the listener a car service accepts dispatcher connections on.
pub async fn bind_car_listener(addr: SocketAddr) -> FleetResult<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    print::ok(format!("Listening on {}", addr));
    Ok(listener)
}

/// Accepts connections forever, serving each on its own task.
///
/// ## Parameters
/// - `id`: the car behind this listener, only used in log lines
/// - `listener`: bound listener
/// - `mailbox`: the car actor every request is forwarded to
pub async fn listener_task(id: u8, listener: TcpListener, mailbox: mpsc::Sender<Envelope>) {
    loop {
        match listener.accept().await {
            Ok((socket, addr)) => {
                let mailbox = mailbox.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve_connection(id, socket, mailbox).await {
                        print::err(format!("elevator {}: connection from {} failed: {}", id, addr, e));
                    }
                });
            }
            Err(e) => {
                print::err(format!("elevator {}: error while accepting connection: {}", id, e));
            }
        }
    }
}

/// Answers every request frame on `stream` until the peer hangs up.
pub async fn serve_connection<S>(id: u8, mut stream: S, mailbox: mpsc::Sender<Envelope>) -> FleetResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(frame) = read_frame(&mut stream).await? {
        let request = message::deserialize_request(&frame)?;

        let (reply_tx, mut reply_rx) = mpsc::channel(1);
        mailbox
            .send(Envelope { request, reply_to: reply_tx })
            .await
            .map_err(|_| FleetError::Transport(format!("elevator {} is not running", id)))?;
        let status = reply_rx
            .recv()
            .await
            .ok_or_else(|| FleetError::Transport(format!("elevator {} dropped {:?}", id, request)))?;

        write_frame(&mut stream, &message::serialize_status(&status)?).await?;
    }
    Ok(())
}

/// Sends `request` on `stream` and waits for the status reply.
pub async fn exchange<S>(stream: &mut S, request: &Request) -> FleetResult<CarStatus>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    write_frame(stream, &message::serialize_request(request)?).await?;
    match read_frame(stream).await? {
        Some(frame) => message::deserialize_status(&frame),
        None => Err(FleetError::Transport("connection closed before the reply arrived".to_string())),
    }
}

/// One request/reply round trip to the car service at `addr` on a fresh connection.
pub async fn request(addr: SocketAddr, request: &Request) -> FleetResult<CarStatus> {
    let mut stream = TcpStream::connect(addr).await?;
    exchange(&mut stream, request).await
}
