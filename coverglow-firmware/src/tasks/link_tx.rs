//! Host link UART transmit task
//!
//! Sends queued replies (pongs and acknowledgements) to the host.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use coverglow_protocol::BoardReply;

use crate::channels::REPLIES;

/// Link TX task - drains the reply queue onto the UART
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let reply = REPLIES.receive().await;
        send_reply(&mut tx, reply).await;
    }
}

async fn send_reply(tx: &mut BufferedUartTx, reply: BoardReply) {
    let mut buf = [0u8; 8];
    match reply.to_frame().encode(&mut buf) {
        Ok(len) => {
            if let Err(e) = tx.write_all(&buf[..len]).await {
                warn!("Failed to send {:?}: {:?}", reply, e);
            } else {
                trace!("Sent {:?}", reply);
            }
        }
        Err(e) => warn!("Failed to encode {:?}: {:?}", reply, e),
    }
}
