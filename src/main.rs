//! Demo binary transferring one message over an in-memory loopback link.
//!
//! Registers an extension instance on each side of a
//! [`LoopbackNetwork`], negotiates both directions, sends a message of the
//! requested size from side A to side B, and reports how it went.

mod cli;

use std::error::Error;

use clap::Parser;
use toxext_messages::{
    Extension,
    ExtensionCallbacks,
    ExtensionConfig,
    PeerId,
    ReceiptId,
    loopback::{LoopbackNetwork, PEER_A, PEER_B},
};
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Summary {
    delivered: Option<Vec<u8>>,
    receipt: Option<ReceiptId>,
}

impl ExtensionCallbacks for Summary {
    fn on_message(&mut self, peer: PeerId, message: &[u8]) {
        info!(peer = %peer, len = message.len(), "message delivered");
        self.delivered = Some(message.to_vec());
    }

    fn on_receipt(&mut self, peer: PeerId, receipt: ReceiptId) {
        info!(peer = %peer, receipt = %receipt, "receipt acknowledged");
        self.receipt = Some(receipt);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let mut network = LoopbackNetwork::new(cli.segment_size);
    let config = ExtensionConfig::default().with_max_receiving_size(cli.max_receive);

    let mut sender = Extension::register(network.host_a(), config, Summary::default())?;
    let mut receiver = Extension::register(network.host_b(), config, Summary::default())?;
    sender.negotiate(network.host_a(), PEER_B);
    receiver.negotiate(network.host_b(), PEER_A);
    network.run_until_idle(&mut sender, &mut receiver);

    let payload: Vec<u8> = (0..=250_u8).cycle().take(cli.size).collect();
    let receipt = sender.send(network.host_a().packets(), PEER_B, &payload)?;
    let segments = network.host_a().packets().len();
    network.run_until_idle(&mut sender, &mut receiver);

    let intact = receiver.callbacks().delivered.as_deref() == Some(payload.as_slice());
    let acknowledged = sender.callbacks().receipt == Some(receipt);
    info!(
        size = cli.size,
        segment_size = cli.segment_size,
        segments,
        receipt = %receipt,
        intact,
        acknowledged,
        "transfer complete"
    );
    if !intact || !acknowledged {
        warn!("message was not delivered intact");
        return Err("transfer failed".into());
    }
    Ok(())
}
