//! # Loopback Self-Check
//!
//! Sends one payment request between two provisioned identities, first
//! through the payment protocol messenger, then through an authenticated
//! `PAYMENTS` gateway, and waits for each to arrive with the right sender.

use crate::container::MessagingNode;
use anyhow::{bail, Context, Result};
use im_01_certificate_authority::IdentityClaim;
use im_03_protocol_messenger::{ProtocolError, ProtocolMessengerApi, PAYMENTS_PROTOCOL, PAYMENT_REQUEST};
use im_04_gateway::{GatewayApi, GatewayError};
use serde_json::json;
use shared_types::{Identity, ProtocolMessage};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{error, info};
use uuid::Uuid;

/// How long each leg waits for delivery.
pub const SELF_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// The payment request used by the self-check.
#[must_use]
pub fn sample_payment_request() -> ProtocolMessage {
    ProtocolMessage::new(
        PAYMENT_REQUEST,
        json!({
            "amount": "1",
            "assetId": Uuid::new_v4().to_string(),
            "toAddress": "self-check",
        }),
    )
}

enum Outcome {
    Delivered(ProtocolMessage, Option<Identity>),
    Rejected(String),
}

/// Run both legs from `sender` to `receiver`.
///
/// # Errors
///
/// Fails if either leg times out, reports an error, or delivers a message
/// that differs from the one sent or comes from the wrong sender.
pub async fn run_self_check(node: &MessagingNode, sender: IdentityClaim, receiver: IdentityClaim) -> Result<()> {
    let expected_sender = sender.identity().clone();
    let recipient = receiver.identity().clone();

    // Leg 1: protocol messenger over per-recipient channels.
    let inbox = node.payments_messenger(receiver.clone());
    let outbox = node.payments_messenger(sender.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let err_tx = tx.clone();
    inbox
        .listen(
            Box::new(move |message: ProtocolMessage, from: Identity| {
                let _ = tx.send(Outcome::Delivered(message, Some(from)));
            }),
            Box::new(move |e: ProtocolError| {
                let _ = err_tx.send(Outcome::Rejected(e.to_string()));
            }),
        )
        .context("Protocol messenger failed to listen")?;

    let message = sample_payment_request();
    outbox
        .send(&message, &recipient)
        .await
        .context("Protocol messenger failed to send")?;
    expect_delivery("protocol messenger", &mut rx, &message, &expected_sender).await?;

    // Leg 2: authenticated gateway over shared topics.
    let gateways = node.authenticated_gateways();
    let inbox = gateways
        .open_gateway(PAYMENTS_PROTOCOL, Some(receiver))
        .context("Failed to open receiving gateway")?;
    let outbox = gateways
        .open_gateway(PAYMENTS_PROTOCOL, Some(sender))
        .context("Failed to open sending gateway")?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let err_tx = tx.clone();
    inbox
        .listen(
            Box::new(move |message: ProtocolMessage, from: Option<Identity>| {
                let _ = tx.send(Outcome::Delivered(message, from));
            }),
            Box::new(move |e: GatewayError| {
                let _ = err_tx.send(Outcome::Rejected(e.to_string()));
            }),
        )
        .context("Gateway failed to listen")?;

    let message = sample_payment_request();
    outbox
        .send(&message, &recipient)
        .await
        .context("Gateway failed to send")?;
    expect_delivery("authenticated gateway", &mut rx, &message, &expected_sender).await?;

    Ok(())
}

async fn expect_delivery(
    leg: &str,
    rx: &mut mpsc::UnboundedReceiver<Outcome>,
    sent: &ProtocolMessage,
    expected_sender: &Identity,
) -> Result<()> {
    let outcome = timeout(SELF_CHECK_TIMEOUT, rx.recv())
        .await
        .with_context(|| format!("{leg}: no delivery within {SELF_CHECK_TIMEOUT:?}"))?;

    match outcome {
        Some(Outcome::Delivered(message, from)) => {
            if &message != sent {
                bail!("{leg}: delivered message differs from the one sent");
            }
            if from.as_ref() != Some(expected_sender) {
                bail!("{leg}: delivered from {from:?}, expected {expected_sender}");
            }
            info!(leg = leg, sender = %expected_sender, "Self-check leg passed");
            Ok(())
        }
        Some(Outcome::Rejected(reason)) => {
            error!(leg = leg, reason = %reason, "Self-check leg rejected");
            bail!("{leg}: message rejected: {reason}")
        }
        None => bail!("{leg}: listener stopped"),
    }
}
