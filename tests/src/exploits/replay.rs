//! # Replay Attacks
//!
//! An eavesdropper captures an honest, verified message and publishes it
//! again. Certificates bind the claim, the channel and the correlation id but
//! not the payload, so a captured certificate can carry any payload. Inside
//! the window the receiver's correlation cache stops both variants; once the
//! window has passed, the issue time carried by the v7 correlation id does.
//!
//! ## Attack Vectors
//!
//! | Attack | Expected rejection |
//! |--------|--------------------|
//! | Captured envelope re-sent unchanged | `ReplayDetected` |
//! | Captured certificate + id with a swapped payload | `ReplayDetected` |
//! | Swapped payload re-sent after the window | `Stale` |
//! | Captured envelope re-sent after the cache evicted it | `Stale` |
//! | Captured gateway message re-published on the topic | `ReplayDetected` |
//! | Captured gateway message re-published after the window | `Stale` |

#[cfg(test)]
mod tests {
    use crate::support::*;
    use im_02_secure_messenger::{MessengerConfig, MessengerError, SecureMessengerApi};
    use im_04_gateway::{gateway_topic, GatewayApi, GatewayError};
    use shared_bus::PubSubProvider;
    use shared_types::ErrorKind;
    use std::time::Duration;

    fn short_window() -> MessengerConfig {
        MessengerConfig {
            replay_window: Duration::from_millis(100),
            ..MessengerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_captured_envelope_replayed() {
        let net = Network::new();
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        let correlation_id = foo.send(b"pay 1", bar.identity()).await.unwrap();
        inbox.next_message().await;

        let captured = net.clients.published().remove(0);
        net.clients.inject(bar.identity(), captured.clone()).await;
        net.clients.inject(bar.identity(), captured).await;

        for _ in 0..2 {
            let error = inbox.next_error().await;
            assert_eq!(
                error,
                MessengerError::ReplayDetected {
                    claim: identity("foo@wallet.ns"),
                    correlation_id,
                }
            );
            assert_eq!(error.kind(), ErrorKind::CertificateInvalid);
        }
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_payload_swap_under_captured_certificate() {
        let net = Network::new();
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        foo.send(b"pay 1 to bar", bar.identity()).await.unwrap();
        assert_eq!(inbox.next_message().await.0, b"pay 1 to bar");

        let mut swapped = net.clients.published().remove(0);
        swapped.payload = b"pay 1000 to mallory".to_vec();
        net.clients.inject(bar.identity(), swapped).await;

        assert!(matches!(
            inbox.next_error().await,
            MessengerError::ReplayDetected { .. }
        ));
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_payload_swap_after_window_rejected() {
        let net = Network::new();
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger_with(net.register("bar@wallet.ns"), &short_window());
        let mut inbox = listen_messenger(&bar);

        foo.send(b"pay 1 to bar", bar.identity()).await.unwrap();
        assert_eq!(inbox.next_message().await.0, b"pay 1 to bar");

        tokio::time::sleep(Duration::from_millis(150)).await;

        let mut swapped = net.clients.published().remove(0);
        swapped.payload = b"pay 1000 to mallory".to_vec();
        net.clients.inject(bar.identity(), swapped).await;

        let error = inbox.next_error().await;
        assert!(
            matches!(error, MessengerError::Stale { .. }),
            "expected Stale, got {error:?}"
        );
        assert_eq!(error.kind(), ErrorKind::CertificateInvalid);
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_replay_after_capacity_eviction_rejected() {
        let net = Network::new();
        let config = MessengerConfig {
            replay_capacity: 1,
            ..MessengerConfig::default()
        };
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger_with(net.register("bar@wallet.ns"), &config);
        let mut inbox = listen_messenger(&bar);

        foo.send(b"first", bar.identity()).await.unwrap();
        inbox.next_message().await;
        // v7 ids are millisecond stamped; keep the two issue times apart.
        tokio::time::sleep(Duration::from_millis(5)).await;
        foo.send(b"second", bar.identity()).await.unwrap();
        inbox.next_message().await;

        let evicted = net.clients.published().remove(0);
        net.clients.inject(bar.identity(), evicted).await;

        assert!(matches!(
            inbox.next_error().await,
            MessengerError::Stale { .. }
        ));
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_replay_accepted_when_guard_disabled() {
        let net = Network::new();
        let config = MessengerConfig::without_replay_protection();
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger_with(net.register("bar@wallet.ns"), &config);
        let mut inbox = listen_messenger(&bar);

        foo.send(b"pay 1", bar.identity()).await.unwrap();
        inbox.next_message().await;

        let captured = net.clients.published().remove(0);
        net.clients.inject(bar.identity(), captured).await;

        assert_eq!(inbox.next_message().await.0, b"pay 1");
        assert!(inbox.no_error().await);
    }

    #[tokio::test]
    async fn test_replay_guard_survives_listener_replacement() {
        let net = Network::new();
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut first = listen_messenger(&bar);

        foo.send(b"pay 1", bar.identity()).await.unwrap();
        first.next_message().await;

        let mut second = listen_messenger(&bar);
        let captured = net.clients.published().remove(0);
        net.clients.inject(bar.identity(), captured).await;

        assert!(matches!(
            second.next_error().await,
            MessengerError::ReplayDetected { .. }
        ));
        assert!(second.no_message().await);
    }

    #[tokio::test]
    async fn test_gateway_message_replayed() {
        let net = Network::new();
        let repository = net.authenticated_gateways();
        let foo = repository
            .open_gateway("PAYMENTS", Some(net.register("foo@wallet.ns")))
            .unwrap();
        let bar = repository
            .open_gateway("PAYMENTS", Some(net.register("bar@wallet.ns")))
            .unwrap();
        let mut inbox = listen_gateway(&bar);

        let topic = gateway_topic("PAYMENTS", &identity("bar@wallet.ns"));
        let mut eavesdropper = net.provider.subscribe(&topic).unwrap();

        foo.send(&payment_request(), &identity("bar@wallet.ns"))
            .await
            .unwrap();
        inbox.next_message().await;

        let captured = tokio::time::timeout(WAIT, eavesdropper.recv())
            .await
            .unwrap()
            .unwrap();
        net.provider.publish(&topic, captured).await.unwrap();

        assert!(matches!(
            inbox.next_error().await,
            GatewayError::Authentication(MessengerError::ReplayDetected { .. })
        ));
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_gateway_message_replayed_after_window() {
        let net = Network::new();
        let repository = net.authenticated_gateways().with_config(short_window());
        let foo = repository
            .open_gateway("PAYMENTS", Some(net.register("foo@wallet.ns")))
            .unwrap();
        let bar = repository
            .open_gateway("PAYMENTS", Some(net.register("bar@wallet.ns")))
            .unwrap();
        let mut inbox = listen_gateway(&bar);

        let topic = gateway_topic("PAYMENTS", &identity("bar@wallet.ns"));
        let mut eavesdropper = net.provider.subscribe(&topic).unwrap();

        foo.send(&payment_request(), &identity("bar@wallet.ns"))
            .await
            .unwrap();
        inbox.next_message().await;
        let captured = tokio::time::timeout(WAIT, eavesdropper.recv())
            .await
            .unwrap()
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        net.provider.publish(&topic, captured).await.unwrap();

        assert!(matches!(
            inbox.next_error().await,
            GatewayError::Authentication(MessengerError::Stale { .. })
        ));
        assert!(inbox.no_message().await);
    }
}
