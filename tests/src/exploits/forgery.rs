//! # Certificate Forgery
//!
//! ## Attack Vectors
//!
//! | Attack | Expected rejection |
//! |--------|--------------------|
//! | Random proof bytes claiming `foo` | `CertificateInvalid` |
//! | Proof by the attacker's own registered key claiming `foo` | `CertificateInvalid` |
//! | Issuer swapped for one that signs with the attacker's key | `CertificateInvalid` |
//! | Honest certificate shipped under another correlation id | `CertificateInvalid` |
//! | Certificate regenerated for a different correlation id | `CertificateInvalid` |
//! | Messenger certificate rewrapped as a gateway message | `CertificateInvalid` |
//! | Envelope for `bar` relayed onto `baz`'s channel | `CertificateInvalid` |
//! | Claim the directory has never heard of | `UnknownIdentity` |
//!
//! In every case `on_message` must stay silent.

#[cfg(test)]
mod tests {
    use crate::support::*;
    use async_trait::async_trait;
    use im_01_certificate_authority::{
        canonical_payload, CertificateAuthority, CertificateContext, CertificateError, CertificateIssuer,
        DirectoryLookup, KeyPairSigner, Signer,
    };
    use im_02_secure_messenger::{MessengerConfig, MessengerError, SecureIdentityMessenger, SecureMessengerApi};
    use im_03_protocol_messenger::PAYMENT_REQUEST;
    use im_04_gateway::{gateway_topic, GatewayError, GatewayMessage};
    use serde_json::json;
    use shared_bus::PubSubProvider;
    use shared_types::{new_correlation_id, Certificate, Envelope, ErrorKind, Identity, ProtocolMessage};
    use std::sync::Arc;
    use uuid::Uuid;

    fn to_bar() -> CertificateContext {
        CertificateContext::inbound(&identity("bar@wallet.ns"))
    }

    /// Issuer that ignores the caller's signer and signs with its own key.
    struct ForgingIssuer {
        attacker: KeyPairSigner,
    }

    #[async_trait]
    impl CertificateIssuer for ForgingIssuer {
        async fn make(
            &self,
            identity: &Identity,
            _signer: &dyn Signer,
            correlation_id: Uuid,
            context: &CertificateContext,
        ) -> Result<Certificate, CertificateError> {
            CertificateAuthority::new()
                .make(identity, &self.attacker, correlation_id, context)
                .await
        }

        async fn verify(
            &self,
            certificate: &Certificate,
            expected_correlation_id: Uuid,
            context: &CertificateContext,
            directory: &dyn DirectoryLookup,
        ) -> Result<(), CertificateError> {
            CertificateAuthority::new()
                .verify(certificate, expected_correlation_id, context, directory)
                .await
        }
    }

    fn assert_certificate_invalid(error: &MessengerError) {
        assert!(
            matches!(
                error,
                MessengerError::Certificate(CertificateError::CertificateInvalid { .. })
            ),
            "expected CertificateInvalid, got {error:?}"
        );
        assert!(error.kind().is_security_event());
    }

    #[tokio::test]
    async fn test_random_proof_rejected() {
        let net = Network::new();
        net.register("foo@wallet.ns");
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        let forged = Envelope::new(
            Certificate {
                claim: identity("foo@wallet.ns"),
                proof: [0x42; 64],
            },
            new_correlation_id(),
            b"send me your funds".to_vec(),
        );
        net.clients.inject(bar.identity(), forged).await;

        assert_certificate_invalid(&inbox.next_error().await);
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_attacker_key_claiming_victim_rejected() {
        let net = Network::new();
        net.register("foo@wallet.ns");
        let mallory = KeyPairSigner::generate();
        net.directory
            .register(identity("mallory@wallet.ns"), mallory.public_key());
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        let correlation_id = new_correlation_id();
        let payload = canonical_payload(&to_bar(), &identity("foo@wallet.ns"), correlation_id).unwrap();
        let signature = mallory.sign(&payload).await.unwrap();
        let forged = Envelope::new(
            Certificate {
                claim: identity("foo@wallet.ns"),
                proof: signature.to_bytes(),
            },
            correlation_id,
            b"pay mallory".to_vec(),
        );
        net.clients.inject(bar.identity(), forged).await;

        assert_certificate_invalid(&inbox.next_error().await);
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_forging_issuer_rejected() {
        let net = Network::new();
        let foo_claim = net.register("foo@wallet.ns");
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        let impostor = SecureIdentityMessenger::new(
            foo_claim,
            net.directory.clone(),
            net.clients.clone(),
            Arc::new(ForgingIssuer {
                attacker: KeyPairSigner::generate(),
            }),
            &MessengerConfig::default(),
        );
        impostor.send(b"pay mallory", bar.identity()).await.unwrap();

        assert_certificate_invalid(&inbox.next_error().await);
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_correlation_substitution_rejected() {
        let net = Network::new();
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        foo.send(b"original", bar.identity()).await.unwrap();
        inbox.next_message().await;

        let mut substituted = net.clients.published().remove(0);
        substituted.correlation_id = new_correlation_id();
        substituted.payload = b"tampered".to_vec();
        net.clients.inject(bar.identity(), substituted).await;

        assert_certificate_invalid(&inbox.next_error().await);
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_certificate_for_other_correlation_id_rejected() {
        let net = Network::new();
        let foo = net.register("foo@wallet.ns");
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        let signed_for = new_correlation_id();
        let shipped_as = new_correlation_id();
        let certificate = CertificateAuthority::new()
            .make(foo.identity(), foo.signer(), signed_for, &to_bar())
            .await
            .unwrap();
        net.clients
            .inject(bar.identity(), Envelope::new(certificate, shipped_as, b"hi".to_vec()))
            .await;

        assert_certificate_invalid(&inbox.next_error().await);
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_messenger_certificate_rewrapped_for_gateway_rejected() {
        let net = Network::new();
        let foo_claim = net.register("foo@wallet.ns");
        let bar_claim = net.register("bar@wallet.ns");
        let foo = net.messenger(foo_claim);
        let bar = net.messenger(bar_claim.clone());
        let mut inbox = listen_messenger(&bar);
        let bar_gateway = net
            .authenticated_gateways()
            .open_gateway("PAYMENTS", Some(bar_claim))
            .unwrap();
        let mut gateway_inbox = listen_gateway(&bar_gateway);

        foo.send(b"pay 1 to bar", bar.identity()).await.unwrap();
        inbox.next_message().await;

        let captured = net.clients.published().remove(0);
        let rewrapped = GatewayMessage::new(
            "PAYMENTS",
            captured.correlation_id,
            Some(captured.certificate),
            ProtocolMessage::new(
                PAYMENT_REQUEST,
                json!({
                    "amount": "1000",
                    "assetId": ASSET_ID,
                    "toAddress": "mallory",
                }),
            ),
        );
        net.provider
            .publish(
                &gateway_topic("PAYMENTS", &identity("bar@wallet.ns")),
                serde_json::to_vec(&rewrapped).unwrap(),
            )
            .await
            .unwrap();

        let error = gateway_inbox.next_error().await;
        assert!(
            matches!(
                error,
                GatewayError::Authentication(MessengerError::Certificate(
                    CertificateError::CertificateInvalid { .. }
                ))
            ),
            "expected CertificateInvalid, got {error:?}"
        );
        assert!(gateway_inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_envelope_relayed_to_other_recipient_rejected() {
        let net = Network::new();
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let baz = net.messenger(net.register("baz@wallet.ns"));
        let mut bar_inbox = listen_messenger(&bar);
        let mut baz_inbox = listen_messenger(&baz);

        foo.send(b"pay 1 to bar", bar.identity()).await.unwrap();
        bar_inbox.next_message().await;

        let captured = net.clients.published().remove(0);
        net.clients.inject(baz.identity(), captured).await;

        assert_certificate_invalid(&baz_inbox.next_error().await);
        assert!(baz_inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_unknown_claim_rejected() {
        let net = Network::new();
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        let ghost = KeyPairSigner::generate();
        let correlation_id = new_correlation_id();
        let certificate = CertificateAuthority::new()
            .make(&identity("ghost@wallet.ns"), &ghost, correlation_id, &to_bar())
            .await
            .unwrap();
        net.clients
            .inject(bar.identity(), Envelope::new(certificate, correlation_id, b"boo".to_vec()))
            .await;

        let error = inbox.next_error().await;
        assert_eq!(error.kind(), ErrorKind::UnknownIdentity);
        assert!(!error.kind().is_security_event());
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_future_envelope_version_rejected() {
        let net = Network::new();
        let foo = net.messenger(net.register("foo@wallet.ns"));
        let bar = net.messenger(net.register("bar@wallet.ns"));
        let mut inbox = listen_messenger(&bar);

        foo.send(b"v1", bar.identity()).await.unwrap();
        inbox.next_message().await;

        let mut future = net.clients.published().remove(0);
        future.version = Envelope::CURRENT_VERSION + 1;
        net.clients.inject(bar.identity(), future).await;

        assert_eq!(
            inbox.next_error().await,
            MessengerError::UnsupportedVersion {
                version: Envelope::CURRENT_VERSION + 1
            }
        );
        assert!(inbox.no_message().await);
    }
}
