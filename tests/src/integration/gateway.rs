//! # Gateway Flows
//!
//! Gateway repositories opened by independent parties over one shared
//! topic provider.
//!
//! ## Flows Tested:
//!
//! 1. **Registry**: unknown names never produce a gateway
//! 2. **Authenticated mode**: the concrete payment scenario with the
//!    verified sender reported
//! 3. **Raw mode**: delivery without a sender
//! 4. **Custom protocols**: a registry seeded with an application protocol

#[cfg(test)]
mod tests {
    use crate::support::*;
    use im_03_protocol_messenger::{ContentSchema, FieldKind, ProtocolDefinition};
    use im_04_gateway::{
        BasicProtocolHandler, GatewayApi, GatewayError, GatewayRepository, HandlerRegistry, ProtocolHandler,
    };
    use serde_json::json;
    use shared_types::{ErrorKind, ProtocolMessage};
    use std::sync::Arc;

    fn chat_registry() -> HandlerRegistry {
        let chat: Arc<dyn ProtocolHandler> = Arc::new(
            ProtocolDefinition::builder("CHAT")
                .message(
                    "TEXT",
                    ContentSchema::new().required("body", FieldKind::NonEmptyString),
                )
                .build()
                .unwrap(),
        );
        let basic: Arc<dyn ProtocolHandler> = Arc::new(BasicProtocolHandler);
        HandlerRegistry::new(vec![basic, chat]).unwrap()
    }

    #[tokio::test]
    async fn test_unregistered_protocol_never_opens() {
        let net = Network::new();

        for name in ["UNKNOWN", "payments", "", "PAYMENTS/extra"] {
            let result = net.authenticated_gateways().open_gateway(name, None);
            let error = result.err().unwrap();
            assert_eq!(error.kind(), ErrorKind::UnsupportedProtocol);
        }
        assert_eq!(net.provider.messages_published(), 0);
    }

    #[tokio::test]
    async fn test_authenticated_payment_request_scenario() {
        let net = Network::new();
        // Two parties, each with its own repository, sharing the transport
        // and the directory.
        let foo = net
            .authenticated_gateways()
            .open_gateway("PAYMENTS", Some(net.register("foo@wallet.ns")))
            .unwrap();
        let bar = net
            .authenticated_gateways()
            .open_gateway("PAYMENTS", Some(net.register("bar@wallet.ns")))
            .unwrap();
        let mut inbox = listen_gateway(&bar);

        foo.send(&payment_request(), &identity("bar@wallet.ns"))
            .await
            .unwrap();

        let (message, sender) = inbox.next_message().await;
        assert_eq!(message, payment_request());
        assert_eq!(sender, Some(identity("foo@wallet.ns")));

        let result = foo
            .send(&malformed_payment_request(), &identity("bar@wallet.ns"))
            .await;
        assert!(matches!(result, Err(GatewayError::Malformed { .. })));
        assert_eq!(net.provider.messages_published(), 1);
        assert!(inbox.no_message().await);
        assert!(inbox.no_error().await);
    }

    #[tokio::test]
    async fn test_raw_gateways_deliver_without_sender() {
        let net = Network::new();
        let foo = net.raw_gateways().open_gateway("BASIC", None).unwrap();
        let bar = net
            .raw_gateways()
            .open_gateway("BASIC", Some(net.register("bar@wallet.ns")))
            .unwrap();
        let mut inbox = listen_gateway(&bar);

        let anything = ProtocolMessage::new("ANYTHING", json!({ "free": ["form", 1, true] }));
        foo.send(&anything, &identity("bar@wallet.ns")).await.unwrap();

        assert_eq!(inbox.next_message().await, (anything, None));
    }

    #[tokio::test]
    async fn test_raw_sender_rejected_by_authenticated_receiver() {
        let net = Network::new();
        let foo = net
            .raw_gateways()
            .open_gateway("PAYMENTS", Some(net.register("foo@wallet.ns")))
            .unwrap();
        let bar = net
            .authenticated_gateways()
            .open_gateway("PAYMENTS", Some(net.register("bar@wallet.ns")))
            .unwrap();
        let mut inbox = listen_gateway(&bar);

        foo.send(&payment_request(), &identity("bar@wallet.ns"))
            .await
            .unwrap();

        let error = inbox.next_error().await;
        assert!(matches!(error, GatewayError::Unauthenticated { .. }));
        assert!(error.kind().is_security_event());
        assert!(inbox.no_message().await);
    }

    #[tokio::test]
    async fn test_custom_protocol_registry() {
        let net = Network::new();
        let repository = GatewayRepository::new(chat_registry(), net.provider.clone())
            .with_authentication(net.directory.clone());
        assert!(repository.open_gateway("PAYMENTS", None).is_err());

        let foo = repository
            .open_gateway("CHAT", Some(net.register("foo@wallet.ns")))
            .unwrap();
        let bar = repository
            .open_gateway("CHAT", Some(net.register("bar@wallet.ns")))
            .unwrap();
        let mut inbox = listen_gateway(&bar);

        let empty = ProtocolMessage::new("TEXT", json!({ "body": "" }));
        let result = foo.send(&empty, &identity("bar@wallet.ns")).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedProtocolMessage);

        let text = ProtocolMessage::new("TEXT", json!({ "body": "hi bar" }));
        foo.send(&text, &identity("bar@wallet.ns")).await.unwrap();

        let (message, sender) = inbox.next_message().await;
        assert_eq!(message, text);
        assert_eq!(sender, Some(identity("foo@wallet.ns")));
    }

    #[tokio::test]
    async fn test_one_identity_many_protocols() {
        let net = Network::new();
        let repository = net.authenticated_gateways();
        let bar = net.register("bar@wallet.ns");
        let bar_basic = repository.open_gateway("BASIC", Some(bar.clone())).unwrap();
        let bar_payments = repository.open_gateway("PAYMENTS", Some(bar)).unwrap();
        let mut basic_inbox = listen_gateway(&bar_basic);
        let mut payments_inbox = listen_gateway(&bar_payments);

        let foo = net.register("foo@wallet.ns");
        let foo_basic = repository.open_gateway("BASIC", Some(foo.clone())).unwrap();
        let foo_payments = repository.open_gateway("PAYMENTS", Some(foo)).unwrap();

        let ping = ProtocolMessage::new("PING", json!({}));
        foo_basic.send(&ping, &identity("bar@wallet.ns")).await.unwrap();
        foo_payments
            .send(&payment_request(), &identity("bar@wallet.ns"))
            .await
            .unwrap();

        assert_eq!(basic_inbox.next_message().await.0, ping);
        assert_eq!(payments_inbox.next_message().await.0, payment_request());
        assert!(basic_inbox.no_message().await);
        assert!(payments_inbox.no_message().await);
    }
}
