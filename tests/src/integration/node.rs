//! # Node Runtime Flows
//!
//! The runtime container wires every subsystem from one configuration.

#[cfg(test)]
mod tests {
    use crate::support::*;
    use im_02_secure_messenger::{MessengerConfig, SecureMessengerApi};
    use im_03_protocol_messenger::ProtocolMessengerApi;
    use node_runtime::{run_self_check, MessagingNode, NodeConfig};

    #[tokio::test]
    async fn test_self_check_on_custom_domain() {
        let config = NodeConfig {
            domain: "pay.example".to_string(),
            ..NodeConfig::default()
        };
        config.validate().unwrap();
        let node = MessagingNode::new(config);

        let sender = node.provision("alice").unwrap();
        let receiver = node.provision("bob").unwrap();
        assert_eq!(sender.identity().as_str(), "alice@pay.example");

        run_self_check(&node, sender, receiver).await.unwrap();
        assert!(node.provider().messages_published() >= 2);
    }

    #[tokio::test]
    async fn test_node_payment_messengers() {
        let node = MessagingNode::new(NodeConfig::default());
        let foo = node.payments_messenger(node.provision("foo").unwrap());
        let bar = node.payments_messenger(node.provision("bar").unwrap());
        let mut inbox = listen_protocol(&bar);

        foo.send(&payment_request(), bar.messenger().identity())
            .await
            .unwrap();

        let (message, sender) = inbox.next_message().await;
        assert_eq!(message, payment_request());
        assert_eq!(sender, identity("foo@wallet.ns"));
    }

    #[tokio::test]
    async fn test_node_without_replay_protection() {
        let node = MessagingNode::new(NodeConfig {
            messenger: MessengerConfig::without_replay_protection(),
            ..NodeConfig::default()
        });
        let foo = node.provision("foo").unwrap();
        let bar = node.provision("bar").unwrap();

        run_self_check(&node, foo, bar).await.unwrap();
    }
}
