//! # Integration Test Flows
//!
//! The client façade driven through the real JSON-RPC runtime adapter
//! against a [`FakeNode`](super::fake_node::FakeNode).
//!
//! ## Flows Tested:
//!
//! 1. **Construction**: chain selection, configuration over the wire
//! 2. **Node list**: wire record to typed `NodeList`, deposits kept exact
//! 3. **ABI pass-through**: encode then decode returns the original arguments
//! 4. **Guards**: invalid input never produces a request
//! 5. **Failures**: each error class surfaces with what failed

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use in3_client::{
        chain_id, Account, ChainConfig, ClientConfig, ClientState, CoercionError,
        ConfigurationError, In3Api, In3Client, In3Error, JsonRpcRuntime, ProofLevel,
        RuntimeError, ValidationError, SUPPORTED_CHAINS,
    };
    use in3_telemetry::{init_logging, TelemetryConfig};
    use primitive_types::U256;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    use crate::integration::fake_node::{node_record, registry_record, FakeNode};

    type Client = In3Client<JsonRpcRuntime<FakeNode>>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn connect(chain: &str, config: Option<ClientConfig>, node: &FakeNode) -> Result<Client, In3Error> {
        In3Client::connect(chain, config, |chain| {
            JsonRpcRuntime::new(node.clone(), chain.chain_id)
        })
    }

    fn mainnet(node: &FakeNode) -> Client {
        connect("mainnet", None, node).unwrap()
    }

    // =============================================================================
    // CONSTRUCTION
    // =============================================================================

    #[test]
    fn test_every_supported_chain_binds_its_id() {
        let expected = [
            ("mainnet", chain_id::MAINNET),
            ("kovan", chain_id::KOVAN),
            ("goerli", chain_id::GOERLI),
        ];
        assert_eq!(SUPPORTED_CHAINS.len(), expected.len());

        for (name, id) in expected {
            let node = FakeNode::new();
            let client = connect(name, None, &node).unwrap();
            assert_eq!(client.chain().chain_id, id);
            assert_eq!(client.runtime().chain_id(), id);
            assert_eq!(client.state(), ClientState::Ready);
            assert!(node.requests().is_empty(), "{name} sent requests without a config");
        }
    }

    #[test]
    fn test_unsupported_chain_names() {
        for name in ["ropsten", "", "Mainnet", "ipfs", "local"] {
            let node = FakeNode::new();
            match connect(name, None, &node) {
                Err(In3Error::Configuration(ConfigurationError::UnsupportedChain(got))) => {
                    assert_eq!(got, name)
                }
                Err(other) => panic!("{name}: unexpected error {other}"),
                Ok(_) => panic!("{name}: construction should fail"),
            }
        }
    }

    #[test]
    fn test_unsupported_chain_message_names_the_chain() {
        let err = connect("ropsten", None, &FakeNode::new()).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Chain name not supported: ropsten. Try mainnet, kovan, goerli."
        );
    }

    #[test]
    fn test_config_travels_as_formatted_params() {
        let node = FakeNode::new();
        let config = ClientConfig {
            chain_id: Some(chain_id::GOERLI),
            request_count: Some(2),
            proof: Some(ProofLevel::Standard),
            ..Default::default()
        };

        let client = connect("goerli", Some(config.clone()), &node).unwrap();
        assert_eq!(client.applied_config(), Some(&config));

        let requests = node.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["method"], "in3_config");
        assert_eq!(requests[0]["in3"]["chainId"], "0x5");
        assert_eq!(
            requests[0]["params"],
            json!([{"chainId": "0x5", "requestCount": 2, "proof": "standard"}])
        );
    }

    #[test]
    fn test_chain_config_selector_uses_embedded_config() {
        let node = FakeNode::new();
        let kovan = ChainConfig::by_name("kovan").unwrap();

        let client = In3Client::connect(kovan, Some(ClientConfig::for_testing()), |chain| {
            JsonRpcRuntime::new(node.clone(), chain.chain_id)
        })
        .unwrap();

        assert_eq!(client.applied_config(), Some(&kovan.client_config));
        assert_eq!(node.requests()[0]["params"], json!([{"chainId": "0x2a"}]));
    }

    #[test]
    fn test_rejected_configuration_aborts_construction() {
        let node = FakeNode::new();
        node.reject_config();

        assert!(matches!(
            connect("kovan", Some(ClientConfig::for_testing()), &node),
            Err(In3Error::Configuration(ConfigurationError::Rejected))
        ));
        assert_eq!(node.methods(), vec!["in3_config"]);
    }

    #[test]
    fn test_failed_configure_call_aborts_construction() {
        let node = FakeNode::new();
        node.fail("in3_config", -32000, "no node reachable");

        match connect("kovan", Some(ClientConfig::default()), &node) {
            Err(In3Error::Configuration(ConfigurationError::Runtime(RuntimeError::Rpc {
                method,
                code,
                message,
            }))) => {
                assert_eq!(method, "in3_config");
                assert_eq!(code, -32000);
                assert_eq!(message, "no node reachable");
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("construction should fail"),
        }
    }

    #[test]
    fn test_config_from_json_file_contents() {
        let node = FakeNode::new();
        let config =
            ClientConfig::from_json(r#"{"chainId":"kovan","maxAttempts":3,"timeout":10000}"#)
                .unwrap();

        connect("kovan", Some(config), &node).unwrap();
        assert_eq!(
            node.requests()[0]["params"],
            json!([{"chainId": "0x2a", "maxAttempts": 3, "timeout": 10000}])
        );
    }

    // =============================================================================
    // NODE LIST
    // =============================================================================

    #[test]
    fn test_node_list_flow() {
        let node = FakeNode::new();
        let client = mainnet(&node);

        let list = client.get_node_list().unwrap();
        assert_eq!(list.nodes.len(), 2);
        assert_eq!(list.total_servers, 5);
        assert!(list.is_partial());
        assert_eq!(list.last_block_number, 8_669_495);

        let twenty_eth = U256::from_dec_str("20000000000000000000").unwrap();
        assert!(list.iter().all(|n| n.deposit == twenty_eth));
        assert_eq!(list.total_deposit(), twenty_eth * U256::from(2u64));

        assert_eq!(node.methods(), vec!["in3_nodeList"]);
        assert_eq!(node.requests()[0]["params"], json!([]));
    }

    #[test]
    fn test_node_list_entities_are_usable() {
        let client = mainnet(&FakeNode::new());
        let list = client.get_node_list().unwrap();

        let first: Account = "0x45d45e6ff99e6c34a235d263965910298985fcfe".parse().unwrap();
        let found = list.find(&first).unwrap();
        assert_eq!(found.url, "https://in3-v2.slock.it/mainnet/nd-1");

        let caps = found.capabilities().unwrap();
        assert!(caps.supports_proof());
        assert_eq!(found.registered_at().unwrap().timestamp(), 1_576_224_418);
        assert_eq!(list.contract, ChainConfig::by_name("mainnet").unwrap().registry);
    }

    #[test]
    fn test_node_list_with_bad_deposit_is_rejected_whole() {
        let mut record = registry_record();
        record["nodes"][1] = node_record(
            "0x1fe2e9bf29aa1938859af64c413361227d04059a",
            1,
            "twenty ether",
        );
        let client = mainnet(&FakeNode::with_node_list(record));

        match client.get_node_list() {
            Err(In3Error::Coercion(CoercionError::InvalidValue {
                entity, field, raw, ..
            })) => {
                assert_eq!(entity, "Node");
                assert_eq!(field, "deposit");
                assert!(raw.contains("twenty ether"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_node_list_missing_field() {
        let mut record = registry_record();
        record.as_object_mut().unwrap().remove("lastBlockNumber");
        let client = mainnet(&FakeNode::with_node_list(record));

        assert_eq!(
            client.get_node_list(),
            Err(In3Error::Coercion(CoercionError::MissingField {
                entity: "NodeList",
                field: "lastBlockNumber",
            }))
        );
    }

    #[test]
    fn test_node_list_of_wrong_shape() {
        let client = mainnet(&FakeNode::with_node_list(json!(["not", "a", "record"])));
        assert!(matches!(
            client.get_node_list(),
            Err(In3Error::Runtime(RuntimeError::UnexpectedResult {
                method: "in3_nodeList",
                ..
            }))
        ));
    }

    // =============================================================================
    // ABI PASS-THROUGH
    // =============================================================================

    #[test]
    fn test_abi_round_trip() {
        let node = FakeNode::new();
        let client = mainnet(&node);
        let args = vec![
            json!("0x1234567890123456789012345678901234567890"),
            json!("20000000000000000000"),
        ];

        let encoded = client.abi_encode("transfer(address,uint256)", &args).unwrap();
        assert!(encoded.starts_with("0x"));

        let decoded = client.abi_decode("transfer(address,uint256)", &encoded).unwrap();
        assert_eq!(decoded, args);

        let requests = node.requests();
        assert_eq!(requests[0]["params"], json!(["transfer(address,uint256)", args]));
        assert_eq!(requests[1]["params"], json!(["transfer(address,uint256)", encoded]));
    }

    #[test]
    fn test_abi_args_keep_order() {
        let client = mainnet(&FakeNode::new());
        let args: Vec<Value> = (0..6u64).map(|i| json!(format!("0x{i:040x}"))).collect();
        let signature = "(address,address,address,address,address,address)";

        let encoded = client.abi_encode(signature, &args).unwrap();
        assert!(encoded.len() > 66);
        assert_eq!(client.abi_decode(signature, &encoded).unwrap(), args);
    }

    #[test]
    fn test_abi_codec_failure_propagates() {
        let node = FakeNode::new();
        node.fail("in3_abiEncode", -32602, "wrong number of arguments");
        let client = mainnet(&node);

        assert_eq!(
            client.abi_encode("balanceOf(address)", &[]),
            Err(In3Error::Runtime(RuntimeError::Rpc {
                method: "in3_abiEncode",
                code: -32602,
                message: "wrong number of arguments".to_string(),
            }))
        );
    }

    // =============================================================================
    // GUARDS
    // =============================================================================

    #[test]
    fn test_invalid_signature_sends_nothing() {
        let node = FakeNode::new();
        let client = mainnet(&node);

        for signature in ["noParens", "(foo)", "transfer(foo,bar)", "balanceOf()address"] {
            assert!(matches!(
                client.abi_encode(signature, &[json!(1)]),
                Err(In3Error::Validation(ValidationError::InvalidSignature { .. }))
            ));
        }
        assert!(node.requests().is_empty());
    }

    #[test]
    fn test_decode_guard_sends_nothing() {
        let node = FakeNode::new();
        let client = mainnet(&node);
        let word = "0".repeat(64);

        assert_eq!(
            client.abi_decode("balanceOf(address)", &word),
            Err(In3Error::Validation(ValidationError::MissingHexPrefix))
        );
        assert_eq!(
            client.abi_decode("balanceOf(address)", &format!("0x{word}")),
            Err(In3Error::Validation(ValidationError::EncodedValueTooShort { length: 64 }))
        );
        assert!(node.requests().is_empty());
    }

    #[test]
    fn test_decode_checks_payload_before_signature() {
        let client = mainnet(&FakeNode::new());
        assert_eq!(
            client.abi_decode("noParens", "1234"),
            Err(In3Error::Validation(ValidationError::MissingHexPrefix))
        );
    }

    #[test]
    fn test_decode_boundary_reaches_runtime() {
        let node = FakeNode::new();
        let client = mainnet(&node);

        // 65 characters pass the guard; the codec then rejects the odd payload
        let result = client.abi_decode("balanceOf(address)", &format!("0x{}", "0".repeat(65)));
        assert!(matches!(result, Err(In3Error::Runtime(RuntimeError::Rpc { .. }))));
        assert_eq!(node.methods(), vec!["in3_abiDecode"]);
    }

    // =============================================================================
    // UNIMPLEMENTED SURFACE + TAXONOMY
    // =============================================================================

    #[test]
    fn test_unimplemented_operations_say_so() {
        let node = FakeNode::new();
        let client = mainnet(&node);

        let err = client.get_config().unwrap_err();
        assert_eq!(err, In3Error::NotImplemented("get_config"));
        assert_eq!(err.to_string(), "get_config is not implemented");
        assert!(client.ens_resolve("vitalik.eth").is_err());
        assert!(node.requests().is_empty());
    }

    #[test]
    fn test_error_messages_identify_the_failure() {
        let validation: In3Error = ValidationError::MissingHexPrefix.into();
        assert_eq!(validation.to_string(), "Encoded values must start with 0x");

        let coercion: In3Error = CoercionError::MissingField {
            entity: "Node",
            field: "weight",
        }
        .into();
        assert!(coercion.to_string().contains("weight"));

        let runtime: In3Error = RuntimeError::Transport {
            method: "in3_nodeList",
            message: "connection refused".to_string(),
        }
        .into();
        assert!(runtime.to_string().contains("in3_nodeList"));
    }

    // =============================================================================
    // CONCURRENCY + LOGGING
    // =============================================================================

    #[test]
    fn test_shared_client_across_threads() {
        let node = FakeNode::new();
        let client = Arc::new(mainnet(&node));

        std::thread::scope(|scope| {
            for i in 0..4u64 {
                let client = Arc::clone(&client);
                scope.spawn(move || {
                    let args = vec![json!(format!("0x{i:040x}"))];
                    let encoded = client.abi_encode("f(address)", &args).unwrap();
                    assert_eq!(client.abi_decode("f(address)", &encoded).unwrap(), args);
                });
            }
        });

        assert_eq!(node.requests().len(), 8);
        let mut ids: Vec<u64> = node
            .requests()
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_client_logs_under_installed_subscriber() {
        let config = TelemetryConfig {
            log_level: "in3_client=debug".to_string(),
            ..TelemetryConfig::for_testing()
        };
        // only the first installer in this binary succeeds
        let _guard = init_logging(&config).ok();

        let client = connect("kovan", Some(ClientConfig::for_testing()), &FakeNode::new()).unwrap();
        assert!(client.get_node_list().is_ok());
    }

    proptest! {
        #[test]
        fn prop_decode_guard_boundary(len in 0usize..160) {
            let node = FakeNode::new();
            let client = mainnet(&node);
            let encoded = format!("0x{}", "0".repeat(len));

            let result = client.abi_decode("balanceOf(address)", &encoded);
            let guarded = matches!(result, Err(In3Error::Validation(_)));
            prop_assert_eq!(guarded, len <= 64);
            prop_assert_eq!(node.requests().is_empty(), len <= 64);
        }

        #[test]
        fn prop_signatures_without_parens_never_reach_runtime(sig in "[a-zA-Z0-9_,:]{0,40}") {
            let node = FakeNode::new();
            let client = mainnet(&node);

            prop_assert!(client.abi_encode(&sig, &[]).is_err());
            prop_assert!(node.requests().is_empty());
        }
    }
}
