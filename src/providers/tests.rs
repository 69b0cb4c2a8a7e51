//! Provider tests with HTTP mocking.

mod zone_tests {
    use crate::error::DdnsError;
    use crate::providers::{CloudflareProvider, DnsProvider};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_resolve_zone_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/client/v4/zones"))
            .and(query_param("name", "example.com"))
            .and(header("X-Auth-Email", "me@example.com"))
            .and(header("X-Auth-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success":true,"result":[{"id":"zone-123","name":"example.com"}],"errors":[]}"#,
            ))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            "me@example.com".to_string(),
            "secret".to_string(),
            mock_server.uri(),
        );

        let zone = provider.resolve_zone("example.com").await.unwrap();
        assert_eq!(zone.id, "zone-123");
    }

    #[tokio::test]
    async fn test_resolve_zone_takes_first_match() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/client/v4/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success":true,"result":[{"id":"zone-1"},{"id":"zone-2"}],"errors":[]}"#,
            ))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            "me@example.com".to_string(),
            "secret".to_string(),
            mock_server.uri(),
        );

        let zone = provider.resolve_zone("example.com").await.unwrap();
        assert_eq!(zone.id, "zone-1");
    }

    #[tokio::test]
    async fn test_resolve_zone_no_match() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/client/v4/zones"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"success":true,"result":[],"errors":[]}"#),
            )
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            "me@example.com".to_string(),
            "secret".to_string(),
            mock_server.uri(),
        );

        let result = provider.resolve_zone("example.com").await;
        assert!(matches!(result, Err(DdnsError::ZoneResolution(_))));
    }

    #[tokio::test]
    async fn test_resolve_zone_failure_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/client/v4/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success":false,"result":null,"errors":[{"message":"Invalid API key"}]}"#,
            ))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            "me@example.com".to_string(),
            "bad".to_string(),
            mock_server.uri(),
        );

        let result = provider.resolve_zone("example.com").await;
        match result {
            Err(DdnsError::ZoneResolution(msg)) => assert!(msg.contains("Invalid API key")),
            other => panic!("Expected ZoneResolution error, got {:?}", other),
        }
    }
}

mod record_tests {
    use crate::error::DdnsError;
    use crate::providers::{CloudflareProvider, DnsProvider, DnsRecord};
    use std::net::IpAddr;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record_fixture() -> DnsRecord {
        serde_json::from_str(
            r#"{"id":"rec-1","name":"example.com","content":"1.1.1.1",
                "type":"A","proxied":true,"ttl":120}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_records_preserves_extra_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/client/v4/zones/zone-123/dns_records"))
            .and(header("X-Auth-Email", "me@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success":true,"result":[
                    {"id":"rec-1","name":"example.com","content":"1.1.1.1","type":"A","proxied":true,"ttl":120},
                    {"id":"rec-2","name":"vpn.example.com","content":"1.1.1.1","type":"A","proxied":false,"ttl":1}
                ],"errors":[]}"#,
            ))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            "me@example.com".to_string(),
            "secret".to_string(),
            mock_server.uri(),
        );

        let records = provider.list_records("zone-123").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content, "1.1.1.1");
        assert_eq!(records[0].extra["type"], "A");
        assert_eq!(records[0].extra["proxied"], true);
    }

    #[tokio::test]
    async fn test_list_records_failure_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/client/v4/zones/zone-123/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success":false,"result":null,"errors":[{"message":"Forbidden"}]}"#,
            ))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            "me@example.com".to_string(),
            "secret".to_string(),
            mock_server.uri(),
        );

        let result = provider.list_records("zone-123").await;
        assert!(matches!(result, Err(DdnsError::RecordListing(_))));
    }

    #[tokio::test]
    async fn test_update_record_sends_full_body() {
        let mock_server = MockServer::start().await;

        // The PUT must carry the whole record with only content replaced.
        Mock::given(method("PUT"))
            .and(path("/client/v4/zones/zone-123/dns_records/rec-1"))
            .and(header("X-Auth-Email", "me@example.com"))
            .and(header("X-Auth-Key", "secret"))
            .and(body_partial_json(serde_json::json!({
                "id": "rec-1",
                "name": "example.com",
                "content": "2.2.2.2",
                "type": "A",
                "proxied": true,
                "ttl": 120
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"success":true,"result":{"id":"rec-1"},"errors":[]}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            "me@example.com".to_string(),
            "secret".to_string(),
            mock_server.uri(),
        );

        let ip: IpAddr = "2.2.2.2".parse().unwrap();
        provider
            .update_record("zone-123", &record_fixture(), ip)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_record_non_200_is_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/client/v4/zones/zone-123/dns_records/rec-1"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(
            "me@example.com".to_string(),
            "secret".to_string(),
            mock_server.uri(),
        );

        let ip: IpAddr = "2.2.2.2".parse().unwrap();
        let result = provider.update_record("zone-123", &record_fixture(), ip).await;

        match result {
            Err(DdnsError::RecordUpdate { record, message }) => {
                assert_eq!(record, "example.com");
                assert!(message.contains("400"));
            }
            other => panic!("Expected RecordUpdate error, got {:?}", other),
        }
    }
}
