//! Instance metadata integration tests.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use awsbase_credentials::{
        Config, EnvConfig, Error, IMDS_CREDENTIALS_SOURCE, ImdsState, ProvideCredentials,
        is_no_valid_credential_sources_error, resolve_credentials_provider,
    };
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::{IMDS_ACCESS_KEY, IMDS_SECRET_KEY, IMDS_SESSION_TOKEN, TestHome, mock_imds};

    #[tokio::test]
    async fn test_should_resolve_instance_role_credentials() {
        let imds = mock_imds().await;
        let home = TestHome::new();
        let home_dir = home.path_str();

        let config = Config::builder()
            .ec2_metadata_service_endpoint(imds.uri())
            .build();
        let env = EnvConfig::from_pairs(&[("HOME", home_dir.as_str())]);

        let (provider, source) = resolve_credentials_provider(&config, &env)
            .await
            .expect("instance role credentials");

        assert_eq!(source, IMDS_CREDENTIALS_SOURCE);
        let creds = provider.retrieve().await.expect("cached credentials");
        assert_eq!(creds.access_key_id(), IMDS_ACCESS_KEY);
        assert_eq!(creds.secret_access_key(), IMDS_SECRET_KEY);
        assert_eq!(creds.session_token(), Some(IMDS_SESSION_TOKEN));
        assert!(creds.expires().is_some());
    }

    #[tokio::test]
    async fn test_should_read_imds_endpoint_from_environment() {
        let imds = mock_imds().await;
        let home = TestHome::new();
        let home_dir = home.path_str();
        let endpoint = imds.uri();

        let env = EnvConfig::from_pairs(&[
            ("HOME", home_dir.as_str()),
            ("AWS_EC2_METADATA_SERVICE_ENDPOINT", endpoint.as_str()),
        ]);

        let (_, source) = resolve_credentials_provider(&Config::default(), &env)
            .await
            .expect("instance role credentials");
        assert_eq!(source, IMDS_CREDENTIALS_SOURCE);
    }

    #[tokio::test]
    async fn test_should_reuse_validated_credentials_without_new_requests() {
        let imds = mock_imds().await;
        let home = TestHome::new();
        let home_dir = home.path_str();

        let config = Config::builder()
            .ec2_metadata_service_endpoint(imds.uri())
            .build();
        let env = EnvConfig::from_pairs(&[("HOME", home_dir.as_str())]);

        let (provider, _) = resolve_credentials_provider(&config, &env)
            .await
            .expect("instance role credentials");
        let before = imds.received_requests().await.expect("recording").len();

        provider.retrieve().await.expect("first retrieve");
        provider.retrieve().await.expect("second retrieve");

        let after = imds.received_requests().await.expect("recording").len();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_should_fail_for_unreachable_imds() {
        let home = TestHome::new();
        let home_dir = home.path_str();

        let config = Config::builder()
            .ec2_metadata_service_endpoint("http://127.0.0.1:1".to_owned())
            .validation_timeout(Some(Duration::from_secs(10)))
            .build();
        let env = EnvConfig::from_pairs(&[("HOME", home_dir.as_str())]);

        let err = resolve_credentials_provider(&config, &env)
            .await
            .expect_err("no credential source");

        assert!(matches!(err, Error::NoValidCredentialSources { .. }));
        assert!(is_no_valid_credential_sources_error(&err));
    }

    #[tokio::test]
    async fn test_should_skip_imds_when_disabled_by_environment() {
        let imds = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&imds)
            .await;

        let home = TestHome::new();
        let home_dir = home.path_str();
        let endpoint = imds.uri();
        let env = EnvConfig::from_pairs(&[
            ("HOME", home_dir.as_str()),
            ("AWS_EC2_METADATA_SERVICE_ENDPOINT", endpoint.as_str()),
            ("AWS_EC2_METADATA_DISABLED", "true"),
        ]);

        let err = resolve_credentials_provider(&Config::default(), &env)
            .await
            .expect_err("no credential source");
        assert!(is_no_valid_credential_sources_error(&err));
    }

    #[tokio::test]
    async fn test_should_force_imds_when_enabled_explicitly() {
        let imds = mock_imds().await;
        let home = TestHome::new();
        let home_dir = home.path_str();

        let config = Config::builder()
            .ec2_metadata_service_endpoint(imds.uri())
            .ec2_metadata_service_enable_state(ImdsState::Enabled)
            .build();
        let env = EnvConfig::from_pairs(&[
            ("HOME", home_dir.as_str()),
            ("AWS_EC2_METADATA_DISABLED", "true"),
        ]);

        let (_, source) = resolve_credentials_provider(&config, &env)
            .await
            .expect("instance role credentials");
        assert_eq!(source, IMDS_CREDENTIALS_SOURCE);
    }
}
