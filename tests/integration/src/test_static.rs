//! Static credential integration tests.

#[cfg(test)]
mod tests {
    use awsbase_credentials::{
        Config, EnvConfig, ProvideCredentials, STATIC_CREDENTIALS_SOURCE,
        resolve_credentials_provider,
    };
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::{TestHome, init_tracing};

    fn static_config(access_key: &str, secret_key: &str, token: &str) -> Config {
        Config::builder()
            .access_key(access_key.to_owned())
            .secret_key(secret_key.to_owned())
            .token(token.to_owned())
            .build()
    }

    #[tokio::test]
    async fn test_should_resolve_static_key_pair() {
        init_tracing();
        let config = static_config("StaticAccessKey", "StaticSecretKey", "");

        let (provider, source) = resolve_credentials_provider(&config, &EnvConfig::from_pairs(&[]))
            .await
            .expect("static credentials");

        assert_eq!(source, STATIC_CREDENTIALS_SOURCE);
        assert!(format!("{provider:?}").starts_with("CredentialsCache"));

        let creds = provider.retrieve().await.expect("cached credentials");
        assert_eq!(creds.access_key_id(), "StaticAccessKey");
        assert_eq!(creds.secret_access_key(), "StaticSecretKey");
        assert_eq!(creds.session_token(), None);
        assert_eq!(creds.source(), STATIC_CREDENTIALS_SOURCE);
    }

    #[tokio::test]
    async fn test_should_resolve_static_key_pair_with_token() {
        init_tracing();
        let config = static_config("StaticAccessKey", "StaticSecretKey", "StaticSessionToken");

        let (provider, source) = resolve_credentials_provider(&config, &EnvConfig::from_pairs(&[]))
            .await
            .expect("static credentials");

        assert_eq!(source, STATIC_CREDENTIALS_SOURCE);
        let creds = provider.retrieve().await.expect("cached credentials");
        assert_eq!(creds.session_token(), Some("StaticSessionToken"));
    }

    #[tokio::test]
    async fn test_should_prefer_static_credentials_over_imds() {
        let imds = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&imds)
            .await;

        let home = TestHome::new();
        let config = Config::builder()
            .access_key("StaticAccessKey".to_owned())
            .secret_key("StaticSecretKey".to_owned())
            .ec2_metadata_service_endpoint(imds.uri())
            .build();
        let home_dir = home.path_str();
        let env = EnvConfig::from_pairs(&[("HOME", home_dir.as_str())]);

        let (provider, source) = resolve_credentials_provider(&config, &env)
            .await
            .expect("static credentials");

        assert_eq!(source, STATIC_CREDENTIALS_SOURCE);
        let creds = provider.retrieve().await.expect("cached credentials");
        assert_eq!(creds.access_key_id(), "StaticAccessKey");
    }

    #[tokio::test]
    async fn test_should_prefer_static_credentials_over_environment() {
        init_tracing();
        let config = static_config("StaticAccessKey", "StaticSecretKey", "");
        let env = EnvConfig::from_pairs(&[
            ("AWS_ACCESS_KEY_ID", "EnvAccessKey"),
            ("AWS_SECRET_ACCESS_KEY", "EnvSecretKey"),
        ]);

        let (provider, _) = resolve_credentials_provider(&config, &env)
            .await
            .expect("static credentials");
        let creds = provider.retrieve().await.expect("cached credentials");
        assert_eq!(creds.access_key_id(), "StaticAccessKey");
    }
}
