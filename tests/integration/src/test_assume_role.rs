//! Role assumption integration tests against a mocked STS endpoint.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use awsbase_credentials::{
        ASSUME_ROLE_SOURCE, AssumeRole, Config, EnvConfig, Error, ProvideCredentials,
        STATIC_CREDENTIALS_SOURCE, err_code_equals, is_cannot_assume_role_error,
        is_no_valid_credential_sources_error, resolve_credentials_provider,
    };
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::init_tracing;

    const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/ci";

    const ASSUME_ROLE_RESPONSE: &str = r#"<AssumeRoleResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <AssumeRoleResult>
    <AssumedRoleUser>
      <Arn>arn:aws:sts::123456789012:assumed-role/ci/integration</Arn>
      <AssumedRoleId>AROA3XFRBF535PLBIFPI4:integration</AssumedRoleId>
    </AssumedRoleUser>
    <Credentials>
      <AccessKeyId>AssumeRoleAccessKey</AccessKeyId>
      <SecretAccessKey>AssumeRoleSecretKey</SecretAccessKey>
      <SessionToken>AssumeRoleSessionToken</SessionToken>
      <Expiration>2099-01-01T00:00:00Z</Expiration>
    </Credentials>
  </AssumeRoleResult>
  <ResponseMetadata>
    <RequestId>01234567-89ab-cdef-0123-456789abcdef</RequestId>
  </ResponseMetadata>
</AssumeRoleResponse>"#;

    const EXPIRED_TOKEN_RESPONSE: &str = r#"<ErrorResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <Error>
    <Type>Sender</Type>
    <Code>ExpiredTokenException</Code>
    <Message>The security token included in the request is expired</Message>
  </Error>
  <RequestId>01234567-89ab-cdef-0123-456789abcdef</RequestId>
</ErrorResponse>"#;

    fn role_config(server: &MockServer, role: AssumeRole) -> Config {
        Config::builder()
            .access_key("StaticAccessKey".to_owned())
            .secret_key("StaticSecretKey".to_owned())
            .region("us-east-1".to_owned())
            .sts_endpoint(server.uri())
            .validation_timeout(Some(Duration::from_secs(10)))
            .assume_role(Some(role))
            .build()
    }

    #[tokio::test]
    async fn test_should_assume_role_with_static_base_credentials() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Action=AssumeRole"))
            .and(body_string_contains("RoleSessionName=integration"))
            .and(body_string_contains("DurationSeconds=3600"))
            .and(body_string_contains("ExternalId=external"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(ASSUME_ROLE_RESPONSE, "text/xml"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let role = AssumeRole::builder()
            .role_arn(ROLE_ARN.to_owned())
            .session_name("integration".to_owned())
            .external_id("external".to_owned())
            .duration(Some(Duration::from_secs(3600)))
            .build();
        let config = role_config(&server, role);

        let (provider, source) = resolve_credentials_provider(&config, &EnvConfig::from_pairs(&[]))
            .await
            .expect("assumed role");

        assert_eq!(source, STATIC_CREDENTIALS_SOURCE);

        let creds = provider.retrieve().await.expect("cached role credentials");
        assert_eq!(creds.access_key_id(), "AssumeRoleAccessKey");
        assert_eq!(creds.secret_access_key(), "AssumeRoleSecretKey");
        assert_eq!(creds.session_token(), Some("AssumeRoleSessionToken"));
        assert_eq!(creds.source(), ASSUME_ROLE_SOURCE);
    }

    #[tokio::test]
    async fn test_should_send_session_tags() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Tags.member.1.Key=team"))
            .and(body_string_contains("Tags.member.1.Value=platform"))
            .and(body_string_contains("TransitiveTagKeys.member.1=team"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(ASSUME_ROLE_RESPONSE, "text/xml"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let role = AssumeRole::builder()
            .role_arn(ROLE_ARN.to_owned())
            .tags(HashMap::from([("team".to_owned(), "platform".to_owned())]))
            .transitive_tag_keys(vec!["team".to_owned()])
            .build();
        let config = role_config(&server, role);

        resolve_credentials_provider(&config, &EnvConfig::from_pairs(&[]))
            .await
            .expect("assumed role");
    }

    #[tokio::test]
    async fn test_should_classify_rejected_role_assumption() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_raw(EXPIRED_TOKEN_RESPONSE, "text/xml"),
            )
            .mount(&server)
            .await;

        let role = AssumeRole::builder().role_arn(ROLE_ARN.to_owned()).build();
        let config = role_config(&server, role);

        let err = resolve_credentials_provider(&config, &EnvConfig::from_pairs(&[]))
            .await
            .expect_err("role assumption rejected");

        assert!(matches!(
            err,
            Error::CannotAssumeRole { ref role_arn, .. } if role_arn == ROLE_ARN
        ));
        assert!(is_cannot_assume_role_error(&err));
        assert!(!is_no_valid_credential_sources_error(&err));
        assert!(err_code_equals(&err, &["ExpiredTokenException"]));
        assert!(!err_code_equals(&err, &["AccessDenied"]));

        let wrapped = anyhow::Error::new(err).context("startup failed");
        assert!(is_cannot_assume_role_error(wrapped.as_ref()));
        assert!(err_code_equals(
            wrapped.as_ref(),
            &["InvalidClientTokenId", "ExpiredTokenException"]
        ));
    }

    #[tokio::test]
    async fn test_should_reject_transitive_key_without_tag() {
        let server = MockServer::start().await;
        let role = AssumeRole::builder()
            .role_arn(ROLE_ARN.to_owned())
            .transitive_tag_keys(vec!["team".to_owned()])
            .build();
        let config = role_config(&server, role);

        let err = resolve_credentials_provider(&config, &EnvConfig::from_pairs(&[]))
            .await
            .expect_err("invalid role configuration");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
