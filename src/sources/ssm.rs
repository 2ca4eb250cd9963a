//! AWS Systems Manager Parameter Store client.

use super::{Parameter, ParameterStore, StoreError};
use crate::error::{ConfigError, Result};
use aws_config::BehaviorVersion;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ssm::operation::get_parameters_by_path::GetParametersByPathError;
use tokio::runtime::Runtime;
use tracing::trace;

/// Largest page `GetParametersByPath` will return.
const MAX_PAGE_SIZE: i32 = 10;

/// Parameter store backed by AWS Systems Manager.
///
/// Each fetch issues `GetParametersByPath` with decryption enabled and
/// recursion disabled, following `NextToken` until the last page. Returned
/// names are made relative to the queried path, so `/prod/app/db_url` fetched
/// under `/prod/app/` is reported as `db_url`.
///
/// The AWS SDK is async; this store owns a current-thread tokio runtime and
/// blocks on it. Do not call [`fetch`](ParameterStore::fetch) or drop the
/// store from inside another async runtime; use `spawn_blocking` there.
///
/// # Examples
///
/// ```rust,no_run
/// use ssm_config_provider::sources::SsmParameterStore;
///
/// # fn example() -> ssm_config_provider::error::Result<()> {
/// let store = SsmParameterStore::builder()
///     .with_region("us-east-1")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SsmParameterStore {
    client: Client,
    page_size: Option<i32>,
    runtime: Runtime,
}

impl SsmParameterStore {
    /// Create a new builder for constructing an SSM store.
    pub fn builder() -> SsmParameterStoreBuilder {
        SsmParameterStoreBuilder::new()
    }

    async fn fetch_all_pages(&self, path: &str) -> std::result::Result<Vec<Parameter>, StoreError> {
        let mut parameters = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .client
                .get_parameters_by_path()
                .path(path)
                .with_decryption(true)
                .recursive(false)
                .set_max_results(self.page_size)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(classify_error)?;
            pages += 1;

            for parameter in output.parameters() {
                if let (Some(name), Some(value)) = (parameter.name(), parameter.value()) {
                    parameters.push(Parameter::new(relative_name(path, name), value));
                }
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        trace!(path, pages, count = parameters.len(), "read all pages");
        Ok(parameters)
    }
}

impl ParameterStore for SsmParameterStore {
    fn fetch(&self, path: &str) -> std::result::Result<Vec<Parameter>, StoreError> {
        self.runtime.block_on(self.fetch_all_pages(path))
    }

    fn name(&self) -> String {
        match self.client.config().region() {
            Some(region) => format!("ssm:{}", region),
            None => "ssm".to_string(),
        }
    }
}

/// Builder for constructing an `SsmParameterStore`.
pub struct SsmParameterStoreBuilder {
    region: Option<String>,
    page_size: Option<i32>,
    client: Option<Client>,
}

impl SsmParameterStoreBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            region: None,
            page_size: None,
            client: None,
        }
    }

    /// Set the AWS region, overriding the default provider chain.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the number of parameters requested per page (1 to 10).
    ///
    /// By default the service picks the page size.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Use a pre-built SDK client instead of loading the default AWS config.
    ///
    /// The region set with [`with_region`](Self::with_region) is ignored when
    /// a client is supplied.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the SSM store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The page size is outside 1 to 10
    /// - The tokio runtime cannot be created
    pub fn build(self) -> Result<SsmParameterStore> {
        if let Some(page_size) = self.page_size {
            if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
                return Err(ConfigError::InvalidArgument(format!(
                    "page size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, page_size
                )));
            }
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConfigError::ClientBuild(format!("Failed to create runtime: {}", e)))?;

        let client = match self.client {
            Some(client) => client,
            None => {
                let mut loader = aws_config::defaults(BehaviorVersion::latest());
                if let Some(region) = self.region {
                    loader = loader.region(Region::new(region));
                }
                let sdk_config = runtime.block_on(loader.load());
                Client::new(&sdk_config)
            }
        };

        Ok(SsmParameterStore {
            client,
            page_size: self.page_size,
            runtime,
        })
    }
}

impl Default for SsmParameterStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the queried path from a fully qualified parameter name.
fn relative_name(path: &str, name: &str) -> String {
    name.strip_prefix(path).unwrap_or(name).to_string()
}

/// Map an SDK failure onto the store error taxonomy.
fn classify_error<R>(err: SdkError<GetParametersByPathError, R>) -> StoreError
where
    R: std::fmt::Debug,
{
    let detail = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::ServiceError(service) => {
            let code = service.err().code().unwrap_or("Unknown");
            match code {
                "AccessDeniedException" => StoreError::AccessDenied(detail),
                "ThrottlingException" => StoreError::Throttled(detail),
                _ => StoreError::Service {
                    code: code.to_string(),
                    message: service.err().message().unwrap_or_default().to_string(),
                },
            }
        }
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StoreError::Transport(detail)
        }
        _ => StoreError::Other(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ssm::config::Credentials;
    use aws_sdk_ssm::error::ErrorMetadata;
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;

    fn page(body: &str) -> ReplayEvent {
        ReplayEvent::new(
            http::Request::builder()
                .uri("https://ssm.us-east-1.amazonaws.com/")
                .body(SdkBody::empty())
                .unwrap(),
            http::Response::builder()
                .status(200)
                .body(SdkBody::from(body))
                .unwrap(),
        )
    }

    fn replay_store(pages: Vec<ReplayEvent>) -> (SsmParameterStore, StaticReplayClient) {
        let http_client = StaticReplayClient::new(pages);
        let config = aws_sdk_ssm::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("akid", "secret", None, None, "test"))
            .http_client(http_client.clone())
            .build();

        let store = SsmParameterStore::builder()
            .with_client(Client::from_conf(config))
            .build()
            .unwrap();
        (store, http_client)
    }

    fn service_error(code: &str, message: &str) -> SdkError<GetParametersByPathError, ()> {
        let metadata = ErrorMetadata::builder().code(code).message(message).build();
        SdkError::service_error(GetParametersByPathError::generic(metadata), ())
    }

    #[test]
    fn test_relative_name() {
        assert_eq!(relative_name("/prod/app/", "/prod/app/db_url"), "db_url");
        assert_eq!(relative_name("/global/", "/global/region"), "region");
        assert_eq!(relative_name("/global/", "standalone"), "standalone");
    }

    #[test]
    fn test_classify_access_denied() {
        let err = classify_error(service_error("AccessDeniedException", "denied"));
        assert!(matches!(err, StoreError::AccessDenied(_)));
    }

    #[test]
    fn test_classify_throttled() {
        let err = classify_error(service_error("ThrottlingException", "Rate exceeded"));
        assert!(matches!(err, StoreError::Throttled(_)));
    }

    #[test]
    fn test_classify_other_service_error() {
        let err = classify_error(service_error("InvalidKeyId", "bad key"));
        assert_eq!(
            err,
            StoreError::Service {
                code: "InvalidKeyId".to_string(),
                message: "bad key".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_timeout_as_transport() {
        let err: SdkError<GetParametersByPathError, ()> = SdkError::timeout_error("timed out");
        assert!(matches!(classify_error(err), StoreError::Transport(_)));
    }

    #[test]
    fn test_fetch_follows_next_token() {
        let (store, http_client) = replay_store(vec![
            page(concat!(
                r#"{"Parameters":[{"Name":"/prod/app/a","Type":"String","Value":"1"}],"#,
                r#""NextToken":"t1"}"#,
            )),
            page(r#"{"Parameters":[{"Name":"/prod/app/b","Type":"SecureString","Value":"2"}]}"#),
        ]);

        let parameters = store.fetch("/prod/app/").unwrap();
        assert_eq!(
            parameters,
            vec![Parameter::new("a", "1"), Parameter::new("b", "2")]
        );

        let bodies: Vec<String> = http_client
            .actual_requests()
            .map(|request| {
                String::from_utf8_lossy(request.body().bytes().unwrap_or_default()).into_owned()
            })
            .collect();
        assert_eq!(bodies.len(), 2);
        for body in &bodies {
            assert!(body.contains(r#""Path":"/prod/app/""#));
            assert!(body.contains(r#""WithDecryption":true"#));
            assert!(body.contains(r#""Recursive":false"#));
        }
        assert!(!bodies[0].contains("NextToken"));
        assert!(bodies[1].contains(r#""NextToken":"t1""#));
    }

    #[test]
    fn test_fetch_maps_service_failure() {
        let (store, _http_client) = replay_store(vec![ReplayEvent::new(
            http::Request::builder()
                .uri("https://ssm.us-east-1.amazonaws.com/")
                .body(SdkBody::empty())
                .unwrap(),
            http::Response::builder()
                .status(400)
                .header("x-amzn-errortype", "AccessDeniedException")
                .body(SdkBody::from(r#"{"__type":"AccessDeniedException","message":"no"}"#))
                .unwrap(),
        )]);

        let err = store.fetch("/global/").unwrap_err();
        assert!(matches!(err, StoreError::AccessDenied(_)));
    }

    #[test]
    fn test_provider_closed_on_blocking_thread() {
        use crate::core::{ConfigProvider, ProviderOptions, ProviderState, SsmConfigProvider};

        let (store, _http_client) = replay_store(Vec::new());
        let mut provider = SsmConfigProvider::builder().with_store(store).build();
        provider
            .configure_with(&ProviderOptions::new().with_environment("prod"))
            .unwrap();

        let outer = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        // The store's own runtime cannot be dropped on an async worker.
        let provider = outer.block_on(async move {
            tokio::task::spawn_blocking(move || {
                provider.close();
                provider
            })
            .await
            .unwrap()
        });
        assert_eq!(provider.state(), ProviderState::Closed);
        assert!(!provider.has_store());
    }

    #[test]
    fn test_builder_rejects_page_size() {
        let result = SsmParameterStore::builder().with_page_size(11).build();
        assert!(matches!(result, Err(ConfigError::InvalidArgument(_))));

        let result = SsmParameterStore::builder().with_page_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_region() {
        let store = SsmParameterStore::builder()
            .with_region("us-east-1")
            .with_page_size(10)
            .build()
            .unwrap();

        assert_eq!(store.name(), "ssm:us-east-1");
        assert_eq!(store.page_size, Some(10));
    }
}
