use std::future::Future;

use crate::client::PostmanService;
use crate::error::{ApiError, DescribeError};
use crate::printers::{PrintOptions, TableRow, table_string};
use crate::render::describe_collections;
use crate::resources::ResourceKind;

/// Fetches every resource named by `args`, then renders them.
///
/// Fetches run one at a time in argument order and the first failure aborts
/// the whole command, so either every resource is rendered or nothing is.
pub async fn describe<S: PostmanService>(
    service: &S,
    kind: ResourceKind,
    args: &[String],
    options: PrintOptions,
) -> Result<String, DescribeError> {
    log::debug!("describe {} {:?}", kind, args);

    match kind {
        ResourceKind::Collection => {
            let collections =
                fetch_each(kind, ids(kind, args)?, |id| service.collection(id)).await?;
            Ok(describe_collections(&collections)?)
        }
        ResourceKind::Environment => {
            let environments =
                fetch_each(kind, ids(kind, args)?, |id| service.environment(id)).await?;
            table(&environments, options)
        }
        ResourceKind::Mock => {
            let mocks = fetch_each(kind, ids(kind, args)?, |id| service.mock(id)).await?;
            table(&mocks, options)
        }
        ResourceKind::Monitor => {
            let monitors = fetch_each(kind, ids(kind, args)?, |id| service.monitor(id)).await?;
            table(&monitors, options)
        }
        ResourceKind::Api => {
            let apis = fetch_each(kind, ids(kind, args)?, |id| service.api(id)).await?;
            table(&apis, options)
        }
        ResourceKind::ApiVersion => {
            let Some((api_id, version_ids)) =
                args.split_first().filter(|(_, rest)| !rest.is_empty())
            else {
                return Err(DescribeError::Usage(
                    "api-versions requires an API id followed by one or more version ids".into(),
                ));
            };
            let versions =
                fetch_each(kind, version_ids, |id| service.api_version(api_id, id)).await?;
            table(&versions, options)
        }
        ResourceKind::Workspace => {
            let workspaces = fetch_each(kind, ids(kind, args)?, |id| service.workspace(id)).await?;
            table(&workspaces, options)
        }
        ResourceKind::User => {
            if !args.is_empty() {
                return Err(DescribeError::Usage("user takes no arguments".into()));
            }
            let user = service.user().await.map_err(|source| DescribeError::Fetch {
                kind,
                id: "me".into(),
                source,
            })?;
            table(&[user], options)
        }
        ResourceKind::Schema => {
            let [api_id, version_id, id] = args else {
                return Err(DescribeError::Usage(
                    "schema requires exactly three arguments: API id, version id and schema id"
                        .into(),
                ));
            };
            let schema = service
                .schema(api_id, version_id, id)
                .await
                .map_err(|source| DescribeError::Fetch {
                    kind,
                    id: id.clone(),
                    source,
                })?;
            table(&[schema], options)
        }
    }
}

fn ids(kind: ResourceKind, args: &[String]) -> Result<&[String], DescribeError> {
    if args.is_empty() {
        return Err(DescribeError::Usage(format!(
            "describing a {} requires at least one id",
            kind
        )));
    }
    Ok(args)
}

async fn fetch_each<'a, T, F, Fut>(
    kind: ResourceKind,
    ids: &'a [String],
    mut fetch: F,
) -> Result<Vec<T>, DescribeError>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut resources = Vec::with_capacity(ids.len());
    for id in ids {
        let resource = fetch(id.as_str())
            .await
            .map_err(|source| DescribeError::Fetch {
                kind,
                id: id.clone(),
                source,
            })?;
        resources.push(resource);
    }
    Ok(resources)
}

fn table<T: TableRow>(resources: &[T], options: PrintOptions) -> Result<String, DescribeError> {
    table_string(resources, options).map_err(|e| DescribeError::Render(e.into()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::resources::{
        Api, ApiVersion, Collection, Environment, Mock, Monitor, Schema, User, Workspace,
    };
    use crate::resources::from_json_str;
    use serde::de::DeserializeOwned;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned JSON by request path and records every path asked for.
    #[derive(Default)]
    struct StubService {
        responses: HashMap<String, Value>,
        requests: RefCell<Vec<String>>,
    }

    impl StubService {
        fn with(mut self, path: &str, value: Value) -> Self {
            self.responses.insert(path.to_string(), value);
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }

        fn fetch<T: DeserializeOwned>(&self, path: String) -> Result<T, ApiError> {
            self.requests.borrow_mut().push(path.clone());
            match self.responses.get(&path) {
                Some(value) => from_json_str(&value.to_string()).map_err(|source| {
                    ApiError::MalformedPayload {
                        resource: "stub",
                        source,
                    }
                }),
                None => Err(ApiError::Response {
                    status: 404,
                    name: "instanceNotFoundError".into(),
                    message: format!("{} not found", path),
                }),
            }
        }
    }

    impl PostmanService for StubService {
        async fn collection(&self, id: &str) -> Result<Collection, ApiError> {
            self.fetch(format!("collections/{id}"))
        }
        async fn environment(&self, id: &str) -> Result<Environment, ApiError> {
            self.fetch(format!("environments/{id}"))
        }
        async fn mock(&self, id: &str) -> Result<Mock, ApiError> {
            self.fetch(format!("mocks/{id}"))
        }
        async fn monitor(&self, id: &str) -> Result<Monitor, ApiError> {
            self.fetch(format!("monitors/{id}"))
        }
        async fn api(&self, id: &str) -> Result<Api, ApiError> {
            self.fetch(format!("apis/{id}"))
        }
        async fn api_version(&self, api_id: &str, id: &str) -> Result<ApiVersion, ApiError> {
            self.fetch(format!("apis/{api_id}/versions/{id}"))
        }
        async fn workspace(&self, id: &str) -> Result<Workspace, ApiError> {
            self.fetch(format!("workspaces/{id}"))
        }
        async fn user(&self) -> Result<User, ApiError> {
            self.fetch("me".to_string())
        }
        async fn schema(
            &self,
            api_id: &str,
            version_id: &str,
            id: &str,
        ) -> Result<Schema, ApiError> {
            self.fetch(format!("apis/{api_id}/versions/{version_id}/schemas/{id}"))
        }
    }

    fn args(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn demo_collection() -> Value {
        json!({
            "info": {"_postman_id": "abc", "name": "Demo", "schema": "v2.1.0"},
            "item": [{"_postman_id": "r1", "name": "Ping"}]
        })
    }

    #[tokio::test]
    async fn describe_collection() {
        let service = StubService::default().with("collections/abc", demo_collection());
        let out = describe(
            &service,
            ResourceKind::Collection,
            &args(&["abc"]),
            PrintOptions::default(),
        )
        .await
        .unwrap();
        assert!(out.starts_with("Info:\n  ID:      abc\n"));
        assert!(out.contains("    Name:  Ping\n"));
    }

    #[tokio::test]
    async fn first_failure_wins() {
        let service = StubService::default().with("collections/abc", demo_collection());
        let err = describe(
            &service,
            ResourceKind::Collection,
            &args(&["abc", "xyz"]),
            PrintOptions::default(),
        )
        .await
        .unwrap_err();

        match err {
            DescribeError::Fetch { kind, id, source } => {
                assert_eq!(kind, ResourceKind::Collection);
                assert_eq!(id, "xyz");
                assert_eq!(source.status(), Some(404));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(service.requests(), vec!["collections/abc", "collections/xyz"]);
    }

    #[tokio::test]
    async fn failure_stops_later_fetches() {
        let service = StubService::default()
            .with("environments/e1", json!({"id": "e1", "name": "One"}))
            .with("environments/e3", json!({"id": "e3", "name": "Three"}));
        let err = describe(
            &service,
            ResourceKind::Environment,
            &args(&["e1", "e2", "e3"]),
            PrintOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DescribeError::Fetch { ref id, .. } if id == "e2"));
        assert_eq!(service.requests(), vec!["environments/e1", "environments/e2"]);
    }

    #[tokio::test]
    async fn malformed_collection_is_reported() {
        let service = StubService::default().with(
            "collections/bad",
            json!({"info": {"_postman_id": "bad"}, "item": [{"name": "Broken", "item": 7}]}),
        );
        let err = describe(
            &service,
            ResourceKind::Collection,
            &args(&["bad"]),
            PrintOptions::default(),
        )
        .await
        .unwrap_err();
        match err {
            DescribeError::Fetch {
                source: ApiError::MalformedPayload { source, .. },
                ..
            } => assert!(source.to_string().contains("invalid folder"), "{}", source),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unsupported_script_body_fails_the_render() {
        let service = StubService::default().with(
            "collections/abc",
            json!({
                "info": {"_postman_id": "abc", "name": "Demo", "schema": "v2.1.0"},
                "item": [{"name": "Ping", "event": [{"listen": "test", "script": {"exec": 42}}]}]
            }),
        );
        let err = describe(
            &service,
            ResourceKind::Collection,
            &args(&["abc"]),
            PrintOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            DescribeError::Render(RenderError::UnsupportedScriptBody { found: "a number", .. })
        ));
    }

    #[tokio::test]
    async fn describe_environments_as_table() {
        let service = StubService::default()
            .with("environments/e1", json!({"id": "e1", "name": "Staging", "values": []}))
            .with(
                "environments/e2",
                json!({"id": "e2", "name": "Production", "values": [{"key": "k", "value": "v"}]}),
            );
        let out = describe(
            &service,
            ResourceKind::Environment,
            &args(&["e1", "e2"]),
            PrintOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(
            out,
            "ID  NAME        VALUES\ne1  Staging     0\ne2  Production  1\n"
        );
    }

    #[tokio::test]
    async fn api_versions_use_first_argument_as_parent() {
        let service = StubService::default()
            .with("apis/a1/versions/v1", json!({"id": "v1", "name": "1.0", "api": "a1"}))
            .with("apis/a1/versions/v2", json!({"id": "v2", "name": "2.0", "api": "a1"}));
        let out = describe(
            &service,
            ResourceKind::ApiVersion,
            &args(&["a1", "v1", "v2"]),
            PrintOptions { no_headers: true },
        )
        .await
        .unwrap();
        assert_eq!(out, "v1  1.0  a1\nv2  2.0  a1\n");
        assert_eq!(
            service.requests(),
            vec!["apis/a1/versions/v1", "apis/a1/versions/v2"]
        );
    }

    #[tokio::test]
    async fn schema_takes_three_arguments() {
        let service = StubService::default().with(
            "apis/a1/versions/v1/schemas/s1",
            json!({"id": "s1", "type": "openapi3", "language": "json", "apiVersion": "v1"}),
        );
        let out = describe(
            &service,
            ResourceKind::Schema,
            &args(&["a1", "v1", "s1"]),
            PrintOptions::default(),
        )
        .await
        .unwrap();
        assert!(out.contains("s1  openapi3  json"));

        for bad in [vec!["a1", "v1"], vec!["a1", "v1", "s1", "extra"]] {
            let err = describe(&service, ResourceKind::Schema, &args(&bad), PrintOptions::default())
                .await
                .unwrap_err();
            assert!(matches!(err, DescribeError::Usage(_)));
        }
    }

    #[tokio::test]
    async fn describe_user() {
        let service = StubService::default().with("me", json!({"id": 42}));
        let out = describe(&service, ResourceKind::User, &[], PrintOptions::default())
            .await
            .unwrap();
        assert_eq!(out, "ID  USERNAME  EMAIL\n42            \n");

        let err = describe(&service, ResourceKind::User, &args(&["x"]), PrintOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DescribeError::Usage(_)));
    }

    #[tokio::test]
    async fn usage_errors_fetch_nothing() {
        let service = StubService::default();
        for kind in [
            ResourceKind::Collection,
            ResourceKind::Mock,
            ResourceKind::Monitor,
            ResourceKind::Api,
            ResourceKind::Workspace,
        ] {
            let err = describe(&service, kind, &[], PrintOptions::default())
                .await
                .unwrap_err();
            assert!(matches!(err, DescribeError::Usage(_)), "{kind}");
        }

        let err = describe(
            &service,
            ResourceKind::ApiVersion,
            &args(&["a1"]),
            PrintOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DescribeError::Usage(_)));
        assert!(service.requests().is_empty());
    }
}
