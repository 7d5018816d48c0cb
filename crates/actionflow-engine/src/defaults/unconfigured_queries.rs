//! Query runner used when the host registers none.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::QueryError;
use crate::traits::QueryRunner;

/// Fails every query with [`QueryError::Unconfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredQueryRunner;

#[async_trait]
impl QueryRunner for UnconfiguredQueryRunner {
    async fn run(
        &self,
        action_id: &str,
        _params: &BTreeMap<String, Value>,
    ) -> Result<Value, QueryError> {
        tracing::warn!(action_id = %action_id, "query run without a configured query runner");
        Err(QueryError::Unconfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_fails() {
        let err = UnconfiguredQueryRunner
            .run("fetchUsers", &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Unconfigured));
    }
}
