//! Identifier returned by the snowflake service.

use serde::Deserialize;

/// Response body of `GET {baseUrl}/api/v1/snowflake/next`.
///
/// ```json
/// { "id": 653436189499457547, "nodeId": 3, "host": "snowflake-2" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeId {
    pub id: i64,
    pub node_id: i64,
    pub host: String,
}
