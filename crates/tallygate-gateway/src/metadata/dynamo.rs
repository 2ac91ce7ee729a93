//! DynamoDB counter store.
//!
//! Table layout: partition key `sourceIp` (S, base64 of the client address),
//! sort key `path` (S), plus `method` (S) and `count` (N).
//!
//! `count` and `path` are DynamoDB reserved words, so every attribute is
//! addressed through `#name` placeholders in expressions.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use tallygate_core::error::{GatewayError, Result};
use tallygate_core::model::{CounterField, CounterQuery, CounterRecord};

use crate::metadata::store::CounterStore;

const SOURCE_IP_VALUE: &str = ":requestSourceIp";
const PATH_VALUE: &str = ":requestPath";

pub struct DynamoCounterStore {
    client: Client,
}

impl DynamoCounterStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client from the standard AWS environment (region, credentials chain).
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl CounterStore for DynamoCounterStore {
    async fn query(&self, q: &CounterQuery) -> Result<Option<CounterRecord>> {
        let parts = QueryParts::from_query(q);
        let out = self
            .client
            .query()
            .table_name(&q.table)
            .key_condition_expression(parts.key_condition)
            .projection_expression(parts.projection)
            .set_expression_attribute_names(Some(parts.names))
            .set_expression_attribute_values(Some(parts.values))
            .limit(1)
            .send()
            .await
            .map_err(|e| {
                GatewayError::Store(format!("query {} failed: {}", q.table, DisplayErrorContext(&e)))
            })?;

        out.items().first().map(record_from_item).transpose()
    }

    async fn put_item(&self, table: &str, record: &CounterRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item_from_record(record)))
            .send()
            .await
            .map_err(|e| {
                GatewayError::Store(format!("put_item {table} failed: {}", DisplayErrorContext(&e)))
            })?;
        Ok(())
    }
}

/// Expressions and bindings for the key-equality query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParts {
    pub key_condition: String,
    pub projection: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl QueryParts {
    pub fn from_query(q: &CounterQuery) -> Self {
        let source_ip = placeholder(CounterField::SourceIp.as_str());
        let path = placeholder(CounterField::Path.as_str());

        let projection = q
            .projection_expression()
            .split(',')
            .map(placeholder)
            .collect::<Vec<_>>()
            .join(",");

        let mut names: HashMap<String, String> = q
            .projection
            .iter()
            .map(|f| (placeholder(f.as_str()), f.as_str().to_string()))
            .collect();
        names.insert(source_ip.clone(), CounterField::SourceIp.as_str().to_string());
        names.insert(path.clone(), CounterField::Path.as_str().to_string());

        let values = HashMap::from([
            (
                SOURCE_IP_VALUE.to_string(),
                AttributeValue::S(q.key.source_ip.clone()),
            ),
            (PATH_VALUE.to_string(), AttributeValue::S(q.key.path.clone())),
        ]);

        Self {
            key_condition: format!("{source_ip} = {SOURCE_IP_VALUE} AND {path} = {PATH_VALUE}"),
            projection,
            names,
            values,
        }
    }
}

fn placeholder(attr: &str) -> String {
    format!("#{attr}")
}

/// Full item written by `put_item`.
pub fn item_from_record(record: &CounterRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            CounterField::SourceIp.as_str().to_string(),
            AttributeValue::S(record.source_ip.clone()),
        ),
        (
            CounterField::Path.as_str().to_string(),
            AttributeValue::S(record.path.clone()),
        ),
        (
            CounterField::Method.as_str().to_string(),
            AttributeValue::S(record.method.clone()),
        ),
        (
            CounterField::Count.as_str().to_string(),
            AttributeValue::N(record.count.to_string()),
        ),
    ])
}

/// Decode a projected item. Missing or mistyped attributes are store errors.
pub fn record_from_item(item: &HashMap<String, AttributeValue>) -> Result<CounterRecord> {
    let count = attr(item, CounterField::Count)?
        .as_n()
        .map_err(|_| malformed(CounterField::Count, "N"))?
        .parse::<u64>()
        .map_err(|e| GatewayError::Store(format!("malformed item: count: {e}")))?;

    Ok(CounterRecord {
        source_ip: string_attr(item, CounterField::SourceIp)?,
        path: string_attr(item, CounterField::Path)?,
        method: string_attr(item, CounterField::Method)?,
        count,
    })
}

fn attr(item: &HashMap<String, AttributeValue>, field: CounterField) -> Result<&AttributeValue> {
    item.get(field.as_str())
        .ok_or_else(|| GatewayError::Store(format!("malformed item: missing {}", field.as_str())))
}

fn string_attr(item: &HashMap<String, AttributeValue>, field: CounterField) -> Result<String> {
    attr(item, field)?
        .as_s()
        .map(String::clone)
        .map_err(|_| malformed(field, "S"))
}

fn malformed(field: CounterField, expected: &str) -> GatewayError {
    GatewayError::Store(format!(
        "malformed item: {} is not of type {expected}",
        field.as_str()
    ))
}
