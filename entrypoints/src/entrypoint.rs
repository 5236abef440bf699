use crate::context::Context;
use crate::error::{EntrypointError, Result};
use crate::pricing::PriceTier;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Output of an entrypoint together with the time its upstream data settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrypointResult<T> {
    pub output: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> EntrypointResult<T> {
    pub fn new(output: T, fetched_at: DateTime<Utc>) -> Self {
        Self { output, fetched_at }
    }

}

/// Checks that serde alone cannot express
pub trait ValidateInput {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A typed, priced query operation
#[async_trait]
pub trait Entrypoint: Send + Sync {
    type Input: DeserializeOwned + JsonSchema + ValidateInput + Send;
    type Output: Serialize + Send;

    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn tier(&self) -> PriceTier;

    async fn run(
        &self,
        ctx: &Context,
        input: Self::Input,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<Self::Output>>;
}

/// Object-safe view of an [`Entrypoint`] over raw JSON input and output
#[async_trait]
pub trait ErasedEntrypoint: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn tier(&self) -> PriceTier;
    fn input_schema(&self) -> Value;

    async fn invoke(
        &self,
        ctx: &Context,
        input: Value,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<Value>>;
}

#[async_trait]
impl<E: Entrypoint> ErasedEntrypoint for E {
    fn name(&self) -> &'static str {
        Entrypoint::name(self)
    }

    fn description(&self) -> &'static str {
        Entrypoint::description(self)
    }

    fn tier(&self) -> PriceTier {
        Entrypoint::tier(self)
    }

    fn input_schema(&self) -> Value {
        serde_json::to_value(schema_for!(E::Input)).unwrap_or(Value::Null)
    }

    async fn invoke(
        &self,
        ctx: &Context,
        input: Value,
        cancel: &CancellationToken,
    ) -> Result<EntrypointResult<Value>> {
        let input = decode_input::<E::Input>(input)?;
        let result = self.run(ctx, input, cancel).await?;
        let output = serde_json::to_value(result.output)?;
        Ok(EntrypointResult::new(output, result.fetched_at))
    }
}

/// Decode and validate raw input. A missing body counts as `{}`.
pub fn decode_input<T>(input: Value) -> Result<T>
where
    T: DeserializeOwned + ValidateInput,
{
    let input = match input {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    let decoded: T = serde_json::from_value(input)
        .map_err(|e| EntrypointError::invalid_input(e.to_string()))?;
    decoded.validate()?;
    Ok(decoded)
}
