use std::sync::Arc;

use async_trait::async_trait;

use crate::{ClaragError, Runnable};

/// Tries `primary`, then each fallback in order, returning the first success
/// or the last error.
pub struct RunnableWithFallbacks<Input, Output> {
    primary: Arc<dyn Runnable<Input, Output>>,
    fallbacks: Vec<Arc<dyn Runnable<Input, Output>>>,
}

impl<Input, Output> RunnableWithFallbacks<Input, Output> {
    pub fn new(
        primary: Arc<dyn Runnable<Input, Output>>,
        fallbacks: Vec<Arc<dyn Runnable<Input, Output>>>,
    ) -> Self {
        Self { primary, fallbacks }
    }
}

#[async_trait]
impl<Input, Output> Runnable<Input, Output> for RunnableWithFallbacks<Input, Output>
where
    Input: Clone + Send + Sync + 'static,
    Output: Send + Sync + 'static,
{
    async fn invoke(&self, input: Input) -> Result<Output, ClaragError> {
        let mut last_error = match self.primary.invoke(input.clone()).await {
            Ok(output) => return Ok(output),
            Err(e) => e,
        };

        for (position, fallback) in self.fallbacks.iter().enumerate() {
            tracing::warn!(
                error = %last_error,
                fallback = position,
                "primary runnable failed, trying fallback"
            );
            match fallback.invoke(input.clone()).await {
                Ok(output) => return Ok(output),
                Err(e) => last_error = e,
            }
        }

        Err(last_error)
    }
}
