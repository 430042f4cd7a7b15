use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use noder_chat::{ChatClient, ChatConfig, ChatRequest, ContentPart, DEFAULT_CHAT_TIMEOUT};
use noder_replicate::{
    InputSchema, PollConfig, Prediction, ProgressFn, ReplicateClient, ReplicateConfig,
};
use noder_reqwest::{HttpConfig, RetryConfig};
use reqwest::Client;
use serde_json::{Map, Value};

use crate::definition::{Node, NodeKind};
use crate::invoker::{NodeInvoker, UpstreamInputs, extract_result};
use crate::provider::{ChatVendor, CredentialsStore, Provider, ProviderRoute};
use crate::{TRACING_TARGET, WorkflowError, WorkflowResult};

/// System prompt used when the node's form leaves it blank.
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant";

/// Input field names media models use for an image conditioning input, in
/// preference order.
const IMAGE_FIELDS: &[&str] = &[
    "image",
    "input_image",
    "first_frame_image",
    "start_image",
    "image_url",
];

/// Production invoker backed by real provider APIs.
///
/// Chat-routed models go through an OpenAI-compatible completions call;
/// everything else is created as a Replicate prediction and polled to a
/// terminal state. Transient provider errors are retried per the configured
/// [`RetryConfig`].
pub struct GenerationInvoker {
    /// API keys per provider.
    credentials: CredentialsStore,
    /// Client for fetching image assets referenced by plain URL.
    assets: Client,
    /// Retry policy for create and completion calls.
    retry: RetryConfig,
    /// Poll cadence for Replicate predictions.
    poll: PollConfig,
    /// Timeout for chat completion requests.
    chat_timeout: Duration,
}

impl GenerationInvoker {
    /// Creates an invoker with default retry, poll, and timeout settings.
    pub fn new(credentials: CredentialsStore) -> WorkflowResult<Self> {
        let assets = HttpConfig::default().client()?;

        Ok(Self {
            credentials,
            assets,
            retry: RetryConfig::default(),
            poll: PollConfig::default(),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
        })
    }

    /// Overrides the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Overrides the prediction poll cadence.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Overrides the chat completion timeout.
    pub fn with_chat_timeout(mut self, chat_timeout: Duration) -> Self {
        self.chat_timeout = chat_timeout;
        self
    }

    async fn invoke_chat(
        &self,
        vendor: ChatVendor,
        model_id: &str,
        node: &Node,
        inputs: &UpstreamInputs,
    ) -> WorkflowResult<Value> {
        let api_key = self.credentials.require(vendor.provider())?;
        let config =
            ChatConfig::new(vendor.base_url(), api_key)?.with_timeout(self.chat_timeout);
        let client = ChatClient::new(config)?;

        let system_prompt = node
            .data
            .system_prompt
            .as_deref()
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        let prompt = compose_prompt(node, inputs);

        let mut request =
            ChatRequest::new(vendor.request_model(model_id)).with_system(system_prompt);
        if inputs.images.is_empty() {
            request = request.with_user_text(prompt);
        } else {
            let mut parts = vec![ContentPart::text(prompt)];
            for image in &inputs.images {
                parts.push(ContentPart::image_url(self.resolve_image(image).await?));
            }
            request = request.with_user_parts(parts);
        }
        if let Some(temperature) = node.data.temperature {
            request = request.with_temperature(temperature as f32);
        }
        if let Some(max_tokens) = node.data.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        tracing::info!(
            target: TRACING_TARGET,
            node_id = %node.id,
            vendor = %vendor,
            model = %model_id,
            "Invoking chat completion"
        );

        let response = self
            .retry
            .retry("chat_completion", || client.complete(&request))
            .await?;
        let content = response.first_content()?;
        Ok(Value::String(content))
    }

    async fn invoke_poll(
        &self,
        model_id: &str,
        node: &Node,
        inputs: &UpstreamInputs,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> WorkflowResult<Value> {
        let api_key = self.credentials.require(Provider::Replicate)?;
        let client = ReplicateClient::new(ReplicateConfig::new(api_key)?)?;

        // Schema lookup is best-effort; without it all set fields are sent.
        let schema = match client.get_input_schema(model_id).await {
            Ok(schema) => schema,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    node_id = %node.id,
                    model = %model_id,
                    %error,
                    "Failed to fetch model input schema, sending all fields"
                );
                None
            }
        };

        let mut images = Vec::with_capacity(inputs.images.len());
        for image in &inputs.images {
            images.push(self.resolve_image(image).await?);
        }
        let input = build_input(node, inputs, &images, schema.as_ref());

        tracing::info!(
            target: TRACING_TARGET,
            node_id = %node.id,
            model = %model_id,
            "Creating prediction"
        );

        let prediction = self
            .retry
            .retry("create_prediction", || {
                client.create_prediction(model_id, input.clone())
            })
            .await?;
        let finished = client
            .poll_prediction(&prediction.id, &self.poll, on_progress)
            .await?;

        finish_prediction(finished, node.kind)
    }

    /// Resolves an image reference into something providers accept inline.
    ///
    /// Data URLs pass through; plain URLs are fetched and re-encoded as a
    /// base64 data URL with the response's content type.
    async fn resolve_image(&self, source: &str) -> WorkflowResult<String> {
        if source.starts_with("data:") {
            return Ok(source.to_owned());
        }

        let response = self.assets.get(source).send().await?.error_for_status()?;
        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .unwrap_or_else(|| "image/png".to_owned());
        let bytes = response.bytes().await?;

        Ok(format!("data:{mime};base64,{}", BASE64.encode(&bytes)))
    }
}

#[async_trait]
impl NodeInvoker for GenerationInvoker {
    async fn invoke(
        &self,
        node: &Node,
        inputs: &UpstreamInputs,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> WorkflowResult<Value> {
        let Some(model_id) = node.data.effective_model() else {
            return Err(WorkflowError::InvalidNodeConfig {
                node_id: node.id.clone(),
                message: "no model selected".to_owned(),
            });
        };
        let model_id = model_id.to_owned();

        match ProviderRoute::for_model(&model_id) {
            ProviderRoute::Chat(vendor) => self.invoke_chat(vendor, &model_id, node, inputs).await,
            ProviderRoute::Poll => self.invoke_poll(&model_id, node, inputs, on_progress).await,
        }
    }
}

/// Normalizes a succeeded prediction into the node's result.
///
/// A succeeded prediction without output, or with an empty output list, is
/// surfaced as an unexpected-output error here rather than leaking a raw
/// provider value to the run.
fn finish_prediction(prediction: Prediction, kind: NodeKind) -> WorkflowResult<Value> {
    let Some(output) = prediction.output else {
        return Err(WorkflowError::UnexpectedOutput(format!(
            "prediction {} succeeded without output",
            prediction.id
        )));
    };
    extract_result(&output, kind)
}

/// Combines the node's own prompt with upstream text, blank-line separated.
fn compose_prompt(node: &Node, inputs: &UpstreamInputs) -> String {
    let own = node.data.effective_prompt().trim();
    match inputs.joined_text() {
        Some(upstream) if own.is_empty() => upstream,
        Some(upstream) => format!("{own}\n\n{upstream}"),
        None => own.to_owned(),
    }
}

/// Assembles the prediction input object from form state and upstream data.
///
/// Typed fields are included when set, filtered by the model's input schema
/// when one is available. Extra form fields were set deliberately and are
/// always forwarded.
fn build_input(
    node: &Node,
    inputs: &UpstreamInputs,
    images: &[String],
    schema: Option<&InputSchema>,
) -> Value {
    let accepts = |field: &str| schema.map(|s| s.accepts(field)).unwrap_or(true);
    let mut input = Map::new();

    let prompt = compose_prompt(node, inputs);
    if !prompt.is_empty() {
        input.insert("prompt".to_owned(), Value::String(prompt));
    }

    let form = &node.data;
    if let Some(negative) = &form.negative_prompt
        && accepts("negative_prompt")
    {
        input.insert("negative_prompt".to_owned(), Value::String(negative.clone()));
    }
    if let Some(width) = form.width
        && accepts("width")
    {
        input.insert("width".to_owned(), width.into());
    }
    if let Some(height) = form.height
        && accepts("height")
    {
        input.insert("height".to_owned(), height.into());
    }
    if let Some(num_outputs) = form.num_outputs
        && accepts("num_outputs")
    {
        input.insert("num_outputs".to_owned(), num_outputs.into());
    }
    if let Some(duration) = form.duration
        && accepts("duration")
    {
        input.insert("duration".to_owned(), duration.into());
    }
    if let Some(fps) = form.fps
        && accepts("fps")
    {
        input.insert("fps".to_owned(), fps.into());
    }
    if let Some(temperature) = form.temperature
        && accepts("temperature")
    {
        input.insert("temperature".to_owned(), temperature.into());
    }
    if let Some(max_tokens) = form.max_tokens
        && accepts("max_tokens")
    {
        input.insert("max_tokens".to_owned(), max_tokens.into());
    }

    for (field, value) in &form.extra {
        if accepts(field) {
            input.insert(field.clone(), value.clone());
        }
    }

    if let Some(image) = images.first() {
        let field = schema
            .and_then(|s| IMAGE_FIELDS.iter().find(|&&field| s.accepts(field)))
            .copied()
            .unwrap_or("image");
        input.insert(field.to_owned(), Value::String(image.clone()));
    }

    Value::Object(input)
}
