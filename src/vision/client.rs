//! Anthropic Messages API vision client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{FoodImage, VisionClient, VisionError, VisionResult, ANALYSIS_PROMPT, SYSTEM_PROMPT};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Vision client backed by a Claude model
#[derive(Clone)]
pub struct AnthropicVision {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicVision {
    pub fn new(api_key: String, model: String, base_url: String) -> VisionResult<Self> {
        if api_key.trim().is_empty() {
            return Err(VisionError::MissingApiKey);
        }
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request<'a>(&'a self, image: &FoodImage, image_data: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: image.media_type(),
                            data: image_data,
                        },
                    },
                    ContentBlock::Text { text: ANALYSIS_PROMPT },
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Join all text blocks of a reply
fn reply_text(response: MessagesResponse) -> VisionResult<String> {
    let text = response
        .content
        .into_iter()
        .filter(|b| b.kind == "text")
        .filter_map(|b| b.text)
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        Err(VisionError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl VisionClient for AnthropicVision {
    async fn describe_food(&self, image: &FoodImage) -> VisionResult<String> {
        let image_data = image.to_base64();
        let body = self.build_request(image, &image_data);

        tracing::info!(model = %self.model, bytes = image.len(), media_type = image.media_type(), "requesting food photo analysis");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "vision API returned an error");
            return Err(VisionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        reply_text(response.json::<MessagesResponse>().await?)
    }
}
