//! Narrator one-liners from a text-generation endpoint
//!
//! One request per game event, fire-and-forget. Nothing here retries, caches
//! or orders responses: whichever reply resolves last is what stays on screen.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::sim::Customization;

/// Model used for narration
pub const MODEL: &str = "gemini-3-flash-preview";
/// Sampling temperature
pub const TEMPERATURE: f32 = 0.9;
/// REST endpoint root
pub const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Shown when the model returns no text
pub const FALLBACK_LINE: &str = "Just keep moving.";
/// Narration before any request has resolved
pub const INITIAL_LINE: &str =
    "Wait... who is this? Ah, the new stick. Don't fall, it's embarrassing.";

/// Build-time API key (`GEMINI_API_KEY`). No key, no requests.
pub fn api_key() -> Option<&'static str> {
    option_env!("GEMINI_API_KEY").filter(|k| !k.is_empty())
}

/// Game events the narrator reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationEvent {
    Start,
    Win,
    Fail,
    Stuck,
}

impl NarrationEvent {
    /// Past-tense phrase used inside the prompt ("The player just ...")
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrationEvent::Start => "start",
            NarrationEvent::Win => "win",
            NarrationEvent::Fail => "fail",
            NarrationEvent::Stuck => "stuck",
        }
    }
}

/// A pending narration request, emitted by the game and executed by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationRequest {
    pub event: NarrationEvent,
    pub level: u32,
    pub custom: Customization,
}

impl NarrationRequest {
    pub fn prompt(&self) -> String {
        build_prompt(self.event, self.level, &self.custom)
    }
}

/// Prompt text for one event
pub fn build_prompt(event: NarrationEvent, level: u32, custom: &Customization) -> String {
    format!(
        "You are a cynical but slightly helpful narrator in a 2D stickman platformer. \
         The player just {} in Level {}. Their style is {} helm with a {}. \
         Provide a short, witty one-liner comment (max 15 words).",
        event.as_str(),
        level,
        custom.helm.as_str(),
        custom.accessory.as_str(),
    )
}

// === Wire format ===

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// JSON body for a `generateContent` call
pub fn request_body(prompt: &str) -> Result<String> {
    let body = GenerateRequest {
        contents: [Content {
            parts: [Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    };
    serde_json::to_string(&body).context("serialize narration request")
}

/// Full request URL for a model and key
pub fn request_url(model: &str, key: &str) -> String {
    format!("{ENDPOINT}/{model}:generateContent?key={key}")
}

/// Extract the narration line from a response body.
///
/// Text parts of the first candidate are joined. A well-formed response with
/// no text yields [`FALLBACK_LINE`]; a body that isn't JSON is an error.
pub fn parse_response(body: &str) -> Result<String> {
    let response: GenerateResponse =
        serde_json::from_str(body).context("parse narration response")?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        Ok(FALLBACK_LINE.to_string())
    } else {
        Ok(text.to_string())
    }
}

/// Perform one narration request from the browser
#[cfg(target_arch = "wasm32")]
pub async fn fetch_line(request: &NarrationRequest, key: &str) -> Result<String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let js_err = |e: wasm_bindgen::JsValue| anyhow::anyhow!("{e:?}");

    let body = request_body(&request.prompt())?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);
    init.set_body(&wasm_bindgen::JsValue::from_str(&body));

    let req = Request::new_with_str_and_init(&request_url(MODEL, key), &init)
        .map_err(js_err)
        .context("build narration request")?;
    req.headers()
        .set("Content-Type", "application/json")
        .map_err(js_err)?;

    let window = web_sys::window().context("no window")?;
    let resp_value = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(js_err)
        .context("narration fetch")?;
    let resp: Response = resp_value.dyn_into().map_err(js_err)?;
    if !resp.ok() {
        bail!("narration endpoint returned HTTP {}", resp.status());
    }

    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .context("narration body is not text")?;
    parse_response(&text)
}

/// Check a key before spending a request on it
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        bail!("empty API key");
    }
    if key.chars().any(|c| c.is_whitespace() || c == '&' || c == '?') {
        bail!("API key contains characters that can't go in a query string");
    }
    Ok(())
}
