use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use crate::models::{
    ChatRequest, ErrorBody, FilesResponse, KbFile, MessageResponse, OutlineRequest, QuizQuestion,
    QuizRequest, QuizResponse, Settings,
};

/// Where the backend lives. The whole app talks to one fixed origin.
pub const BACKEND_URL: &str = "http://localhost:8000";

/// Everything that can go wrong talking to the backend. No variant is
/// fatal; each is surfaced inline, scoped to the operation that failed.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无法连接后端服务: {0}")]
    Transport(String),
    #[error("{detail}")]
    Status { code: StatusCode, detail: String },
    #[error("后端返回了意外的数据: {0}")]
    MalformedBody(String),
    #[error("响应中断: {0}")]
    Interrupted(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

pub struct ApiService;

impl ApiService {
    fn url(path: &str) -> String {
        format!("{}{}", BACKEND_URL.trim_end_matches('/'), path)
    }

    /// Turns a non-2xx response into a Status error, mining the body for
    /// the backend's `detail` (FastAPI) or `message` field, with a
    /// generic notice when neither parses.
    async fn status_error(resp: Response) -> ApiError {
        let code = resp.status();
        let detail = match resp.json::<ErrorBody>().await {
            Ok(body) => body
                .detail
                .or(body.message)
                .unwrap_or_else(|| format!("请求失败 ({})", code)),
            Err(_) => format!("请求失败 ({})", code),
        };
        ApiError::Status { code, detail }
    }

    async fn check(resp: Response) -> Result<Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(Self::status_error(resp).await)
        }
    }

    /// POST /build-kb. Rebuilds the backend's search index. Expensive;
    /// callers put this behind the confirmation gate.
    pub async fn build_kb() -> Result<String, ApiError> {
        let resp = Client::new().post(Self::url("/build-kb")).send().await?;
        let resp = Self::check(resp).await?;
        let body: MessageResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        Ok(body.message)
    }

    /// POST /chat. Returns the raw response so the caller can pick
    /// between the streamed body and the legacy `{answer}` JSON
    /// (see [`Self::is_legacy_json`]).
    pub async fn chat(request: &ChatRequest) -> Result<Response, ApiError> {
        let resp = Client::new()
            .post(Self::url("/chat"))
            .json(request)
            .send()
            .await?;
        Self::check(resp).await
    }

    /// A JSON content type signals the legacy whole-answer contract;
    /// anything else is consumed as a chunked text stream.
    pub fn is_legacy_json(resp: &Response) -> bool {
        resp.headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false)
    }

    /// GET /files. The returned listing fully replaces the local cache.
    pub async fn list_files() -> Result<Vec<KbFile>, ApiError> {
        let resp = Client::new().get(Self::url("/files")).send().await?;
        let resp = Self::check(resp).await?;
        let body: FilesResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        Ok(body.files)
    }

    /// POST /upload. One file per call, multipart field `file`.
    pub async fn upload_file(name: &str, bytes: Vec<u8>) -> Result<(), ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = Client::new()
            .post(Self::url("/upload"))
            .multipart(form)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// DELETE /files/{filename}. Destructive; behind the confirmation gate.
    pub async fn delete_file(name: &str) -> Result<(), ApiError> {
        let resp = Client::new()
            .delete(Self::url(&format!("/files/{}", name)))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// GET /settings. Fetches the full configuration map.
    pub async fn get_settings() -> Result<Settings, ApiError> {
        let resp = Client::new().get(Self::url("/settings")).send().await?;
        let resp = Self::check(resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::MalformedBody(e.to_string()))
    }

    /// POST /settings. Full overwrite; every known field is sent every
    /// time, changed or not.
    pub async fn save_settings(settings: &Settings) -> Result<String, ApiError> {
        let resp = Client::new()
            .post(Self::url("/settings"))
            .json(settings)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: MessageResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        Ok(body.message)
    }

    /// POST /quiz. Atomic: one JSON payload with the full question list.
    /// A success body without the list is a malformed-body error, never
    /// an empty success.
    pub async fn generate_quiz(request: &QuizRequest) -> Result<Vec<QuizQuestion>, ApiError> {
        let resp = Client::new()
            .post(Self::url("/quiz"))
            .json(request)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: QuizResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        body.questions
            .ok_or_else(|| ApiError::MalformedBody("缺少 questions 字段".to_string()))
    }

    /// POST /outline. Always a streamed text body.
    pub async fn generate_outline(request: &OutlineRequest) -> Result<Response, ApiError> {
        let resp = Client::new()
            .post(Self::url("/outline"))
            .json(request)
            .send()
            .await?;
        Self::check(resp).await
    }
}
