use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// One of the five top-level screens. Switching modes never clears
/// another mode's state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Chat,
    Quiz,
    Outline,
    KnowledgeBase,
    Settings,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct KbFile {
    pub name: String,
    pub size: u64,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuizKind {
    #[serde(rename = "choice")]
    Choice,
    #[serde(rename = "short-answer")]
    ShortAnswer,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Simple,
    Hard,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuizKind,
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub answer: String,
    pub explanation: String,
    pub source: String,
}

/// Dismissible inline notice for operation outcomes (save/delete/rebuild/upload).
#[derive(Clone, PartialEq, Debug)]
pub struct Notice {
    pub id: String,
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoticeKind {
    Info,
    Error,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), kind: NoticeKind::Info, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), kind: NoticeKind::Error, text: text.into() }
    }
}

/// The backend's configuration map. The wire format is a flat JSON object
/// keyed by the upper-case names below; the four numeric fields are real
/// integers on the wire and coerced from form text at the edit boundary.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Settings {
    #[serde(rename = "OPENAI_API_KEY")]
    pub api_key: String,
    #[serde(rename = "OPENAI_API_BASE")]
    pub api_base_url: String,
    #[serde(rename = "MODEL_NAME")]
    pub primary_model: String,
    #[serde(rename = "FAST_MODEL_NAME")]
    pub fast_model: String,
    #[serde(rename = "OPENAI_EMBEDDING_MODEL")]
    pub embedding_model: String,
    #[serde(rename = "DATA_DIR")]
    pub data_dir: String,
    #[serde(rename = "VECTOR_DB_PATH")]
    pub vector_db_path: String,
    #[serde(rename = "TOP_K")]
    pub top_k: u32,
    #[serde(rename = "CHUNK_SIZE")]
    pub chunk_size: u32,
    #[serde(rename = "CHUNK_OVERLAP")]
    pub chunk_overlap: u32,
    #[serde(rename = "MAX_TOKENS")]
    pub max_tokens: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
            primary_model: "qwen3-max".to_string(),
            fast_model: "qwen-flash".to_string(),
            embedding_model: "text-embedding-v2".to_string(),
            data_dir: "./data".to_string(),
            vector_db_path: "./vector_db".to_string(),
            top_k: 10,
            chunk_size: 500,
            chunk_overlap: 50,
            max_tokens: 4096,
        }
    }
}

/// Editable fields of [`Settings`], named for the form controls.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettingsField {
    ApiKey,
    ApiBaseUrl,
    PrimaryModel,
    FastModel,
    EmbeddingModel,
    DataDir,
    VectorDbPath,
    TopK,
    ChunkSize,
    ChunkOverlap,
    MaxTokens,
}

impl Settings {
    /// Applies raw form text to one field. Integer fields are parsed;
    /// text that does not parse leaves the current value untouched and
    /// reports false so the form can flag it.
    pub fn apply_field(&mut self, field: SettingsField, raw: &str) -> bool {
        match field {
            SettingsField::ApiKey => self.api_key = raw.to_string(),
            SettingsField::ApiBaseUrl => self.api_base_url = raw.to_string(),
            SettingsField::PrimaryModel => self.primary_model = raw.to_string(),
            SettingsField::FastModel => self.fast_model = raw.to_string(),
            SettingsField::EmbeddingModel => self.embedding_model = raw.to_string(),
            SettingsField::DataDir => self.data_dir = raw.to_string(),
            SettingsField::VectorDbPath => self.vector_db_path = raw.to_string(),
            SettingsField::TopK => return self.parse_into(raw, |s| &mut s.top_k),
            SettingsField::ChunkSize => return self.parse_into(raw, |s| &mut s.chunk_size),
            SettingsField::ChunkOverlap => return self.parse_into(raw, |s| &mut s.chunk_overlap),
            SettingsField::MaxTokens => return self.parse_into(raw, |s| &mut s.max_tokens),
        }
        true
    }

    fn parse_into(&mut self, raw: &str, dest: impl FnOnce(&mut Self) -> &mut u32) -> bool {
        match raw.trim().parse::<u32>() {
            Ok(n) => {
                *dest(self) = n;
                true
            }
            Err(_) => false,
        }
    }
}

// API DTOs

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub query: String,
    pub history: Vec<Message>,
}

/// Legacy non-streamed chat contract: one JSON object with the whole answer.
#[derive(Deserialize, Debug)]
pub struct ChatAnswer {
    pub answer: String,
}

#[derive(Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct FilesResponse {
    pub files: Vec<KbFile>,
}

#[derive(Serialize, Debug)]
pub struct QuizRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(rename = "type")]
    pub kind: QuizKind,
    pub num_questions: u8,
}

/// `questions` is optional so a success body missing the list can be
/// told apart from an empty-but-valid result.
#[derive(Deserialize, Debug)]
pub struct QuizResponse {
    pub questions: Option<Vec<QuizQuestion>>,
}

#[derive(Serialize, Debug)]
pub struct OutlineRequest {
    pub topic: String,
}

/// Error body shape shared by all non-2xx responses; the backend uses
/// `detail` (FastAPI) but `message` is accepted as a fallback.
#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub detail: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_wire_keys_round_trip() {
        let mut s = Settings::default();
        s.api_key = "sk-test".into();
        s.top_k = 7;

        let json = serde_json::to_string(&s).unwrap();
        // Full-overwrite contract: every known key is present every time.
        for key in [
            "OPENAI_API_KEY",
            "OPENAI_API_BASE",
            "MODEL_NAME",
            "FAST_MODEL_NAME",
            "OPENAI_EMBEDDING_MODEL",
            "DATA_DIR",
            "VECTOR_DB_PATH",
            "TOP_K",
            "CHUNK_SIZE",
            "CHUNK_OVERLAP",
            "MAX_TOKENS",
        ]
        .iter()
        {
            assert!(json.contains(key), "missing {} in {}", key, json);
        }

        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn integer_field_coercion() {
        let mut s = Settings::default();
        assert!(s.apply_field(SettingsField::ChunkSize, "800"));
        assert_eq!(s.chunk_size, 800);
        assert!(s.apply_field(SettingsField::TopK, " 3 "));
        assert_eq!(s.top_k, 3);
        assert!(s.apply_field(SettingsField::ChunkOverlap, "80"));
        assert_eq!(s.chunk_overlap, 80);
        assert!(s.apply_field(SettingsField::MaxTokens, "2048"));
        assert_eq!(s.max_tokens, 2048);

        assert!(!s.apply_field(SettingsField::ChunkSize, "九百"));
        assert_eq!(s.chunk_size, 800);

        // junk leaves the stored value alone
        assert!(!s.apply_field(SettingsField::MaxTokens, "lots"));
        assert_eq!(s.max_tokens, 2048);
        assert!(!s.apply_field(SettingsField::ChunkOverlap, "-5"));
        assert_eq!(s.chunk_overlap, 80);
    }

    #[test]
    fn text_fields_are_opaque() {
        let mut s = Settings::default();
        assert!(s.apply_field(SettingsField::ApiKey, "  sk-并不校验  "));
        assert_eq!(s.api_key, "  sk-并不校验  ");
    }

    #[test]
    fn quiz_response_distinguishes_missing_from_empty() {
        let missing: QuizResponse = serde_json::from_str("{}").unwrap();
        assert!(missing.questions.is_none());

        let empty: QuizResponse = serde_json::from_str(r#"{"questions":[]}"#).unwrap();
        assert_eq!(empty.questions.unwrap().len(), 0);
    }

    #[test]
    fn quiz_question_wire_shape() {
        let q: QuizQuestion = serde_json::from_str(
            r#"{
                "id": "q1",
                "type": "choice",
                "question": "注意力机制的作用是什么？",
                "options": ["A", "B", "C", "D"],
                "answer": "A",
                "explanation": "见第三讲",
                "source": "lecture3.pdf"
            }"#,
        )
        .unwrap();
        assert_eq!(q.kind, QuizKind::Choice);
        assert_eq!(q.options.as_ref().unwrap().len(), 4);

        let short: QuizQuestion = serde_json::from_str(
            r#"{"id":"q2","type":"short-answer","question":"?","answer":"a","explanation":"e","source":"s"}"#,
        )
        .unwrap();
        assert_eq!(short.kind, QuizKind::ShortAnswer);
        assert!(short.options.is_none());
    }

    #[test]
    fn message_roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
        let json = serde_json::to_string(&Message::assistant("yo")).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }
}
