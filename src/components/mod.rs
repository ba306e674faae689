pub mod chat_area;
pub mod confirm;
pub mod knowledge_base;
pub mod outline;
pub mod quiz;
pub mod settings;
pub mod sidebar;
