// src/common/response.rs

use serde::Serialize;

/// Envelope de sucesso: { message, data? }
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Resposta apenas com mensagem (ex.: exclusões).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_only_omits_data() {
        let json = serde_json::to_value(ApiResponse::message("Cliente excluído com sucesso")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Cliente excluído com sucesso" }));
    }

    #[test]
    fn data_is_nested() {
        let json = serde_json::to_value(ApiResponse::new("ok", vec![1, 2])).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
