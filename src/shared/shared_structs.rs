// src/shared/shared_structs.rs

use serde::{Deserialize, Deserializer, Serialize};

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Debug, Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
}

impl<T> GenericResponse<T> {
    /// Resposta de sucesso com corpo.
    pub fn sucesso(message: impl Into<String>, body: T) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }

    /// Resposta de erro com dados de contexto (saldo atual, contagem de bloqueios...).
    pub fn erro_com_contexto(message: impl Into<String>, body: T) -> Self {
        GenericResponse {
            status: "error".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }
}

impl GenericResponse<()> {
    pub fn erro(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "error".to_string(),
            message: message.into(),
            body: None,
        }
    }
}

/// Desserializa campos anuláveis de atualizações parciais.
///
/// Campo ausente => `None` (não altera), `null` => `Some(None)` (limpa o valor),
/// valor presente => `Some(Some(valor))`. Deve ser usado junto de `#[serde(default)]`.
pub fn campo_anulavel<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
