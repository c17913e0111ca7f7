//! Key/value bot configuration stored in the `bot_config` table.
//!
//! Values are text. Compound values (objects and arrays) are stored as JSON;
//! on read, anything that parses as JSON is returned decoded and everything
//! else comes back as a plain string.

use serde_json::{Value, json};

pub const ADSENSE_PUBLISHER_ID: &str = "adsense_publisher_id";
pub const ADSENSE_SLOT_ID: &str = "adsense_slot_id";

pub fn encode_config_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn decode_config_value(raw: Option<&str>) -> Value {
    match raw {
        None => Value::Null,
        Some(raw) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
    }
}

/// Text form of a setting used as a switch: empty strings, null and false
/// all mean "not configured".
pub fn configured_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Values written at startup for keys that are not present yet.
pub fn default_settings() -> Vec<(&'static str, Value)> {
    vec![
        ("bot_name", json!("Atual.bot")),
        (
            "bot_description",
            json!("Plataforma Inteligente de Automação de Vagas e Notícias"),
        ),
        ("theme", json!("dark")),
        (ADSENSE_PUBLISHER_ID, json!("")),
        (ADSENSE_SLOT_ID, json!("")),
        ("whatsapp_support_number", json!("")),
        (
            "estados_brasil",
            json!([
                "AC - Acre",
                "AL - Alagoas",
                "AP - Amapá",
                "AM - Amazonas",
                "BA - Bahia",
                "CE - Ceará",
                "DF - Distrito Federal",
                "ES - Espírito Santo",
                "GO - Goiás",
                "MA - Maranhão",
                "MT - Mato Grosso",
                "MS - Mato Grosso do Sul",
                "MG - Minas Gerais",
                "PA - Pará",
                "PB - Paraíba",
                "PR - Paraná",
                "PE - Pernambuco",
                "PI - Piauí",
                "RJ - Rio de Janeiro",
                "RN - Rio Grande do Norte",
                "RS - Rio Grande do Sul",
                "RO - Rondônia",
                "RR - Roraima",
                "SC - Santa Catarina",
                "SP - São Paulo",
                "SE - Sergipe",
                "TO - Tocantins"
            ]),
        ),
        (
            "ai_providers_available",
            json!([
                "ChatGPT-4o",
                "ChatGPT-4 Turbo",
                "ChatGPT-3.5 Turbo",
                "Gemini 1.5 Pro",
                "Gemini 1.5 Flash",
                "Claude 3 Opus",
                "Claude 3 Sonnet",
                "Claude 3 Haiku",
                "Llama 3",
                "Mistral Large",
                "Qwen (Tongyi Qianwen)",
                "Command R+",
                "Perplexity Online",
                "Manus"
            ]),
        ),
    ]
}
