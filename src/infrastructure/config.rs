use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub gemini: GeminiSettings,
    pub insights: InsightSettings,
    pub widgets: WidgetSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    #[serde(default)]
    pub ephemeral: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiSettings {
    pub api_base: String,
    pub model: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InsightSettings {
    pub max_input_bytes: usize,
    pub prompt_template: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetSettings {
    pub defaults: Vec<String>,
}

/// Load `config/app` (any format the config crate knows), then apply
/// `PMBRAIN__SECTION__KEY` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app"))
        .add_source(
            config::Environment::with_prefix("PMBRAIN")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a prompt string
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
