//! Configuração do cliente carregada a partir de `jobflow.toml`.
//!
//! A struct [`ClientConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `JOBFLOW_API_KEY` e `JOBFLOW_BASE_URL` têm
//! precedência sobre o arquivo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::state_machine::TransitionTable;

const CONFIG_FILE: &str = "jobflow.toml";

/// Configuração de nível superior carregada de `jobflow.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// URL base da API do serviço de jobs (sem barra final).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chave enviada como `Authorization: Bearer`. Vazia desativa o cabeçalho.
    #[serde(default)]
    pub api_key: String,

    /// Timeout de conexão em segundos.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Timeout total de cada requisição em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tabela de transições substituindo a embutida, se presente.
    /// Uma tabela inconsistente é rejeitada na leitura.
    #[serde(default)]
    pub transitions: Option<TransitionTable>,
}

// Valor padrão para a URL base: servidor local.
fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

// Valor padrão para o timeout de conexão: 10s.
fn default_connect_timeout_secs() -> u64 {
    10
}

// Valor padrão para o timeout de requisição: 30s.
fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            transitions: None,
        }
    }
}

impl ClientConfig {
    /// Carrega a configuração de `jobflow.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        let mut config = Self::read(Path::new(CONFIG_FILE))?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Carrega a configuração de um caminho explícito, que deve existir.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config = Self::parse(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::parse(&contents)
        } else {
            Ok(Self::default())
        }
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str::<ClientConfig>(contents)?)
    }

    /// Aplica as variáveis de ambiente; valores vazios são ignorados.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("JOBFLOW_API_KEY").filter(|v| !v.is_empty()) {
            self.api_key = key;
        }
        if let Some(url) = lookup("JOBFLOW_BASE_URL").filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
    }

    /// A tabela configurada, ou a embutida.
    pub fn transition_table(&self) -> TransitionTable {
        self.transitions.clone().unwrap_or_default()
    }
}
