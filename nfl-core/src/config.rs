//! # Configuração do Pós-processamento
//!
//! Todas as chaves têm valor padrão, então um arquivo vazio equivale à política
//! de produção. As opções marcadas como *alternativas desativadas* existem
//! apenas para experimentação: melhoram a precisão das menções, mas pioram a
//! extração de relações feita depois, e por isso ficam desligadas.
//!
//! ```toml
//! [gazetteer]
//! path = "data/nfl_gazetteer.tsv"
//! max_phrase_length = 5
//!
//! [filter]
//! prefer_dictionary_for_teams = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gazetteer::{Gazetteer, MAX_PHRASE_LENGTH};

/// Configuração completa do pós-processador.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    pub gazetteer: GazetteerConfig,
    pub filter: FilterPolicy,
    pub scanner: ScanPolicy,
}

/// Origem e limite de janela do gazetteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerConfig {
    /// Arquivo TSV do gazetteer. Sem caminho, usa-se o gazetteer de demonstração.
    pub path: Option<PathBuf>,
    /// Tamanho máximo (em tokens) das frases consultadas.
    pub max_phrase_length: usize,
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_phrase_length: MAX_PHRASE_LENGTH,
        }
    }
}

impl GazetteerConfig {
    /// Carrega o gazetteer do arquivo configurado, se houver.
    pub fn load(&self) -> Result<Option<Gazetteer>> {
        self.path
            .as_ref()
            .map(|path| Gazetteer::load(path, self.max_phrase_length))
            .transpose()
    }
}

/// Política do filtro de menções espúrias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPolicy {
    /// Descarta todos os times vindos do etiquetador; o gazetteer passa a ser
    /// a única fonte de `NFLTeam`. Também habilita a varredura de times.
    pub prefer_dictionary_for_teams: bool,
    /// Alternativa desativada: descarta `NFLGame` cujo último token não é substantivo.
    pub drop_games_without_noun_head: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            prefer_dictionary_for_teams: true,
            drop_games_without_noun_head: false,
        }
    }
}

/// Política da varredura por gazetteer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanPolicy {
    /// Alternativa desativada: aceita também `NFLGame` do gazetteer quando
    /// precedido por um placar e fora de jogos já anotados.
    pub games_from_gazetteer: bool,
}

impl PostprocessConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_production_policy() {
        let config = PostprocessConfig::default();
        assert!(config.filter.prefer_dictionary_for_teams);
        assert!(!config.filter.drop_games_without_noun_head);
        assert!(!config.scanner.games_from_gazetteer);
        assert_eq!(config.gazetteer.max_phrase_length, MAX_PHRASE_LENGTH);
        assert!(config.gazetteer.path.is_none());
    }

    #[test]
    fn test_empty_toml_equals_default() {
        let config = PostprocessConfig::from_toml_str("").unwrap();
        assert_eq!(config, PostprocessConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = PostprocessConfig::from_toml_str(
            "[gazetteer]\nmax_phrase_length = 4\n\n[filter]\nprefer_dictionary_for_teams = false\n",
        )
        .unwrap();
        assert_eq!(config.gazetteer.max_phrase_length, 4);
        assert!(!config.filter.prefer_dictionary_for_teams);
        assert!(!config.filter.drop_games_without_noun_head);
    }

    #[test]
    fn test_invalid_toml() {
        let err = PostprocessConfig::from_toml_str("[filter]\nprefer_dictionary_for_teams = \"sim\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_config_and_gazetteer() {
        let dir = tempfile::tempdir().unwrap();
        let gaz_path = dir.path().join("gaz.tsv");
        std::fs::write(&gaz_path, "NFLTeam\tChicago Bears\tBears\n").unwrap();

        let config_path = dir.path().join("nfl.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "[gazetteer]").unwrap();
        writeln!(file, "path = {:?}", gaz_path.to_str().unwrap()).unwrap();
        writeln!(file, "max_phrase_length = 3").unwrap();

        let config = PostprocessConfig::load(&config_path).unwrap();
        let gaz = config.gazetteer.load().unwrap().unwrap();
        assert_eq!(gaz.max_phrase_length(), 3);
        assert_eq!(gaz.lookup("bears"), Some("NFLTeam"));
    }

    #[test]
    fn test_no_path_loads_nothing() {
        assert!(GazetteerConfig::default().load().unwrap().is_none());
    }
}
