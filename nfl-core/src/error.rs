//! Erros de carregamento do gazetteer e da configuração.
//!
//! O núcleo (filtro e varredura) não falha: qualquer entrada bem formada é
//! processada. Apenas a leitura de recursos externos pode dar errado.

use std::path::PathBuf;

use thiserror::Error;

/// Erros que podem ocorrer ao carregar o gazetteer ou a configuração.
#[derive(Debug, Error)]
pub enum Error {
    #[error("falha ao ler {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("linha {line}: frase vazia no gazetteer")]
    EmptyPhrase { line: usize },

    #[error("linha {line}: rótulo vazio no gazetteer")]
    EmptyLabel { line: usize },

    #[error("linha {line}: rótulo sem nenhuma frase associada")]
    MissingPhrase { line: usize },

    #[error("configuração inválida: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
