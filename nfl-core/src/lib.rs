//! # nfl-core — Pós-processamento de Menções para o Domínio NFL
//!
//! Camada de correção aplicada depois de um pipeline genérico de extração de
//! informação. Cada sentença chega com tokens (palavra, POS, NER) e com a lista
//! de menções prevista pelo etiquetador estatístico; o pós-processamento
//! corrige essa lista sem nenhum estado entre sentenças.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Datas** ([`mention`]): sequências `DATE` do NER genérico viram menções `Date`.
//! 2.  **Filtro** ([`filter`]): remove falsos positivos sistemáticos
//!     ("second half" como data, fragmentos como "' 1", times do CRF).
//! 3.  **Varredura** ([`scanner`]): maior casamento à esquerda contra o
//!     [`gazetteer`], injetando os times que o CRF deixou passar.
//! 4.  **Orquestração** ([`pipeline`]): executa os passos por sentença e emite eventos.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::sync::Arc;
//! use nfl_core::{Gazetteer, Sentence, SentencePostprocessor};
//! use nfl_core::tokenizer::tokenize;
//!
//! // 1. O gazetteer é construído uma vez e compartilhado
//! let gazetteer = Gazetteer::from_entries([("New England Patriots", "NFLTeam")], 4).unwrap();
//! let postprocessor = SentencePostprocessor::with_gazetteer(Arc::new(gazetteer));
//!
//! // 2. Uma sentença vinda do pipeline genérico
//! let mut sentence = Sentence::new(tokenize("the new england patriots won"));
//!
//! // 3. Corrige as menções no lugar
//! postprocessor.postprocess(&mut sentence, 0);
//! assert_eq!(sentence.mentions[0].start, 1);
//! assert_eq!(sentence.mentions[0].end, 4);
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod gazetteer;
pub mod mention;
pub mod pipeline;
pub mod scanner;
pub mod tokenizer;

pub use config::{FilterPolicy, GazetteerConfig, PostprocessConfig, ScanPolicy};
pub use error::{Error, Result};
pub use filter::{MentionFilter, RemovalReason};
pub use gazetteer::{Gazetteer, MAX_PHRASE_LENGTH};
pub use mention::{Mention, Sentence};
pub use pipeline::{PostprocessEvent, PostprocessReport, SentencePostprocessor};
pub use scanner::DictionaryScanner;
pub use tokenizer::Token;
