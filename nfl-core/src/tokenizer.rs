//! # Tokens da sentença
//!
//! O pós-processador recebe sentenças já tokenizadas e etiquetadas pelo
//! pipeline genérico (POS e NER por token). Este módulo define o [`Token`]
//! e oferece um tokenizador simples para quando só há texto cru, por exemplo
//! nas sentenças de demonstração ou em requisições `{"text": ...}` do servidor.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use nfl_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("The New England Patriots won 24-10.");
//! assert_eq!(tokens[1].text, "New");
//! assert_eq!(tokens[1].ner, "O");
//! ```

use serde::{Deserialize, Serialize};

/// Tag NER atribuída a tokens que não pertencem a nenhuma entidade.
pub const OUTSIDE_TAG: &str = "O";

/// Um token da sentença, como entregue pelo pipeline genérico.
///
/// O índice é estável durante todo o processamento da sentença; as menções
/// apontam para tokens por esse índice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Palavra de superfície (ex: "Patriots", ",", "24").
    pub text: String,
    /// Tag de classe gramatical (ex: "NNP", "VBD"). Vazia quando desconhecida.
    #[serde(default)]
    pub pos: String,
    /// Tag NER do etiquetador genérico (ex: "DATE", "O").
    #[serde(default = "outside_tag")]
    pub ner: String,
    /// Índice sequencial do token na sentença (0, 1, 2...).
    #[serde(default)]
    pub index: usize,
}

fn outside_tag() -> String {
    OUTSIDE_TAG.to_string()
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>, pos: impl Into<String>, ner: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: pos.into(),
            ner: ner.into(),
            index,
        }
    }

    /// Token sem POS e com NER `O`.
    pub fn plain(index: usize, text: impl Into<String>) -> Self {
        Self::new(index, text, "", OUTSIDE_TAG)
    }
}

/// Reatribui os índices para que coincidam com a posição na lista.
pub fn reindex(tokens: &mut [Token]) {
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
}

/// Abreviações que não devem ter o ponto separado
const ABBREVIATIONS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "Jr", "Sr", "St", "vs", "No", "Jan", "Feb", "Mar",
    "Apr", "Aug", "Sept", "Sep", "Oct", "Nov", "Dec", "Inc", "Co",
];

/// Tokeniza texto cru separando palavras, números e pontuação.
///
/// Os tokens saem sem POS e com NER `O`: este tokenizador não substitui o
/// pipeline genérico, apenas permite montar sentenças a partir de texto.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_alphanumeric() || (ch == '-' || ch == '\'') && !current.is_empty() {
            current.push(ch);
        } else if ch == '.' && !current.is_empty() {
            let is_abbrev = ABBREVIATIONS.contains(&current.as_str());
            // Números decimais (ex: 3.5)
            let current_is_num = current.chars().all(|c| c.is_ascii_digit());
            let next_is_num = chars.get(i + 1).map(|c| c.is_ascii_digit()).unwrap_or(false);

            if is_abbrev || (current_is_num && next_is_num) {
                current.push('.');
            } else {
                flush(&mut words, &mut current);
                words.push(".".to_string());
            }
        } else if ch.is_whitespace() {
            flush(&mut words, &mut current);
        } else {
            flush(&mut words, &mut current);
            words.push(ch.to_string());
        }
    }
    flush(&mut words, &mut current);

    words
        .into_iter()
        .enumerate()
        .map(|(i, w)| Token::plain(i, w))
        .collect()
}

/// Fecha a palavra acumulada (se não vazia)
fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}
