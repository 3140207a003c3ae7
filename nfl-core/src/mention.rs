//! # Menções de Entidades e Sentenças
//!
//! Uma **menção** é um trecho de tokens `[start, end)` rotulado com um tipo de
//! entidade. O etiquetador estatístico produz a lista inicial; o pós-processador
//! remove menções espúrias e acrescenta as que faltam.
//!
//! ## Tipos usados no domínio
//!
//! | Rótulo    | Significado                       | Exemplos                        |
//! |-----------|-----------------------------------|---------------------------------|
//! | `Date`    | Datas (vindas do NER genérico)    | "January 5", "Sunday"           |
//! | `NFLTeam` | Times da NFL                      | "New England Patriots", "Bears" |
//! | `NFLGame` | Referências a jogos               | "victory", "the game"           |
//!
//! Os rótulos são strings abertas: o etiquetador pode produzir outros tipos
//! (ex: `FinalScore`) e eles atravessam o pós-processamento intactos.

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

pub const DATE: &str = "Date";
pub const NFL_TEAM: &str = "NFLTeam";
pub const NFL_GAME: &str = "NFLGame";

/// Tag NER do etiquetador genérico que origina as menções `Date`.
pub const DATE_NER_TAG: &str = "DATE";

/// Uma menção de entidade sobre os tokens de uma sentença.
///
/// # Exemplo
/// Em "the new england patriots won", a menção do time é
/// `Mention { label: "NFLTeam", start: 1, end: 4, text: "new england patriots", .. }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Identificador único dentro do documento (ver [`make_mention_id`]).
    pub id: String,
    /// Tipo da entidade (ex: "Date", "NFLTeam").
    pub label: String,
    /// Índice do token inicial (inclusivo)
    pub start: usize,
    /// Índice do token final (exclusivo)
    pub end: usize,
    /// Texto da menção: as palavras do trecho unidas por espaço.
    #[serde(default)]
    pub text: String,
}

impl Mention {
    /// Cria uma menção sobre `tokens[start..end]`, derivando o texto do trecho.
    ///
    /// O chamador garante `start < end <= tokens.len()`.
    pub fn new(id: impl Into<String>, label: impl Into<String>, start: usize, end: usize, tokens: &[Token]) -> Self {
        debug_assert!(start < end && end <= tokens.len());
        Self {
            id: id.into(),
            label: label.into(),
            start,
            end,
            text: extent_text(tokens, start, end),
        }
    }

    pub fn is_type(&self, label: &str) -> bool {
        self.label == label
    }

    /// Quantidade de tokens cobertos.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Verifica se dois trechos compartilham algum token.
    pub fn overlaps(&self, other: &Mention) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for Mention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}, {}) {} \"{}\"", self.id, self.start, self.end, self.label, self.text)
    }
}

/// Texto de superfície de `tokens[start..end]`, separado por espaços simples.
pub fn extent_text(tokens: &[Token], start: usize, end: usize) -> String {
    tokens[start..end]
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Gera o identificador de uma menção a partir da sentença e do deslocamento.
///
/// Formato: `"{doc_id}-EntityMention-{sentença}-{deslocamento}"`, ou sem o
/// prefixo quando a sentença não tem documento associado.
pub fn make_mention_id(doc_id: Option<&str>, sentence_index: usize, offset: usize) -> String {
    match doc_id {
        Some(doc) => format!("{}-EntityMention-{}-{}", doc, sentence_index, offset),
        None => format!("EntityMention-{}-{}", sentence_index, offset),
    }
}

/// Uma sentença: tokens fixos e a lista editável de menções.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Documento de origem, usado como prefixo dos identificadores.
    #[serde(default)]
    pub doc_id: Option<String>,
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            doc_id: None,
            tokens,
            mentions: Vec::new(),
        }
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    pub fn mention_id(&self, sentence_index: usize, offset: usize) -> String {
        make_mention_id(self.doc_id.as_deref(), sentence_index, offset)
    }

    /// Descarta menções fora dos limites da sentença ou vazias.
    ///
    /// Entradas vindas de fora (JSON) passam por aqui antes do pós-processamento.
    pub fn retain_valid_mentions(&mut self) -> usize {
        let n = self.tokens.len();
        let before = self.mentions.len();
        self.mentions.retain(|m| m.start < m.end && m.end <= n);
        before - self.mentions.len()
    }

    /// Recalcula o texto de cada menção a partir dos tokens do seu trecho.
    ///
    /// Exige menções dentro dos limites (ver [`Sentence::retain_valid_mentions`]).
    pub fn refresh_mention_texts(&mut self) {
        let tokens = &self.tokens;
        for m in &mut self.mentions {
            m.text = extent_text(tokens, m.start, m.end);
        }
    }
}

/// Converte sequências contíguas de tokens com a mesma tag NER em menções.
///
/// Para cada sequência maximal de tokens cuja tag é `ner_tag`, acrescenta uma
/// menção do tipo `label`. Os identificadores continuam a numeração a partir
/// do tamanho atual da lista de menções.
///
/// # Exemplo
/// Tags `[O, DATE, DATE, O, DATE]` → menções `[1, 3)` e `[4, 5)`.
///
/// Retorna quantas menções foram criadas.
pub fn annotate_from_ner_tags(sentence: &mut Sentence, sentence_index: usize, ner_tag: &str, label: &str) -> usize {
    let mut created = Vec::new();
    let mut offset = sentence.mentions.len();
    let tokens = &sentence.tokens;
    let mut i = 0;

    while i < tokens.len() {
        if tokens[i].ner != ner_tag {
            i += 1;
            continue;
        }

        // Acumula tokens consecutivos com a mesma tag
        let start = i;
        while i < tokens.len() && tokens[i].ner == ner_tag {
            i += 1;
        }

        let id = make_mention_id(sentence.doc_id.as_deref(), sentence_index, offset);
        offset += 1;
        created.push(Mention::new(id, label, start, i, tokens));
    }

    let count = created.len();
    sentence.mentions.extend(created);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(words: &[(&str, &str)]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, (w, ner))| Token::new(i, *w, "", *ner))
            .collect()
    }

    #[test]
    fn test_extent_text() {
        let tokens = tagged(&[("the", "O"), ("second", "O"), ("half", "O")]);
        let m = Mention::new("m0", DATE, 0, 3, &tokens);
        assert_eq!(m.text, "the second half");
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_mention_id_format() {
        assert_eq!(make_mention_id(None, 3, 7), "EntityMention-3-7");
        assert_eq!(make_mention_id(Some("nyt-001"), 0, 2), "nyt-001-EntityMention-0-2");
    }

    #[test]
    fn test_overlaps() {
        let tokens = tagged(&[("a", "O"), ("b", "O"), ("c", "O"), ("d", "O")]);
        let a = Mention::new("a", NFL_TEAM, 0, 2, &tokens);
        let b = Mention::new("b", NFL_TEAM, 1, 3, &tokens);
        let c = Mention::new("c", NFL_TEAM, 2, 4, &tokens);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_annotate_from_ner_tags_runs() {
        let tokens = tagged(&[
            ("on", "O"),
            ("Sunday", "DATE"),
            ("night", "DATE"),
            ("and", "O"),
            ("Monday", "DATE"),
        ]);
        let mut sentence = Sentence::new(tokens);
        let created = annotate_from_ner_tags(&mut sentence, 2, DATE_NER_TAG, DATE);

        assert_eq!(created, 2);
        assert_eq!(sentence.mentions[0].start, 1);
        assert_eq!(sentence.mentions[0].end, 3);
        assert_eq!(sentence.mentions[0].text, "Sunday night");
        assert_eq!(sentence.mentions[0].id, "EntityMention-2-0");
        assert_eq!(sentence.mentions[1].start, 4);
        assert_eq!(sentence.mentions[1].end, 5);
        assert_eq!(sentence.mentions[1].id, "EntityMention-2-1");
        assert!(sentence.mentions.iter().all(|m| m.label == DATE));
    }

    #[test]
    fn test_annotate_continues_numbering() {
        let tokens = tagged(&[("Bears", "O"), ("Sunday", "DATE")]);
        let mut sentence = Sentence::new(tokens.clone());
        sentence.mentions.push(Mention::new("existing", NFL_TEAM, 0, 1, &tokens));

        annotate_from_ner_tags(&mut sentence, 0, DATE_NER_TAG, DATE);
        assert_eq!(sentence.mentions[1].id, "EntityMention-0-1");
    }

    #[test]
    fn test_annotate_empty_sentence() {
        let mut sentence = Sentence::default();
        assert_eq!(annotate_from_ner_tags(&mut sentence, 0, DATE_NER_TAG, DATE), 0);
        assert!(sentence.mentions.is_empty());
    }

    #[test]
    fn test_retain_valid_mentions() {
        let tokens = tagged(&[("a", "O"), ("b", "O")]);
        let mut sentence = Sentence::new(tokens.clone());
        sentence.mentions.push(Mention::new("ok", DATE, 0, 2, &tokens));
        sentence.mentions.push(Mention {
            id: "bad".into(),
            label: DATE.into(),
            start: 1,
            end: 5,
            text: String::new(),
        });
        assert_eq!(sentence.retain_valid_mentions(), 1);
        assert_eq!(sentence.mentions.len(), 1);
    }

    #[test]
    fn test_refresh_mention_texts() {
        let tokens = tagged(&[("On", "O"), ("January", "DATE"), ("5", "DATE")]);
        let mut sentence = Sentence::new(tokens);
        sentence.mentions.push(Mention {
            id: "m0".into(),
            label: DATE.into(),
            start: 1,
            end: 3,
            text: "' 1".into(),
        });
        sentence.refresh_mention_texts();
        assert_eq!(sentence.mentions[0].text, "January 5");
    }
}
