//! # Pós-processador de Sentenças — Orquestrador com Eventos Observáveis
//!
//! Para cada sentença, na ordem:
//!
//! 1. Deriva menções `Date` das sequências `DATE` do NER genérico (o CRF do
//!    domínio não reconhece datas).
//! 2. Guarda o número de menções existentes: é o deslocamento dos novos
//!    identificadores.
//! 3. Remove menções espúrias ([`MentionFilter`]).
//! 4. Injeta os times encontrados no gazetteer ([`DictionaryScanner`]).
//!
//! O deslocamento do passo 2 é capturado **antes** do filtro e não é ajustado
//! pelas remoções; consumidores dependem dessa numeração.
//!
//! Assim como no pipeline de análise, cada passo pode emitir eventos por um
//! canal `mpsc`, o que permite ao servidor WebSocket transmitir o progresso.

use std::sync::mpsc;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PostprocessConfig;
use crate::filter::{MentionFilter, RemovalReason};
use crate::gazetteer::Gazetteer;
use crate::mention::{annotate_from_ner_tags, Mention, Sentence, DATE, DATE_NER_TAG};
use crate::scanner::DictionaryScanner;

/// Eventos emitidos durante o pós-processamento de uma sentença.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PostprocessEvent {
    /// **Passo 1**: menções `Date` derivadas das tags do NER genérico.
    DatesDerived {
        sentence_index: usize,
        count: usize,
    },
    /// **Passo 3**: uma menção foi descartada pelo filtro.
    MentionRemoved {
        sentence_index: usize,
        mention: Mention,
        reason: RemovalReason,
    },
    /// **Passo 4**: uma menção foi acrescentada a partir do gazetteer.
    MentionAdded {
        sentence_index: usize,
        mention: Mention,
    },
    /// **Conclusão**: lista final de menções da sentença.
    Done {
        sentence_index: usize,
        mentions: Vec<Mention>,
    },
}

/// Contagens de uma passada (sentença ou documento).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostprocessReport {
    pub sentences: usize,
    pub dates_derived: usize,
    pub removed: usize,
    pub added: usize,
}

impl std::ops::Add for PostprocessReport {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            sentences: self.sentences + other.sentences,
            dates_derived: self.dates_derived + other.dates_derived,
            removed: self.removed + other.removed,
            added: self.added + other.added,
        }
    }
}

/// O pós-processador de menções do domínio NFL.
///
/// O gazetteer é construído uma vez e compartilhado por `Arc`; o
/// pós-processador só o lê, então pode ser usado por várias threads ao mesmo
/// tempo (ver [`SentencePostprocessor::postprocess_document`]).
#[derive(Debug, Clone)]
pub struct SentencePostprocessor {
    gazetteer: Arc<Gazetteer>,
    config: PostprocessConfig,
}

impl SentencePostprocessor {
    pub fn new(gazetteer: Arc<Gazetteer>, config: PostprocessConfig) -> Self {
        Self { gazetteer, config }
    }

    /// Pós-processador com a política padrão.
    pub fn with_gazetteer(gazetteer: Arc<Gazetteer>) -> Self {
        Self::new(gazetteer, PostprocessConfig::default())
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn config(&self) -> &PostprocessConfig {
        &self.config
    }

    /// Pós-processa uma sentença, alterando suas menções no lugar.
    pub fn postprocess(&self, sentence: &mut Sentence, sentence_index: usize) {
        self.run(sentence, sentence_index, None);
    }

    /// Igual a [`postprocess`](Self::postprocess), enviando eventos de progresso por `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `DatesDerived`
    /// 2. `MentionRemoved` (um por remoção, na ordem da lista)
    /// 3. `MentionAdded` (um por inserção, da esquerda para a direita)
    /// 4. `Done`
    pub fn postprocess_streaming(
        &self,
        sentence: &mut Sentence,
        sentence_index: usize,
        tx: &mpsc::Sender<PostprocessEvent>,
    ) -> PostprocessReport {
        self.run(sentence, sentence_index, Some(tx))
    }

    /// Pós-processa todas as sentenças de um documento em paralelo.
    ///
    /// O índice de cada sentença é a sua posição na lista.
    pub fn postprocess_document(&self, sentences: &mut [Sentence]) -> PostprocessReport {
        let report = sentences
            .par_iter_mut()
            .enumerate()
            .map(|(i, sentence)| self.run(sentence, i, None))
            .reduce(PostprocessReport::default, |a, b| a + b);

        info!(
            "{} sentenças pós-processadas: {} datas derivadas, {} menções removidas, {} adicionadas",
            report.sentences, report.dates_derived, report.removed, report.added
        );
        report
    }

    fn run(
        &self,
        sentence: &mut Sentence,
        sentence_index: usize,
        tx: Option<&mpsc::Sender<PostprocessEvent>>,
    ) -> PostprocessReport {
        let emit = |event: PostprocessEvent| {
            if let Some(tx) = tx {
                let _ = tx.send(event);
            }
        };

        // === Passo 1: datas do NER genérico ===
        let dates_derived = annotate_from_ner_tags(sentence, sentence_index, DATE_NER_TAG, DATE);
        emit(PostprocessEvent::DatesDerived {
            sentence_index,
            count: dates_derived,
        });

        // === Passo 2: deslocamento dos identificadores ===
        let original_count = sentence.mentions.len();

        // === Passo 3: filtro ===
        let filter = MentionFilter::new(self.config.filter);
        let outcome = filter.apply(&sentence.mentions, &sentence.tokens);
        sentence.mentions = outcome.kept;
        let removed = outcome.removed.len();
        for (mention, reason) in outcome.removed {
            emit(PostprocessEvent::MentionRemoved {
                sentence_index,
                mention,
                reason,
            });
        }

        // === Passo 4: varredura do gazetteer ===
        let scanner = DictionaryScanner::new(
            &self.gazetteer,
            self.config.filter.prefer_dictionary_for_teams,
            self.config.scanner,
        );
        let added = scanner.scan(sentence, sentence_index, original_count);
        let added_count = added.len();
        for mention in added {
            emit(PostprocessEvent::MentionAdded {
                sentence_index,
                mention,
            });
        }

        emit(PostprocessEvent::Done {
            sentence_index,
            mentions: sentence.mentions.clone(),
        });

        PostprocessReport {
            sentences: 1,
            dates_derived,
            removed,
            added: added_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterPolicy;
    use crate::mention::{NFL_GAME, NFL_TEAM};
    use crate::tokenizer::Token;

    fn gazetteer() -> Arc<Gazetteer> {
        Arc::new(
            Gazetteer::from_entries(
                [
                    ("New England Patriots", NFL_TEAM),
                    ("Patriots", NFL_TEAM),
                    ("New York Jets", NFL_TEAM),
                    ("Jets", NFL_TEAM),
                    ("win", NFL_GAME),
                ],
                5,
            )
            .unwrap(),
        )
    }

    fn tokens(words: &[(&str, &str, &str)]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, (w, pos, ner))| Token::new(i, *w, *pos, *ner))
            .collect()
    }

    /// "The Patriots beat the Jets in the second half on Sunday"
    fn game_sentence() -> Sentence {
        let toks = tokens(&[
            ("The", "DT", "O"),
            ("Patriots", "NNPS", "ORGANIZATION"),
            ("beat", "VBD", "O"),
            ("the", "DT", "O"),
            ("Jets", "NNPS", "ORGANIZATION"),
            ("in", "IN", "O"),
            ("the", "DT", "DATE"),
            ("second", "JJ", "DATE"),
            ("half", "NN", "DATE"),
            ("on", "IN", "O"),
            ("Sunday", "NNP", "DATE"),
        ]);
        let mut sentence = Sentence::new(toks.clone());
        // Saída do CRF: um time (que será trocado pelo do gazetteer) e um jogo
        sentence.mentions.push(Mention::new("EntityMention-0-0", NFL_TEAM, 1, 2, &toks));
        sentence.mentions.push(Mention::new("EntityMention-0-1", NFL_GAME, 2, 3, &toks));
        sentence
    }

    #[test]
    fn test_postprocess_full_flow() {
        let pp = SentencePostprocessor::with_gazetteer(gazetteer());
        let mut sentence = game_sentence();
        pp.postprocess(&mut sentence, 0);

        let summary: Vec<(&str, usize, usize, &str)> = sentence
            .mentions
            .iter()
            .map(|m| (m.label.as_str(), m.start, m.end, m.id.as_str()))
            .collect();

        // Datas derivadas: "the second half" (id 2, depois removida) e "Sunday" (id 3).
        // Deslocamento = 4 menções antes do filtro.
        assert_eq!(
            summary,
            vec![
                (NFL_GAME, 2, 3, "EntityMention-0-1"),
                (DATE, 10, 11, "EntityMention-0-3"),
                (NFL_TEAM, 1, 2, "EntityMention-0-4"),
                (NFL_TEAM, 4, 5, "EntityMention-0-5"),
            ]
        );
    }

    #[test]
    fn test_streaming_events_order() {
        let pp = SentencePostprocessor::with_gazetteer(gazetteer());
        let mut sentence = game_sentence();
        let (tx, rx) = mpsc::channel();
        let report = pp.postprocess_streaming(&mut sentence, 0, &tx);
        drop(tx);

        let events: Vec<PostprocessEvent> = rx.iter().collect();
        assert!(matches!(events[0], PostprocessEvent::DatesDerived { count: 2, .. }));
        assert!(matches!(
            events[1],
            PostprocessEvent::MentionRemoved { reason: RemovalReason::TeamFromTagger, .. }
        ));
        assert!(matches!(
            events[2],
            PostprocessEvent::MentionRemoved { reason: RemovalReason::GameTime, .. }
        ));
        assert!(matches!(events[3], PostprocessEvent::MentionAdded { .. }));
        assert!(matches!(events[4], PostprocessEvent::MentionAdded { .. }));
        match events.last().unwrap() {
            PostprocessEvent::Done { mentions, .. } => assert_eq!(mentions, &sentence.mentions),
            other => panic!("último evento deveria ser Done: {:?}", other),
        }

        assert_eq!(
            report,
            PostprocessReport {
                sentences: 1,
                dates_derived: 2,
                removed: 2,
                added: 2,
            }
        );
    }

    #[test]
    fn test_tagger_teams_kept_without_dictionary_preference() {
        let config = PostprocessConfig {
            filter: FilterPolicy {
                prefer_dictionary_for_teams: false,
                ..FilterPolicy::default()
            },
            ..PostprocessConfig::default()
        };
        let pp = SentencePostprocessor::new(gazetteer(), config);
        let mut sentence = game_sentence();
        pp.postprocess(&mut sentence, 0);

        let teams: Vec<&Mention> = sentence.mentions.iter().filter(|m| m.is_type(NFL_TEAM)).collect();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].id, "EntityMention-0-0");
    }

    #[test]
    fn test_empty_sentence_is_noop() {
        let pp = SentencePostprocessor::with_gazetteer(gazetteer());
        let mut sentence = Sentence::default();
        pp.postprocess(&mut sentence, 0);
        assert!(sentence.tokens.is_empty());
        assert!(sentence.mentions.is_empty());
    }

    #[test]
    fn test_document_parallel_matches_sequential() {
        let pp = SentencePostprocessor::with_gazetteer(gazetteer());
        let mut parallel: Vec<Sentence> = (0..16).map(|_| game_sentence()).collect();
        let mut sequential = parallel.clone();

        let report = pp.postprocess_document(&mut parallel);
        for (i, sentence) in sequential.iter_mut().enumerate() {
            pp.postprocess(sentence, i);
        }

        assert_eq!(parallel, sequential);
        assert_eq!(report.sentences, 16);
        assert_eq!(report.added, 32);
        assert_eq!(parallel[7].mentions[2].id, "EntityMention-7-4");
    }
}
